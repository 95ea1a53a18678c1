//! Runs the feed fetches on a tokio runtime so the UI thread never waits on
//! the network. Results come back over a channel and are drained once per
//! frame.

use crate::{
    core::composer::{FeedEvent, MapComposer},
    data::feed::{FeedKind, FeedSource},
};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type Notify = Arc<dyn Fn() + Send + Sync>;

pub struct FeedLoader {
    tx: Sender<FeedEvent>,
    rx: Receiver<FeedEvent>,
    notify: Option<Notify>,
}

impl FeedLoader {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            notify: None,
        }
    }

    /// Called from the fetch task after each result is queued, e.g. to wake
    /// the UI.
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Spawns one independent task per feed.
    pub fn spawn_all(&self, runtime: &Handle, source: Arc<dyn FeedSource>) -> Vec<JoinHandle<()>> {
        FeedKind::ALL
            .iter()
            .map(|&kind| self.spawn(runtime, Arc::clone(&source), kind))
            .collect()
    }

    pub fn spawn(&self, runtime: &Handle, source: Arc<dyn FeedSource>, kind: FeedKind) -> JoinHandle<()> {
        let tx = self.tx.clone();
        let notify = self.notify.clone();

        runtime.spawn(async move {
            log::debug!("fetching {} feed in background", kind);
            let result = source.fetch(kind).await;
            if tx.send(FeedEvent::new(kind, result)).is_err() {
                log::warn!("{} feed finished after the map was closed", kind);
                return;
            }
            if let Some(notify) = notify {
                notify();
            }
        })
    }

    pub fn try_recv(&self) -> Option<FeedEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Hands every queued result to the composer; returns how many there were.
    pub fn drain_into(&self, composer: &mut MapComposer) -> usize {
        let mut applied = 0;
        while let Some(event) = self.try_recv() {
            composer.handle(event);
            applied += 1;
        }
        applied
    }

    pub fn receiver(&self) -> &Receiver<FeedEvent> {
        &self.rx
    }
}

impl Default for FeedLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::composer::{ComposerState, FeedStatus};
    use crate::core::config::MapConfig;
    use crate::data::geojson::GeoJson;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSource;

    #[async_trait]
    impl FeedSource for StaticSource {
        async fn fetch(&self, kind: FeedKind) -> Result<GeoJson> {
            match kind {
                FeedKind::Earthquakes => {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    GeoJson::from_str(
                        r#"{"type": "FeatureCollection", "features": [
                            {"type": "Feature", "properties": {"mag": 3.0},
                             "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 40.0]}}
                        ]}"#,
                    )
                }
                FeedKind::TectonicPlates => GeoJson::from_str(r#"{"type": "FeatureCollection", "feat"#),
            }
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_background_results_reach_composer() {
        let wakeups = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakeups);
        let loader = FeedLoader::new().with_notify(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handles = loader.spawn_all(&Handle::current(), Arc::new(StaticSource));
        for handle in handles {
            handle.await.unwrap();
        }

        let mut composer = MapComposer::new(MapConfig::default());
        composer.attach();
        assert_eq!(loader.drain_into(&mut composer), 2);
        assert_eq!(wakeups.load(Ordering::SeqCst), 2);

        assert!(composer.is_settled());
        assert_eq!(composer.state(), ComposerState::AwaitingData);
        assert_eq!(
            composer.status(FeedKind::Earthquakes),
            &FeedStatus::Loaded { rendered: 1, skipped: 0 }
        );
        assert!(loader.try_recv().is_none());
    }
}
