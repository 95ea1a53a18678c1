use super::source::TileSource;
use crate::core::constants::USER_AGENT;
use crate::core::geo::TileCoord;
use crate::{Error, Result};
use crossbeam_channel::Sender;
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;

/// Shared blocking client; public tile servers reject requests without a
/// User-Agent.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|err| {
            log::warn!("falling back to default tile client: {}", err);
            Client::new()
        })
});

/// Outcome of one tile download
#[derive(Debug)]
pub struct TileResponse {
    pub coord: TileCoord,
    pub result: Result<Vec<u8>>,
}

/// Downloads tiles on detached threads and reports each outcome over a
/// channel.
#[derive(Debug, Clone)]
pub struct TileLoader {
    tx: Sender<TileResponse>,
    max_attempts: usize,
}

impl TileLoader {
    pub fn new(tx: Sender<TileResponse>, max_attempts: usize) -> Self {
        Self {
            tx,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn start_download(&self, source: &dyn TileSource, coord: TileCoord) {
        let url = source.url(coord);
        let tx = self.tx.clone();
        let max_attempts = self.max_attempts;

        thread::spawn(move || {
            let mut last_error = None;
            for attempt in 1..=max_attempts {
                log::debug!("fetch tile {:?} attempt {}", coord, attempt);
                match fetch(&url) {
                    Ok(data) => {
                        log::debug!("downloaded tile {:?} ({} bytes)", coord, data.len());
                        let _ = tx.send(TileResponse {
                            coord,
                            result: Ok(data),
                        });
                        return;
                    }
                    Err(err) => {
                        log::warn!("tile {:?} attempt {} failed: {}", coord, attempt, err);
                        last_error = Some(err);
                        if attempt < max_attempts {
                            thread::sleep(Duration::from_millis(100));
                        }
                    }
                }
            }

            log::error!("giving up on tile {:?}", coord);
            let err = last_error.unwrap_or_else(|| Error::Layer(format!("tile {:?} not fetched", coord)));
            let _ = tx.send(TileResponse {
                coord,
                result: Err(err),
            });
        });
    }
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let resp = HTTP_CLIENT.get(url).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(resp.bytes()?.to_vec())
}
