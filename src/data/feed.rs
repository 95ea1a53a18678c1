//! Remote GeoJSON feeds.

use crate::core::config::FeedConfig;
use crate::data::geojson::GeoJson;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two datasets the map knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedKind {
    Earthquakes,
    TectonicPlates,
}

impl FeedKind {
    pub const ALL: [FeedKind; 2] = [FeedKind::Earthquakes, FeedKind::TectonicPlates];

    /// Overlay name shown in the layer control
    pub fn label(&self) -> &'static str {
        match self {
            FeedKind::Earthquakes => "Earthquakes",
            FeedKind::TectonicPlates => "Tectonic Plates",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything that can hand back a feed's document
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, kind: FeedKind) -> Result<GeoJson>;
}

/// Fetches feeds over HTTP(S). One GET per call; no retries, no timeout
/// beyond the transport's own.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    config: FeedConfig,
}

impl HttpFeedSource {
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn url(&self, kind: FeedKind) -> &str {
        self.config.url(kind)
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, kind: FeedKind) -> Result<GeoJson> {
        let url = self.url(kind);
        log::debug!("requesting {} feed from {}", kind, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let geojson = GeoJson::from_slice(&body)?;
        log::info!(
            "{} feed delivered {} features ({} bytes)",
            kind,
            geojson.features().len(),
            body.len()
        );
        Ok(geojson)
    }
}
