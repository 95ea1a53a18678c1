//! Configuration for the map composer and viewer.
//!
//! Everything has a working default; the `with_*` builders exist so tests and
//! embedders can point the feeds elsewhere or start on a different view.

use crate::core::constants::{
    BOUNDARY_FEED_URL, DEFAULT_CENTER, DEFAULT_ZOOM, EARTHQUAKE_FEED_URL, MAX_ZOOM, MIN_ZOOM,
    USER_AGENT,
};
use crate::core::geo::LatLng;
use crate::data::feed::FeedKind;
use crate::layers::tile::BaseLayerPreset;
use crate::style::magnitude::RadiusScale;
use serde::{Deserialize, Serialize};

/// Where the two datasets come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub earthquakes_url: String,
    pub boundaries_url: String,
    pub user_agent: String,
}

impl FeedConfig {
    pub fn url(&self, kind: FeedKind) -> &str {
        match kind {
            FeedKind::Earthquakes => &self.earthquakes_url,
            FeedKind::TectonicPlates => &self.boundaries_url,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            earthquakes_url: EARTHQUAKE_FEED_URL.to_string(),
            boundaries_url: BOUNDARY_FEED_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Base-layer tile fetching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLoadingConfig {
    /// Decoded tiles kept in the LRU cache
    pub cache_size: usize,
    /// New tile downloads started per frame
    pub max_requests_per_frame: usize,
    /// Download attempts per tile before giving up
    pub max_attempts: usize,
    /// Seconds a failed tile waits before it is requested again
    pub retry_after_secs: u64,
}

impl Default for TileLoadingConfig {
    fn default() -> Self {
        Self {
            cache_size: 512,
            max_requests_per_frame: 4,
            max_attempts: 2,
            retry_after_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub radius_scale: RadiusScale,
    pub feeds: FeedConfig,
    /// Base layers offered in the layer control, in display order
    pub base_layers: Vec<BaseLayerPreset>,
    /// Index into `base_layers` shown at startup
    pub default_base_layer: usize,
    pub tiles: TileLoadingConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            radius_scale: RadiusScale::Linear,
            feeds: FeedConfig::default(),
            base_layers: vec![
                BaseLayerPreset::Street,
                BaseLayerPreset::Satellite,
                BaseLayerPreset::Grayscale,
            ],
            default_base_layer: 0,
            tiles: TileLoadingConfig::default(),
        }
    }
}

impl MapConfig {
    pub fn with_view(mut self, center: LatLng, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    pub fn with_feed_urls(
        mut self,
        earthquakes_url: impl Into<String>,
        boundaries_url: impl Into<String>,
    ) -> Self {
        self.feeds.earthquakes_url = earthquakes_url.into();
        self.feeds.boundaries_url = boundaries_url.into();
        self
    }

    pub fn with_radius_scale(mut self, radius_scale: RadiusScale) -> Self {
        self.radius_scale = radius_scale;
        self
    }

    pub fn with_base_layers(mut self, base_layers: Vec<BaseLayerPreset>, default: usize) -> Self {
        self.base_layers = base_layers;
        self.default_base_layer = default;
        self
    }

    /// Default base-layer index, clamped into range
    pub fn initial_base_layer(&self) -> usize {
        self.default_base_layer
            .min(self.base_layers.len().saturating_sub(1))
    }
}
