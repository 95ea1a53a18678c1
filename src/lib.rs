//! # quakemap
//!
//! An interactive map of recent earthquakes and tectonic plate boundaries,
//! built from two public GeoJSON feeds.
//!
//! The library is headless: scales, GeoJSON decoding, the feature renderer,
//! legends, layer groups and the [`MapComposer`] can all be used without a
//! window. The `egui` feature adds a map widget that paints a composer.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod render;
pub mod style;
pub mod tiles;
pub mod ui;

#[cfg(feature = "tokio-runtime")]
pub mod background;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    composer::{ComposerState, FeedEvent, FeedStatus, MapComposer},
    config::MapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    viewport::Viewport,
};

pub use data::{
    feature::{BoundaryFeature, EarthquakeFeature},
    feed::{FeedKind, FeedSource, HttpFeedSource},
    geojson::GeoJson,
};

pub use layers::{control::LayerControl, group::LayerGroup, tile::BaseLayerPreset};

pub use render::{render_boundaries, render_earthquakes, RenderReport};

pub use style::{boundary_color, depth_color, magnitude_radius, Color, RadiusScale};

pub use ui::{legend::Legend, popup::PopupContent};

#[cfg(feature = "egui")]
pub use ui::widget::MapView;

#[cfg(feature = "tokio-runtime")]
pub use background::FeedLoader;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Invalid GeoJSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Layer error: {0}")]
    Layer(String),
}
