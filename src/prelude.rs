//! Common quakemap types and traits
//!
//! `use quakemap::prelude::*;` pulls in what an embedder needs to build and
//! drive a map.

pub use crate::core::{
    composer::{ComposerState, FeedEvent, FeedStatus, MapComposer},
    config::{FeedConfig, MapConfig, TileLoadingConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    viewport::Viewport,
};

pub use crate::data::{
    feature::{BoundaryFeature, EarthquakeFeature},
    feed::{FeedKind, FeedSource, HttpFeedSource},
    geojson::{GeoJson, GeoJsonFeature},
};

pub use crate::layers::{
    base::LayerTrait,
    control::LayerControl,
    group::LayerGroup,
    tile::{BaseLayerPreset, TileLayer},
    vector::{CircleMarker, Polyline, RenderedItem},
};

pub use crate::render::RenderReport;

pub use crate::style::{BoundaryClass, Color, DepthScale, RadiusScale};

pub use crate::ui::{elements::Position, legend::Legend, popup::PopupContent};

#[cfg(feature = "egui")]
pub use crate::ui::widget::MapView;

#[cfg(feature = "tokio-runtime")]
pub use crate::background::FeedLoader;

pub use crate::{Error, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
