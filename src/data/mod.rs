pub mod feature;
pub mod feed;
pub mod geojson;

pub use feature::{BoundaryFeature, EarthquakeFeature};
pub use feed::{FeedKind, FeedSource, HttpFeedSource};
pub use geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};
