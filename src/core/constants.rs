//! Engine-wide constants: feed endpoints, visual encoding and web-map defaults.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// USGS summary feed of every earthquake in the past month.
pub const EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson";

/// PB2002 plate boundary steps (properties STEPCLASS / PLATEBOUND / VELOCITYLE).
pub const BOUNDARY_FEED_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_steps.json";

/// User-Agent sent with feed and tile requests; public tile servers reject anonymous clients.
pub const USER_AGENT: &str = "quakemap/0.1 (+https://github.com/quakemap/quakemap)";

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Marker radius in pixels per unit of magnitude.
pub const MAGNITUDE_RADIUS_FACTOR: f64 = 4.0;

/// Smallest radius a marker is ever painted with.
pub const MIN_DISPLAY_RADIUS: f64 = 1.0;

/// Earthquake marker outline.
pub const MARKER_OUTLINE_WEIGHT: f32 = 1.0;
pub const MARKER_OUTLINE_OPACITY: f32 = 1.0;
pub const MARKER_FILL_OPACITY: f32 = 0.8;

/// Plate boundary stroke.
pub const BOUNDARY_LINE_WEIGHT: f32 = 2.0;
pub const BOUNDARY_LINE_OPACITY: f32 = 1.0;

/// Screen-space slack (pixels) when clicking on a boundary line.
pub const LINE_HIT_TOLERANCE: f64 = 4.0;

/// Initial view: whole world.
pub const DEFAULT_CENTER: (f64, f64) = (0.0, 0.0);
pub const DEFAULT_ZOOM: f64 = 2.0;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 18.0;
