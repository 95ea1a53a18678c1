pub mod macros;

pub mod base;
pub mod control;
pub mod group;
pub mod tile;
pub mod vector;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use control::{ControlEntry, LayerControl, OverlayEntry};
pub use group::LayerGroup;
pub use tile::{BaseLayerPreset, TileLayer, TileLayerOptions};
pub use vector::{CircleMarker, LineStyle, PointStyle, Polyline, RenderedItem};
