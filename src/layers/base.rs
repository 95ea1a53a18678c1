use crate::core::geo::LatLngBounds;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerType {
    /// Background tile imagery
    Tile,
    /// Toggleable group of rendered features
    Overlay,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Overlay => write!(f, "overlay"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Shared surface of everything the map stacks: base tiles and overlays
pub trait LayerTrait: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn layer_type(&self) -> LayerType;
    fn z_index(&self) -> i32;
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, opacity: f32);
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    /// Geographic extent of the layer's content, if it has any
    fn bounds(&self) -> Option<LatLngBounds>;
}
