//! Layer control: which base layer is active and which overlays are on.
//!
//! The control only tracks the user's choices by layer id. The composer owns
//! the layers themselves and applies those choices to them.

use crate::ui::elements::Position;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayEntry {
    pub id: String,
    pub name: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerControl {
    position: Position,
    base_layers: Vec<ControlEntry>,
    active_base: usize,
    overlays: Vec<OverlayEntry>,
}

impl LayerControl {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            base_layers: Vec::new(),
            active_base: 0,
            overlays: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Registers a base layer and returns its index. The first one
    /// registered starts out active.
    pub fn add_base_layer(&mut self, id: impl Into<String>, name: impl Into<String>) -> usize {
        self.base_layers.push(ControlEntry {
            id: id.into(),
            name: name.into(),
        });
        self.base_layers.len() - 1
    }

    pub fn add_overlay(&mut self, id: impl Into<String>, name: impl Into<String>, visible: bool) {
        self.overlays.push(OverlayEntry {
            id: id.into(),
            name: name.into(),
            visible,
        });
    }

    pub fn base_layers(&self) -> &[ControlEntry] {
        &self.base_layers
    }

    pub fn overlays(&self) -> &[OverlayEntry] {
        &self.overlays
    }

    /// Radio behaviour: exactly one base layer is active at a time.
    pub fn select_base_layer(&mut self, index: usize) -> Result<()> {
        if index >= self.base_layers.len() {
            return Err(Error::Layer(format!(
                "no base layer at index {} ({} registered)",
                index,
                self.base_layers.len()
            )));
        }
        self.active_base = index;
        Ok(())
    }

    pub fn active_base_index(&self) -> usize {
        self.active_base
    }

    pub fn active_base_layer(&self) -> Option<&ControlEntry> {
        self.base_layers.get(self.active_base)
    }

    pub fn set_overlay_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        let overlay = self
            .overlays
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| Error::Layer(format!("unknown overlay '{}'", id)))?;
        overlay.visible = visible;
        Ok(())
    }

    pub fn is_overlay_visible(&self, id: &str) -> Option<bool> {
        self.overlays.iter().find(|o| o.id == id).map(|o| o.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> LayerControl {
        let mut control = LayerControl::new(Position::TopRight);
        control.add_base_layer("base-street", "Street");
        control.add_base_layer("base-satellite", "Satellite");
        control.add_overlay("earthquakes", "Earthquakes", true);
        control.add_overlay("tectonic-plates", "Tectonic Plates", true);
        control
    }

    #[test]
    fn test_base_layer_selection() {
        let mut control = control();
        assert_eq!(control.active_base_layer().unwrap().name, "Street");

        control.select_base_layer(1).unwrap();
        assert_eq!(control.active_base_index(), 1);
        assert_eq!(control.active_base_layer().unwrap().id, "base-satellite");

        assert!(control.select_base_layer(2).is_err());
        assert_eq!(control.active_base_index(), 1);
    }

    #[test]
    fn test_overlay_toggles() {
        let mut control = control();
        control.set_overlay_visible("earthquakes", false).unwrap();

        assert_eq!(control.is_overlay_visible("earthquakes"), Some(false));
        assert_eq!(control.is_overlay_visible("tectonic-plates"), Some(true));
        assert_eq!(control.is_overlay_visible("volcanoes"), None);
        assert!(control.set_overlay_visible("volcanoes", true).is_err());
    }
}
