//! Plate boundary step classes (PB2002 `STEPCLASS`) and their colours.

use crate::style::color::Color;
use serde::{Deserialize, Serialize};

/// Colour for any code outside the known set.
pub const FALLBACK_BOUNDARY_COLOR: Color = Color::rgb(0x80, 0x80, 0x80);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryClass {
    Subduction,
    Rift,
    OceanicSpreadingRidge,
    OceanicTransformFault,
    Other,
}

impl BoundaryClass {
    /// Every class in legend order, `Other` last.
    pub const ALL: [BoundaryClass; 5] = [
        BoundaryClass::Subduction,
        BoundaryClass::Rift,
        BoundaryClass::OceanicSpreadingRidge,
        BoundaryClass::OceanicTransformFault,
        BoundaryClass::Other,
    ];

    /// Exact, case-sensitive match on the trimmed code; missing and unknown
    /// codes are `Other`.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("SUB") => BoundaryClass::Subduction,
            Some("RIF") => BoundaryClass::Rift,
            Some("OSR") => BoundaryClass::OceanicSpreadingRidge,
            Some("OTF") => BoundaryClass::OceanicTransformFault,
            _ => BoundaryClass::Other,
        }
    }

    pub fn code(&self) -> Option<&'static str> {
        match self {
            BoundaryClass::Subduction => Some("SUB"),
            BoundaryClass::Rift => Some("RIF"),
            BoundaryClass::OceanicSpreadingRidge => Some("OSR"),
            BoundaryClass::OceanicTransformFault => Some("OTF"),
            BoundaryClass::Other => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BoundaryClass::Subduction => "Subduction",
            BoundaryClass::Rift => "Rift",
            BoundaryClass::OceanicSpreadingRidge => "Oceanic Spreading Ridge",
            BoundaryClass::OceanicTransformFault => "Oceanic Transform Fault",
            BoundaryClass::Other => "Other",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            BoundaryClass::Subduction => Color::rgb(0xFF, 0x00, 0x00),
            BoundaryClass::Rift => Color::rgb(0x00, 0xFF, 0x00),
            BoundaryClass::OceanicSpreadingRidge => Color::rgb(0x00, 0x00, 0xFF),
            BoundaryClass::OceanicTransformFault => Color::rgb(0xFF, 0x00, 0xFF),
            BoundaryClass::Other => FALLBACK_BOUNDARY_COLOR,
        }
    }
}

/// Colour for a raw `STEPCLASS` value
pub fn boundary_color(code: Option<&str>) -> Color {
    BoundaryClass::from_code(code).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(boundary_color(Some("SUB")).to_hex(), "#FF0000");
        assert_eq!(boundary_color(Some("RIF")).to_hex(), "#00FF00");
        assert_eq!(boundary_color(Some("OSR")).to_hex(), "#0000FF");
        assert_eq!(boundary_color(Some("OTF")).to_hex(), "#FF00FF");
    }

    #[test]
    fn test_unknown_codes_fall_back_to_gray() {
        for code in [Some("XYZ"), Some(""), Some("rif"), Some("CRB"), None] {
            assert_eq!(boundary_color(code).to_hex(), "#808080", "code {code:?}");
        }
    }

    #[test]
    fn test_padded_code_is_trimmed() {
        assert_eq!(BoundaryClass::from_code(Some(" OTF ")), BoundaryClass::OceanicTransformFault);
    }

    #[test]
    fn test_code_round_trip() {
        for class in BoundaryClass::ALL {
            assert_eq!(BoundaryClass::from_code(class.code()), class);
        }
    }
}
