//! Magnitude → marker radius.

use crate::core::constants::MAGNITUDE_RADIUS_FACTOR;
use serde::{Deserialize, Serialize};

/// Magnitude at which both scales agree on the radius.
const AREA_REFERENCE_MAGNITUDE: f64 = 5.0;

/// How marker size grows with magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadiusScale {
    /// radius = 4·m, unclamped
    #[default]
    Linear,
    /// marker area proportional to magnitude, equal to `Linear` at m = 5
    AreaProportional,
}

impl RadiusScale {
    pub fn radius_for(&self, magnitude: f64) -> f64 {
        match self {
            RadiusScale::Linear => magnitude_radius(magnitude),
            RadiusScale::AreaProportional => area_radius(magnitude),
        }
    }
}

/// Linear radius: exactly `4 · magnitude`. Zero and negative magnitudes give
/// zero and negative radii; painting code clamps, this function does not.
pub fn magnitude_radius(magnitude: f64) -> f64 {
    magnitude * MAGNITUDE_RADIUS_FACTOR
}

/// Area-proportional radius; negative magnitudes collapse to zero.
pub fn area_radius(magnitude: f64) -> f64 {
    MAGNITUDE_RADIUS_FACTOR * (AREA_REFERENCE_MAGNITUDE * magnitude.max(0.0)).sqrt()
}
