//! Depth colour scale: six contiguous buckets, light (shallow) to dark (deep).

use crate::style::color::Color;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One row of the depth table: everything deeper than `lower_bound` (and not
/// deeper than the next bucket's bound) gets `color`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthBucket {
    pub lower_bound: f64,
    pub color: Color,
}

impl DepthBucket {
    pub const fn new(lower_bound: f64, color: Color) -> Self {
        Self { lower_bound, color }
    }
}

/// Standard depth buckets in km. The first bound only labels the legend;
/// anything at or above sea level still lands in the first bucket.
pub const DEPTH_BUCKETS: [DepthBucket; 6] = [
    DepthBucket::new(-10.0, Color::rgb(0xFF, 0xED, 0xA0)),
    DepthBucket::new(10.0, Color::rgb(0xFD, 0x8D, 0x3C)),
    DepthBucket::new(30.0, Color::rgb(0xFC, 0x4E, 0x2A)),
    DepthBucket::new(50.0, Color::rgb(0xE3, 0x1A, 0x1C)),
    DepthBucket::new(70.0, Color::rgb(0xBD, 0x00, 0x26)),
    DepthBucket::new(90.0, Color::rgb(0x80, 0x00, 0x26)),
];

/// Ordered, exhaustive depth → colour table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DepthBucket>", into = "Vec<DepthBucket>")]
pub struct DepthScale {
    buckets: Vec<DepthBucket>,
}

impl DepthScale {
    /// Validates that the table is non-empty and strictly ascending.
    pub fn new(buckets: Vec<DepthBucket>) -> Result<Self> {
        if buckets.is_empty() {
            return Err(Error::Layer("depth scale needs at least one bucket".to_string()));
        }
        if buckets.windows(2).any(|pair| pair[0].lower_bound >= pair[1].lower_bound) {
            return Err(Error::Layer(
                "depth scale bounds must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { buckets })
    }

    pub fn standard() -> Self {
        Self {
            buckets: DEPTH_BUCKETS.to_vec(),
        }
    }

    pub fn buckets(&self) -> &[DepthBucket] {
        &self.buckets
    }

    /// Colour for a depth in km. Thresholds are strict: a depth exactly on a
    /// bound belongs to the shallower bucket. NaN falls into the first bucket.
    pub fn color_for(&self, depth_km: f64) -> Color {
        self.buckets
            .iter()
            .skip(1)
            .rev()
            .find(|bucket| depth_km > bucket.lower_bound)
            .unwrap_or(&self.buckets[0])
            .color
    }

    /// Lightest colour, used for features whose depth is unknown
    pub fn shallowest(&self) -> Color {
        self.buckets[0].color
    }
}

impl TryFrom<Vec<DepthBucket>> for DepthScale {
    type Error = Error;

    fn try_from(buckets: Vec<DepthBucket>) -> Result<Self> {
        Self::new(buckets)
    }
}

impl From<DepthScale> for Vec<DepthBucket> {
    fn from(scale: DepthScale) -> Self {
        scale.buckets
    }
}

impl Default for DepthScale {
    fn default() -> Self {
        Self::standard()
    }
}

/// Colour of the standard scale for `depth_km`
pub fn depth_color(depth_km: f64) -> Color {
    DepthScale::standard().color_for(depth_km)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_depths() {
        assert_eq!(depth_color(95.0).to_hex(), "#800026");
        assert_eq!(depth_color(10.0).to_hex(), "#FFEDA0");
        assert_eq!(depth_color(10.5).to_hex(), "#FD8D3C");
        assert_eq!(depth_color(90.0).to_hex(), "#BD0026");
    }

    #[test]
    fn test_shallow_and_negative_depths_are_lightest() {
        for depth in [-50.0, -10.0, 0.0, 5.0, 10.0] {
            assert_eq!(depth_color(depth).to_hex(), "#FFEDA0", "depth {depth}");
        }
        assert_eq!(depth_color(f64::NAN).to_hex(), "#FFEDA0");
    }

    #[test]
    fn test_very_deep_is_darkest() {
        assert_eq!(depth_color(700.0).to_hex(), "#800026");
        assert_eq!(depth_color(f64::INFINITY).to_hex(), "#800026");
    }

    #[test]
    fn test_lightness_never_increases_with_depth() {
        let scale = DepthScale::standard();
        let mut previous = scale.color_for(-100.0).luminance();
        let mut depth = -100.0;
        while depth < 200.0 {
            let current = scale.color_for(depth).luminance();
            assert!(current <= previous, "lighter colour at depth {depth}");
            previous = current;
            depth += 0.5;
        }
    }

    #[test]
    fn test_rejects_unordered_table() {
        let buckets = vec![
            DepthBucket::new(10.0, Color::WHITE),
            DepthBucket::new(5.0, Color::BLACK),
        ];
        assert!(DepthScale::new(buckets).is_err());
        assert!(DepthScale::new(Vec::new()).is_err());
    }
}
