//! Typed views of the two feeds' features.
//!
//! Extraction never fails: every attribute is optional, and the renderer
//! decides what to do with the gaps.

use crate::core::geo::LatLng;
use crate::data::geojson::GeoJsonFeature;
use serde::{Deserialize, Serialize};

/// One event from the USGS summary feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeFeature {
    pub id: Option<String>,
    pub place: Option<String>,
    pub magnitude: Option<f64>,
    pub depth_km: Option<f64>,
    /// Origin time, epoch milliseconds
    pub timestamp_ms: Option<i64>,
    pub position: Option<LatLng>,
}

impl EarthquakeFeature {
    /// Reads `properties.place`, `properties.mag`, `properties.time` and
    /// `geometry.coordinates = [lon, lat, depth]`.
    pub fn from_geojson(feature: &GeoJsonFeature) -> Self {
        let (position, depth_km) = feature
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.point())
            .map(|(position, depth)| (Some(position), depth))
            .unwrap_or((None, None));

        Self {
            id: feature.id.as_ref().map(|id| match id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            place: feature.property_str("place"),
            magnitude: feature.property_f64("mag"),
            depth_km,
            timestamp_ms: feature.property_i64("time"),
            position,
        }
    }
}

/// One PB2002 plate boundary step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    pub step_class: Option<String>,
    pub plate_boundary_name: Option<String>,
    pub velocity_mm_per_year: Option<f64>,
    /// Line parts, each with at least two points
    pub paths: Vec<Vec<LatLng>>,
}

impl BoundaryFeature {
    /// Reads `properties.STEPCLASS`, `properties.PLATEBOUND`,
    /// `properties.VELOCITYLE` and a (Multi)LineString geometry.
    pub fn from_geojson(feature: &GeoJsonFeature) -> Self {
        Self {
            step_class: feature.property_str("STEPCLASS"),
            plate_boundary_name: feature.property_str("PLATEBOUND"),
            velocity_mm_per_year: feature.property_f64("VELOCITYLE"),
            paths: feature
                .geometry
                .as_ref()
                .map(|geometry| geometry.line_paths())
                .unwrap_or_default(),
        }
    }
}
