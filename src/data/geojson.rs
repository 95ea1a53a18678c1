//! Tolerant serde model of the GeoJSON the feeds deliver.
//!
//! A feed is rejected only when its top level is not a Feature or a
//! FeatureCollection. Below that, anything malformed (a feature that is not an
//! object, an unknown geometry type, properties that are not a map) is
//! downgraded to "missing" and logged, so one bad record never costs the batch.

use crate::core::geo::LatLng;
use crate::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A GeoJSON position: `[lon, lat]` or `[lon, lat, elevation/depth]`.
/// Components are read one by one, so a `null` depth does not cost the
/// feature its location.
pub type Position = Vec<Option<f64>>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<Map<String, Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection {
        #[serde(deserialize_with = "lenient_features")]
        features: Vec<GeoJsonFeature>,
    },
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            log::warn!("ignoring malformed GeoJSON member: {}", e);
            Ok(None)
        }
    }
}

fn lenient_features<'de, D>(deserializer: D) -> std::result::Result<Vec<GeoJsonFeature>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    let total = raw.len();
    let features: Vec<GeoJsonFeature> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(feature) => Some(feature),
            Err(e) => {
                log::warn!("dropping unreadable feature: {}", e);
                None
            }
        })
        .collect();

    if features.len() < total {
        log::warn!("{} of {} features could not be read", total - features.len(), total);
    }
    Ok(features)
}

impl GeoJson {
    /// Parses a GeoJSON document from text
    pub fn from_str(geojson_str: &str) -> Result<Self> {
        Ok(serde_json::from_str(geojson_str)?)
    }

    /// Parses a GeoJSON document from raw bytes (an HTTP body)
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// All features in document order
    pub fn features(&self) -> &[GeoJsonFeature] {
        match self {
            GeoJson::Feature(feature) => std::slice::from_ref(feature),
            GeoJson::FeatureCollection { features } => features,
        }
    }

    pub fn into_features(self) -> Vec<GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features,
        }
    }
}

impl GeoJsonFeature {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref()?.get(key)
    }

    /// Text property; numbers are rendered as text, null and objects are `None`
    pub fn property_str(&self, key: &str) -> Option<String> {
        match self.property(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric property; numeric strings such as `"12.5"` are accepted
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.property(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite())
    }

    /// Integer property (epoch milliseconds and the like)
    pub fn property_i64(&self, key: &str) -> Option<i64> {
        match self.property(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl GeoJsonGeometry {
    /// Position of a Point geometry, plus its third component when present
    pub fn point(&self) -> Option<(LatLng, Option<f64>)> {
        match self {
            GeoJsonGeometry::Point { coordinates } => {
                let lat_lng = LatLng::from_position(coordinates)?;
                let third = coordinates.get(2).copied().flatten().filter(|z| z.is_finite());
                Some((lat_lng, third))
            }
            _ => None,
        }
    }

    /// Line parts of a LineString / MultiLineString. Unreadable positions are
    /// dropped; parts left with fewer than two points are dropped too.
    pub fn line_paths(&self) -> Vec<Vec<LatLng>> {
        let to_path = |line: &Vec<Position>| -> Vec<LatLng> {
            line.iter().filter_map(|p| LatLng::from_position(p)).collect()
        };

        let paths: Vec<Vec<LatLng>> = match self {
            GeoJsonGeometry::LineString { coordinates } => vec![to_path(coordinates)],
            GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().map(to_path).collect()
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(|g| g.line_paths()).collect()
            }
            _ => Vec::new(),
        };

        paths.into_iter().filter(|path| path.len() >= 2).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn pos(lng: f64, lat: f64) -> Position {
        vec![Some(lng), Some(lat)]
    }

    #[test]
    fn test_geojson_parsing() {
        let geojson_str = r#"
        {
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"place": "10 km N of Ridgecrest, CA", "mag": 2.3},
                    "geometry": {
                        "type": "Point",
                        "coordinates": [-117.67, 35.72, 8.1]
                    }
                }
            ]
        }
        "#;

        let geojson = GeoJson::from_str(geojson_str).unwrap();
        let features = geojson.features();
        assert_eq!(features.len(), 1);

        let (position, depth) = features[0].geometry.as_ref().unwrap().point().unwrap();
        assert_eq!(position, LatLng::new(35.72, -117.67));
        assert_eq!(depth, Some(8.1));
        assert_eq!(features[0].property_f64("mag"), Some(2.3));
    }

    #[test]
    fn test_rejects_non_geojson_root() {
        assert!(GeoJson::from_str("[1, 2, 3]").is_err());
        assert!(GeoJson::from_str(r#"{"type": "Topology"}"#).is_err());
        assert!(matches!(
            GeoJson::from_str("not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_malformed_members_are_downgraded() {
        let geojson_str = r#"
        {
            "type": "FeatureCollection",
            "features": [
                42,
                {"type": "Feature", "properties": "oops", "geometry": {"type": "Blob"}},
                {"type": "Feature", "properties": null, "geometry": null},
                {"type": "Feature", "properties": {"STEPCLASS": "RIF"},
                 "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}}
            ]
        }
        "#;

        let features = GeoJson::from_str(geojson_str).unwrap().into_features();
        assert_eq!(features.len(), 3);
        assert!(features[0].geometry.is_none());
        assert!(features[0].properties.is_none());
        assert!(features[1].geometry.is_none());
        assert_eq!(features[2].property_str("STEPCLASS").as_deref(), Some("RIF"));
    }

    #[test]
    fn test_line_paths() {
        let multi = GeoJsonGeometry::MultiLineString {
            coordinates: vec![
                vec![pos(0.0, 0.0), pos(10.0, 5.0)],
                vec![pos(1.0, 1.0)],
                vec![pos(20.0, -5.0), pos(21.0, -6.0), pos(22.0, -7.0)],
            ],
        };

        let paths = multi.line_paths();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0][1], LatLng::new(5.0, 10.0));
        assert_eq!(paths[1].len(), 3);

        let point = GeoJsonGeometry::Point {
            coordinates: pos(0.0, 0.0),
        };
        assert!(point.line_paths().is_empty());
    }

    #[test]
    fn test_null_depth_keeps_position() {
        let geometry: GeoJsonGeometry =
            serde_json::from_str(r#"{"type": "Point", "coordinates": [10.0, 20.0, null]}"#).unwrap();

        let (position, depth) = geometry.point().unwrap();
        assert_eq!(position, LatLng::new(20.0, 10.0));
        assert_eq!(depth, None);
    }

    #[test]
    fn test_null_vertex_is_dropped_from_line() {
        let geometry: GeoJsonGeometry = serde_json::from_str(
            r#"{"type": "LineString", "coordinates": [[0, 0], [null, 1], [2, 2]]}"#,
        )
        .unwrap();

        let paths = geometry.line_paths();
        assert_eq!(paths, vec![vec![LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0)]]);
    }

    #[test]
    fn test_numeric_string_properties() {
        let feature: GeoJsonFeature = serde_json::from_str(
            r#"{"type": "Feature", "properties": {"VELOCITYLE": "58.43", "time": 1700000000000}}"#,
        )
        .unwrap();

        assert_eq!(feature.property_f64("VELOCITYLE"), Some(58.43));
        assert_eq!(feature.property_i64("time"), Some(1_700_000_000_000));
        assert_eq!(feature.property_str("missing"), None);
    }
}
