use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator latitude limit
const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from a GeoJSON position (`[lon, lat, ...]`).
    ///
    /// Returns `None` when the position has fewer than two components or
    /// either of the first two is null or not finite.
    pub fn from_position(position: &[Option<f64>]) -> Option<Self> {
        match position {
            [Some(lng), Some(lat), ..] if lng.is_finite() && lat.is_finite() => {
                Some(Self::new(*lat, *lng))
            }
            _ => None,
        }
    }

    /// Wraps longitude to [-180, 180] range
    pub fn wrap_lng(lng: f64) -> f64 {
        let wrapped = lng % 360.0;
        if wrapped > 180.0 {
            wrapped - 360.0
        } else if wrapped < -180.0 {
            wrapped + 360.0
        } else {
            wrapped
        }
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest bounds containing every point, `None` for an empty slice
    pub fn from_points(points: &[LatLng]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(*first, *first);
        for point in rest {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Returns the union of this bounds with another bounds
    pub fn union(&self, other: &LatLngBounds) -> LatLngBounds {
        let south = self.south_west.lat.min(other.south_west.lat);
        let west = self.south_west.lng.min(other.south_west.lng);
        let north = self.north_east.lat.max(other.north_east.lat);
        let east = self.north_east.lng.max(other.north_east.lng);

        LatLngBounds::new(LatLng::new(south, west), LatLng::new(north, east))
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Converts tile coordinate to LatLng (northwest corner)
    pub fn to_lat_lng(&self) -> LatLng {
        let n = 2_f64.powi(self.z as i32);
        let lng = self.x as f64 / n * 360.0 - 180.0;
        let lat_rad = (PI * (1.0 - 2.0 * self.y as f64 / n)).sinh().atan();

        LatLng::new(lat_rad.to_degrees(), lng)
    }

    /// Gets the bounds of the tile
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.to_lat_lng();
        let se = TileCoord::new(self.x + 1, self.y + 1, self.z).to_lat_lng();

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Gets the parent tile at a lower zoom level
    pub fn parent(&self) -> Option<TileCoord> {
        if self.z == 0 {
            None
        } else {
            Some(TileCoord::new(self.x / 2, self.y / 2, self.z - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_position_swaps_axis_order() {
        let coord = LatLng::from_position(&[Some(-122.4), Some(37.7), Some(8.5)]).unwrap();
        assert_eq!(coord, LatLng::new(37.7, -122.4));
    }

    #[test]
    fn test_from_position_ignores_missing_depth() {
        let coord = LatLng::from_position(&[Some(10.0), Some(20.0), None]).unwrap();
        assert_eq!(coord, LatLng::new(20.0, 10.0));
    }

    #[test]
    fn test_from_position_rejects_short_null_or_nan() {
        assert!(LatLng::from_position(&[]).is_none());
        assert!(LatLng::from_position(&[Some(10.0)]).is_none());
        assert!(LatLng::from_position(&[None, Some(1.0)]).is_none());
        assert!(LatLng::from_position(&[Some(f64::NAN), Some(1.0)]).is_none());
    }

    #[test]
    fn test_wrap_lng() {
        assert_eq!(LatLng::wrap_lng(190.0), -170.0);
        assert_eq!(LatLng::wrap_lng(-190.0), 170.0);
        assert_eq!(LatLng::wrap_lng(45.0), 45.0);
    }

    #[test]
    fn test_tile_corners_and_parent() {
        let tile = TileCoord::new(1, 1, 1);
        let bounds = tile.bounds();

        assert_eq!(tile.to_lat_lng().lng, 0.0);
        assert!(bounds.north_east.lat.abs() < 1e-9);
        assert!((bounds.south_west.lat + 85.0511287798).abs() < 1e-6);
        assert_eq!(bounds.north_east.lng, 180.0);
        assert_eq!(tile.parent(), Some(TileCoord::new(0, 0, 0)));
        assert_eq!(TileCoord::new(0, 0, 0).parent(), None);
    }

    #[test]
    fn test_bounds_from_points_and_union() {
        let bounds = LatLngBounds::from_points(&[
            LatLng::new(10.0, 20.0),
            LatLng::new(-5.0, 40.0),
            LatLng::new(3.0, -10.0),
        ])
        .unwrap();

        assert_eq!(bounds.south_west, LatLng::new(-5.0, -10.0));
        assert_eq!(bounds.north_east, LatLng::new(10.0, 40.0));
        assert!(LatLngBounds::from_points(&[]).is_none());

        let other = LatLngBounds::new(LatLng::new(20.0, 20.0), LatLng::new(30.0, 30.0));
        let union = bounds.union(&other);
        assert_eq!(union.south_west, LatLng::new(-5.0, -10.0));
        assert_eq!(union.north_east, LatLng::new(30.0, 40.0));
    }
}
