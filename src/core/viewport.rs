use crate::core::{
    constants::TILE_SIZE,
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Sets the center, keeping latitude inside the projectable range
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), LatLng::wrap_lng(center.lng));
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits. A reversed pair is swapped; a non-finite
    /// limit leaves the current limits in place.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if !min_zoom.is_finite() || !max_zoom.is_finite() {
            log::warn!(
                "ignoring zoom limits {}..={}, keeping {}..={}",
                min_zoom,
                max_zoom,
                self.min_zoom,
                self.max_zoom
            );
            return;
        }
        let (min_zoom, max_zoom) = if min_zoom > max_zoom {
            log::warn!("zoom limits {}..={} are reversed, swapping", min_zoom, max_zoom);
            (max_zoom, min_zoom)
        } else {
            (min_zoom, max_zoom)
        };

        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let world = TILE_SIZE as f64 * 2_f64.powf(zoom.unwrap_or(self.zoom));
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();

        let x = (lat_lng.lng + 180.0) / 360.0 * world;
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * world;

        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to LatLng
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let world = TILE_SIZE as f64 * 2_f64.powf(zoom.unwrap_or(self.zoom));

        let lng = pixel.x / world * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * pixel.y / world)).sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// World pixel of the view center
    fn pixel_origin(&self) -> Point {
        self.project(&self.center, None)
    }

    /// Converts a geographical coordinate to screen pixel coordinates (container relative)
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let offset = self.project(lat_lng, None).subtract(&self.pixel_origin());
        Point::new(offset.x + self.size.x / 2.0, offset.y + self.size.y / 2.0)
    }

    /// Converts screen pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let offset = Point::new(pixel.x - self.size.x / 2.0, pixel.y - self.size.y / 2.0);
        self.unproject(&self.pixel_origin().add(&offset), None)
    }

    /// Pans the viewport so content moves by `delta` screen pixels
    pub fn pan(&mut self, delta: Point) {
        let new_origin = self.pixel_origin().subtract(&delta);
        let center = self.unproject(&new_origin, None);
        self.set_center(center);
    }

    /// Zooms to `zoom`, keeping `focus_point` (screen pixels) stationary if given
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus_screen) => {
                let focus_latlng = self.pixel_to_lat_lng(&focus_screen);
                self.zoom = new_zoom;

                let drifted = self.lat_lng_to_pixel(&focus_latlng);
                self.pan(focus_screen.subtract(&drifted));
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&Point::new(self.size.x, self.size.y));

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }
}
