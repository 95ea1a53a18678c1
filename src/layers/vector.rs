use crate::{
    core::{
        constants::{
            BOUNDARY_LINE_OPACITY, BOUNDARY_LINE_WEIGHT, MARKER_FILL_OPACITY,
            MARKER_OUTLINE_OPACITY, MARKER_OUTLINE_WEIGHT, MIN_DISPLAY_RADIUS,
        },
        geo::{LatLng, LatLngBounds},
    },
    style::Color,
    ui::popup::PopupContent,
};
use serde::{Deserialize, Serialize};

/// Style for circle markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub fill_color: Color,
    pub fill_opacity: f32,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub stroke_opacity: f32,
    /// Radius in screen pixels; may be zero or negative
    pub radius: f64,
}

impl PointStyle {
    /// Earthquake marker: black outline, translucent fill
    pub fn marker(fill_color: Color, radius: f64) -> Self {
        Self {
            fill_color,
            fill_opacity: MARKER_FILL_OPACITY,
            stroke_color: Color::BLACK,
            stroke_width: MARKER_OUTLINE_WEIGHT,
            stroke_opacity: MARKER_OUTLINE_OPACITY,
            radius,
        }
    }
}

/// Style for polylines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

impl LineStyle {
    /// Plate boundary stroke in the given colour
    pub fn boundary(color: Color) -> Self {
        Self {
            color,
            width: BOUNDARY_LINE_WEIGHT,
            opacity: BOUNDARY_LINE_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    pub position: LatLng,
    pub style: PointStyle,
    pub popup: PopupContent,
}

impl CircleMarker {
    pub fn new(position: LatLng, style: PointStyle, popup: PopupContent) -> Self {
        Self {
            position,
            style,
            popup,
        }
    }

    /// Radius actually painted: never below one pixel.
    pub fn display_radius(&self) -> f64 {
        if self.style.radius.is_finite() {
            self.style.radius.max(MIN_DISPLAY_RADIUS)
        } else {
            MIN_DISPLAY_RADIUS
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    /// One entry per line part
    pub paths: Vec<Vec<LatLng>>,
    pub style: LineStyle,
    pub popup: PopupContent,
}

impl Polyline {
    pub fn new(paths: Vec<Vec<LatLng>>, style: LineStyle, popup: PopupContent) -> Self {
        Self {
            paths,
            style,
            popup,
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        let points: Vec<LatLng> = self.paths.iter().flatten().copied().collect();
        LatLngBounds::from_points(&points)
    }
}

/// Anything a renderer puts into a layer group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderedItem {
    Circle(CircleMarker),
    Path(Polyline),
}

impl RenderedItem {
    pub fn popup(&self) -> &PopupContent {
        match self {
            RenderedItem::Circle(marker) => &marker.popup,
            RenderedItem::Path(line) => &line.popup,
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        match self {
            RenderedItem::Circle(marker) => Some(LatLngBounds::new(marker.position, marker.position)),
            RenderedItem::Path(line) => line.bounds(),
        }
    }

    pub fn as_circle(&self) -> Option<&CircleMarker> {
        match self {
            RenderedItem::Circle(marker) => Some(marker),
            RenderedItem::Path(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&Polyline> {
        match self {
            RenderedItem::Path(line) => Some(line),
            RenderedItem::Circle(_) => None,
        }
    }
}

impl From<CircleMarker> for RenderedItem {
    fn from(marker: CircleMarker) -> Self {
        RenderedItem::Circle(marker)
    }
}

impl From<Polyline> for RenderedItem {
    fn from(line: Polyline) -> Self {
        RenderedItem::Path(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(radius: f64) -> CircleMarker {
        CircleMarker::new(
            LatLng::new(10.0, 20.0),
            PointStyle::marker(Color::rgb(0xFF, 0xED, 0xA0), radius),
            PopupContent::new("test"),
        )
    }

    #[test]
    fn test_marker_style_defaults() {
        let style = PointStyle::marker(Color::WHITE, 8.0);
        assert_eq!(style.stroke_color.to_hex(), "#000000");
        assert_eq!(style.stroke_width, 1.0);
        assert_eq!(style.stroke_opacity, 1.0);
        assert_eq!(style.fill_opacity, 0.8);
    }

    #[test]
    fn test_display_radius_floor() {
        assert_eq!(marker(20.0).display_radius(), 20.0);
        assert_eq!(marker(0.0).display_radius(), 1.0);
        assert_eq!(marker(-4.0).display_radius(), 1.0);
        assert_eq!(marker(f64::NAN).display_radius(), 1.0);
        // stored radius is left as computed
        assert_eq!(marker(-4.0).style.radius, -4.0);
    }

    #[test]
    fn test_polyline_bounds_span_all_parts() {
        let line = Polyline::new(
            vec![
                vec![LatLng::new(0.0, 0.0), LatLng::new(5.0, 5.0)],
                vec![LatLng::new(-3.0, 10.0), LatLng::new(1.0, 12.0)],
            ],
            LineStyle::boundary(Color::rgb(0, 0xFF, 0)),
            PopupContent::new("RIF"),
        );

        let bounds = line.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-3.0, 0.0));
        assert_eq!(bounds.north_east, LatLng::new(5.0, 12.0));
        assert_eq!(line.style.width, 2.0);
    }
}
