use crate::{
    core::{
        constants::LINE_HIT_TOLERANCE,
        geo::{LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        vector::{CircleMarker, Polyline, RenderedItem},
    },
};
use geo::{EuclideanDistance, LineString};

/// A named overlay: an append-only list of rendered items that is shown or
/// hidden as a whole.
#[derive(Debug, Clone)]
pub struct LayerGroup {
    properties: LayerProperties,
    items: Vec<RenderedItem>,
}

impl LayerGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            properties: LayerProperties::new(id.into(), name.into(), LayerType::Overlay),
            items: Vec::new(),
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.set_z_index(z_index);
        self
    }

    pub fn set_z_index(&mut self, z_index: i32) {
        self.properties.z_index = z_index;
    }

    pub fn add(&mut self, item: impl Into<RenderedItem>) {
        self.items.push(item.into());
    }

    pub fn items(&self) -> &[RenderedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn markers(&self) -> impl Iterator<Item = &CircleMarker> {
        self.items.iter().filter_map(RenderedItem::as_circle)
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.items.iter().filter_map(RenderedItem::as_path)
    }

    /// Topmost item under `screen` (container pixels). Later items are drawn
    /// over earlier ones, so the search runs back to front. Hidden groups
    /// never hit.
    pub fn hit_test(&self, viewport: &Viewport, screen: Point) -> Option<&RenderedItem> {
        if !self.properties.visible {
            return None;
        }

        self.items.iter().rev().find(|item| match item {
            RenderedItem::Circle(marker) => {
                let center = viewport.lat_lng_to_pixel(&marker.position);
                center.distance_to(&screen) <= marker.display_radius()
            }
            RenderedItem::Path(line) => {
                let tolerance = LINE_HIT_TOLERANCE + line.style.width as f64 / 2.0;
                let cursor = geo::Point::new(screen.x, screen.y);
                line.paths.iter().any(|path| {
                    let projected: LineString<f64> = path
                        .iter()
                        .map(|ll| {
                            let p = viewport.lat_lng_to_pixel(ll);
                            (p.x, p.y)
                        })
                        .collect::<Vec<_>>()
                        .into();
                    cursor.euclidean_distance(&projected) <= tolerance
                })
            }
        })
    }
}

impl LayerTrait for LayerGroup {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        self.items
            .iter()
            .filter_map(RenderedItem::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::layers::vector::{LineStyle, PointStyle};
    use crate::style::Color;
    use crate::ui::popup::PopupContent;

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(1024.0, 1024.0))
    }

    fn marker(lat: f64, lng: f64, radius: f64, title: &str) -> CircleMarker {
        CircleMarker::new(
            LatLng::new(lat, lng),
            PointStyle::marker(Color::WHITE, radius),
            PopupContent::new(title),
        )
    }

    #[test]
    fn test_append_only_group() {
        let mut group = LayerGroup::new("earthquakes", "Earthquakes");
        assert!(group.is_empty());

        group.add(marker(0.0, 0.0, 4.0, "a"));
        group.add(marker(1.0, 1.0, 8.0, "b"));

        assert_eq!(group.len(), 2);
        assert_eq!(group.markers().count(), 2);
        assert_eq!(group.polylines().count(), 0);
        assert_eq!(group.layer_type(), LayerType::Overlay);
    }

    #[test]
    fn test_hit_test_prefers_topmost_marker() {
        let mut group = LayerGroup::new("earthquakes", "Earthquakes");
        group.add(marker(0.0, 0.0, 20.0, "below"));
        group.add(marker(0.0, 0.0, 10.0, "above"));

        let view = viewport();
        let center = Point::new(512.0, 512.0);

        let hit = group.hit_test(&view, center).unwrap();
        assert_eq!(hit.popup().title, "above");

        let edge = Point::new(512.0 + 15.0, 512.0);
        assert_eq!(group.hit_test(&view, edge).unwrap().popup().title, "below");
        assert!(group.hit_test(&view, Point::new(600.0, 600.0)).is_none());
    }

    #[test]
    fn test_hit_test_on_polyline() {
        let mut group = LayerGroup::new("plates", "Tectonic Plates");
        group.add(Polyline::new(
            vec![vec![LatLng::new(0.0, -10.0), LatLng::new(0.0, 10.0)]],
            LineStyle::boundary(Color::rgb(255, 0, 0)),
            PopupContent::new("equator"),
        ));

        let view = viewport();
        assert!(group.hit_test(&view, Point::new(512.0, 514.0)).is_some());
        assert!(group.hit_test(&view, Point::new(512.0, 530.0)).is_none());
    }

    #[test]
    fn test_hidden_group_never_hits() {
        let mut group = LayerGroup::new("earthquakes", "Earthquakes");
        group.add(marker(0.0, 0.0, 20.0, "a"));
        group.set_visible(false);

        assert!(group.hit_test(&viewport(), Point::new(512.0, 512.0)).is_none());
    }

    #[test]
    fn test_bounds_cover_all_items() {
        let mut group = LayerGroup::new("earthquakes", "Earthquakes");
        assert!(group.bounds().is_none());

        group.add(marker(-5.0, 30.0, 4.0, "a"));
        group.add(marker(12.0, -40.0, 4.0, "b"));

        let bounds = group.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-5.0, -40.0));
        assert_eq!(bounds.north_east, LatLng::new(12.0, 30.0));
    }
}
