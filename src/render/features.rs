//! Turns typed features into styled, clickable layer items.

use crate::{
    data::{
        feature::{BoundaryFeature, EarthquakeFeature},
        geojson::GeoJson,
    },
    layers::{
        group::LayerGroup,
        vector::{CircleMarker, LineStyle, PointStyle, Polyline},
    },
    style::{boundary_color, DepthScale, RadiusScale},
    ui::popup::PopupContent,
};
use serde::{Deserialize, Serialize};

/// What one render pass did with its batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderReport {
    pub rendered: usize,
    /// Features with no usable position
    pub skipped: usize,
}

impl RenderReport {
    pub fn total(&self) -> usize {
        self.rendered + self.skipped
    }
}

pub fn earthquakes_from_geojson(geojson: &GeoJson) -> Vec<EarthquakeFeature> {
    geojson
        .features()
        .iter()
        .map(EarthquakeFeature::from_geojson)
        .collect()
}

pub fn boundaries_from_geojson(geojson: &GeoJson) -> Vec<BoundaryFeature> {
    geojson
        .features()
        .iter()
        .map(BoundaryFeature::from_geojson)
        .collect()
}

/// Marker for one earthquake, `None` if it has nowhere to go.
///
/// Missing magnitude gives a zero radius and missing depth the shallowest
/// colour.
pub fn earthquake_marker(
    quake: &EarthquakeFeature,
    depth_scale: &DepthScale,
    radius_scale: RadiusScale,
) -> Option<CircleMarker> {
    let position = quake.position?;
    let fill = quake
        .depth_km
        .map(|depth| depth_scale.color_for(depth))
        .unwrap_or_else(|| depth_scale.shallowest());
    let radius = radius_scale.radius_for(quake.magnitude.unwrap_or(0.0));

    Some(CircleMarker::new(
        position,
        PointStyle::marker(fill, radius),
        PopupContent::earthquake(quake),
    ))
}

/// Polyline for one boundary step, `None` without a drawable line.
pub fn boundary_polyline(boundary: &BoundaryFeature) -> Option<Polyline> {
    if boundary.paths.is_empty() {
        return None;
    }

    Some(Polyline::new(
        boundary.paths.clone(),
        LineStyle::boundary(boundary_color(boundary.step_class.as_deref())),
        PopupContent::boundary(boundary),
    ))
}

pub fn render_earthquakes(
    quakes: &[EarthquakeFeature],
    depth_scale: &DepthScale,
    radius_scale: RadiusScale,
    group: &mut LayerGroup,
) -> RenderReport {
    let mut report = RenderReport::default();

    for (index, quake) in quakes.iter().enumerate() {
        match earthquake_marker(quake, depth_scale, radius_scale) {
            Some(marker) => {
                group.add(marker);
                report.rendered += 1;
            }
            None => {
                log::warn!(
                    "skipping earthquake #{} ({}): no usable position",
                    index,
                    quake.id.as_deref().unwrap_or("no id")
                );
                report.skipped += 1;
            }
        }
    }

    log::debug!(
        "rendered {} earthquake markers, skipped {}",
        report.rendered,
        report.skipped
    );
    report
}

pub fn render_boundaries(boundaries: &[BoundaryFeature], group: &mut LayerGroup) -> RenderReport {
    let mut report = RenderReport::default();

    for (index, boundary) in boundaries.iter().enumerate() {
        match boundary_polyline(boundary) {
            Some(line) => {
                group.add(line);
                report.rendered += 1;
            }
            None => {
                log::warn!(
                    "skipping boundary #{} ({}): no line geometry",
                    index,
                    boundary.plate_boundary_name.as_deref().unwrap_or("unnamed")
                );
                report.skipped += 1;
            }
        }
    }

    log::debug!(
        "rendered {} boundary paths, skipped {}",
        report.rendered,
        report.skipped
    );
    report
}
