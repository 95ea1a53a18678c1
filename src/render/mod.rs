pub mod features;

pub use features::{
    boundaries_from_geojson, boundary_polyline, earthquake_marker, earthquakes_from_geojson,
    render_boundaries, render_earthquakes, RenderReport,
};
