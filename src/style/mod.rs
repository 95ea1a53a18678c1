//! Visual encoding: colours, the depth and magnitude scales, and the
//! plate boundary classifier.

pub mod boundary;
pub mod color;
pub mod depth;
pub mod magnitude;

pub use boundary::{boundary_color, BoundaryClass, FALLBACK_BOUNDARY_COLOR};
pub use color::Color;
pub use depth::{depth_color, DepthBucket, DepthScale, DEPTH_BUCKETS};
pub use magnitude::{area_radius, magnitude_radius, RadiusScale};
