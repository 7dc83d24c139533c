#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for plane construction and fitting.
pub mod error;

/// Plane equations in implicit form.
pub mod plane;

/// 3d point type.
pub mod point;

/// RANSAC plane estimation.
pub mod ransac;

pub use error::{PlaneError, PlaneFitError};
pub use plane::PlaneEquation;
pub use point::Point3d;
pub use ransac::{count_inliers, fit_plane_ransac, fit_plane_ransac_with_rng, PlaneFit, PlaneRansacParams};
