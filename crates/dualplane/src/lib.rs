#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Dualplane
//!
//! Recovers two calibration planes and the 3d positions of the markers on
//! them from a single depth map, then validates the result against expected
//! physical measurements.
//!
//! ## Pipeline
//!
//! 1. [`sampler`]: collect valid depth samples inside each plane region.
//! 2. [`dualplane_3d::ransac`]: fit one plane per region with RANSAC.
//! 3. [`assign`]: assign each marker to the region containing it.
//! 4. [`resolve`]: lift each marker to 3d, falling back to the plane when the
//!    depth reading is missing.
//! 5. [`measure`]: plane distance, marker distances and residuals.
//!
//! ## Example
//!
//! ```rust
//! use dualplane::{run_pipeline, DepthMap, Marker, PipelineConfig, PixelRect, Region};
//!
//! // two flat surfaces at 100 mm and 800 mm
//! let depth = DepthMap::from_fn([120, 60].into(), |x, _| if x < 60 { 100u16 } else { 800 });
//! let regions = [
//!     Region::new(PixelRect::new(0, 0, 49, 49), 0),
//!     Region::new(PixelRect::new(70, 0, 119, 49), 1),
//! ];
//! let markers = vec![Marker::new(1, 20.0, 20.0), Marker::new(2, 90.0, 20.0)];
//!
//! let mut config = PipelineConfig::default();
//! config.ransac.random_seed = Some(42);
//!
//! let output = run_pipeline(&depth, &regions, markers, &config)?;
//! assert!((output.report.plane_distance.distance - 700.0).abs() < 1e-6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Marker to plane assignment.
pub mod assign;

/// Depth map container.
pub mod depth;

/// Error types.
pub mod error;

/// Marker type.
pub mod marker;

/// Plane distance, marker distances and residuals with grades.
pub mod measure;

/// End-to-end pipeline orchestration.
pub mod pipeline;

/// Plane regions.
pub mod region;

/// Marker depth resolution.
pub mod resolve;

/// Depth sampling inside regions.
pub mod sampler;

/// Marker acquisition sources.
pub mod source;

pub use depth::{DepthMap, DepthSize};
pub use error::{ConfigError, DepthMapError, MarkerError, MarkerSourceError, PipelineError, RegionError};
pub use marker::Marker;
pub use measure::{Grade, GradeThresholds, MeasurementConfig, MeasurementReport};
pub use pipeline::{
    fit_region_planes, run_pipeline, run_pipeline_with_rng, FittedPlane, PipelineConfig,
    PipelineOutput,
};
pub use region::{PixelRect, Region};
pub use resolve::{DepthSource, Resolution, ResolvedMarker, Unresolved};

pub use dualplane_3d::{PlaneEquation, PlaneFit, PlaneRansacParams, Point3d};
