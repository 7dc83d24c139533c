use dualplane_3d::PlaneFitError;

/// Error raised when building a depth map.
#[derive(thiserror::Error, Debug)]
pub enum DepthMapError {
    /// The number of samples does not match the map size.
    #[error("Data length ({0}) does not match the depth map size ({1})")]
    InvalidDataLength(usize, usize),
}

/// Error raised when building a region rectangle.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RegionError {
    /// Width or height is zero.
    #[error("Region rectangle must have a non-zero size, got {width}x{height}")]
    EmptyRect {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Error raised when annotating a marker.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MarkerError {
    /// The marker already carries a plane assignment.
    #[error("Marker {id} is already assigned to plane {plane}")]
    AlreadyAssigned {
        /// Marker identifier.
        id: i32,
        /// Plane index already assigned.
        plane: usize,
    },
}

/// Error raised by a marker source.
#[derive(thiserror::Error, Debug)]
pub enum MarkerSourceError {
    /// The marker list could not be read.
    #[error("Failed to read marker list: {0}")]
    Io(#[from] std::io::Error),

    /// The source is not available in this build or environment.
    #[error("Marker source {0} is not available")]
    Unavailable(&'static str),
}

/// Error raised when validating a pipeline configuration.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive is not.
    #[error("{name} must be a positive finite number, got {value}")]
    NotPositive {
        /// Name of the offending field.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Grade thresholds are not ordered.
    #[error("{name}: excellent threshold {excellent} is larger than good threshold {good}")]
    UnorderedThresholds {
        /// Name of the offending field.
        name: &'static str,
        /// Excellent threshold.
        excellent: f64,
        /// Good threshold.
        good: f64,
    },
}

/// Run-level failure of the measurement pipeline.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PipelineError {
    /// The run needs exactly two regions.
    #[error("Expected {expected} plane regions, got {actual}")]
    RegionCount {
        /// Number of regions required.
        expected: usize,
        /// Number of regions provided.
        actual: usize,
    },

    /// Two regions share the same plane index.
    #[error("Duplicate plane region index {0}")]
    DuplicateRegionIndex(usize),

    /// A region index is not 0 or 1.
    #[error("Plane region index {0} is out of range")]
    RegionIndexOutOfRange(usize),

    /// A region holds too few valid depth samples to fit a plane.
    #[error("Region {region} has {actual} valid depth samples, at least {required} are required")]
    InsufficientPoints {
        /// Plane index of the region.
        region: usize,
        /// Minimum number of samples.
        required: usize,
        /// Number of valid samples found.
        actual: usize,
    },

    /// Plane fitting failed.
    #[error(transparent)]
    PlaneFit(#[from] PlaneFitError),

    /// The configuration is invalid.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
