/// Error raised when building a plane equation.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlaneError {
    /// The normal vector is too short to be normalized.
    #[error("Plane normal magnitude {0} is below the degeneracy tolerance")]
    DegenerateNormal(f64),

    /// One of the coefficients is NaN or infinite.
    #[error("Plane coefficients must be finite")]
    NonFiniteCoefficient,
}

/// Error raised by the RANSAC plane estimator.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PlaneFitError {
    /// Not enough points to attempt a fit.
    #[error("Plane fitting requires at least {required} points, got {actual}")]
    InsufficientPoints {
        /// Minimum number of points required.
        required: usize,
        /// Number of points provided.
        actual: usize,
    },

    /// The inlier threshold must be a positive finite distance.
    #[error("Invalid inlier threshold {0}, expected a positive finite distance")]
    InvalidThreshold(f64),
}
