//! RANSAC plane estimation over noisy depth samples.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::PlaneFitError;
use crate::plane::PlaneEquation;
use crate::point::Point3d;

/// Parameters for RANSAC plane fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneRansacParams {
    /// Number of random trials.
    pub iterations: usize,
    /// Distance below which a point counts as an inlier, in point units.
    pub inlier_threshold: f64,
    /// Minimum number of points required to attempt a fit.
    pub min_points: usize,
    /// Inlier ratio below which the fit is reported as low quality.
    pub min_inlier_ratio: f64,
    /// Optional fixed seed for reproducible sampling.
    pub random_seed: Option<u64>,
}

impl Default for PlaneRansacParams {
    fn default() -> Self {
        Self {
            iterations: 1000,
            inlier_threshold: 1.0,
            min_points: 100,
            min_inlier_ratio: 0.9,
            random_seed: None,
        }
    }
}

/// Result of a RANSAC plane fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneFit {
    /// Best plane found.
    pub plane: PlaneEquation,
    /// Number of points within the inlier threshold of `plane`.
    pub num_inliers: usize,
    /// Number of points the fit was run on.
    pub num_points: usize,
}

impl PlaneFit {
    /// Fraction of the points that are inliers of the fitted plane.
    pub fn inlier_ratio(&self) -> f64 {
        if self.num_points == 0 {
            return 0.0;
        }
        self.num_inliers as f64 / self.num_points as f64
    }

    /// Whether no trial produced a usable plane.
    ///
    /// A degenerate fit carries [`PlaneEquation::horizontal`] as its plane.
    pub fn is_degenerate(&self) -> bool {
        self.num_inliers == 0
    }
}

/// Count the points whose distance to `plane` is strictly below `threshold`.
pub fn count_inliers(points: &[Point3d], plane: &PlaneEquation, threshold: f64) -> usize {
    points
        .iter()
        .filter(|p| plane.distance(p) < threshold)
        .count()
}

/// Fit a plane to `points` with RANSAC.
///
/// The random source is seeded from `params.random_seed` when set, otherwise
/// from the operating system. See [`fit_plane_ransac_with_rng`].
pub fn fit_plane_ransac(
    points: &[Point3d],
    params: &PlaneRansacParams,
) -> Result<PlaneFit, PlaneFitError> {
    let mut rng: StdRng = match params.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    fit_plane_ransac_with_rng(points, params, &mut rng)
}

/// Fit a plane to `points` with RANSAC using an explicit random source.
///
/// Each trial draws three indices independently and uniformly. Trials with
/// coinciding indices or a near-degenerate normal are skipped. The candidate
/// with the highest inlier count wins; ties keep the earliest trial.
///
/// If no trial yields a valid plane the result is the horizontal plane with
/// zero inliers, which callers detect through [`PlaneFit::is_degenerate`].
///
/// # Errors
///
/// * [`PlaneFitError::InvalidThreshold`] if the threshold is not a positive
///   finite number.
/// * [`PlaneFitError::InsufficientPoints`] if fewer than `params.min_points`
///   (and never fewer than three) points are given.
pub fn fit_plane_ransac_with_rng<R: Rng + ?Sized>(
    points: &[Point3d],
    params: &PlaneRansacParams,
    rng: &mut R,
) -> Result<PlaneFit, PlaneFitError> {
    let threshold = params.inlier_threshold;
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(PlaneFitError::InvalidThreshold(threshold));
    }

    let n = points.len();
    let required = params.min_points.max(3);
    if n < required {
        return Err(PlaneFitError::InsufficientPoints {
            required,
            actual: n,
        });
    }

    let mut best_plane = PlaneEquation::horizontal();
    let mut best_inliers = 0;

    for iter in 0..params.iterations {
        let idx1 = rng.random_range(0..n);
        let idx2 = rng.random_range(0..n);
        let idx3 = rng.random_range(0..n);

        if idx1 == idx2 || idx2 == idx3 || idx1 == idx3 {
            continue;
        }

        let Some(candidate) =
            PlaneEquation::from_points(&points[idx1], &points[idx2], &points[idx3])
        else {
            continue;
        };

        let inliers = count_inliers(points, &candidate, threshold);
        if inliers > best_inliers {
            log::debug!("iteration {}: {} inliers for {}", iter, inliers, candidate);
            best_inliers = inliers;
            best_plane = candidate;
        }
    }

    let fit = PlaneFit {
        plane: best_plane,
        num_inliers: best_inliers,
        num_points: n,
    };

    log::info!(
        "Inliers: {}/{} ({:.2}%)",
        fit.num_inliers,
        fit.num_points,
        fit.inlier_ratio() * 100.0
    );

    if fit.is_degenerate() {
        log::warn!("No valid plane found in {} iterations", params.iterations);
    } else if fit.inlier_ratio() < params.min_inlier_ratio {
        log::warn!(
            "Low inlier ratio {:.3} (expected at least {:.3})",
            fit.inlier_ratio(),
            params.min_inlier_ratio
        );
    }

    Ok(fit)
}
