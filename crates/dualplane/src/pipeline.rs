use dualplane_3d::{fit_plane_ransac_with_rng, PlaneEquation, PlaneFit, PlaneRansacParams};
use num_traits::ToPrimitive;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::assign::assign_markers;
use crate::depth::DepthMap;
use crate::error::{ConfigError, PipelineError};
use crate::marker::Marker;
use crate::measure::{measure, MeasurementConfig, MeasurementReport};
use crate::region::{validate_regions, Region, NUM_PLANES};
use crate::resolve::{resolve_markers, Resolution};
use crate::sampler::sample_region_points;

/// Configuration of a full pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Plane fitting parameters.
    pub ransac: PlaneRansacParams,
    /// Measurement parameters.
    pub measurement: MeasurementConfig,
}

impl PipelineConfig {
    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.ransac.inlier_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "ransac.inlier_threshold",
                value: threshold,
            });
        }
        self.measurement.validate()
    }
}

/// A plane fitted to the samples of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedPlane {
    /// Plane index of the source region.
    pub index: usize,
    /// Number of valid depth samples in the region.
    pub num_points: usize,
    /// RANSAC result.
    pub fit: PlaneFit,
}

impl FittedPlane {
    /// The fitted plane equation.
    #[inline]
    pub fn plane(&self) -> &PlaneEquation {
        &self.fit.plane
    }
}

/// Everything computed by one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// The two fitted planes, ordered by plane index.
    pub planes: [FittedPlane; 2],
    /// The input markers annotated with their plane assignment.
    pub markers: Vec<Marker>,
    /// 3d positions of the markers.
    pub resolution: Resolution,
    /// Measurements.
    pub report: MeasurementReport,
}

impl PipelineOutput {
    /// The two plane equations ordered by plane index.
    pub fn plane_equations(&self) -> [PlaneEquation; 2] {
        [self.planes[0].fit.plane, self.planes[1].fit.plane]
    }
}

/// Fit one plane per region.
///
/// The result is ordered by region index regardless of the order of
/// `regions`.
///
/// # Errors
///
/// * Region validation errors if there are not exactly two regions with
///   indices 0 and 1.
/// * [`PipelineError::InsufficientPoints`] if a region holds fewer than
///   `params.min_points` valid samples.
pub fn fit_region_planes<T, R>(
    depth: &DepthMap<T>,
    regions: &[Region],
    params: &PlaneRansacParams,
    rng: &mut R,
) -> Result<[FittedPlane; 2], PipelineError>
where
    T: Copy + ToPrimitive,
    R: Rng + ?Sized,
{
    validate_regions(regions)?;

    let mut sorted = regions.to_vec();
    sorted.sort_by_key(|region| region.index);

    let mut fitted = Vec::with_capacity(NUM_PLANES);
    for region in &sorted {
        let points = sample_region_points(region, depth);
        log::info!("Fitting plane {}: {} points", region.index, points.len());

        if points.len() < params.min_points {
            return Err(PipelineError::InsufficientPoints {
                region: region.index,
                required: params.min_points,
                actual: points.len(),
            });
        }

        let fit = fit_plane_ransac_with_rng(&points, params, rng)?;
        log::info!("Plane {}: {}", region.index, fit.plane);

        fitted.push(FittedPlane {
            index: region.index,
            num_points: points.len(),
            fit,
        });
    }

    let mut fitted = fitted.into_iter();
    match (fitted.next(), fitted.next()) {
        (Some(first), Some(second)) => Ok([first, second]),
        _ => Err(PipelineError::RegionCount {
            expected: NUM_PLANES,
            actual: regions.len(),
        }),
    }
}

/// Run the whole pipeline with an explicit random source.
///
/// Markers outside every region or without a resolvable depth are left out
/// of the report; they are listed in [`Resolution::unresolved`].
pub fn run_pipeline_with_rng<T, R>(
    depth: &DepthMap<T>,
    regions: &[Region],
    markers: Vec<Marker>,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<PipelineOutput, PipelineError>
where
    T: Copy + ToPrimitive,
    R: Rng + ?Sized,
{
    config.validate()?;

    let planes = fit_region_planes(depth, regions, &config.ransac, rng)?;
    let equations = [planes[0].fit.plane, planes[1].fit.plane];

    let mut markers = markers;
    let num_assigned = assign_markers(&mut markers, regions);
    log::info!("Assigned {}/{} markers", num_assigned, markers.len());

    let resolution = resolve_markers(&markers, depth, &equations);
    let report = measure(&equations, &resolution.resolved, &config.measurement);

    Ok(PipelineOutput {
        planes,
        markers,
        resolution,
        report,
    })
}

/// Run the whole pipeline.
///
/// Sampling is seeded from `config.ransac.random_seed` when set, otherwise
/// from the operating system.
pub fn run_pipeline<T>(
    depth: &DepthMap<T>,
    regions: &[Region],
    markers: Vec<Marker>,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError>
where
    T: Copy + ToPrimitive,
{
    let mut rng: StdRng = match config.ransac.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    run_pipeline_with_rng(depth, regions, markers, config, &mut rng)
}
