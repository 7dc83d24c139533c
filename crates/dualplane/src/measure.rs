//! Quantitative validation of the recovered geometry.
//!
//! The measurements are the distance between the two planes, the distances
//! between every pair of resolved markers and the residual of each marker
//! against its own plane. Plane distance and residuals carry a qualitative
//! [`Grade`].

use dualplane_3d::PlaneEquation;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resolve::ResolvedMarker;

/// Qualitative accuracy grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    /// Below the excellent threshold.
    Excellent,
    /// Below the good threshold.
    Good,
    /// Anything else.
    Poor,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Grade::Excellent => "EXCELLENT",
            Grade::Good => "GOOD",
            Grade::Poor => "POOR",
        };
        write!(f, "{name}")
    }
}

/// Upper bounds (exclusive) for the excellent and good grades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    /// Values strictly below this are excellent.
    pub excellent: f64,
    /// Values strictly below this (and not excellent) are good.
    pub good: f64,
}

impl GradeThresholds {
    /// Grade a non-negative error value.
    pub fn grade(&self, value: f64) -> Grade {
        if value < self.excellent {
            Grade::Excellent
        } else if value < self.good {
            Grade::Good
        } else {
            Grade::Poor
        }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        for value in [self.excellent, self.good] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.excellent > self.good {
            return Err(ConfigError::UnorderedThresholds {
                name,
                excellent: self.excellent,
                good: self.good,
            });
        }
        Ok(())
    }
}

/// Parameters of the measurement engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Expected physical distance between the two planes, in depth units.
    pub expected_plane_distance: f64,
    /// Thresholds on the plane distance error, in percent.
    pub plane_distance_percent: GradeThresholds,
    /// Thresholds on the marker residual, in depth units.
    pub residual: GradeThresholds,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            expected_plane_distance: 700.0,
            plane_distance_percent: GradeThresholds {
                excellent: 5.0,
                good: 10.0,
            },
            residual: GradeThresholds {
                excellent: 1.0,
                good: 5.0,
            },
        }
    }
}

impl MeasurementConfig {
    /// Check that all distances and thresholds are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.expected_plane_distance;
        if !(expected.is_finite() && expected > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "expected_plane_distance",
                value: expected,
            });
        }
        self.plane_distance_percent
            .validate("plane_distance_percent")?;
        self.residual.validate("residual")
    }
}

/// Distance between the two planes compared to its expected value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaneDistance {
    /// Measured distance `|d1 - d2|`.
    pub distance: f64,
    /// Expected distance.
    pub expected: f64,
    /// Absolute error `|distance - expected|`.
    pub error: f64,
    /// Error relative to the expected distance, in percent.
    pub error_percent: f64,
    /// Grade of `error_percent`.
    pub grade: Grade,
}

/// Distances between two resolved markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerPairDistance {
    /// Identifier of the first marker.
    pub first_id: i32,
    /// Identifier of the second marker.
    pub second_id: i32,
    /// Euclidean 3d distance.
    pub distance_3d: f64,
    /// Euclidean distance over x and y only.
    pub distance_2d: f64,
    /// Absolute difference in z.
    pub depth_difference: f64,
}

/// Distance of a resolved marker to its assigned plane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerResidual {
    /// Marker identifier.
    pub id: i32,
    /// Assigned plane index.
    pub plane_index: usize,
    /// Absolute point-to-plane distance.
    pub residual: f64,
    /// Grade of `residual`.
    pub grade: Grade,
}

/// All measurements of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementReport {
    /// Distance between the two planes.
    pub plane_distance: PlaneDistance,
    /// Distances for every unordered pair of resolved markers.
    pub pair_distances: Vec<MarkerPairDistance>,
    /// Residual of each resolved marker.
    pub residuals: Vec<MarkerResidual>,
}

/// Perpendicular distance between two planes, `|d1 - d2|`.
///
/// Only meaningful for (nearly) parallel planes with unit normals of the same
/// orientation, which [`PlaneEquation`] guarantees.
#[inline]
pub fn plane_distance(first: &PlaneEquation, second: &PlaneEquation) -> f64 {
    (first.offset() - second.offset()).abs()
}

/// Compare the plane distance against the expected value.
pub fn measure_plane_distance(
    planes: &[PlaneEquation; 2],
    config: &MeasurementConfig,
) -> PlaneDistance {
    let distance = plane_distance(&planes[0], &planes[1]);
    let expected = config.expected_plane_distance;
    let error = (distance - expected).abs();
    let error_percent = error / expected * 100.0;

    PlaneDistance {
        distance,
        expected,
        error,
        error_percent,
        grade: config.plane_distance_percent.grade(error_percent),
    }
}

/// Distances between every unordered pair of markers, in input order.
pub fn marker_pair_distances(markers: &[ResolvedMarker]) -> Vec<MarkerPairDistance> {
    let mut pairs = Vec::with_capacity(markers.len() * markers.len().saturating_sub(1) / 2);
    for (i, first) in markers.iter().enumerate() {
        for second in &markers[i + 1..] {
            pairs.push(MarkerPairDistance {
                first_id: first.id,
                second_id: second.id,
                distance_3d: first.point.distance(&second.point),
                distance_2d: first.point.distance_xy(&second.point),
                depth_difference: (second.point.z - first.point.z).abs(),
            });
        }
    }
    pairs
}

/// Residual of each marker against its assigned plane.
///
/// Markers whose plane index has no equation in `planes` are skipped.
pub fn marker_residuals(
    markers: &[ResolvedMarker],
    planes: &[PlaneEquation],
    thresholds: &GradeThresholds,
) -> Vec<MarkerResidual> {
    markers
        .iter()
        .filter_map(|marker| {
            let plane = planes.get(marker.plane_index)?;
            let residual = plane.distance(&marker.point);
            Some(MarkerResidual {
                id: marker.id,
                plane_index: marker.plane_index,
                residual,
                grade: thresholds.grade(residual),
            })
        })
        .collect()
}

/// Compute the full measurement report.
pub fn measure(
    planes: &[PlaneEquation; 2],
    markers: &[ResolvedMarker],
    config: &MeasurementConfig,
) -> MeasurementReport {
    let plane_distance = measure_plane_distance(planes, config);
    log::info!(
        "Plane distance: {:.3} (expected {:.3}, error {:.2}%, {})",
        plane_distance.distance,
        plane_distance.expected,
        plane_distance.error_percent,
        plane_distance.grade
    );

    MeasurementReport {
        plane_distance,
        pair_distances: marker_pair_distances(markers),
        residuals: marker_residuals(markers, planes, &config.residual),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::DepthSource;
    use approx::assert_relative_eq;
    use dualplane_3d::Point3d;

    fn resolved(id: i32, plane_index: usize, point: [f64; 3]) -> ResolvedMarker {
        ResolvedMarker {
            id,
            plane_index,
            point: Point3d::from(point),
            source: DepthSource::Measured,
        }
    }

    fn flat(z: f64) -> PlaneEquation {
        PlaneEquation::new(0.0, 0.0, 1.0, -z).unwrap()
    }

    #[test]
    fn test_grade_thresholds() {
        let t = GradeThresholds {
            excellent: 1.0,
            good: 5.0,
        };
        assert_eq!(t.grade(0.0), Grade::Excellent);
        assert_eq!(t.grade(0.999), Grade::Excellent);
        assert_eq!(t.grade(1.0), Grade::Good);
        assert_eq!(t.grade(4.9), Grade::Good);
        assert_eq!(t.grade(5.0), Grade::Poor);
        assert_eq!(Grade::Poor.to_string(), "POOR");
    }

    #[test]
    fn test_plane_distance_symmetric() {
        let (p1, p2) = (flat(100.0), flat(800.0));
        assert_relative_eq!(plane_distance(&p1, &p2), 700.0);
        assert_eq!(plane_distance(&p1, &p2), plane_distance(&p2, &p1));
        assert_eq!(plane_distance(&p1, &p1), 0.0);
    }

    #[test]
    fn test_measure_plane_distance_grades() {
        let config = MeasurementConfig::default();

        let exact = measure_plane_distance(&[flat(100.0), flat(800.0)], &config);
        assert_relative_eq!(exact.error, 0.0);
        assert_eq!(exact.grade, Grade::Excellent);

        // 7% off
        let off = measure_plane_distance(&[flat(100.0), flat(849.0)], &config);
        assert_relative_eq!(off.error_percent, 7.0, epsilon = 1e-9);
        assert_eq!(off.grade, Grade::Good);

        let poor = measure_plane_distance(&[flat(100.0), flat(500.0)], &config);
        assert_eq!(poor.grade, Grade::Poor);
    }

    #[test]
    fn test_marker_pair_distances() {
        let markers = vec![
            resolved(1, 0, [0.0, 0.0, 100.0]),
            resolved(2, 1, [3.0, 4.0, 800.0]),
            resolved(3, 1, [6.0, 8.0, 800.0]),
        ];

        let pairs = marker_pair_distances(&markers);
        assert_eq!(pairs.len(), 3);

        let ids = pairs
            .iter()
            .map(|p| (p.first_id, p.second_id))
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![(1, 2), (1, 3), (2, 3)]);

        assert_relative_eq!(pairs[0].distance_2d, 5.0);
        assert_relative_eq!(pairs[0].depth_difference, 700.0);
        assert_relative_eq!(pairs[0].distance_3d, (25.0f64 + 700.0 * 700.0).sqrt());
        assert_relative_eq!(pairs[2].distance_3d, 5.0);
        assert_relative_eq!(pairs[2].depth_difference, 0.0);

        assert!(marker_pair_distances(&markers[..1]).is_empty());
    }

    #[test]
    fn test_marker_residuals() {
        let planes = [flat(100.0), flat(800.0)];
        let markers = vec![
            resolved(1, 0, [10.0, 10.0, 100.4]),
            resolved(2, 1, [10.0, 10.0, 797.0]),
            resolved(3, 1, [10.0, 10.0, 790.0]),
        ];

        let residuals = marker_residuals(&markers, &planes, &MeasurementConfig::default().residual);
        let grades = residuals.iter().map(|r| r.grade).collect::<Vec<_>>();
        assert_eq!(grades, vec![Grade::Excellent, Grade::Good, Grade::Poor]);
        assert_relative_eq!(residuals[0].residual, 0.4, epsilon = 1e-9);
        assert_relative_eq!(residuals[1].residual, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_config_validate() {
        assert_eq!(MeasurementConfig::default().validate(), Ok(()));

        let config = MeasurementConfig {
            expected_plane_distance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                name: "expected_plane_distance",
                ..
            })
        ));

        let config = MeasurementConfig {
            residual: GradeThresholds {
                excellent: 6.0,
                good: 5.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnorderedThresholds {
                name: "residual",
                ..
            })
        ));
    }

    #[test]
    fn test_config_partial_json() -> Result<(), serde_json::Error> {
        let config: MeasurementConfig = serde_json::from_str(r#"{"expected_plane_distance": 650.0}"#)?;
        assert_eq!(config.expected_plane_distance, 650.0);
        assert_eq!(config.residual, MeasurementConfig::default().residual);
        Ok(())
    }
}
