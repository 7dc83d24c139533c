use dualplane_3d::{PlaneEquation, Point3d};
use num_traits::ToPrimitive;
use serde::Serialize;

use crate::depth::DepthMap;
use crate::marker::Marker;

/// Where the depth of a resolved marker comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepthSource {
    /// A valid reading of the depth map at the marker pixel.
    Measured,
    /// The assigned plane equation solved for z.
    PlaneFallback,
}

/// Why a marker could not be lifted to 3d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unresolved {
    /// The marker lies outside every region.
    Unassigned,
    /// No plane equation exists for the assigned index.
    MissingPlane,
    /// No depth reading and the plane is parallel to the depth axis.
    DegeneratePlane,
}

/// A marker with its 3d position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMarker {
    /// Marker identifier.
    pub id: i32,
    /// Assigned plane index.
    pub plane_index: usize,
    /// 3d position `(x, y, z)` at the rounded marker pixel.
    pub point: Point3d,
    /// Origin of `point.z`.
    pub source: DepthSource,
}

/// Outcome of resolving a set of markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    /// Markers with a 3d position, in input order.
    pub resolved: Vec<ResolvedMarker>,
    /// Identifiers of the markers left out, with the reason.
    pub unresolved: Vec<(i32, Unresolved)>,
}

/// Compute the 3d position of one marker.
///
/// A valid depth reading at the rounded marker pixel takes precedence, even
/// when it disagrees with the plane. Otherwise z is solved from the plane of
/// the marker's assigned index in `planes`.
pub fn resolve_marker<T>(
    marker: &Marker,
    depth: &DepthMap<T>,
    planes: &[PlaneEquation],
) -> Result<ResolvedMarker, Unresolved>
where
    T: Copy + ToPrimitive,
{
    let plane_index = marker.plane_index().ok_or(Unresolved::Unassigned)?;
    let [px, py] = marker.pixel();
    let (x, y) = (px as f64, py as f64);

    let (z, source) = match depth.depth_at(px, py) {
        Some(z) => (z, DepthSource::Measured),
        None => {
            let plane = planes.get(plane_index).ok_or(Unresolved::MissingPlane)?;
            let z = plane.solve_z(x, y).ok_or(Unresolved::DegeneratePlane)?;
            (z, DepthSource::PlaneFallback)
        }
    };

    Ok(ResolvedMarker {
        id: marker.id,
        plane_index,
        point: Point3d::new(x, y, z),
        source,
    })
}

/// Resolve every marker, collecting the ones that cannot be lifted.
pub fn resolve_markers<T>(
    markers: &[Marker],
    depth: &DepthMap<T>,
    planes: &[PlaneEquation],
) -> Resolution
where
    T: Copy + ToPrimitive,
{
    let mut resolution = Resolution::default();

    for marker in markers {
        match resolve_marker(marker, depth, planes) {
            Ok(resolved) => {
                log::debug!(
                    "Marker {} (plane {}): {:?} from {:?}",
                    resolved.id,
                    resolved.plane_index,
                    resolved.point,
                    resolved.source
                );
                resolution.resolved.push(resolved);
            }
            Err(reason) => {
                log::warn!("Marker {} left unresolved: {:?}", marker.id, reason);
                resolution.unresolved.push((marker.id, reason));
            }
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assigned(id: i32, x: f64, y: f64, plane: usize) -> Marker {
        let mut marker = Marker::new(id, x, y);
        assert_eq!(marker.assign(plane), Ok(()));
        marker
    }

    #[test]
    fn test_measured_depth_wins() {
        let depth = DepthMap::from_fn([10, 10].into(), |_, _| 512u16);
        // plane says z = 100, the reading says 512
        let planes = [PlaneEquation::new(0.0, 0.0, 1.0, -100.0).unwrap()];

        let res = resolve_marker(&assigned(1, 3.2, 4.8, 0), &depth, &planes).unwrap();
        assert_eq!(res.point, Point3d::new(3.0, 5.0, 512.0));
        assert_eq!(res.source, DepthSource::Measured);
    }

    #[test]
    fn test_plane_fallback() {
        let depth = DepthMap::from_fn([10, 10].into(), |_, _| 0u16);
        let plane = PlaneEquation::new(0.2, -0.1, 1.0, -300.0).unwrap();
        let planes = [PlaneEquation::horizontal(), plane];

        let res = resolve_marker(&assigned(4, 6.0, 2.0, 1), &depth, &planes).unwrap();
        let [a, b, c, d] = plane.coefficients();
        assert_relative_eq!(res.point.z, -(a * 6.0 + b * 2.0 + d) / c, epsilon = 1e-12);
        assert_relative_eq!(plane.distance(&res.point), 0.0, epsilon = 1e-9);
        assert_eq!(res.source, DepthSource::PlaneFallback);
        assert_eq!(res.plane_index, 1);
    }

    #[test]
    fn test_fallback_outside_map() {
        let depth = DepthMap::from_fn([4, 4].into(), |_, _| 900.0f32);
        let planes = [PlaneEquation::new(0.0, 0.0, 1.0, -250.0).unwrap()];

        let res = resolve_marker(&assigned(2, 20.0, 20.0, 0), &depth, &planes).unwrap();
        assert_relative_eq!(res.point.z, 250.0);
        assert_eq!(res.source, DepthSource::PlaneFallback);
    }

    #[test]
    fn test_unresolved_reasons() {
        let depth = DepthMap::from_fn([4, 4].into(), |_, _| 0u16);
        let vertical = [PlaneEquation::new(1.0, 0.0, 0.0, -2.0).unwrap()];

        assert_eq!(
            resolve_marker(&Marker::new(1, 1.0, 1.0), &depth, &vertical),
            Err(Unresolved::Unassigned)
        );
        assert_eq!(
            resolve_marker(&assigned(2, 1.0, 1.0, 0), &depth, &vertical),
            Err(Unresolved::DegeneratePlane)
        );
        assert_eq!(
            resolve_marker(&assigned(3, 1.0, 1.0, 1), &depth, &vertical),
            Err(Unresolved::MissingPlane)
        );
    }

    #[test]
    fn test_resolve_markers_collects() {
        let depth = DepthMap::from_fn([4, 4].into(), |x, _| if x == 0 { 700u16 } else { 0 });
        let planes = [
            PlaneEquation::new(0.0, 0.0, 1.0, -100.0).unwrap(),
            PlaneEquation::new(0.0, 1.0, 0.0, -1.0).unwrap(),
        ];
        let markers = vec![
            assigned(1, 0.0, 1.0, 1),
            assigned(2, 2.0, 2.0, 0),
            assigned(3, 2.0, 2.0, 1),
            Marker::new(4, 3.0, 3.0),
        ];

        let resolution = resolve_markers(&markers, &depth, &planes);
        let ids = resolution.resolved.iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(resolution.resolved[0].point.z, 700.0);
        assert_eq!(resolution.resolved[1].point.z, 100.0);
        assert_eq!(
            resolution.unresolved,
            vec![(3, Unresolved::DegeneratePlane), (4, Unresolved::Unassigned)]
        );
    }
}
