use crate::marker::Marker;
use crate::region::Region;

/// Index of the first region containing the pixel `(x, y)`.
pub fn find_region(pixel: [i64; 2], regions: &[Region]) -> Option<usize> {
    regions
        .iter()
        .find(|region| region.rect.contains(pixel[0], pixel[1]))
        .map(|region| region.index)
}

/// Assign each marker to the first region containing its rounded position.
///
/// Regions are tested in the given order. Markers outside every region stay
/// unassigned, as are markers with a non-finite position. Markers that already
/// carry an assignment are left untouched.
/// Returns the number of markers assigned by this call.
pub fn assign_markers(markers: &mut [Marker], regions: &[Region]) -> usize {
    let mut num_assigned = 0;

    for marker in markers.iter_mut() {
        if marker.is_assigned() {
            continue;
        }

        if !marker.has_finite_position() {
            log::warn!(
                "Marker {} has a non-finite position {:?}",
                marker.id,
                marker.position
            );
            continue;
        }

        match find_region(marker.pixel(), regions) {
            Some(index) => {
                if marker.assign(index).is_ok() {
                    num_assigned += 1;
                }
            }
            None => log::warn!(
                "Marker {} at {:?} lies outside all plane regions",
                marker.id,
                marker.position
            ),
        }
    }

    num_assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::PixelRect;

    fn regions() -> [Region; 2] {
        [
            Region::new(PixelRect::new(0, 0, 49, 49), 0),
            Region::new(PixelRect::new(100, 0, 149, 49), 1),
        ]
    }

    #[test]
    fn test_assign_inside() {
        let mut markers = vec![
            Marker::new(1, 20.3, 30.0),
            Marker::new(2, 120.0, 10.7),
            Marker::new(3, 75.0, 25.0),
        ];

        let n = assign_markers(&mut markers, &regions());
        assert_eq!(n, 2);
        assert_eq!(markers[0].plane_index(), Some(0));
        assert_eq!(markers[1].plane_index(), Some(1));
        assert_eq!(markers[2].plane_index(), None);
    }

    #[test]
    fn test_assign_edges_inclusive() {
        let mut markers = vec![
            Marker::new(1, 49.0, 49.0),
            Marker::new(2, 100.0, 0.0),
            Marker::new(3, 49.4, 0.0),
            Marker::new(4, 49.6, 0.0),
        ];

        assign_markers(&mut markers, &regions());
        assert_eq!(markers[0].plane_index(), Some(0));
        assert_eq!(markers[1].plane_index(), Some(1));
        assert_eq!(markers[2].plane_index(), Some(0));
        assert_eq!(markers[3].plane_index(), None);
    }

    #[test]
    fn test_assign_first_match_wins() {
        let overlapping = [
            Region::new(PixelRect::new(0, 0, 60, 60), 1),
            Region::new(PixelRect::new(40, 40, 100, 100), 0),
        ];
        let mut markers = vec![Marker::new(1, 50.0, 50.0)];
        assign_markers(&mut markers, &overlapping);
        assert_eq!(markers[0].plane_index(), Some(1));
    }

    #[test]
    fn test_assign_skips_non_finite() {
        let mut markers = vec![
            Marker::new(1, f64::NAN, f64::NAN),
            Marker::new(2, f64::INFINITY, 5.0),
            Marker::new(3, 10.0, f64::NEG_INFINITY),
            Marker::new(4, 0.0, 0.0),
        ];

        assert_eq!(assign_markers(&mut markers, &regions()), 1);
        assert_eq!(markers[0].plane_index(), None);
        assert_eq!(markers[1].plane_index(), None);
        assert_eq!(markers[2].plane_index(), None);
        assert_eq!(markers[3].plane_index(), Some(0));
    }

    #[test]
    fn test_assign_keeps_existing() {
        let mut markers = vec![Marker::new(1, 20.0, 20.0)];
        assert_eq!(markers[0].assign(1), Ok(()));
        assert_eq!(assign_markers(&mut markers, &regions()), 0);
        assert_eq!(markers[0].plane_index(), Some(1));
    }
}
