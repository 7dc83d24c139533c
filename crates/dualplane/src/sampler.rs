use dualplane_3d::Point3d;
use num_traits::ToPrimitive;

use crate::depth::DepthMap;
use crate::region::Region;

/// Collect the valid 3d samples `(x, y, depth)` inside a region.
///
/// The region is clipped to the map bounds. Pixels without a valid reading
/// (zero, negative, NaN) are skipped. The result is empty when the region lies
/// outside the map or holds no valid depth.
pub fn sample_region_points<T>(region: &Region, depth: &DepthMap<T>) -> Vec<Point3d>
where
    T: Copy + ToPrimitive,
{
    let Some(rect) = region.rect.clip(depth.size()) else {
        log::debug!("Region {} lies outside the depth map", region.index);
        return Vec::new();
    };

    let mut points = Vec::with_capacity((rect.width() * rect.height()) as usize);
    for y in rect.y_min..=rect.y_max {
        for x in rect.x_min..=rect.x_max {
            if let Some(z) = depth.depth_at(x, y) {
                points.push(Point3d::new(x as f64, y as f64, z));
            }
        }
    }

    log::debug!("Region {}: {} valid samples", region.index, points.len());

    points
}
