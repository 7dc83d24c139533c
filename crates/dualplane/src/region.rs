use serde::{Deserialize, Serialize};

use crate::depth::DepthSize;
use crate::error::{PipelineError, RegionError};

/// Number of planes expected per run.
pub const NUM_PLANES: usize = 2;

/// An axis-aligned pixel rectangle with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left-most column.
    pub x_min: i64,
    /// Top-most row.
    pub y_min: i64,
    /// Right-most column.
    pub x_max: i64,
    /// Bottom-most row.
    pub y_max: i64,
}

impl PixelRect {
    /// Create a rectangle from two opposite corners in any order.
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self {
            x_min: x0.min(x1),
            y_min: y0.min(y1),
            x_max: x0.max(x1),
            y_max: y0.max(y1),
        }
    }

    /// Create a rectangle from the two corners of a drag gesture.
    pub fn from_corners(start: [i64; 2], end: [i64; 2]) -> Self {
        Self::new(start[0], start[1], end[0], end[1])
    }

    /// Create a rectangle covering `width x height` pixels from `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::EmptyRect`] when either dimension is zero.
    pub fn from_xywh(x: i64, y: i64, width: u32, height: u32) -> Result<Self, RegionError> {
        if width == 0 || height == 0 {
            return Err(RegionError::EmptyRect { width, height });
        }
        Ok(Self {
            x_min: x,
            y_min: y,
            x_max: x + width as i64 - 1,
            y_max: y + height as i64 - 1,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u64 {
        (self.x_max - self.x_min) as u64 + 1
    }

    /// Height in pixels.
    pub fn height(&self) -> u64 {
        (self.y_max - self.y_min) as u64 + 1
    }

    /// Whether the pixel `(x, y)` lies inside the rectangle, edges included.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Intersect the rectangle with the bounds of a map of the given size.
    ///
    /// Returns `None` when the rectangle lies entirely outside the map.
    pub fn clip(&self, size: DepthSize) -> Option<PixelRect> {
        if size.width == 0 || size.height == 0 {
            return None;
        }
        let x_min = self.x_min.max(0);
        let y_min = self.y_min.max(0);
        let x_max = self.x_max.min(size.width as i64 - 1);
        let y_max = self.y_max.min(size.height as i64 - 1);
        if x_min > x_max || y_min > y_max {
            return None;
        }
        Some(PixelRect {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }
}

/// A rectangle selecting the depth samples of one of the two planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Pixel rectangle.
    pub rect: PixelRect,
    /// Plane index, 0 or 1.
    pub index: usize,
}

impl Region {
    /// Create a region for the plane `index`.
    pub fn new(rect: PixelRect, index: usize) -> Self {
        Self { rect, index }
    }
}

/// Check that exactly two regions with the distinct indices 0 and 1 are given.
pub fn validate_regions(regions: &[Region]) -> Result<(), PipelineError> {
    if regions.len() != NUM_PLANES {
        return Err(PipelineError::RegionCount {
            expected: NUM_PLANES,
            actual: regions.len(),
        });
    }

    let mut seen = [false; NUM_PLANES];
    for region in regions {
        let slot = seen
            .get_mut(region.index)
            .ok_or(PipelineError::RegionIndexOutOfRange(region.index))?;
        if *slot {
            return Err(PipelineError::DuplicateRegionIndex(region.index));
        }
        *slot = true;
    }

    Ok(())
}
