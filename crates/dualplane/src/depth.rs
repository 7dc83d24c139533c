use num_traits::ToPrimitive;

use crate::error::DepthMapError;

/// Size of a depth map in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthSize {
    /// Width of the depth map in pixels
    pub width: usize,
    /// Height of the depth map in pixels
    pub height: usize,
}

impl std::fmt::Display for DepthSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "DepthSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for DepthSize {
    fn from(size: [usize; 2]) -> Self {
        DepthSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Returns true if `z` is a usable depth measurement.
///
/// Zero, negative, NaN and infinite values mean "no data".
#[inline]
pub fn is_valid_depth(z: f64) -> bool {
    z.is_finite() && z > 0.0
}

/// A single-channel depth map stored in row-major order.
///
/// The sample type can be any numeric type convertible to `f64`, typically
/// `u16` millimeters or `f32`.
#[derive(Debug, Clone)]
pub struct DepthMap<T> {
    size: DepthSize,
    data: Vec<T>,
}

impl<T> DepthMap<T>
where
    T: Copy + ToPrimitive,
{
    /// Create a depth map from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`DepthMapError::InvalidDataLength`] if `data` does not hold
    /// exactly `width * height` samples.
    pub fn new(size: DepthSize, data: Vec<T>) -> Result<Self, DepthMapError> {
        let expected = size.width * size.height;
        if data.len() != expected {
            return Err(DepthMapError::InvalidDataLength(data.len(), expected));
        }
        Ok(Self { size, data })
    }

    /// Create a depth map by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(size: DepthSize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(size.width * size.height);
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(x, y));
            }
        }
        Self { size, data }
    }

    /// The size of the depth map.
    #[inline]
    pub fn size(&self) -> DepthSize {
        self.size
    }

    /// The width of the depth map in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// The height of the depth map in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// The raw samples in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Raw sample at the pixel `(x, y)`, or `None` outside the map.
    pub fn get(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        Some(self.data[y * self.size.width + x])
    }

    /// Mutable access to the sample at `(x, y)`, or `None` outside the map.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.data.get_mut(y * self.size.width + x)
    }

    /// Valid depth reading at `(x, y)` as `f64`.
    ///
    /// Returns `None` outside the map, for samples that do not convert to
    /// `f64`, and for zero, negative, NaN or infinite readings.
    pub fn depth_at(&self, x: i64, y: i64) -> Option<f64> {
        self.get(x, y)
            .and_then(|v| v.to_f64())
            .filter(|&z| is_valid_depth(z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_map_new() -> Result<(), DepthMapError> {
        let map = DepthMap::new([3, 2].into(), vec![0u16, 1, 2, 3, 4, 5])?;
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 2);
        assert_eq!(map.get(2, 1), Some(5));
        assert_eq!(map.get(3, 0), None);
        assert_eq!(map.get(-1, 0), None);
        Ok(())
    }

    #[test]
    fn test_depth_map_invalid_length() {
        let res = DepthMap::new([3, 2].into(), vec![0u16; 5]);
        assert!(matches!(res, Err(DepthMapError::InvalidDataLength(5, 6))));
    }

    #[test]
    fn test_depth_at_filters_no_data() -> Result<(), DepthMapError> {
        let map = DepthMap::new([4, 1].into(), vec![0.0f32, -3.0, f32::NAN, 812.5])?;
        assert_eq!(map.depth_at(0, 0), None);
        assert_eq!(map.depth_at(1, 0), None);
        assert_eq!(map.depth_at(2, 0), None);
        assert_eq!(map.depth_at(3, 0), Some(812.5));
        assert_eq!(map.depth_at(4, 0), None);
        Ok(())
    }

    #[test]
    fn test_from_fn_row_major() {
        let mut map = DepthMap::from_fn([3, 2].into(), |x, y| (10 * y + x) as u16);
        assert_eq!(map.as_slice(), &[0, 1, 2, 10, 11, 12]);
        if let Some(v) = map.get_mut(1, 1) {
            *v = 0;
        }
        assert_eq!(map.depth_at(1, 1), None);
        assert_eq!(map.depth_at(2, 1), Some(12.0));
    }
}
