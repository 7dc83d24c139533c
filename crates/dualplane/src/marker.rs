use serde::{Deserialize, Serialize};

use crate::error::MarkerError;

/// A 2d marker location to be lifted onto one of the two planes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Stable identifier.
    pub id: i32,
    /// Sub-pixel image position `[x, y]`.
    pub position: [f64; 2],
    plane: Option<usize>,
}

impl Marker {
    /// Create an unassigned marker.
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self {
            id,
            position: [x, y],
            plane: None,
        }
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn has_finite_position(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
    }

    /// The position rounded to the nearest integer pixel.
    ///
    /// Only meaningful when [`Marker::has_finite_position`] holds.
    #[inline]
    pub fn pixel(&self) -> [i64; 2] {
        [self.position[0].round() as i64, self.position[1].round() as i64]
    }

    /// The plane index this marker is assigned to, if any.
    #[inline]
    pub fn plane_index(&self) -> Option<usize> {
        self.plane
    }

    /// Whether the marker has been assigned to a plane.
    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.plane.is_some()
    }

    /// Assign the marker to a plane. A marker is assigned at most once.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::AlreadyAssigned`] if the marker already has a plane.
    pub fn assign(&mut self, plane: usize) -> Result<(), MarkerError> {
        if let Some(current) = self.plane {
            return Err(MarkerError::AlreadyAssigned {
                id: self.id,
                plane: current,
            });
        }
        self.plane = Some(plane);
        Ok(())
    }
}
