// Object placement: position, orientation and scale.
//
// Spheres are unit radius and rotation-invariant; the tracer reads only the
// position.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::Rotation;

/// Position, rotation and scale of a scene object.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "unit_scale")]
    pub scale: DVec3,
}

fn unit_scale() -> DVec3 {
    DVec3::ONE
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: Rotation::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(position: DVec3, rotation: Rotation, scale: DVec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Unrotated, unscaled transform at `position`.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}
