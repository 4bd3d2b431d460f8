//! Camera pose used to generate primary rays.

use lumen_math::{Basis, DVec3, Rotation};
use serde::{Deserialize, Serialize};

/// Camera state: position, orientation and field of view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: DVec3,
    #[serde(default)]
    pub rotation: Rotation,
    /// Field of view in degrees, spanning the image width
    #[serde(default = "default_fov")]
    pub fov: f64,
}

fn default_fov() -> f64 {
    60.0
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DVec3::ZERO, Rotation::IDENTITY, default_fov())
    }
}

impl Camera {
    /// Create a new camera
    pub fn new(position: DVec3, rotation: Rotation, fov: f64) -> Self {
        Self {
            position,
            rotation,
            fov,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Field of view in degrees.
    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Forward/right/up vectors for the current rotation.
    pub fn basis(&self) -> Basis {
        self.rotation.basis()
    }
}
