use glam::{DQuat, DVec3, EulerRot};
use serde::{Deserialize, Serialize};

/// Orientation as yaw, pitch and roll angles in radians.
///
/// Conventions (right-handed, Y up):
/// - at zero rotation the forward axis is -Z, right is +X and up is +Y
/// - yaw rotates about +Y (positive turns left)
/// - pitch rotates about the yawed +X (positive looks up)
/// - roll rotates about the resulting forward axis
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Orthonormal forward/right/up frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Basis {
    pub forward: DVec3,
    pub right: DVec3,
    pub up: DVec3,
}

impl Default for Basis {
    fn default() -> Self {
        Rotation::default().basis()
    }
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        yaw: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };

    /// Create a rotation from angles in radians.
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Create a rotation from angles in degrees.
    pub fn from_degrees(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::new(yaw.to_radians(), pitch.to_radians(), roll.to_radians())
    }

    /// Quaternion applying yaw, then pitch, then roll (intrinsic Y-X-Z).
    pub fn to_quat(&self) -> DQuat {
        DQuat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }

    /// Forward/right/up axes for this orientation.
    pub fn basis(&self) -> Basis {
        let q = self.to_quat();
        Basis {
            forward: q * DVec3::NEG_Z,
            right: q * DVec3::X,
            up: q * DVec3::Y,
        }
    }
}
