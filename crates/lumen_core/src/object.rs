//! Renderable scene objects.

use std::fmt;

use lumen_math::{DVec3, Rotation, Transform};
use serde::{Deserialize, Serialize};

use crate::material::MaterialId;

/// Geometric primitive of an object.
///
/// Only spheres can be intersected. Scene files reject the other kinds on
/// load; in a scene built in code the intersector reports them as unsupported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Unit-radius sphere centered on the transform position
    Sphere,
    Cube,
    Rectangle,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cube => "cube",
            ShapeKind::Rectangle => "rectangle",
        };
        f.write_str(name)
    }
}

/// An instantiated, renderable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub shape: ShapeKind,
    pub transform: Transform,
    pub material: MaterialId,
}

impl Object {
    pub fn new(shape: ShapeKind, transform: Transform, material: MaterialId) -> Self {
        Self {
            shape,
            transform,
            material,
        }
    }

    /// Unit sphere at `center`.
    pub fn sphere(center: DVec3, material: MaterialId) -> Self {
        Self::new(ShapeKind::Sphere, Transform::from_position(center), material)
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }

    pub fn position(&self) -> DVec3 {
        self.transform.position
    }

    pub fn rotation(&self) -> Rotation {
        self.transform.rotation
    }

    pub fn scale(&self) -> DVec3 {
        self.transform.scale
    }
}
