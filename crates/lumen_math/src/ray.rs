use glam::DVec3;

/// A ray in 3D space with an origin and a direction.
///
/// Rays represent a half-line starting at `origin` and traveling in
/// `direction`. The direction is expected to be close to unit length;
/// intersection distances are measured in multiples of it.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray whose direction is normalized.
    ///
    /// A zero direction stays zero (see [`crate::Vec3Ext::normalized`]).
    pub fn towards(origin: DVec3, direction: DVec3) -> Self {
        use crate::Vec3Ext;
        Self::new(origin, direction.normalized())
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
