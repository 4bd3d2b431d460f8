// Vector utilities for DVec3
//
// Extends glam::DVec3 with the handful of operations the tracer leans on.
// Note: glam already provides dot(), cross(), length(), reflect(), refract(),
// angle_between() and the arithmetic operators. Methods here must not reuse
// those names or glam's inherent versions win.

use glam::DVec3;

/// Extension trait for DVec3 to provide ray tracing helpers.
pub trait Vec3Ext {
    /// Euclidean length of the vector.
    fn magnitude(&self) -> f64;

    /// Return a unit-length copy. A zero-length vector returns the zero vector
    /// instead of NaN.
    fn normalized(&self) -> DVec3;

    /// Normalize in place. Leaves a zero-length vector untouched.
    fn normalize_mut(&mut self);

    /// Flip the vector in place.
    fn reverse_mut(&mut self);
}

impl Vec3Ext for DVec3 {
    #[inline]
    fn magnitude(&self) -> f64 {
        self.length()
    }

    fn normalized(&self) -> DVec3 {
        let magnitude = self.length();
        if magnitude == 0.0 {
            return DVec3::ZERO;
        }
        *self / magnitude
    }

    fn normalize_mut(&mut self) {
        *self = self.normalized();
    }

    fn reverse_mut(&mut self) {
        *self = -*self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_normalized_unit_length() {
        let v = DVec3::new(3.0, 4.0, 12.0);
        let n = v.normalized();

        assert!((n.magnitude() - 1.0).abs() < EPS);
        assert!((n - DVec3::new(3.0, 4.0, 12.0) / 13.0).length() < EPS);
    }

    #[test]
    fn test_normalized_zero_is_zero() {
        assert_eq!(DVec3::ZERO.normalized(), DVec3::ZERO);

        let mut v = DVec3::ZERO;
        v.normalize_mut();
        assert_eq!(v, DVec3::ZERO);
    }

    #[test]
    fn test_normalize_mut() {
        let mut v = DVec3::new(0.0, -2.0, 0.0);
        v.normalize_mut();
        assert_eq!(v, DVec3::NEG_Y);
    }

    #[test]
    fn test_reverse_mut() {
        let mut v = DVec3::new(1.0, -2.0, 3.0);
        v.reverse_mut();
        assert_eq!(v, DVec3::new(-1.0, 2.0, -3.0));
    }

    #[test]
    fn test_reflect_preserves_angle() {
        let normal = DVec3::Y;
        let incoming = DVec3::new(1.0, -1.0, 0.0).normalized();
        let reflected = incoming.reflect(normal);

        assert!((reflected.magnitude() - 1.0).abs() < EPS);
        assert!((reflected - DVec3::new(1.0, 1.0, 0.0).normalized()).length() < EPS);
        assert!((reflected - (incoming - 2.0 * incoming.dot(normal) * normal)).length() < EPS);

        // Angle of incidence equals angle of reflection
        let incidence = (-incoming).angle_between(normal);
        let reflection = reflected.angle_between(normal);
        assert!((incidence - reflection).abs() < 1e-7);
    }

    #[test]
    fn test_angle_between() {
        use std::f64::consts::FRAC_PI_2;

        assert!((DVec3::X.angle_between(DVec3::Y) - FRAC_PI_2).abs() < 1e-7);
        assert!(DVec3::X.angle_between(DVec3::X * 5.0).abs() < 1e-7);
    }

    #[test]
    fn test_cross_is_right_handed() {
        assert_eq!(DVec3::X.cross(DVec3::Y), DVec3::Z);
    }
}
