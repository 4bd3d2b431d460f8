//! Primary ray generation.

use lumen_core::Camera;
use lumen_math::{Ray, Vec3Ext};

/// Generate one primary ray per pixel, in row-major order.
///
/// Rays go through pixel centers on an image plane one unit in front of the
/// camera. The field of view spans the image width; row 0 is the top row.
pub fn generate_rays(camera: &Camera, width: u32, height: u32) -> Vec<Ray> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let basis = camera.basis();
    let aspect = height as f64 / width as f64;
    let half_width = (camera.fov().to_radians() / 2.0).tan();
    let half_height = half_width * aspect;

    let mut rays = Vec::with_capacity(width as usize * height as usize);
    for py in 0..height {
        let v = (py as f64 + 0.5) / height as f64 * 2.0 - 1.0;
        for px in 0..width {
            let u = (px as f64 + 0.5) / width as f64 * 2.0 - 1.0;

            let direction = basis.forward + basis.right * (u * half_width)
                - basis.up * (v * half_height);
            rays.push(Ray::new(camera.position(), direction.normalized()));
        }
    }

    rays
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::{DVec3, Rotation};

    const EPS: f64 = 1e-12;

    #[test]
    fn test_ray_count_and_origin() {
        let camera = Camera::new(DVec3::new(1.0, 2.0, 3.0), Rotation::IDENTITY, 60.0);
        let rays = generate_rays(&camera, 8, 6);

        assert_eq!(rays.len(), 48);
        assert!(rays.iter().all(|r| r.origin == camera.position));
        assert!(rays.iter().all(|r| (r.direction.length() - 1.0).abs() < EPS));
        assert!(generate_rays(&camera, 0, 6).is_empty());
    }

    #[test]
    fn test_center_ray_is_forward() {
        let camera = Camera::new(DVec3::ZERO, Rotation::from_degrees(30.0, -10.0, 0.0), 60.0);
        let rays = generate_rays(&camera, 1, 1);
        assert!((rays[0].direction - camera.basis().forward).length() < EPS);
    }

    #[test]
    fn test_orientation() {
        let camera = Camera::new(DVec3::ZERO, Rotation::IDENTITY, 90.0);
        let rays = generate_rays(&camera, 2, 2);

        // Top-left pixel looks up and left, bottom-right looks down and right
        let top_left = rays[0].direction;
        let bottom_right = rays[3].direction;
        assert!(top_left.x < 0.0 && top_left.y > 0.0 && top_left.z < 0.0);
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
    }

    #[test]
    fn test_fov_spans_width() {
        // With a 90 degree field of view the edge of the image plane is at
        // 45 degrees; pixel centers sit just inside it.
        let camera = Camera::new(DVec3::ZERO, Rotation::IDENTITY, 90.0);
        let width = 1000;
        let rays = generate_rays(&camera, width, 1);

        let last = rays[(width - 1) as usize].direction;
        let angle = last.angle_between(DVec3::NEG_Z).to_degrees();
        assert!(angle < 45.0 && angle > 44.9, "{}", angle);
    }

    #[test]
    fn test_non_square_aspect() {
        let camera = Camera::new(DVec3::ZERO, Rotation::IDENTITY, 90.0);
        let rays = generate_rays(&camera, 4, 2);

        // Half height is half of half width for a 2:1 image
        let d = rays[0].direction;
        let (x, y) = (d.x / -d.z, d.y / -d.z);
        assert!((x - -0.75).abs() < EPS);
        assert!((y - 0.25).abs() < EPS);
    }
}
