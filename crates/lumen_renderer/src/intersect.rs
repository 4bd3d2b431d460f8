//! Ray/scene intersection.
//!
//! Objects are volumes, so a collision records both where a ray enters the
//! object and where it leaves it. Refraction uses the exit half.

use lumen_core::{Object, Scene, ShapeKind};
use lumen_math::{DVec3, Ray, Vec3Ext};
use thiserror::Error;

/// Roots at or below this distance count as behind the ray origin.
///
/// Keeps secondary rays from re-hitting the surface they start on.
pub const SELF_INTERSECTION_EPSILON: f64 = 1e-9;

/// Spheres are unit radius; object scale is not applied.
pub const SPHERE_RADIUS: f64 = 1.0;

/// Errors raised while intersecting.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectError {
    #[error("Unimplemented shape '{0}' defined for collision check")]
    UnsupportedShape(ShapeKind),
}

/// Record of a ray passing through an object.
///
/// Invariant: `0 <= distance <= exit_distance`. Normals are unit length and
/// point out of the object.
#[derive(Debug, Clone, Copy)]
pub struct CollisionInfo<'a> {
    /// Object that was hit
    pub object: &'a Object,

    /// Entry point
    pub position: DVec3,
    pub normal: DVec3,
    pub distance: f64,

    /// Exit point (same as entry when the ray starts inside the object)
    pub exit_position: DVec3,
    pub exit_normal: DVec3,
    pub exit_distance: f64,
}

impl<'a> CollisionInfo<'a> {
    fn sphere(object: &'a Object, ray: &Ray, entry: f64, exit: f64) -> Self {
        let center = object.position();
        let position = ray.at(entry);
        let exit_position = ray.at(exit);

        Self {
            object,
            position,
            normal: (position - center).normalized(),
            distance: entry,
            exit_position,
            exit_normal: (exit_position - center).normalized(),
            exit_distance: exit,
        }
    }
}

/// Both roots of the ray/sphere quadratic, smallest first.
///
/// Solves `|o + t·d - c|² = r²` with `a = d·d`, `b = 2(o-c)·d` and
/// `c = (o-c)·(o-c) - r²`. A negative discriminant is a miss.
fn sphere_roots(center: DVec3, radius: f64, ray: &Ray) -> Option<(f64, f64)> {
    let offset = ray.origin - center;

    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * offset.dot(ray.direction);
    let c = offset.dot(offset) - radius * radius;

    if a == 0.0 {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    Some(((-b - sqrtd) / (2.0 * a), (-b + sqrtd) / (2.0 * a)))
}

/// Roots for any shape kind, or an error for kinds without an intersector.
fn shape_roots(object: &Object, ray: &Ray) -> Result<Option<(f64, f64)>, IntersectError> {
    match object.shape() {
        ShapeKind::Sphere => Ok(sphere_roots(object.position(), SPHERE_RADIUS, ray)),
        shape @ (ShapeKind::Cube | ShapeKind::Rectangle) => {
            Err(IntersectError::UnsupportedShape(shape))
        }
    }
}

/// Find the nearest object hit by `ray`.
///
/// Returns `Ok(None)` when the ray escapes the scene. An object of an
/// unsupported shape aborts the search with an error rather than being
/// skipped.
pub fn first_collision<'a>(
    scene: &'a Scene,
    ray: &Ray,
) -> Result<Option<CollisionInfo<'a>>, IntersectError> {
    let mut nearest: Option<CollisionInfo<'a>> = None;

    for object in scene.objects() {
        let Some((near, far)) = shape_roots(object, ray)? else {
            continue;
        };

        // Smallest root in front of the origin is the entry
        let entry = if near > SELF_INTERSECTION_EPSILON {
            near
        } else if far > SELF_INTERSECTION_EPSILON {
            far
        } else {
            continue;
        };

        if nearest.map_or(true, |hit| entry < hit.distance) {
            nearest = Some(CollisionInfo::sphere(object, ray, entry, far));
        }
    }

    Ok(nearest)
}

/// Re-intersect a single object from a ray that may start inside it.
///
/// The exit is the far root; the entry is clamped to the origin when the
/// origin lies inside the volume.
pub fn internal_collision<'a>(
    object: &'a Object,
    ray: &Ray,
) -> Result<Option<CollisionInfo<'a>>, IntersectError> {
    let Some((near, far)) = shape_roots(object, ray)? else {
        return Ok(None);
    };

    if far <= SELF_INTERSECTION_EPSILON {
        return Ok(None);
    }

    Ok(Some(CollisionInfo::sphere(object, ray, near.max(0.0), far)))
}
