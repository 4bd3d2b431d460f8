//! Recursive light transport.
//!
//! Each hit splits the light it returns into three parts weighted by the
//! material: direct diffuse light from every point light, a mirror
//! reflection and a refracted ray through the object. Reflection and
//! refraction recurse up to the configured depth.

use lumen_core::{Color, Material, Object};
use lumen_math::{DVec3, Ray, Vec3Ext};

use crate::context::RenderContext;
use crate::intersect::{first_collision, internal_collision, CollisionInfo};

/// 8-bit RGB color.
pub type Rgb = [u8; 3];

/// A ray from a surface point towards a light.
#[derive(Debug, Clone, Copy)]
pub struct ShadowRay {
    pub ray: Ray,
    /// Distance from the ray origin to the light
    pub light_distance: f64,
}

/// Clamp a 0-255 color to 8-bit channels.
pub fn to_rgb(color: Color) -> Rgb {
    let clamped = color.clamp(Color::ZERO, Color::splat(255.0));
    [clamped.x as u8, clamped.y as u8, clamped.z as u8]
}

/// Bend a unit `incident` direction through a surface using Snell's law.
///
/// `normal` must face against the incident ray and `eta` is `n1 / n2`.
/// Returns `None` on total internal reflection.
pub fn refract(incident: DVec3, normal: DVec3, eta: f64) -> Option<DVec3> {
    // glam returns zero past the critical angle
    let bent = incident.refract(normal, eta);
    if bent == DVec3::ZERO {
        None
    } else {
        Some(bent.normalized())
    }
}

/// Mirror `ray` about the entry normal of `collision`.
pub fn reflection_ray(ray: &Ray, collision: &CollisionInfo) -> Ray {
    Ray::new(collision.position, ray.direction.reflect(collision.normal))
}

/// Evaluates the light carried back along rays through one scene.
pub struct LightTransport<'a> {
    context: &'a RenderContext,
}

impl<'a> LightTransport<'a> {
    pub fn new(context: &'a RenderContext) -> Self {
        Self { context }
    }

    /// Color seen along `ray`, clamped to 8-bit channels.
    pub fn total_light(&self, ray: &Ray, max_depth: u32) -> Rgb {
        to_rgb(self.trace(ray, 0, max_depth))
    }

    /// Unclamped light along `ray` at recursion `depth`.
    pub fn trace(&self, ray: &Ray, depth: u32, max_depth: u32) -> Color {
        if depth > max_depth {
            return Color::ZERO;
        }

        let collision = match first_collision(&self.context.scene, ray) {
            Ok(Some(collision)) => collision,
            Ok(None) => return Color::ZERO,
            Err(e) => {
                log::error!("Light transport: {}", e);
                return Color::ZERO;
            }
        };

        let material = self.context.materials.resolve(collision.object.material);
        if !material.is_valid() {
            log::error!(
                "Invalid material {}: reflectivity {} + transparency {} exceeds 1.0",
                collision.object.material,
                material.reflectivity,
                material.transparency
            );
            return Color::ZERO;
        }

        let mut color = Color::ZERO;

        let diffuse = material.diffuse_fraction();
        if diffuse > 0.0 {
            color += self.diffuse_light(&collision, material) * diffuse;
        }

        if material.reflectivity > 0.0 {
            let reflected = reflection_ray(ray, &collision);
            color += self.trace(&reflected, depth + 1, max_depth) * material.reflectivity;
        }

        if material.transparency > 0.0 {
            if let Some(refracted) = self.refraction_ray(ray, &collision) {
                color += self.trace(&refracted, depth + 1, max_depth) * material.transparency;
            }
        }

        color
    }

    /// One ray per light from the entry point of `collision`.
    pub fn shadow_rays(&self, collision: &CollisionInfo) -> Vec<ShadowRay> {
        self.context
            .scene
            .lights()
            .iter()
            .map(|light| {
                let to_light = light.position - collision.position;
                ShadowRay {
                    ray: Ray::new(collision.position, to_light.normalized()),
                    light_distance: to_light.length(),
                }
            })
            .collect()
    }

    /// Whether something blocks `shadow` before it reaches its light.
    fn is_shadowed(&self, shadow: &ShadowRay) -> bool {
        match first_collision(&self.context.scene, &shadow.ray) {
            Ok(Some(blocker)) => blocker.distance < shadow.light_distance,
            Ok(None) => false,
            Err(e) => {
                log::error!("Shadow test: {}", e);
                true
            }
        }
    }

    /// Lambertian light from every unobstructed light. Lights add without
    /// clamping.
    fn diffuse_light(&self, collision: &CollisionInfo, material: &Material) -> Color {
        self.shadow_rays(collision)
            .iter()
            .filter(|shadow| !self.is_shadowed(shadow))
            .fold(Color::ZERO, |sum, shadow| {
                let intensity = collision.normal.dot(shadow.ray.direction).max(0.0);
                sum + material.color * intensity
            })
    }

    /// Ray leaving the object after refracting through it.
    ///
    /// The ray bends towards the normal on entry, crosses the object and
    /// bends again on exit. `None` when the ray cannot get out.
    pub fn refraction_ray(&self, ray: &Ray, collision: &CollisionInfo) -> Option<Ray> {
        let config = &self.context.config;
        let direction = ray.direction.normalized();

        let inner = if direction.dot(collision.normal) < 0.0 {
            let bent = refract(
                direction,
                collision.normal,
                config.incident_ior / config.object_ior,
            )?;
            Ray::new(collision.position, bent)
        } else {
            // Ray started inside the object; the hit is already the way out
            Ray::new(ray.origin, direction)
        };

        self.escape(collision.object, inner)
    }

    /// Follow a ray travelling inside `object` until it refracts out.
    ///
    /// Every exit past the critical angle reflects back inside. The number of
    /// exit attempts is capped by `max_tir_steps` (at least one); hitting the
    /// cap drops the ray.
    pub(crate) fn escape(&self, object: &Object, mut inner: Ray) -> Option<Ray> {
        let config = &self.context.config;
        let eta = config.object_ior / config.incident_ior;
        let max_steps = config.max_tir_steps.max(1);

        for _ in 0..max_steps {
            let exit = match internal_collision(object, &inner) {
                Ok(Some(exit)) => exit,
                Ok(None) => {
                    log::warn!("Refraction: internal collision not found");
                    return None;
                }
                Err(e) => {
                    log::error!("Refraction: {}", e);
                    return None;
                }
            };

            if let Some(out) = refract(inner.direction, -exit.exit_normal, eta) {
                return Some(Ray::new(exit.exit_position, out));
            }

            // Total internal reflection
            inner = Ray::new(exit.exit_position, inner.direction.reflect(exit.exit_normal));
        }

        log::warn!(
            "Refraction: reached max internal reflection depth ({}), dropping ray",
            max_steps
        );
        None
    }
}
