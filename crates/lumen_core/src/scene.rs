//! Scene container for Lumen.
//!
//! A flat, ordered list of objects plus the point lights that illuminate
//! them. The scene is built once and only read while a frame renders.

use lumen_math::DVec3;
use serde::{Deserialize, Serialize};

use crate::object::Object;

/// A point light.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: DVec3,
}

impl Light {
    pub fn new(position: DVec3) -> Self {
        Self { position }
    }
}

/// Ordered collection of objects and lights.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<Object>,
    lights: Vec<Light>,

    /// Scene name (usually from filename)
    pub name: String,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an object and return its index.
    pub fn add_object(&mut self, object: Object) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Total number of objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get the object at `index`.
    ///
    /// Out-of-range indices are logged and return `None`.
    pub fn object(&self, index: usize) -> Option<&Object> {
        let object = self.objects.get(index);
        if object.is_none() {
            log::error!(
                "Attempted to retrieve object {} from scene '{}' with {} objects",
                index,
                self.name,
                self.objects.len()
            );
        }
        object
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialId;

    #[test]
    fn test_scene_creation() {
        let mut scene = Scene::new("test");
        assert_eq!(scene.object_count(), 0);

        let first = scene.add_object(Object::sphere(DVec3::new(0.0, 0.0, -5.0), MaterialId(1)));
        let second = scene.add_object(Object::sphere(DVec3::new(3.0, 3.0, -5.0), MaterialId(2)));
        scene.add_light(Light::new(DVec3::new(0.0, 5.0, -3.0)));

        assert_eq!((first, second), (0, 1));
        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.object(1).map(|o| o.material), Some(MaterialId(2)));
    }

    #[test]
    fn test_out_of_range_object_is_none() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut scene = Scene::new("bounds");
        scene.add_object(Object::sphere(DVec3::ZERO, MaterialId::AIR));

        assert!(scene.object(0).is_some());
        assert!(scene.object(1).is_none());
        assert!(scene.object(usize::MAX).is_none());
    }
}
