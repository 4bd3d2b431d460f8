//! Scene description files.
//!
//! A scene description is a JSON document listing the camera, materials,
//! objects and lights of a scene:
//!
//! ```json
//! {
//!   "name": "single",
//!   "camera": { "position": [0, 0, 0], "fov": 60 },
//!   "materials": [{ "id": 1, "color": [0, 0, 255] }],
//!   "objects": [{ "shape": "sphere", "transform": { "position": [0, 0, -5] }, "material": 1 }],
//!   "lights": [{ "position": [0, 5, -3] }]
//! }
//! ```
//!
//! Loading validates the description: malformed material coefficients,
//! duplicate material ids, references to undefined materials and shapes the
//! tracer cannot intersect are rejected here rather than discovered while
//! rendering.

use std::collections::HashSet;
use std::path::Path;

use lumen_math::DVec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::material::{Color, Material, MaterialId, MaterialTable};
use crate::object::{Object, ShapeKind};
use crate::scene::{Light, Scene};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Material {id} is invalid: reflectivity {reflectivity} + transparency {transparency} must be fractions summing to at most 1")]
    InvalidMaterial {
        id: MaterialId,
        reflectivity: f64,
        transparency: f64,
    },

    #[error("Material {0} is defined more than once")]
    DuplicateMaterial(MaterialId),

    #[error("Object {object} references undefined material {material}")]
    UnknownMaterial { object: usize, material: MaterialId },

    #[error("Object {object} has shape '{shape}', which cannot be rendered")]
    UnsupportedShape { object: usize, shape: ShapeKind },
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// A material entry in a description file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub id: MaterialId,
    #[serde(flatten)]
    pub material: Material,
}

/// Serializable description of a complete scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub materials: Vec<MaterialEntry>,
    #[serde(default)]
    pub objects: Vec<Object>,
    #[serde(default)]
    pub lights: Vec<Light>,
}

/// Everything a renderer needs, built from a validated description.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub scene: Scene,
    pub materials: MaterialTable,
    pub camera: Camera,
}

impl SceneDescription {
    /// Validate the description and build the runtime scene.
    pub fn build(self) -> SceneResult<LoadedScene> {
        let mut materials = MaterialTable::new();
        let mut seen = HashSet::new();

        for entry in self.materials {
            if !entry.material.is_valid() {
                return Err(SceneError::InvalidMaterial {
                    id: entry.id,
                    reflectivity: entry.material.reflectivity,
                    transparency: entry.material.transparency,
                });
            }
            if !seen.insert(entry.id) {
                return Err(SceneError::DuplicateMaterial(entry.id));
            }
            materials.insert(entry.id, entry.material);
        }

        let mut scene = Scene::new(self.name);
        for (index, object) in self.objects.into_iter().enumerate() {
            if object.shape != ShapeKind::Sphere {
                return Err(SceneError::UnsupportedShape {
                    object: index,
                    shape: object.shape,
                });
            }
            if !materials.contains(object.material) {
                return Err(SceneError::UnknownMaterial {
                    object: index,
                    material: object.material,
                });
            }
            scene.add_object(object);
        }
        for light in self.lights {
            scene.add_light(light);
        }

        log::info!(
            "Loaded scene '{}': {} objects, {} lights, {} materials",
            scene.name,
            scene.object_count(),
            scene.lights().len(),
            materials.len()
        );

        Ok(LoadedScene {
            scene,
            materials,
            camera: self.camera,
        })
    }
}

/// Parse a scene file's JSON into a description, or into a type that embeds
/// one.
pub fn parse_scene<T: DeserializeOwned>(json: &str) -> SceneResult<T> {
    Ok(serde_json::from_str(json)?)
}

impl AsMut<SceneDescription> for SceneDescription {
    fn as_mut(&mut self) -> &mut SceneDescription {
        self
    }
}

/// Read and parse a scene file.
///
/// The scene name defaults to the file stem when the file does not set one.
/// Call [`SceneDescription::build`] on the result to validate it.
pub fn read_scene_file<T, P>(path: P) -> SceneResult<T>
where
    T: DeserializeOwned + AsMut<SceneDescription>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mut scene: T = parse_scene(&text)?;

    let description = scene.as_mut();
    if description.name.is_empty() {
        description.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
    }

    Ok(scene)
}

/// The built-in start-up scene: four unit spheres lit by one point light.
pub fn default_scene() -> SceneDescription {
    let materials = vec![
        MaterialEntry {
            id: MaterialId(1),
            material: Material::diffuse(Color::new(0.0, 0.0, 255.0)),
        },
        MaterialEntry {
            id: MaterialId(2),
            material: Material::diffuse(Color::new(255.0, 50.0, 200.0)),
        },
        MaterialEntry {
            id: MaterialId(3),
            material: Material::diffuse(Color::new(50.0, 255.0, 50.0)),
        },
    ];

    let objects = vec![
        Object::sphere(DVec3::new(0.0, 0.0, -5.0), MaterialId(1)),
        Object::sphere(DVec3::new(3.0, 3.0, -5.0), MaterialId(2)),
        Object::sphere(DVec3::new(-3.0, 3.0, -5.0), MaterialId(3)),
        Object::sphere(DVec3::new(0.0, 0.0, -8.0), MaterialId(3)),
    ];

    SceneDescription {
        name: "default".to_string(),
        camera: Camera::default(),
        materials,
        objects,
        lights: vec![Light::new(DVec3::new(0.0, 5.0, -3.0))],
    }
}
