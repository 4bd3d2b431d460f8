//! Lumen Core - Scene model for the Lumen ray tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Object`, `Light`, `Camera`
//! - **Materials**: `Material` values keyed by `MaterialId` in a `MaterialTable`
//! - **Scene descriptions**: JSON loading and validation
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{read_scene_file, SceneDescription};
//!
//! let description: SceneDescription = read_scene_file("scene.json")?;
//! let loaded = description.build()?;
//! println!("Loaded {} objects", loaded.scene.object_count());
//! ```

pub mod camera;
pub mod config;
pub mod material;
pub mod object;
pub mod scene;

// Re-export commonly used types
pub use camera::Camera;
pub use config::{
    default_scene, parse_scene, read_scene_file, LoadedScene, SceneDescription, SceneError,
};
pub use material::{Color, Material, MaterialId, MaterialTable};
pub use object::{Object, ShapeKind};
pub use scene::{Light, Scene};
