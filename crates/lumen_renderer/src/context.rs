//! Render configuration and the shared, read-only render context.

use lumen_core::{LoadedScene, MaterialTable, Scene};
use serde::{Deserialize, Serialize};

use crate::task::DEFAULT_TASK_SIZE;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum reflection/refraction recursion depth (0 = primary hits only)
    pub max_depth: u32,
    /// Number of rays per dispatched task
    pub task_size: usize,
    /// Worker thread count
    pub threads: usize,
    /// Refractive index of the medium rays travel through
    pub incident_ior: f64,
    /// Refractive index used for every object
    pub object_ior: f64,
    /// Exit attempts (at least one) before a refracted ray is dropped
    pub max_tir_steps: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 1,
            task_size: DEFAULT_TASK_SIZE,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            incident_ior: 1.0,
            object_ior: 1.1,
            max_tir_steps: 5,
        }
    }
}

/// Everything a worker reads while rendering.
///
/// Owns the scene and material table for the lifetime of the renderer.
/// Shared between workers behind an `Arc` and never mutated during a frame.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub scene: Scene,
    pub materials: MaterialTable,
    pub config: RenderConfig,
}

impl RenderContext {
    pub fn new(scene: Scene, materials: MaterialTable, config: RenderConfig) -> Self {
        Self {
            scene,
            materials,
            config,
        }
    }

    /// Build a context from a loaded scene description.
    pub fn from_loaded(loaded: LoadedScene, config: RenderConfig) -> Self {
        Self::new(loaded.scene, loaded.materials, config)
    }
}
