// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod ray;
mod rotation;
mod transform;
mod vector;

pub use ray::Ray;
pub use rotation::{Basis, Rotation};
pub use transform::Transform;
pub use vector::Vec3Ext;
