//! Surface materials and the id-keyed material table.
//!
//! Objects never hold a material directly. They carry a [`MaterialId`] that is
//! resolved through a [`MaterialTable`] at shading time.

use std::collections::HashMap;
use std::fmt;

use lumen_math::DVec3;
use serde::{Deserialize, Serialize};

/// Color type alias. Channels are on a 0-255 scale.
pub type Color = DVec3;

/// Identifier of a material inside a [`MaterialTable`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Black, fully transparent. Always present in a table.
    pub const AIR: MaterialId = MaterialId(0);
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a surface splits incoming light between diffuse, mirror and
/// transmitted components.
///
/// `reflectivity + transparency` must not exceed 1; the remainder is the
/// diffuse fraction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse color (RGB, 0-255)
    pub color: Color,

    /// Fraction of light mirrored (0-1)
    #[serde(default)]
    pub reflectivity: f64,

    /// Fraction of light transmitted (0-1)
    #[serde(default)]
    pub transparency: f64,
}

impl Material {
    pub const AIR: Material = Material {
        color: Color::ZERO,
        reflectivity: 0.0,
        transparency: 1.0,
    };

    pub fn new(color: Color, reflectivity: f64, transparency: f64) -> Self {
        Self {
            color,
            reflectivity,
            transparency,
        }
    }

    /// Fully diffuse material of the given color.
    pub fn diffuse(color: Color) -> Self {
        Self::new(color, 0.0, 0.0)
    }

    /// Remaining fraction after reflection and transmission.
    ///
    /// Negative for malformed materials.
    pub fn diffuse_fraction(&self) -> f64 {
        1.0 - self.reflectivity - self.transparency
    }

    /// Check that every coefficient is a fraction and that they sum to at most 1.
    pub fn is_valid(&self) -> bool {
        let fractions = [self.reflectivity, self.transparency];
        fractions.iter().all(|f| (0.0..=1.0).contains(f)) && self.diffuse_fraction() >= 0.0
    }
}

/// Lookup table from [`MaterialId`] to [`Material`].
#[derive(Debug, Clone)]
pub struct MaterialTable {
    materials: HashMap<MaterialId, Material>,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialTable {
    /// Create a table holding only [`MaterialId::AIR`].
    pub fn new() -> Self {
        let mut materials = HashMap::new();
        materials.insert(MaterialId::AIR, Material::AIR);
        Self { materials }
    }

    /// Insert or replace a material, returning the previous one if any.
    pub fn insert(&mut self, id: MaterialId, material: Material) -> Option<Material> {
        if !material.is_valid() {
            log::warn!(
                "Material {} has invalid coefficients (reflectivity {}, transparency {}); it will render black",
                id,
                material.reflectivity,
                material.transparency
            );
        }
        self.materials.insert(id, material)
    }

    /// Get a material by id.
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Get a material by id, falling back to air for unknown ids.
    pub fn resolve(&self, id: MaterialId) -> &Material {
        match self.materials.get(&id) {
            Some(material) => material,
            None => {
                log::warn!("Unknown material {}, using air", id);
                &Material::AIR
            }
        }
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        self.materials.contains_key(&id)
    }

    /// Number of materials, air included.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diffuse_fraction() {
        let m = Material::new(Color::splat(255.0), 0.25, 0.5);
        assert!((m.diffuse_fraction() - 0.25).abs() < 1e-12);
        assert!(m.is_valid());

        assert_eq!(Material::diffuse(Color::ONE).diffuse_fraction(), 1.0);
    }

    #[test]
    fn test_invalid_materials() {
        assert!(!Material::new(Color::ONE, 0.7, 0.6).is_valid());
        assert!(!Material::new(Color::ONE, -0.1, 0.0).is_valid());
        assert!(!Material::new(Color::ONE, 0.0, 1.5).is_valid());
        assert!(Material::AIR.is_valid());
    }

    #[test]
    fn test_table_always_has_air() {
        let table = MaterialTable::new();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(MaterialId::AIR), Some(&Material::AIR));
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_air() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut table = MaterialTable::new();
        let blue = Material::diffuse(Color::new(0.0, 0.0, 255.0));
        assert!(table.insert(MaterialId(1), blue).is_none());

        assert_eq!(table.resolve(MaterialId(1)), &blue);
        assert_eq!(table.resolve(MaterialId(42)), &Material::AIR);
        assert!(table.get(MaterialId(42)).is_none());
    }

    #[test]
    fn test_insert_keeps_invalid_material() {
        let mut table = MaterialTable::new();
        let broken = Material::new(Color::ONE, 0.8, 0.8);
        table.insert(MaterialId(3), broken);
        assert!(table.contains(MaterialId(3)));
        assert_eq!(table.resolve(MaterialId(3)), &broken);
    }
}
