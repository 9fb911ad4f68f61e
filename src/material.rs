// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Surface and medium materials, the texture sampling interface, and the named
//! registries a scene is built from.

use crate::error::SceneBuildError;
use crate::math::{Point2, Rgb};
use std::collections::HashMap;
use std::sync::Arc;

/// A texture maps UV coordinates to a color. Absent textures are represented by `None`
/// on [`SurfaceMaterial`], not by a null-object `Texture` impl, so sampling a materal
/// without one is a plain match rather than a virtual call.
pub trait Texture: Send + Sync {
    fn sample(&self, uv: Point2) -> Rgb;
}

/// A two-color checker pattern, tiling with period `1 / scale` in both `u` and `v`.
#[derive(Clone, Copy, Debug)]
pub struct CheckerTexture {
    pub primary_color: Rgb,
    pub secondary_color: Rgb,
    pub scale: f32,
}

impl CheckerTexture {
    pub fn new(primary_color: Rgb, secondary_color: Rgb, scale: f32) -> CheckerTexture {
        CheckerTexture { primary_color, secondary_color, scale }
    }
}

impl Texture for CheckerTexture {
    fn sample(&self, uv: Point2) -> Rgb {
        let u_parity = (uv.x * self.scale).rem_euclid(1.0) > 0.5;
        let v_parity = (uv.y * self.scale).rem_euclid(1.0) > 0.5;
        if u_parity != v_parity {
            self.primary_color
        } else {
            self.secondary_color
        }
    }
}

/// Surface appearance: what a ray sees when it hits a shape's boundary.
///
/// A material "is a light" when its emission is bright enough to register as a light
/// source (`spec.md`'s `ε_emit = 1e-4`, see [`Rgb::is_emissive`]).
#[derive(Clone)]
pub struct SurfaceMaterial {
    pub surface_color: Rgb,
    pub emission_color: Rgb,
    /// In `[0, 1]`. Fraction of light that passes through via refraction.
    pub transparency: f32,
    /// In `[0, 1]`. Fraction of light that bounces via specular reflection.
    pub reflectivity: f32,
    /// In `[0, 1]`. Weight applied to direct (shadow-ray) lighting.
    pub diffuse: f32,
    pub texture: Option<Arc<dyn Texture>>,
}

impl SurfaceMaterial {
    pub fn is_light(&self) -> bool {
        self.emission_color.is_emissive()
    }

    /// White when no texture is bound, so `surface_color` alone carries all chromatic
    /// information.
    pub fn sample_texture(&self, uv: Point2) -> Rgb {
        match &self.texture {
            Some(texture) => texture.sample(uv),
            None => Rgb::WHITE,
        }
    }
}

/// The material of the volume a shape encloses: per-channel absorption (used as the
/// coefficient in `exp(-absorption * distance)`) and a refractive index.
#[derive(Clone, Copy, Debug)]
pub struct MediumMaterial {
    pub absorption: Rgb,
    pub refractive_index: f32,
}

impl MediumMaterial {
    pub const VACUUM: MediumMaterial = MediumMaterial { absorption: Rgb::ZERO, refractive_index: 1.0 };
}

/// Named surface materials, owned for the lifetime of a render.
#[derive(Default)]
pub struct MaterialDatabase {
    materials: HashMap<String, Arc<SurfaceMaterial>>,
}

impl MaterialDatabase {
    pub fn new() -> MaterialDatabase {
        MaterialDatabase::default()
    }

    pub fn register(&mut self, name: impl Into<String>, material: SurfaceMaterial) -> Arc<SurfaceMaterial> {
        let material = Arc::new(material);
        self.materials.insert(name.into(), material.clone());
        material
    }

    pub fn get(&self, name: &str) -> Result<Arc<SurfaceMaterial>, SceneBuildError> {
        self.materials.get(name).cloned().ok_or_else(|| SceneBuildError::UnknownMaterial(name.to_string()))
    }
}

/// Named textures, owned for the lifetime of a render.
#[derive(Default)]
pub struct TextureDatabase {
    textures: HashMap<String, Arc<dyn Texture>>,
}

impl TextureDatabase {
    pub fn new() -> TextureDatabase {
        TextureDatabase::default()
    }

    pub fn register(&mut self, name: impl Into<String>, texture: impl Texture + 'static) -> Arc<dyn Texture> {
        let texture: Arc<dyn Texture> = Arc::new(texture);
        self.textures.insert(name.into(), texture.clone());
        texture
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Texture>, SceneBuildError> {
        self.textures.get(name).cloned().ok_or_else(|| SceneBuildError::UnknownTexture(name.to_string()))
    }
}

/// Named medium materials, owned for the lifetime of a render.
#[derive(Default)]
pub struct MediumDatabase {
    mediums: HashMap<String, Arc<MediumMaterial>>,
}

impl MediumDatabase {
    pub fn new() -> MediumDatabase {
        MediumDatabase::default()
    }

    pub fn register(&mut self, name: impl Into<String>, medium: MediumMaterial) -> Arc<MediumMaterial> {
        let medium = Arc::new(medium);
        self.mediums.insert(name.into(), medium.clone());
        medium
    }

    pub fn get(&self, name: &str) -> Result<Arc<MediumMaterial>, SceneBuildError> {
        self.mediums.get(name).cloned().ok_or_else(|| SceneBuildError::UnknownMedium(name.to_string()))
    }
}
