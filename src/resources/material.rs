use bitflags::bitflags;
use glam::Vec3;

use crate::assets::TextureHandle;
use crate::renderer::{UniformSink, UniformValue};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MaterialFeatures: u32 {
        const USE_MAP          = 1 << 0;
        const USE_NORMAL_MAP   = 1 << 1;
        const USE_SPECULAR_MAP = 1 << 2;
    }
}

/// Texture unit each map binds to.
pub const MAP_UNIT: u32 = 0;
pub const SPECULAR_MAP_UNIT: u32 = 1;
pub const NORMAL_MAP_UNIT: u32 = 2;

/// Phong material parsed from an MTL `newmtl` block.
///
/// Colors are nominally in `[0, 1]` but are never clamped. Materials are
/// shared behind an `Arc` by every object built from the same named entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// `Ka`
    pub ambient: Vec3,
    /// `Kd`
    pub diffuse: Vec3,
    /// `Ks`
    pub specular: Vec3,
    /// `Ns`
    pub shininess: f32,

    /// `map_Kd`
    pub map: Option<TextureHandle>,
    /// `map_Ns`
    pub specular_map: Option<TextureHandle>,
    /// `map_Bump` / `bump` / `norm`
    pub normal_map: Option<TextureHandle>,
}

impl Default for Material {
    /// A fresh `newmtl` entry: black, shininess 1, untextured.
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            shininess: 1.0,
            map: None,
            specular_map: None,
            normal_map: None,
        }
    }
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Grey material used when a model never selects one.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            name: "default".to_string(),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.5),
            specular: Vec3::splat(0.3),
            shininess: 20.0,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn has_texture(&self) -> bool {
        self.map.is_some() || self.specular_map.is_some() || self.normal_map.is_some()
    }

    #[must_use]
    pub fn features(&self) -> MaterialFeatures {
        let mut features = MaterialFeatures::empty();
        features.set(MaterialFeatures::USE_MAP, self.map.is_some());
        features.set(MaterialFeatures::USE_SPECULAR_MAP, self.specular_map.is_some());
        features.set(MaterialFeatures::USE_NORMAL_MAP, self.normal_map.is_some());
        features
    }

    /// Texture bindings as `(unit, handle)` pairs.
    pub fn texture_bindings(&self) -> impl Iterator<Item = (u32, TextureHandle)> + '_ {
        [
            (MAP_UNIT, self.map),
            (SPECULAR_MAP_UNIT, self.specular_map),
            (NORMAL_MAP_UNIT, self.normal_map),
        ]
        .into_iter()
        .filter_map(|(unit, handle)| handle.map(|h| (unit, h)))
    }

    /// Writes `u_material.*` uniforms for the phong/textured shaders.
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        sink.set_uniform("u_material.kA", UniformValue::Vec3(self.ambient));
        sink.set_uniform("u_material.kD", UniformValue::Vec3(self.diffuse));
        sink.set_uniform("u_material.kS", UniformValue::Vec3(self.specular));
        sink.set_uniform("u_material.shininess", UniformValue::Float(self.shininess));

        let features = self.features();
        for (name, flag, unit) in [
            ("map_kD", MaterialFeatures::USE_MAP, MAP_UNIT),
            ("map_nS", MaterialFeatures::USE_SPECULAR_MAP, SPECULAR_MAP_UNIT),
            ("map_norm", MaterialFeatures::USE_NORMAL_MAP, NORMAL_MAP_UNIT),
        ] {
            let enabled = features.contains(flag);
            sink.set_uniform(&format!("u_material.has_{name}"), UniformValue::Bool(enabled));
            if enabled {
                sink.set_uniform(&format!("u_material.{name}"), UniformValue::Sampler(unit));
            }
        }
    }
}
