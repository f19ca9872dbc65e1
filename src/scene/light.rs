use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Vec3};

use crate::errors::{Result, ViewerError};
use crate::renderer::{UniformSink, UniformValue};
use crate::resources::Mesh;

/// Size of each light uniform array in the phong shader.
pub const SHADER_MAX_LIGHTS: usize = 16;

/// Declared light type, as written in a scene description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Ambient,
    Directional,
    Point,
}

impl LightType {
    pub const ALL: [LightType; 3] = [Self::Ambient, Self::Directional, Self::Point];

    /// Name of the shader uniform array holding lights of this type.
    #[must_use]
    pub fn uniform_array(self) -> &'static str {
        match self {
            Self::Ambient => "u_lights_ambient",
            Self::Directional => "u_lights_directional",
            Self::Point => "u_lights_point",
        }
    }

    /// Half-extents of the wire box drawn for lights of this type.
    #[must_use]
    pub fn gizmo_scale(self) -> Vec3 {
        match self {
            Self::Ambient => Vec3::splat(10000.0),
            Self::Directional => Vec3::new(0.025, 0.25, 0.025),
            Self::Point => Vec3::splat(0.1),
        }
    }
}

impl FromStr for LightType {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ambient" => Ok(Self::Ambient),
            "directional" => Ok(Self::Directional),
            "point" => Ok(Self::Point),
            other => Err(ViewerError::UnknownLightType(other.to_string())),
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ambient => "ambient",
            Self::Directional => "directional",
            Self::Point => "point",
        })
    }
}

/// Per-type state derived from the owning node's world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    /// World rotation applied to `-Y`.
    Directional { direction: Vec3 },
    /// World translation.
    Point { position: Vec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Slot in this type's uniform array.
    pub id: u32,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_ambient(id: u32, color: Vec3, intensity: f32) -> Self {
        Self {
            id,
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    #[must_use]
    pub fn new_directional(id: u32, color: Vec3, intensity: f32) -> Self {
        Self {
            id,
            color,
            intensity,
            kind: LightKind::Directional {
                direction: Vec3::NEG_Y,
            },
        }
    }

    #[must_use]
    pub fn new_point(id: u32, color: Vec3, intensity: f32) -> Self {
        Self {
            id,
            color,
            intensity,
            kind: LightKind::Point {
                position: Vec3::ZERO,
            },
        }
    }

    #[must_use]
    pub fn light_type(&self) -> LightType {
        match self.kind {
            LightKind::Ambient => LightType::Ambient,
            LightKind::Directional { .. } => LightType::Directional,
            LightKind::Point { .. } => LightType::Point,
        }
    }

    /// Re-derives direction or position from the owning node's world matrix.
    pub fn apply_world_transform(&mut self, world: &Mat4) {
        match &mut self.kind {
            LightKind::Ambient => {}
            LightKind::Directional { direction } => {
                let (_, rotation, _) = world.to_scale_rotation_translation();
                *direction = rotation * Vec3::NEG_Y;
            }
            LightKind::Point { position } => {
                *position = world.w_axis.truncate();
            }
        }
    }

    /// Writes this light into slot `id` of its uniform array.
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        let prefix = format!("{}[{}]", self.light_type().uniform_array(), self.id);
        sink.set_uniform(&format!("{prefix}.color"), UniformValue::Vec3(self.color));
        sink.set_uniform(&format!("{prefix}.intensity"), UniformValue::Float(self.intensity));
        match self.kind {
            LightKind::Ambient => {}
            LightKind::Directional { direction } => {
                sink.set_uniform(&format!("{prefix}.direction"), UniformValue::Vec3(direction));
            }
            LightKind::Point { position } => {
                sink.set_uniform(&format!("{prefix}.position"), UniformValue::Vec3(position));
            }
        }
    }

    #[must_use]
    pub fn gizmo_mesh(&self) -> Mesh {
        Mesh::wire_box(self.light_type().gizmo_scale())
    }
}

/// Zeroes every slot of every light uniform array.
pub fn reset_light_uniforms(sink: &mut dyn UniformSink) {
    for i in 0..SHADER_MAX_LIGHTS {
        for ty in LightType::ALL {
            let prefix = format!("{}[{i}]", ty.uniform_array());
            sink.set_uniform(&format!("{prefix}.color"), UniformValue::Vec3(Vec3::ZERO));
            sink.set_uniform(&format!("{prefix}.intensity"), UniformValue::Float(0.0));
            match ty {
                LightType::Ambient => {}
                LightType::Directional => {
                    sink.set_uniform(&format!("{prefix}.direction"), UniformValue::Vec3(Vec3::ZERO));
                }
                LightType::Point => {
                    sink.set_uniform(&format!("{prefix}.position"), UniformValue::Vec3(Vec3::ZERO));
                }
            }
        }
    }
}

/// Hands out per-type sequential light ids in the order lights are requested.
#[derive(Debug, Default, Clone)]
pub struct LightFactory {
    counts: [u32; 3],
}

impl LightFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `type_name` and creates a light with the next id of that type.
    pub fn instantiate(&mut self, type_name: &str, color: Vec3, intensity: f32) -> Result<Light> {
        let ty: LightType = type_name.parse()?;
        let slot = &mut self.counts[ty as usize];
        let id = *slot;
        *slot += 1;

        if id as usize >= SHADER_MAX_LIGHTS {
            log::warn!("{ty} light #{id} exceeds the shader limit of {SHADER_MAX_LIGHTS}; it will not be visible");
        }

        Ok(match ty {
            LightType::Ambient => Light::new_ambient(id, color, intensity),
            LightType::Directional => Light::new_directional(id, color, intensity),
            LightType::Point => Light::new_point(id, color, intensity),
        })
    }

    /// Number of lights of `ty` created so far.
    #[must_use]
    pub fn count(&self, ty: LightType) -> u32 {
        self.counts[ty as usize]
    }
}
