//! Viewer Configuration
//!
//! Every section has defaults matching the stock snow globe scene, so a
//! config file only needs the values it changes:
//!
//! ```json
//! { "particles": { "max_particles": 64 }, "shake": { "duration": 1.5 } }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::AssetSource;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub particles: ParticleConfig,
    pub shake: ShakeConfig,
    pub textures: TextureConfig,
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(source: &dyn AssetSource, path: &Path) -> Result<Self> {
        let config = Self::from_json_str(&source.read_to_string(path)?)?;
        log::debug!("Loaded viewer config from {}", path.display());
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fovy_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub center: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.001,
            far: 1000.0,
            eye: Vec3::new(2.0, 0.5, -2.0),
            center: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub max_particles: usize,
    /// Particles per second.
    pub emission_rate: f32,
    /// Seconds.
    pub lifetime: f32,
    pub gravity: Vec3,
    /// Emitter offset above the globe center.
    pub emitter_offset: Vec3,
    pub globe_radius: f32,
    /// Radius of the snow base disc the particles settle on.
    pub snow_base_radius: f32,
    /// Height of the snow base disc relative to the globe center.
    pub snow_base_height: f32,
    /// Fraction of normal velocity kept after hitting the globe wall.
    pub restitution: f32,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            max_particles: 16,
            emission_rate: 6.0,
            lifetime: 4.0,
            gravity: Vec3::new(0.0, -2.0, 0.0),
            emitter_offset: Vec3::new(0.0, 1.0, 0.0),
            globe_radius: 1.0,
            snow_base_radius: 0.72,
            snow_base_height: -0.7,
            restitution: 0.5,
            seed: 0x5eed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Seconds.
    pub duration: f32,
    /// Peak displacement per frame at the start of a shake.
    pub amplitude: f32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            duration: 3.0,
            amplitude: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Maximum number of images decoded per frame.
    pub decode_budget: usize,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self { decode_budget: 2 }
    }
}
