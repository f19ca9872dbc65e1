//! Scene Description
//!
//! Serde model of the JSON scene format:
//!
//! ```json
//! {
//!   "models": [{ "name": "tree", "obj": "models/tree.obj" }],
//!   "lights": [{ "name": "sun", "type": "directional", "color": "#ffeedd", "intensity": 0.8 }],
//!   "scenegraph": {
//!     "name": "root", "type": "node",
//!     "children": [
//!       { "name": "tree1", "type": "model", "content": "tree",
//!         "transformation": { "rotation": [0, 45, 0], "translation": [1, 0, 0], "scale": [2, 2, 2] } },
//!       { "name": "sun1", "type": "light", "content": "sun" }
//!     ]
//!   }
//! }
//! ```
//!
//! A three-element rotation is Euler angles in degrees; a four-element
//! rotation is a quaternion `[x, y, z, w]`.

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ViewerError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub models: Vec<ModelDesc>,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
    pub scenegraph: NodeDesc,
}

impl SceneDescription {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDesc {
    pub name: String,
    /// Path of the OBJ file.
    pub obj: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightDesc {
    pub name: String,
    /// `ambient`, `directional` or `point`; validated when the light is instantiated.
    #[serde(rename = "type")]
    pub light_type: String,
    pub color: ColorDesc,
    pub intensity: f32,
}

/// `"#rrggbb"` or `[r, g, b]` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorDesc {
    Hex(String),
    Rgb([f32; 3]),
}

impl ColorDesc {
    pub fn to_vec3(&self) -> Result<Vec3> {
        match self {
            Self::Rgb(rgb) => Ok(Vec3::from_array(*rgb)),
            Self::Hex(hex) => parse_hex_color(hex),
        }
    }
}

fn parse_hex_color(hex: &str) -> Result<Vec3> {
    let invalid = || ViewerError::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }

    let mut rgb = [0.0; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        *channel = f32::from(byte) / 255.0;
    }
    Ok(Vec3::from_array(rgb))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Node,
    Model,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDesc {
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    /// Model or light name for `model` / `light` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<TransformDesc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDesc>,
}

impl NodeDesc {
    /// Local matrix; identity when no transformation is given.
    pub fn local_matrix(&self) -> Result<Mat4> {
        self.transformation
            .as_ref()
            .map_or(Ok(Mat4::IDENTITY), TransformDesc::to_matrix)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformDesc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
}

impl TransformDesc {
    /// `translation * rotation * scale`.
    pub fn to_matrix(&self) -> Result<Mat4> {
        let rotation = match self.rotation.as_deref() {
            None => Quat::IDENTITY,
            Some(&[x, y, z]) => euler_degrees(x, y, z),
            Some(&[x, y, z, w]) => {
                let q = Quat::from_xyzw(x, y, z, w);
                if q.length_squared() <= f32::EPSILON {
                    return Err(ViewerError::InvalidTransform("zero-length quaternion".to_string()));
                }
                q.normalize()
            }
            Some(other) => {
                return Err(ViewerError::InvalidTransform(format!(
                    "rotation needs 3 (euler) or 4 (quaternion) components, got {}",
                    other.len()
                )));
            }
        };
        let translation = self.translation.map_or(Vec3::ZERO, Vec3::from_array);
        let scale = self.scale.map_or(Vec3::ONE, Vec3::from_array);

        Ok(Mat4::from_scale_rotation_translation(scale, rotation, translation))
    }
}

/// Euler angles in degrees, rotating about X first, then Y, then Z.
#[must_use]
pub fn euler_degrees(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::ZYX, z.to_radians(), y.to_radians(), x.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_scale_to_unit_range() {
        let c = parse_hex_color("#ff8000").unwrap();
        assert!((c - Vec3::new(1.0, 128.0 / 255.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn malformed_hex_colors_are_rejected() {
        for bad in ["ff8000", "#ff80", "#gg0000", "#ff80001"] {
            assert!(matches!(parse_hex_color(bad), Err(ViewerError::InvalidColor(_))), "{bad}");
        }
    }

    #[test]
    fn rotation_arity_is_checked() {
        let t = TransformDesc {
            rotation: Some(vec![1.0, 2.0]),
            ..TransformDesc::default()
        };
        assert!(matches!(t.to_matrix(), Err(ViewerError::InvalidTransform(_))));
    }
}
