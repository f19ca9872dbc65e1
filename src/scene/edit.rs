use glam::{Mat4, Quat, Vec3, Vec4};

/// Degrees of rotation per pixel-second of drag.
const ROTATE_SPEED: f32 = 10.0;
/// World units of translation per pixel-second of drag.
const TRANSLATE_SPEED: f32 = 0.75;

/// An interactive transform edit expressed in world-aligned axes.
///
/// Applied as `local * S * W⁻¹ * T * R * W`, where `W` is the node's world
/// matrix with its translation removed: the node is temporarily aligned to
/// world space, rotated and moved there, brought back into its local frame,
/// and finally scaled about its own origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeEdit {
    pub rotation: Quat,
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for NodeEdit {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl NodeEdit {
    #[must_use]
    pub fn rotate(axis: Vec3, angle_radians: f32) -> Self {
        Self {
            rotation: Quat::from_axis_angle(axis.normalize_or(Vec3::Y), angle_radians),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn translate(offset: Vec3) -> Self {
        Self {
            translation: offset,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn scale(factor: f32) -> Self {
        Self {
            scale: factor,
            ..Self::default()
        }
    }

    /// Rotation from a mouse drag, about the camera's up and right axes.
    #[must_use]
    pub fn from_rotate_drag(up: Vec3, right: Vec3, dx: f32, dy: f32, dt: f32) -> Self {
        let about_up = Quat::from_axis_angle(up, (ROTATE_SPEED * dx * dt).to_radians());
        let about_right = Quat::from_axis_angle(right, (ROTATE_SPEED * dy * dt).to_radians());
        Self {
            rotation: about_right * about_up,
            ..Self::default()
        }
    }

    /// Translation from a mouse drag, in the camera's image plane.
    #[must_use]
    pub fn from_translate_drag(up: Vec3, right: Vec3, dx: f32, dy: f32, dt: f32) -> Self {
        Self::translate(right * (TRANSLATE_SPEED * dx * dt) - up * (TRANSLATE_SPEED * dy * dt))
    }

    /// Uniform scale from a vertical drag.
    #[must_use]
    pub fn from_scale_drag(dy: f32, dt: f32) -> Self {
        Self::scale(1.0 + dy * dt)
    }

    /// New local matrix for a node currently at `local` / `world`.
    #[must_use]
    pub fn apply(&self, local: &Mat4, world: &Mat4) -> Mat4 {
        let mut world_rs = *world;
        world_rs.w_axis = Vec4::W;

        let (world_rs, world_rs_inv) = if world_rs.determinant().abs() > f32::EPSILON {
            (world_rs, world_rs.inverse())
        } else {
            log::warn!("Node world matrix is singular; editing in local axes");
            (Mat4::IDENTITY, Mat4::IDENTITY)
        };

        *local
            * Mat4::from_scale(Vec3::splat(self.scale))
            * world_rs_inv
            * Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.rotation)
            * world_rs
    }
}
