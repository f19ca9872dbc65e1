use glam::{Mat4, Vec3, Vec4};

use crate::config::CameraConfig;
use crate::renderer::{UniformSink, UniformValue};

/// Arcball camera orbiting `center`.
///
/// `forward` points from the center toward the eye; `right` and `up`
/// complete the view-space basis. Interaction methods take input deltas that
/// were already polled by the host (pixels) and the frame time.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,

    forward: Vec3,
    right: Vec3,
    up: Vec3,

    pub fovy_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    #[must_use]
    pub fn new(eye: Vec3, center: Vec3) -> Self {
        Self::from_config(&CameraConfig {
            eye,
            center,
            ..CameraConfig::default()
        })
    }

    #[must_use]
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            eye: config.eye,
            center: config.center,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            fovy_degrees: config.fovy_degrees,
            aspect: config.aspect,
            near: config.near,
            far: config.far,
        };
        camera.update_basis();
        camera
    }

    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[inline]
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[inline]
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    fn update_basis(&mut self) {
        self.forward = (self.eye - self.center).normalize_or(Vec3::Z);
        self.right = Vec3::Y.cross(self.forward).normalize_or(Vec3::X);
        self.up = self.forward.cross(self.right).normalize_or(Vec3::Y);
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// View matrix with the translation removed, for the skybox.
    #[must_use]
    pub fn skybox_view(&self) -> Mat4 {
        let mut view = self.view_matrix();
        view.w_axis = Vec4::W;
        view
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Rotates the eye around the center: horizontally about world Y, then
    /// vertically about the camera's right axis.
    pub fn orbit(&mut self, dx: f32, dy: f32, dt: f32) {
        let yaw = Mat4::from_rotation_y((-10.0 * dx * dt).to_radians());
        let offset = yaw.transform_vector3(self.eye - self.center);
        self.eye = self.center + offset;

        let pitch = Mat4::from_axis_angle(self.right, (-10.0 * dy * dt).to_radians());
        self.eye = self.center + pitch.transform_vector3(self.eye - self.center);
        self.update_basis();
    }

    /// Moves eye and center together in the view plane.
    pub fn pan(&mut self, dx: f32, dy: f32, dt: f32) {
        let translation = self.right * (-0.75 * dx * dt) + self.up * (0.75 * dy * dt);
        self.eye += translation;
        self.center += translation;
        self.update_basis();
    }

    /// Moves the eye along the view axis.
    pub fn zoom(&mut self, dy: f32, dt: f32) {
        self.eye += self.forward * (-dy * dt);
        self.update_basis();
    }

    /// `u_v`, `u_p` and `u_eye`.
    pub fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        sink.set_uniform("u_v", UniformValue::Mat4(self.view_matrix()));
        sink.set_uniform("u_p", UniformValue::Mat4(self.projection_matrix()));
        sink.set_uniform("u_eye", UniformValue::Vec3(self.eye));
    }

    /// Skybox variant of [`write_uniforms`](Self::write_uniforms).
    pub fn write_skybox_uniforms(&self, sink: &mut dyn UniformSink) {
        sink.set_uniform("u_v", UniformValue::Mat4(self.skybox_view()));
        sink.set_uniform("u_p", UniformValue::Mat4(self.projection_matrix()));
        sink.set_uniform("u_eye", UniformValue::Vec3(self.eye));
    }
}
