//! Rendering Collaborators
//!
//! The viewer core does not talk to a GPU API. Buffer, texture and shader
//! objects are created by whatever backend the host application provides;
//! the core only sees the traits below:
//!
//! - [`UniformSink`]: receives named uniform values (lights, materials, camera)
//! - [`RenderBackend`]: uploads meshes, compiles shaders, binds textures and draws
//!
//! [`HeadlessBackend`] records every call and is used by tests and the demo.

pub mod headless;
pub mod shaders;
pub mod uniforms;

use glam::{Mat4, Vec3};
use slotmap::new_key_type;

use crate::assets::TextureHandle;
use crate::errors::Result;
use crate::resources::Mesh;

pub use headless::{DrawCall, HeadlessBackend};
pub use shaders::{ShaderKind, ShaderSet};
pub use uniforms::UniformTable;

new_key_type! {
    /// GPU-side vertex/index buffer pair created by [`RenderBackend::upload_mesh`].
    pub struct GeometryHandle;
    /// Linked shader program created by [`RenderBackend::compile_shader`].
    pub struct ShaderHandle;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    /// Texture unit index.
    Sampler(u32),
    Vec3(Vec3),
    Mat4(Mat4),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    #[default]
    Triangles,
    Lines,
    Points,
}

/// Receiver of named shader uniforms.
pub trait UniformSink {
    fn set_uniform(&mut self, name: &str, value: UniformValue);
}

/// GPU layer consumed by the core.
///
/// Uniforms set through the [`UniformSink`] supertrait apply to the shader
/// most recently selected with [`use_shader`](Self::use_shader).
pub trait RenderBackend: UniformSink {
    fn upload_mesh(&mut self, mesh: &Mesh) -> GeometryHandle;

    fn compile_shader(&mut self, vertex_src: &str, fragment_src: &str) -> Result<ShaderHandle>;

    fn use_shader(&mut self, shader: ShaderHandle);

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    fn draw(&mut self, geometry: GeometryHandle, mode: DrawMode, index_count: u32);

    /// Streams a transient point list (particles) and draws it.
    fn draw_points(&mut self, positions: &[f32]);
}
