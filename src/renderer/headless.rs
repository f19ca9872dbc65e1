use glam::Mat4;
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use super::{
    DrawMode, GeometryHandle, RenderBackend, ShaderHandle, UniformSink, UniformTable, UniformValue,
};
use crate::assets::TextureHandle;
use crate::errors::{Result, ViewerError};
use crate::resources::Mesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryRecord {
    pub vertex_count: usize,
    pub index_count: usize,
    pub stride_bytes: usize,
    /// Size of the interleaved vertex buffer as it would be sent to the GPU.
    pub vertex_bytes: usize,
}

/// One recorded draw, with the state that was bound when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub shader: Option<ShaderHandle>,
    pub geometry: Option<GeometryHandle>,
    pub mode: DrawMode,
    pub count: u32,
    /// `u_m` of the active shader at draw time.
    pub model_matrix: Option<Mat4>,
    pub textures: Vec<(u32, TextureHandle)>,
}

/// Backend that performs no GPU work and records every call.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    geometries: SlotMap<GeometryHandle, GeometryRecord>,
    shaders: SlotMap<ShaderHandle, UniformTable>,
    current_shader: Option<ShaderHandle>,
    bound_textures: FxHashMap<u32, TextureHandle>,
    draws: Vec<DrawCall>,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the draw list of the previous frame.
    pub fn begin_frame(&mut self) {
        self.draws.clear();
        self.bound_textures.clear();
    }

    #[must_use]
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    #[must_use]
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GeometryRecord> {
        self.geometries.get(handle)
    }

    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    #[must_use]
    pub fn uniforms(&self, shader: ShaderHandle) -> Option<&UniformTable> {
        self.shaders.get(shader)
    }
}

impl UniformSink for HeadlessBackend {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        match self.current_shader.and_then(|s| self.shaders.get_mut(s)) {
            Some(table) => table.set_uniform(name, value),
            None => log::debug!("Uniform '{name}' set with no shader bound; dropped"),
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&mut self, mesh: &Mesh) -> GeometryHandle {
        let vertices = mesh.interleaved();
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        self.geometries.insert(GeometryRecord {
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
            stride_bytes: mesh.layout().stride_bytes(),
            vertex_bytes: bytes.len(),
        })
    }

    fn compile_shader(&mut self, vertex_src: &str, fragment_src: &str) -> Result<ShaderHandle> {
        for (stage, src) in [("vertex", vertex_src), ("fragment", fragment_src)] {
            if !src.contains("void main") {
                return Err(ViewerError::ShaderCompile(format!(
                    "{stage} stage has no entry point"
                )));
            }
        }
        Ok(self.shaders.insert(UniformTable::new()))
    }

    fn use_shader(&mut self, shader: ShaderHandle) {
        self.current_shader = Some(shader);
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.bound_textures.insert(unit, texture);
    }

    fn draw(&mut self, geometry: GeometryHandle, mode: DrawMode, index_count: u32) {
        let model_matrix = self
            .current_shader
            .and_then(|s| self.shaders.get(s))
            .and_then(|table| table.get_mat4("u_m"));
        let mut textures: Vec<_> = self.bound_textures.iter().map(|(&u, &t)| (u, t)).collect();
        textures.sort_by_key(|&(unit, _)| unit);

        self.draws.push(DrawCall {
            shader: self.current_shader,
            geometry: Some(geometry),
            mode,
            count: index_count,
            model_matrix,
            textures,
        });
        self.bound_textures.clear();
    }

    fn draw_points(&mut self, positions: &[f32]) {
        self.draws.push(DrawCall {
            shader: self.current_shader,
            geometry: None,
            mode: DrawMode::Points,
            count: (positions.len() / 3) as u32,
            model_matrix: None,
            textures: Vec::new(),
        });
    }
}
