//! Skybox Background
//!
//! A cube map drawn around the camera with the translation stripped from the
//! view matrix. The cube texture is pinned in the [`TextureStore`] so it
//! survives scene swaps.

use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::{TextureHandle, TextureLoader, TextureStore};
use crate::renderer::{RenderBackend, ShaderKind, ShaderSet, UniformValue};
use crate::resources::{Material, Mesh};
use crate::scene::camera::Camera;
use crate::scene::object::RenderObject;

/// Texture unit the cube map is bound to.
pub const ENV_MAP_UNIT: u32 = 0;

#[derive(Debug, Clone)]
pub struct Skybox {
    faces: [PathBuf; 6],
    texture: TextureHandle,
    cube: RenderObject,
}

impl Skybox {
    /// Requests the cube map (+x, -x, +y, -y, +z, -z) and pins it.
    pub fn new(textures: &mut TextureStore, faces: [PathBuf; 6]) -> Self {
        let texture = textures.load_cube_texture(faces.clone());
        textures.pin(texture);
        Self {
            faces,
            texture,
            cube: RenderObject::new(Arc::new(Mesh::inward_cube()), Arc::new(Material::default())),
        }
    }

    #[must_use]
    pub fn faces(&self) -> &[PathBuf; 6] {
        &self.faces
    }

    #[must_use]
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    pub fn upload(&mut self, backend: &mut dyn RenderBackend) {
        self.cube.upload(backend);
    }

    pub fn render(&self, backend: &mut dyn RenderBackend, shaders: &ShaderSet, camera: &Camera) {
        let Some(geometry) = self.cube.geometry() else {
            return;
        };
        if !shaders.bind(backend, ShaderKind::Skybox) {
            return;
        }
        camera.write_skybox_uniforms(backend);
        backend.set_uniform("u_envMap", UniformValue::Sampler(ENV_MAP_UNIT));
        backend.bind_texture(ENV_MAP_UNIT, self.texture);
        backend.draw(geometry, self.cube.draw_mode, self.cube.mesh.index_count() as u32);
    }
}
