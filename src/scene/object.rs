use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::assets::LoadedModel;
use crate::renderer::{DrawMode, GeometryHandle, RenderBackend, UniformValue};
use crate::resources::{BoundingBox, Material, Mesh};

/// Geometry + material + world placement, drawn by scene traversal.
///
/// The mesh and material are shared with every other object instantiated
/// from the same model. `model_matrix` mirrors the owning node's world
/// transform and is refreshed by transform propagation.
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub mesh: Arc<Mesh>,
    pub material: Arc<Material>,
    pub draw_mode: DrawMode,
    pub(crate) model_matrix: Mat4,
    pub(crate) geometry: Option<GeometryHandle>,
}

impl RenderObject {
    #[must_use]
    pub fn new(mesh: Arc<Mesh>, material: Arc<Material>) -> Self {
        Self {
            mesh,
            material,
            draw_mode: DrawMode::Triangles,
            model_matrix: Mat4::IDENTITY,
            geometry: None,
        }
    }

    #[must_use]
    pub fn from_model(model: &LoadedModel) -> Self {
        Self::new(model.mesh.clone(), model.material.clone())
    }

    #[inline]
    #[must_use]
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    #[inline]
    pub fn set_transformation(&mut self, world: Mat4) {
        self.model_matrix = world;
    }

    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Option<GeometryHandle> {
        self.geometry
    }

    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        self.geometry.is_some()
    }

    /// Uploads the mesh once; later calls are no-ops.
    pub fn upload(&mut self, backend: &mut dyn RenderBackend) -> GeometryHandle {
        *self
            .geometry
            .get_or_insert_with(|| backend.upload_mesh(&self.mesh))
    }

    /// World-space bounds of the mesh at the current model matrix.
    #[must_use]
    pub fn world_bounds(&self) -> Option<BoundingBox> {
        self.mesh
            .bounding_box()
            .map(|b| b.transform(&self.model_matrix))
    }

    /// Sets material and transform uniforms, binds maps and issues the draw.
    /// Objects that were never uploaded are skipped.
    pub fn render(&self, backend: &mut dyn RenderBackend) {
        let Some(geometry) = self.geometry else {
            return;
        };
        self.material.write_uniforms(backend);
        for (unit, texture) in self.material.texture_bindings() {
            backend.bind_texture(unit, texture);
        }
        backend.set_uniform("u_m", UniformValue::Mat4(self.model_matrix));
        backend.draw(geometry, self.draw_mode, self.mesh.index_count() as u32);
    }

    /// Flat-colored draw used for light gizmos.
    pub fn render_flat(&self, backend: &mut dyn RenderBackend, color: Vec3) {
        let Some(geometry) = self.geometry else {
            return;
        };
        backend.set_uniform("u_color", UniformValue::Vec3(color));
        backend.set_uniform("u_m", UniformValue::Mat4(self.model_matrix));
        backend.draw(geometry, self.draw_mode, self.mesh.index_count() as u32);
    }
}
