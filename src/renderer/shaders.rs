use rustc_hash::FxHashMap;

use super::{RenderBackend, ShaderHandle};
use crate::errors::{Result, ViewerError};

const MESH_VERT: &str = include_str!("shaders/mesh.vert");
const PHONG_FRAG: &str = include_str!("shaders/phong.frag");
const GIZMO_VERT: &str = include_str!("shaders/gizmo.vert");
const GIZMO_FRAG: &str = include_str!("shaders/gizmo.frag");
const POINTS_VERT: &str = include_str!("shaders/points.vert");
const POINTS_FRAG: &str = include_str!("shaders/points.frag");
const SKYBOX_VERT: &str = include_str!("shaders/skybox.vert");
const SKYBOX_FRAG: &str = include_str!("shaders/skybox.frag");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Lit models, textured or not (feature flags select the maps).
    Phong,
    /// Flat-colored light gizmos.
    Gizmo,
    /// Particle point sprites.
    Points,
    Skybox,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 4] = [Self::Phong, Self::Gizmo, Self::Points, Self::Skybox];

    #[must_use]
    pub fn sources(self) -> (&'static str, &'static str) {
        match self {
            Self::Phong => (MESH_VERT, PHONG_FRAG),
            Self::Gizmo => (GIZMO_VERT, GIZMO_FRAG),
            Self::Points => (POINTS_VERT, POINTS_FRAG),
            Self::Skybox => (SKYBOX_VERT, SKYBOX_FRAG),
        }
    }
}

/// Compiled programs for every [`ShaderKind`].
#[derive(Debug, Default)]
pub struct ShaderSet {
    programs: FxHashMap<ShaderKind, ShaderHandle>,
}

impl ShaderSet {
    pub fn compile(backend: &mut dyn RenderBackend) -> Result<Self> {
        let mut programs = FxHashMap::default();
        for kind in ShaderKind::ALL {
            let (vertex, fragment) = kind.sources();
            let handle = backend
                .compile_shader(vertex, fragment)
                .map_err(|e| ViewerError::ShaderCompile(format!("{kind:?}: {e}")))?;
            programs.insert(kind, handle);
        }
        Ok(Self { programs })
    }

    #[must_use]
    pub fn get(&self, kind: ShaderKind) -> Option<ShaderHandle> {
        self.programs.get(&kind).copied()
    }

    /// Selects `kind` on the backend. Returns false if it was never compiled.
    pub fn bind(&self, backend: &mut dyn RenderBackend, kind: ShaderKind) -> bool {
        match self.get(kind) {
            Some(handle) => {
                backend.use_shader(handle);
                true
            }
            None => false,
        }
    }
}
