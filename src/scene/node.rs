use std::sync::Arc;

use glam::Mat4;

use crate::renderer::DrawMode;
use crate::resources::Material;
use crate::scene::NodeHandle;
use crate::scene::light::Light;
use crate::scene::object::RenderObject;

/// What a node carries besides its transform.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node.
    Group,
    Model(RenderObject),
    Light {
        light: Light,
        /// Wire box visualizing the light.
        gizmo: RenderObject,
    },
}

impl NodeKind {
    /// Light payload with its kind-specific gizmo.
    #[must_use]
    pub fn light(light: Light) -> Self {
        let mut gizmo = RenderObject::new(Arc::new(light.gizmo_mesh()), Arc::new(Material::fallback()));
        gizmo.draw_mode = DrawMode::Lines;
        Self::Light { light, gizmo }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Group => "node",
            Self::Model(_) => "model",
            Self::Light { .. } => "light",
        }
    }
}

/// Scene node.
///
/// Parent/child links are only changed through [`Scene`](crate::scene::Scene),
/// which keeps both sides consistent. `world` is a cache: it always equals
/// the parent's world matrix times `local`.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub(crate) local: Mat4,
    pub(crate) world: Mat4,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind, local: Mat4) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            local,
            world: local,
        }
    }

    #[must_use]
    pub fn group(name: impl Into<String>, local: Mat4) -> Self {
        Self::new(name, NodeKind::Group, local)
    }

    #[must_use]
    pub fn model(name: impl Into<String>, local: Mat4, object: RenderObject) -> Self {
        Self::new(name, NodeKind::Model(object), local)
    }

    #[must_use]
    pub fn light(name: impl Into<String>, local: Mat4, light: Light) -> Self {
        Self::new(name, NodeKind::light(light), local)
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    #[inline]
    #[must_use]
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    #[must_use]
    pub fn object(&self) -> Option<&RenderObject> {
        match &self.kind {
            NodeKind::Model(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn light_data(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light { light, .. } => Some(light),
            _ => None,
        }
    }

    /// Pushes a freshly computed world matrix into the node's payload.
    pub(crate) fn sync_payload(&mut self) {
        let world = self.world;
        match &mut self.kind {
            NodeKind::Group => {}
            NodeKind::Model(object) => object.set_transformation(world),
            NodeKind::Light { light, gizmo } => {
                light.apply_world_transform(&world);
                gizmo.set_transformation(world);
            }
        }
    }
}
