use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::assets::LoadedModel;
use crate::errors::{Result, ViewerError};
use crate::renderer::{RenderBackend, ShaderKind, ShaderSet, UniformSink};
use crate::resources::BoundingBox;
use crate::scene::NodeHandle;
use crate::scene::description::LightDesc;
use crate::scene::edit::NodeEdit;
use crate::scene::light::Light;
use crate::scene::node::{Node, NodeKind};
use crate::scene::transform_system::{self, TransformObserver};

/// A loaded scene: the node hierarchy plus the model and light tables it was
/// built from.
///
/// Nodes live in an arena and refer to each other by [`NodeHandle`]. A node's
/// parent handle and its parent's child list are only ever changed together.
#[derive(Debug)]
pub struct Scene {
    nodes: SlotMap<NodeHandle, Node>,
    root: NodeHandle,

    models: FxHashMap<String, LoadedModel>,
    lights: FxHashMap<String, LightDesc>,
}

impl Scene {
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self::with_tables(root, FxHashMap::default(), FxHashMap::default())
    }

    pub(crate) fn with_tables(
        root: Node,
        models: FxHashMap<String, LoadedModel>,
        lights: FxHashMap<String, LightDesc>,
    ) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = root;
        root.parent = None;
        root.world = root.local;
        root.sync_payload();
        let root = nodes.insert(root);
        Self {
            nodes,
            root,
            models,
            lights,
        }
    }

    // ========================================================================
    // Access
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Models loaded for this scene, by declared name.
    #[must_use]
    pub fn models(&self) -> &FxHashMap<String, LoadedModel> {
        &self.models
    }

    /// Light definitions declared by this scene, by name.
    #[must_use]
    pub fn light_definitions(&self) -> &FxHashMap<String, LightDesc> {
        &self.lights
    }

    pub(crate) fn set_tables(
        &mut self,
        models: FxHashMap<String, LoadedModel>,
        lights: FxHashMap<String, LightDesc>,
    ) {
        self.models = models;
        self.lights = lights;
    }

    fn node(&self, handle: NodeHandle) -> Result<&Node> {
        self.nodes.get(handle).ok_or(ViewerError::InvalidHandle)
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Inserts `node` as the last child of `parent`.
    ///
    /// The child's world matrix is computed from the parent's current one;
    /// its own payload is synced but no observer is notified.
    pub fn add_child(&mut self, parent: NodeHandle, node: Node) -> Result<NodeHandle> {
        let parent_world = self.node(parent)?.world;

        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();
        node.world = parent_world * node.local;
        node.sync_payload();

        let handle = self.nodes.insert(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        Ok(handle)
    }

    /// All nodes in pre-order, children in insertion order.
    #[must_use]
    pub fn flatten(&self) -> Vec<NodeHandle> {
        self.flatten_from(self.root)
    }

    /// Pre-order listing of the subtree rooted at `start`.
    #[must_use]
    pub fn flatten_from(&self, start: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![start];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            out.push(handle);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in pre-order.
    pub fn find_by_name(&self, name: &str) -> Result<NodeHandle> {
        self.flatten()
            .into_iter()
            .find(|&h| self.nodes[h].name == name)
            .ok_or_else(|| ViewerError::NodeNotFound(name.to_string()))
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    pub fn local_transform(&self, handle: NodeHandle) -> Result<Mat4> {
        Ok(self.node(handle)?.local)
    }

    pub fn world_transform(&self, handle: NodeHandle) -> Result<Mat4> {
        Ok(self.node(handle)?.world)
    }

    /// Replaces a node's local matrix and recomputes the world matrix of the
    /// node and its whole subtree before returning. Lights and models in the
    /// subtree are reported to `observer` as they are updated.
    pub fn set_local_transform(
        &mut self,
        handle: NodeHandle,
        local: Mat4,
        observer: &mut dyn TransformObserver,
    ) -> Result<()> {
        let node = self.nodes.get_mut(handle).ok_or(ViewerError::InvalidHandle)?;
        node.local = local;
        transform_system::propagate(&mut self.nodes, handle, observer);
        Ok(())
    }

    /// Re-applies the root's own transform, refreshing every cached world
    /// matrix and pushing every light.
    pub fn refresh(&mut self, observer: &mut dyn TransformObserver) {
        let root = self.root;
        let local = self.nodes[root].local;
        if let Err(e) = self.set_local_transform(root, local, observer) {
            log::error!("Scene refresh failed: {e}");
        }
    }

    /// Moves a node by `offset` in its parent's space.
    pub fn translate(
        &mut self,
        handle: NodeHandle,
        offset: Vec3,
        observer: &mut dyn TransformObserver,
    ) -> Result<()> {
        let local = Mat4::from_translation(offset) * self.local_transform(handle)?;
        self.set_local_transform(handle, local, observer)
    }

    /// Applies a view-aligned interactive edit, see [`NodeEdit`].
    pub fn apply_edit(
        &mut self,
        handle: NodeHandle,
        edit: &NodeEdit,
        observer: &mut dyn TransformObserver,
    ) -> Result<()> {
        let node = self.node(handle)?;
        let local = edit.apply(&node.local, &node.world);
        self.set_local_transform(handle, local, observer)
    }

    // ========================================================================
    // Payload queries
    // ========================================================================

    /// Lights in pre-order.
    pub fn lights(&self) -> impl Iterator<Item = (NodeHandle, &Light)> + '_ {
        self.flatten()
            .into_iter()
            .filter_map(|h| self.nodes[h].light_data().map(|l| (h, l)))
    }

    /// Writes every light's uniforms into `sink`.
    pub fn push_lights(&self, sink: &mut dyn UniformSink) {
        for (_, light) in self.lights() {
            light.write_uniforms(sink);
        }
    }

    /// World-space bounds of every model node.
    #[must_use]
    pub fn model_bounds(&self) -> Vec<BoundingBox> {
        self.flatten()
            .into_iter()
            .filter_map(|h| self.nodes[h].object().and_then(|o| o.world_bounds()))
            .collect()
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Uploads every mesh that has no GPU geometry yet. Returns how many were uploaded.
    pub fn upload(&mut self, backend: &mut dyn RenderBackend) -> usize {
        let mut uploaded = 0;
        for node in self.nodes.values_mut() {
            let object = match &mut node.kind {
                NodeKind::Group => continue,
                NodeKind::Model(object) => object,
                NodeKind::Light { gizmo, .. } => gizmo,
            };
            if !object.is_uploaded() {
                object.upload(backend);
                uploaded += 1;
            }
        }
        uploaded
    }

    /// Draws the hierarchy in pre-order: models with the phong shader, light
    /// gizmos with the flat shader.
    pub fn render(&self, backend: &mut dyn RenderBackend, shaders: &ShaderSet) {
        let mut bound: Option<ShaderKind> = None;
        let mut bind = |backend: &mut dyn RenderBackend, kind: ShaderKind| {
            if bound != Some(kind) && shaders.bind(backend, kind) {
                bound = Some(kind);
            }
        };

        for handle in self.flatten() {
            match &self.nodes[handle].kind {
                NodeKind::Group => {}
                NodeKind::Model(object) => {
                    bind(backend, ShaderKind::Phong);
                    object.render(backend);
                }
                NodeKind::Light { light, gizmo } => {
                    bind(backend, ShaderKind::Gizmo);
                    gizmo.render_flat(backend, light.color);
                }
            }
        }
    }
}
