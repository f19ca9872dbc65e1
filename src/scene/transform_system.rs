//! Transform System
//!
//! Recomputes cached world matrices for a subtree and pushes the results into
//! node payloads (render objects, lights). Decoupled from [`Scene`] so it only
//! borrows the node arena.
//!
//! Propagation is eager and synchronous: when it returns, every node of the
//! subtree holds `parent.world * local`, and the observer has been told about
//! every light and model that moved, in pre-order.
//!
//! [`Scene`]: crate::scene::Scene

use glam::Mat4;
use slotmap::SlotMap;

use crate::renderer::UniformTable;
use crate::scene::NodeHandle;
use crate::scene::light::Light;
use crate::scene::node::{Node, NodeKind};

/// Receives payload updates during propagation.
pub trait TransformObserver {
    /// A light's derived state changed (or needs its initial push).
    fn light_updated(&mut self, node: NodeHandle, light: &Light);

    /// A model's world matrix changed.
    fn object_moved(&mut self, _node: NodeHandle, _world: &Mat4) {}
}

/// Observer that ignores every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TransformObserver for NoopObserver {
    fn light_updated(&mut self, _node: NodeHandle, _light: &Light) {}
}

/// Light uniforms land in the table, keyed by their shader names.
impl TransformObserver for UniformTable {
    fn light_updated(&mut self, _node: NodeHandle, light: &Light) {
        light.write_uniforms(self);
    }
}

/// Updates the subtree rooted at `start`. Returns the number of nodes visited.
pub fn propagate(
    nodes: &mut SlotMap<NodeHandle, Node>,
    start: NodeHandle,
    observer: &mut dyn TransformObserver,
) -> usize {
    let parent_world = nodes
        .get(start)
        .and_then(|n| n.parent)
        .and_then(|p| nodes.get(p))
        .map_or(Mat4::IDENTITY, |p| p.world);

    // (node, parent world)
    let mut stack: Vec<(NodeHandle, Mat4)> = Vec::with_capacity(64);
    stack.push((start, parent_world));
    let mut visited = 0;

    while let Some((handle, parent_world)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        node.world = parent_world * node.local;
        node.sync_payload();
        visited += 1;

        match &node.kind {
            NodeKind::Group => {}
            NodeKind::Model(object) => observer.object_moved(handle, object.model_matrix()),
            NodeKind::Light { light, .. } => observer.light_updated(handle, light),
        }

        let world = node.world;
        for &child in node.children.iter().rev() {
            stack.push((child, world));
        }
    }

    visited
}
