use rustc_hash::FxHashMap;

use crate::assets::{LoadedModel, ModelLoader};
use crate::errors::{Result, ViewerError};
use crate::scene::description::{LightDesc, NodeDesc, NodeType, SceneDescription};
use crate::scene::light::LightFactory;
use crate::scene::node::Node;
use crate::scene::object::RenderObject;
use crate::scene::transform_system::TransformObserver;
use crate::scene::{NodeHandle, Scene};

/// Builds a [`Scene`] from a [`SceneDescription`].
///
/// 1. Every declared model is loaded up front.
/// 2. Light definitions are registered by name without being instantiated.
/// 3. The hierarchy is walked in pre-order; model nodes get a render object
///    sharing the loaded mesh/material, light nodes get a light whose id is the
///    next free slot of its type. Ids therefore follow hierarchy order, not the
///    order of the `lights` list.
/// 4. The root's transform is re-applied so every world matrix and every light
///    uniform is pushed once through the observer.
///
/// Any error aborts the build; nothing partially built escapes.
pub struct SceneBuilder<'a> {
    model_loader: &'a mut dyn ModelLoader,
    light_factory: &'a mut LightFactory,
}

struct Tables {
    models: FxHashMap<String, LoadedModel>,
    lights: FxHashMap<String, LightDesc>,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(model_loader: &'a mut dyn ModelLoader, light_factory: &'a mut LightFactory) -> Self {
        Self {
            model_loader,
            light_factory,
        }
    }

    pub fn build(
        &mut self,
        description: &SceneDescription,
        observer: &mut dyn TransformObserver,
    ) -> Result<Scene> {
        let mut models = FxHashMap::default();
        for model in &description.models {
            let loaded = self.model_loader.load_model(&model.obj)?;
            models.insert(model.name.clone(), loaded);
        }

        let lights = description
            .lights
            .iter()
            .map(|l| (l.name.clone(), l.clone()))
            .collect();

        let tables = Tables { models, lights };

        let root = self.instantiate(&description.scenegraph, &tables)?;
        let mut scene = Scene::with_tables(root, FxHashMap::default(), FxHashMap::default());
        let root = scene.root();
        self.attach_children(&mut scene, root, &description.scenegraph, &tables)?;

        let Tables { models, lights } = tables;
        scene.set_tables(models, lights);

        scene.refresh(observer);

        log::info!(
            "Built scene '{}': {} nodes, {} models",
            description.scenegraph.name,
            scene.len(),
            scene.models().len()
        );
        Ok(scene)
    }

    fn attach_children(
        &mut self,
        scene: &mut Scene,
        parent: NodeHandle,
        desc: &NodeDesc,
        tables: &Tables,
    ) -> Result<()> {
        for child in &desc.children {
            let node = self.instantiate(child, tables)?;
            let handle = scene.add_child(parent, node)?;
            self.attach_children(scene, handle, child, tables)?;
        }
        Ok(())
    }

    fn instantiate(&mut self, desc: &NodeDesc, tables: &Tables) -> Result<Node> {
        let local = desc.local_matrix()?;

        match desc.node_type {
            NodeType::Node => Ok(Node::group(&desc.name, local)),
            NodeType::Model => {
                let name = content(desc)?;
                let model = tables
                    .models
                    .get(name)
                    .ok_or_else(|| ViewerError::MissingModel(name.to_string()))?;
                Ok(Node::model(&desc.name, local, RenderObject::from_model(model)))
            }
            NodeType::Light => {
                let name = content(desc)?;
                let spec = tables
                    .lights
                    .get(name)
                    .ok_or_else(|| ViewerError::MissingLight(name.to_string()))?;
                let light = self.light_factory.instantiate(
                    &spec.light_type,
                    spec.color.to_vec3()?,
                    spec.intensity,
                )?;
                Ok(Node::light(&desc.name, local, light))
            }
        }
    }
}

fn content(desc: &NodeDesc) -> Result<&str> {
    desc.content
        .as_deref()
        .ok_or_else(|| ViewerError::MissingContent(desc.name.clone()))
}
