use std::path::Path;

use glam::{Mat4, Vec3};

use crate::assets::io::parent_dir;
use crate::assets::{AssetSource, ObjLoader, TextureStore};
use crate::errors::{Result, ViewerError};
use crate::renderer::{UniformSink, UniformTable};
use crate::scene::builder::SceneBuilder;
use crate::scene::description::SceneDescription;
use crate::scene::edit::NodeEdit;
use crate::scene::light::{LightFactory, reset_light_uniforms};
use crate::scene::{NodeHandle, Scene};

/// Owns the live scene and the state whose lifetime follows it: textures and
/// the light uniform mirror.
///
/// A load builds the new scene completely before touching anything live. On
/// failure the previous scene, its textures and its light uniforms are left
/// exactly as they were.
#[derive(Debug, Default)]
pub struct SceneManager {
    active: Option<Scene>,
    textures: TextureStore,
    /// Light uniform state for the lit shader, kept in step with the graph.
    light_uniforms: UniformTable,
}

impl SceneManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.as_ref()
    }

    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.active.as_mut()
    }

    #[must_use]
    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }

    #[must_use]
    pub fn light_uniforms(&self) -> &UniformTable {
        &self.light_uniforms
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Reads a scene description file; model paths are relative to its directory.
    pub fn load_file(&mut self, source: &dyn AssetSource, path: &Path) -> Result<()> {
        let text = source.read_to_string(path).inspect_err(|e| {
            log::error!("Failed to read scene {}: {e}; keeping current scene", path.display());
        })?;
        self.load_json(&text, source, &parent_dir(path))
    }

    pub fn load_json(&mut self, text: &str, source: &dyn AssetSource, base_dir: &Path) -> Result<()> {
        let description = SceneDescription::from_json_str(text).inspect_err(|e| {
            log::error!("Invalid scene description: {e}; keeping current scene");
        })?;
        self.load_description(&description, source, base_dir)
    }

    pub fn load_description(
        &mut self,
        description: &SceneDescription,
        source: &dyn AssetSource,
        base_dir: &Path,
    ) -> Result<()> {
        let generation = self.textures.begin_generation();

        let mut staged_uniforms = UniformTable::new();
        reset_light_uniforms(&mut staged_uniforms);

        let mut light_factory = LightFactory::new();
        let built = {
            let mut loader = ObjLoader::new(source, &mut self.textures).with_base_dir(base_dir);
            SceneBuilder::new(&mut loader, &mut light_factory).build(description, &mut staged_uniforms)
        };

        match built {
            Ok(scene) => {
                self.active = Some(scene);
                self.light_uniforms = staged_uniforms;
                self.textures.discard_before(generation);
                Ok(())
            }
            Err(e) => {
                log::error!("Scene load failed: {e}; keeping current scene");
                Err(e)
            }
        }
    }

    // ========================================================================
    // Edits on the live scene
    // ========================================================================

    pub fn find(&self, name: &str) -> Result<NodeHandle> {
        self.active
            .as_ref()
            .ok_or(ViewerError::NoActiveScene)?
            .find_by_name(name)
    }

    pub fn set_local_transform(&mut self, handle: NodeHandle, local: Mat4) -> Result<()> {
        let scene = self.active.as_mut().ok_or(ViewerError::NoActiveScene)?;
        scene.set_local_transform(handle, local, &mut self.light_uniforms)
    }

    pub fn apply_edit(&mut self, handle: NodeHandle, edit: &NodeEdit) -> Result<()> {
        let scene = self.active.as_mut().ok_or(ViewerError::NoActiveScene)?;
        scene.apply_edit(handle, edit, &mut self.light_uniforms)
    }

    /// Offsets the whole scene by moving its root.
    pub fn translate_root(&mut self, offset: Vec3) -> Result<()> {
        let scene = self.active.as_mut().ok_or(ViewerError::NoActiveScene)?;
        let root = scene.root();
        scene.translate(root, offset, &mut self.light_uniforms)
    }

    /// Replays the light uniform mirror into `sink` (the bound lit shader).
    pub fn flush_light_uniforms(&self, sink: &mut dyn UniformSink) {
        for (name, value) in self.light_uniforms.iter() {
            sink.set_uniform(name, *value);
        }
    }
}
