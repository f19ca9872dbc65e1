//! Frame Driver
//!
//! [`Viewer`] ties the scene, camera, particles and shake together. A host
//! calls [`Viewer::update`] then [`Viewer::render`] once per frame; the two
//! never overlap, so rendering always sees a fully propagated scene.

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assets::AssetSource;
use crate::config::ViewerConfig;
use crate::errors::{Result, ViewerError};
use crate::particles::{CollisionWorld, Emitter, ShakeEffect};
use crate::renderer::{RenderBackend, ShaderKind, ShaderSet};
use crate::resources::BoundingSphere;
use crate::scene::{Camera, SceneManager, Skybox};

/// Per-frame statistics returned by [`Viewer::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles_emitted: usize,
    pub particles_alive: usize,
    pub textures_decoded: usize,
    pub shaking: bool,
}

pub struct Viewer {
    config: ViewerConfig,
    scenes: SceneManager,
    camera: Camera,
    emitter: Emitter,
    shake: ShakeEffect,
    skybox: Option<Skybox>,
    shaders: Option<ShaderSet>,
    rng: StdRng,
    /// Accumulated shake displacement of the globe.
    globe_offset: Vec3,
}

impl Viewer {
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let particles = &config.particles;
        Self {
            camera: Camera::from_config(&config.camera),
            emitter: Emitter::from_config(particles, particles.emitter_offset),
            shake: ShakeEffect::from_config(&config.shake),
            rng: StdRng::seed_from_u64(particles.seed),
            scenes: SceneManager::new(),
            skybox: None,
            shaders: None,
            globe_offset: Vec3::ZERO,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[must_use]
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    #[must_use]
    pub fn shake(&self) -> &ShakeEffect {
        &self.shake
    }

    #[must_use]
    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    /// Compiled programs, once [`init`](Self::init) or a render has run.
    #[must_use]
    pub fn shaders(&self) -> Option<&ShaderSet> {
        self.shaders.as_ref()
    }

    #[must_use]
    pub fn globe_center(&self) -> Vec3 {
        self.globe_offset
    }

    /// Loads a scene file, keeping the current scene if anything fails.
    pub fn load_scene(&mut self, source: &dyn AssetSource, path: &Path) -> Result<()> {
        self.scenes.load_file(source, path)
    }

    /// Replaces the background cube map.
    pub fn set_skybox(&mut self, faces: [PathBuf; 6]) {
        let textures = self.scenes.textures_mut();
        if let Some(old) = self.skybox.take() {
            textures.unpin(old.texture());
        }
        self.skybox = Some(Skybox::new(textures, faces));
    }

    pub fn start_shake(&mut self) {
        log::debug!("Shake started");
        self.shake.start();
    }

    /// Compiles the shader programs. Called lazily by [`render`](Self::render).
    pub fn init(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        if self.shaders.is_none() {
            self.shaders = Some(ShaderSet::compile(backend)?);
        }
        Ok(())
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// Advances shake, particles and texture decoding by `dt` seconds.
    pub fn update(&mut self, dt: f32, source: &dyn AssetSource) -> FrameStats {
        let mut stats = FrameStats::default();

        if let Some(frame) = self.shake.update(dt, &mut self.rng) {
            stats.shaking = true;
            self.globe_offset += frame.offset;
            match self.scenes.translate_root(frame.offset) {
                Ok(()) | Err(ViewerError::NoActiveScene) => {}
                Err(e) => log::warn!("Shake could not move the scene: {e}"),
            }
            self.emitter.apply_shake(frame.offset, frame.amount);
        }

        let particles = &self.config.particles;
        self.emitter.position = self.globe_offset + particles.emitter_offset;

        let obstacles = self
            .scenes
            .active_scene()
            .map(|scene| scene.model_bounds())
            .unwrap_or_default();
        let world = CollisionWorld::new(
            BoundingSphere::new(self.globe_offset, particles.globe_radius),
            particles.restitution,
        )
        .with_snow_base(
            self.globe_offset + Vec3::Y * particles.snow_base_height,
            particles.snow_base_radius,
        )
        .with_obstacles(obstacles);

        let globe_matrix = Mat4::from_translation(self.globe_offset);
        stats.particles_emitted = self.emitter.update(dt, &globe_matrix, &world, &mut self.rng);
        stats.particles_alive = self.emitter.len();

        stats.textures_decoded = self
            .scenes
            .textures_mut()
            .decode_pending(source, self.config.textures.decode_budget);

        stats
    }

    // ========================================================================
    // Render
    // ========================================================================

    /// Uploads new geometry, writes camera and light uniforms, then draws the
    /// skybox, the scene and the particles.
    pub fn render(&mut self, backend: &mut dyn RenderBackend) -> Result<()> {
        self.init(backend)?;
        let Some(shaders) = self.shaders.as_ref() else {
            return Ok(());
        };

        if let Some(skybox) = self.skybox.as_mut() {
            skybox.upload(backend);
            skybox.render(backend, shaders, &self.camera);
        }

        for kind in [ShaderKind::Phong, ShaderKind::Gizmo, ShaderKind::Points] {
            if shaders.bind(backend, kind) {
                self.camera.write_uniforms(backend);
            }
        }
        if shaders.bind(backend, ShaderKind::Phong) {
            self.scenes.flush_light_uniforms(backend);
        }

        if let Some(scene) = self.scenes.active_scene_mut() {
            let uploaded = scene.upload(backend);
            if uploaded > 0 {
                log::debug!("Uploaded {uploaded} meshes");
            }
            scene.render(backend, shaders);
        }

        self.emitter.render(backend, shaders);
        Ok(())
    }
}
