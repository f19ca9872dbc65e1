use glam::{Mat4, Vec3};
use rand::RngExt;
use rand::rngs::StdRng;

use crate::config::ParticleConfig;
use crate::particles::{CollisionWorld, Particle};
use crate::renderer::{RenderBackend, ShaderKind, ShaderSet, UniformValue};

/// Screen-space size of a particle at unit view distance.
const POINT_SIZE: f32 = 40.0;

/// Continuous particle source.
///
/// Emission is driven by accumulated time: each update spawns
/// `floor(elapsed * rate)` particles (never exceeding `max_particles` alive),
/// then keeps only the fractional remainder of one emission period.
#[derive(Debug, Clone)]
pub struct Emitter {
    pub position: Vec3,
    pub max_particles: usize,
    /// Particles per second.
    pub emission_rate: f32,
    /// Lifespan given to new particles, seconds.
    pub lifetime: f32,
    pub gravity: Vec3,

    elapsed: f32,
    particles: Vec<Particle>,
}

impl Emitter {
    #[must_use]
    pub fn new(position: Vec3, max_particles: usize, emission_rate: f32, lifetime: f32) -> Self {
        Self {
            position,
            max_particles,
            emission_rate,
            lifetime,
            gravity: Vec3::new(0.0, -2.0, 0.0),
            elapsed: 0.0,
            particles: Vec::with_capacity(max_particles),
        }
    }

    #[must_use]
    pub fn from_config(config: &ParticleConfig, position: Vec3) -> Self {
        let mut emitter = Self::new(
            position,
            config.max_particles,
            config.emission_rate,
            config.lifetime,
        );
        emitter.gravity = config.gravity;
        emitter
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.elapsed = 0.0;
    }

    /// Emits, integrates, collides and culls. Returns the number of
    /// particles emitted this step.
    ///
    /// Initial velocities are drawn from [-1, 1]^3 and rotated/scaled by
    /// `globe_matrix` so they follow the globe's orientation.
    pub fn update(
        &mut self,
        dt: f32,
        globe_matrix: &Mat4,
        world: &CollisionWorld,
        rng: &mut StdRng,
    ) -> usize {
        self.elapsed += dt;
        let emitted = self.emit(globe_matrix, rng);

        for particle in &mut self.particles {
            particle.step(dt);
            world.resolve(particle);
        }
        self.particles.retain(|p| !p.is_dead());

        emitted
    }

    fn emit(&mut self, globe_matrix: &Mat4, rng: &mut StdRng) -> usize {
        if self.emission_rate <= 0.0 {
            self.elapsed = 0.0;
            return 0;
        }

        let due = (self.elapsed * self.emission_rate).floor().max(0.0) as usize;
        let room = self.max_particles.saturating_sub(self.particles.len());
        let count = due.min(room);

        for _ in 0..count {
            let velocity = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            self.particles.push(Particle::new(
                self.position,
                globe_matrix.transform_vector3(velocity),
                self.gravity,
                self.lifetime,
            ));
        }

        self.elapsed %= 1.0 / self.emission_rate;
        count
    }

    /// Adds `offset * amount` to every particle's velocity.
    pub fn apply_shake(&mut self, offset: Vec3, amount: f32) {
        let impulse = offset * amount;
        for particle in &mut self.particles {
            particle.velocity += impulse;
        }
    }

    /// Flat `[x, y, z, ...]` positions for a point draw.
    #[must_use]
    pub fn point_positions(&self) -> Vec<f32> {
        self.particles
            .iter()
            .flat_map(|p| p.position.to_array())
            .collect()
    }

    /// Draws every live particle as one point list. Camera uniforms must
    /// already be set on the points shader.
    pub fn render(&self, backend: &mut dyn RenderBackend, shaders: &ShaderSet) {
        if self.particles.is_empty() || !shaders.bind(backend, ShaderKind::Points) {
            return;
        }
        backend.set_uniform("u_point_size", UniformValue::Float(POINT_SIZE));
        backend.draw_points(&self.point_positions());
    }
}
