use glam::Vec3;

use crate::particles::Particle;
use crate::resources::{BoundingBox, BoundingSphere};

/// What a particle hit during [`CollisionWorld::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Pushed back inside the globe.
    Wall,
    /// Settled on the snow base.
    Ground,
    /// Settled on top of a model.
    Obstacle,
}

/// Horizontal disc the snow piles up on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowBase {
    pub center: Vec3,
    pub radius: f32,
}

impl SnowBase {
    fn covers(&self, point: Vec3) -> bool {
        let dx = point.x - self.center.x;
        let dz = point.z - self.center.z;
        dx * dx + dz * dz <= self.radius * self.radius
    }
}

/// Static colliders for one simulation step, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionWorld {
    pub globe: BoundingSphere,
    /// Fraction of the outward normal velocity kept on a wall bounce.
    pub restitution: f32,
    pub snow_base: Option<SnowBase>,
    /// World-space model bounds.
    pub obstacles: Vec<BoundingBox>,
}

impl CollisionWorld {
    #[must_use]
    pub fn new(globe: BoundingSphere, restitution: f32) -> Self {
        Self {
            globe,
            restitution,
            snow_base: None,
            obstacles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_snow_base(mut self, center: Vec3, radius: f32) -> Self {
        self.snow_base = Some(SnowBase { center, radius });
        self
    }

    #[must_use]
    pub fn with_obstacles(mut self, obstacles: Vec<BoundingBox>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// Moves `particle` out of any collider it penetrates.
    ///
    /// The globe wall projects the particle back onto the sphere and reflects
    /// the outward part of its velocity. Models and the snow base stop the
    /// particle on their top surface.
    pub fn resolve(&self, particle: &mut Particle) -> Contact {
        let mut contact = Contact::None;

        if !self.globe.contains(particle.position) {
            let normal = self.globe.outward_normal(particle.position);
            particle.position = self.globe.center + normal * self.globe.radius;
            let outward = particle.velocity.dot(normal);
            if outward > 0.0 {
                particle.velocity -= normal * (outward * (1.0 + self.restitution));
            }
            contact = Contact::Wall;
        }

        if let Some(obstacle) = self.obstacles.iter().find(|b| b.contains(particle.position)) {
            particle.position.y = obstacle.max.y;
            particle.velocity = Vec3::ZERO;
            return Contact::Obstacle;
        }

        if let Some(base) = &self.snow_base
            && particle.position.y < base.center.y
            && base.covers(particle.position)
        {
            particle.position.y = base.center.y;
            particle.velocity = Vec3::ZERO;
            return Contact::Ground;
        }

        contact
    }
}
