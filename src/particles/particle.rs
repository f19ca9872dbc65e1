use glam::Vec3;

/// One snow particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Seconds the particle lives.
    pub lifespan: f32,
    /// Seconds lived so far.
    pub age: f32,
}

impl Particle {
    #[must_use]
    pub fn new(position: Vec3, velocity: Vec3, acceleration: Vec3, lifespan: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration,
            lifespan,
            age: 0.0,
        }
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity.
    pub fn step(&mut self, dt: f32) {
        self.age += dt;
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }

    #[inline]
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.age >= self.lifespan
    }
}
