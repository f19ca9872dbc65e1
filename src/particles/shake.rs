use glam::Vec3;
use rand::rngs::StdRng;
use rand::RngExt;

use crate::config::ShakeConfig;

/// Displacement produced by one frame of an active shake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeFrame {
    pub offset: Vec3,
    /// Current strength, decaying linearly to zero over the duration.
    pub amount: f32,
}

/// Decaying jitter applied to the globe and its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeEffect {
    duration: f32,
    amplitude: f32,
    timer: f32,
    active: bool,
}

impl ShakeEffect {
    #[must_use]
    pub fn new(duration: f32, amplitude: f32) -> Self {
        Self {
            duration,
            amplitude,
            timer: 0.0,
            active: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &ShakeConfig) -> Self {
        Self::new(config.duration, config.amplitude)
    }

    /// Starts (or restarts) the shake.
    pub fn start(&mut self) {
        self.timer = 0.0;
        self.active = self.duration > 0.0;
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.timer
    }

    /// Advances the timer and returns this frame's displacement, or `None`
    /// once the shake has run its course.
    pub fn update(&mut self, dt: f32, rng: &mut StdRng) -> Option<ShakeFrame> {
        if !self.active {
            return None;
        }
        if self.timer >= self.duration {
            self.active = false;
            return None;
        }

        self.timer += dt;
        let amount = (self.amplitude * (self.duration - self.timer) / self.duration).max(0.0);
        let time = self.timer * 10.0;
        let mut axis = || (time + rng.random_range(0.0..1.0f32) - 0.5).sin() * amount;
        let offset = Vec3::new(axis(), axis(), axis());

        Some(ShakeFrame { offset, amount })
    }
}
