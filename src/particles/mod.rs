//! Snow Particles
//!
//! A CPU particle simulation that runs next to the scene graph: the
//! [`Emitter`] spawns and integrates [`Particle`]s, the [`CollisionWorld`]
//! keeps them inside the globe, and [`ShakeEffect`] drives the shake
//! interaction.

pub mod collision;
pub mod emitter;
pub mod particle;
pub mod shake;

pub use collision::{CollisionWorld, Contact, SnowBase};
pub use emitter::Emitter;
pub use particle::Particle;
pub use shake::{ShakeEffect, ShakeFrame};
