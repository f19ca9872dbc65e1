#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod assets;
pub mod config;
pub mod errors;
pub mod particles;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod viewer;

pub use assets::{AssetSource, FileSource, MemorySource, ObjLoader, TextureHandle, TextureStore};
pub use config::ViewerConfig;
pub use errors::{Result, ViewerError};
pub use particles::{Emitter, Particle, ShakeEffect};
pub use renderer::{HeadlessBackend, RenderBackend, UniformSink, UniformValue};
pub use resources::{Material, Mesh};
pub use scene::{Camera, Light, Node, NodeHandle, Scene, SceneManager};
pub use viewer::{FrameStats, Viewer};

/// Common imports for hosts driving a [`Viewer`].
pub mod prelude {
    pub use crate::assets::{AssetSource, FileSource, MemorySource, TextureHandle, TextureLoader, TextureStore};
    pub use crate::config::ViewerConfig;
    pub use crate::errors::ViewerError;
    pub use crate::renderer::{HeadlessBackend, RenderBackend, UniformSink, UniformValue};
    pub use crate::scene::{Camera, Light, Node, NodeEdit, NodeHandle, Scene, SceneManager};
    pub use crate::viewer::{FrameStats, Viewer};
    pub use glam::{Mat4, Quat, Vec3};
}
