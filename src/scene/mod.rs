//! Scene Graph
//!
//! - [`Scene`]: node arena plus the model and light tables of one loaded scene
//! - [`Node`]: name, payload and local/world transform
//! - [`transform_system`]: eager world-matrix propagation with an observer
//! - [`SceneBuilder`]: instantiates a [`SceneDescription`]
//! - [`SceneManager`]: owns the live scene and swaps it atomically on load
//! - [`Camera`]: arcball camera
//! - [`Skybox`]: cube-map background

pub mod background;
pub mod builder;
pub mod camera;
pub mod description;
pub mod edit;
pub mod light;
pub mod manager;
pub mod node;
pub mod object;
pub mod scene;
pub mod transform_system;

pub use background::Skybox;
pub use builder::SceneBuilder;
pub use camera::Camera;
pub use description::{ColorDesc, LightDesc, ModelDesc, NodeDesc, NodeType, SceneDescription, TransformDesc};
pub use edit::NodeEdit;
pub use light::{Light, LightFactory, LightKind, LightType};
pub use manager::SceneManager;
pub use node::{Node, NodeKind};
pub use object::RenderObject;
pub use scene::Scene;
pub use transform_system::{NoopObserver, TransformObserver};

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
