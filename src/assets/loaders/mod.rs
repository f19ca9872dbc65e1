pub mod mtl;
pub mod obj;

use std::sync::Arc;

use crate::errors::Result;
use crate::resources::{Material, Mesh};

pub use mtl::{MaterialLibrary, MtlLoader};
pub use obj::ObjLoader;

/// A parsed model: immutable geometry plus the material it is drawn with.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub mesh: Arc<Mesh>,
    pub material: Arc<Material>,
}

/// Model source consumed by the scene builder.
pub trait ModelLoader {
    /// Loads the model referenced by a scene description path.
    fn load_model(&mut self, path: &str) -> Result<LoadedModel>;
}
