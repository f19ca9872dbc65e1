//! Core resource definitions, independent of any GPU implementation:
//! - Mesh: indexed vertex data produced by the model loaders
//! - Material: phong material with optional texture maps
//! - BoundingBox / BoundingSphere: spatial bounds used by culling and collision

pub mod bounds;
pub mod material;
pub mod mesh;

pub use bounds::{BoundingBox, BoundingSphere};
pub use material::{Material, MaterialFeatures};
pub use mesh::{Mesh, VertexLayout};
