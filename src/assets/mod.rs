//! Asset loading: the file I/O seam, texture storage, and the OBJ/MTL loaders.

pub mod io;
pub mod loaders;
pub mod storage;

pub use io::{AssetSource, FileSource, MemorySource};
pub use loaders::{LoadedModel, MaterialLibrary, ModelLoader, MtlLoader, ObjLoader};
pub use storage::{Texture, TextureData, TextureHandle, TextureLoader, TextureState, TextureStore};
