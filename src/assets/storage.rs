//! Texture Storage
//!
//! Textures are handed out immediately as bindable handles and upgraded in
//! place once their image bytes have been decoded.
//!
//! # Lifecycle
//!
//! ```text
//! load_texture(path) ──► Pending (1x1 placeholder) ──decode_pending──► Ready
//!                                                   └─(decode error)──► Failed (placeholder kept)
//! ```
//!
//! Decoding is cooperative: [`TextureStore::decode_pending`] processes a
//! bounded number of requests per call and is driven once per frame. When a
//! new scene is loaded the store starts a new generation; textures belonging
//! only to older generations are discarded, pending or not.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::assets::io::AssetSource;
use crate::errors::{Result, ViewerError};

new_key_type! {
    /// Handle to a 2D or cube texture owned by a [`TextureStore`].
    pub struct TextureHandle;
}

/// Pixel value shown while a texture is still decoding.
pub const PLACEHOLDER_PIXEL: [u8; 4] = [255, 255, 255, 255];

/// Loader seam consumed by the MTL parser and the skybox.
///
/// Returned handles are valid and bindable immediately; visible content may lag.
pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> TextureHandle;

    fn load_cube_texture(&mut self, faces: [PathBuf; 6]) -> TextureHandle;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureSource {
    Image(PathBuf),
    Cube(Box<[PathBuf; 6]>),
}

/// Decoded RGBA8 pixels. Cube maps store six equally sized layers back to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub layers: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    fn placeholder(layers: u32) -> Self {
        Self {
            width: 1,
            height: 1,
            layers,
            rgba: PLACEHOLDER_PIXEL.repeat(layers as usize),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct Texture {
    pub source: TextureSource,
    state: TextureState,
    data: TextureData,
    generation: u64,
    /// Survives generation changes (viewer-owned textures such as the skybox).
    pinned: bool,
    /// Bumped whenever `data` changes so a renderer can re-upload.
    version: u64,
}

impl Texture {
    fn new(source: TextureSource, generation: u64) -> Self {
        let layers = match source {
            TextureSource::Image(_) => 1,
            TextureSource::Cube(_) => 6,
        };
        Self {
            source,
            state: TextureState::Pending,
            data: TextureData::placeholder(layers),
            generation,
            pinned: false,
            version: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> TextureState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == TextureState::Ready
    }

    /// Current pixels: the placeholder until decoding succeeds.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &TextureData {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug, Default)]
pub struct TextureStore {
    map: SlotMap<TextureHandle, Texture>,
    lookup: FxHashMap<TextureSource, TextureHandle>,
    pending: VecDeque<TextureHandle>,
    generation: u64,
}

impl TextureStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation and returns its id. Textures requested from
    /// now on (including re-requests of existing paths) belong to it.
    pub fn begin_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        self.map.get(handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn request(&mut self, source: TextureSource) -> TextureHandle {
        if let Some(&handle) = self.lookup.get(&source)
            && let Some(texture) = self.map.get_mut(handle)
        {
            texture.generation = self.generation;
            return handle;
        }

        let handle = self.map.insert(Texture::new(source.clone(), self.generation));
        self.lookup.insert(source, handle);
        self.pending.push_back(handle);
        handle
    }

    /// Decodes up to `budget` pending textures. Returns how many were processed.
    ///
    /// Decode failures are logged and leave the placeholder in place.
    pub fn decode_pending(&mut self, source: &dyn AssetSource, budget: usize) -> usize {
        let mut processed = 0;
        while processed < budget {
            let Some(handle) = self.pending.pop_front() else {
                break;
            };
            let Some(texture) = self.map.get_mut(handle) else {
                continue;
            };

            let decoded = match &texture.source {
                TextureSource::Image(path) => decode_image(source, path),
                TextureSource::Cube(faces) => decode_cube(source, faces),
            };

            match decoded {
                Ok(data) => {
                    log::debug!(
                        "Texture ready: {:?} ({}x{}x{})",
                        texture.source,
                        data.width,
                        data.height,
                        data.layers
                    );
                    texture.data = data;
                    texture.state = TextureState::Ready;
                    texture.version += 1;
                }
                Err(e) => {
                    log::warn!("Texture decode failed for {:?}: {e}", texture.source);
                    texture.state = TextureState::Failed;
                }
            }
            processed += 1;
        }
        processed
    }

    /// Keeps `handle` alive across scene loads. Returns false for a stale handle.
    pub fn pin(&mut self, handle: TextureHandle) -> bool {
        match self.map.get_mut(handle) {
            Some(texture) => {
                texture.pinned = true;
                true
            }
            None => false,
        }
    }

    /// Releases a pin so the texture can be discarded with its generation.
    pub fn unpin(&mut self, handle: TextureHandle) {
        if let Some(texture) = self.map.get_mut(handle) {
            texture.pinned = false;
        }
    }

    /// Drops every unpinned texture last requested before `generation`,
    /// together with its queued decode.
    pub fn discard_before(&mut self, generation: u64) {
        self.map
            .retain(|_, texture| texture.pinned || texture.generation >= generation);
        let map = &self.map;
        self.lookup.retain(|_, handle| map.contains_key(*handle));
        self.pending.retain(|handle| map.contains_key(*handle));
    }
}

impl TextureLoader for TextureStore {
    fn load_texture(&mut self, path: &Path) -> TextureHandle {
        self.request(TextureSource::Image(path.to_path_buf()))
    }

    fn load_cube_texture(&mut self, faces: [PathBuf; 6]) -> TextureHandle {
        self.request(TextureSource::Cube(Box::new(faces)))
    }
}

fn decode_image(source: &dyn AssetSource, path: &Path) -> Result<TextureData> {
    let bytes = source.read_bytes(path)?;
    let img = image::load_from_memory(&bytes)?;
    let (width, height) = img.dimensions();
    Ok(TextureData {
        width,
        height,
        layers: 1,
        rgba: img.into_rgba8().into_raw(),
    })
}

fn decode_cube(source: &dyn AssetSource, faces: &[PathBuf; 6]) -> Result<TextureData> {
    let mut combined = Vec::new();
    let mut size: Option<(u32, u32)> = None;

    for path in faces {
        let face = decode_image(source, path)?;
        match size {
            None => size = Some((face.width, face.height)),
            Some(dims) if dims != (face.width, face.height) => {
                return Err(ViewerError::InvalidTexture(format!(
                    "cube face {} is {}x{}, expected {}x{}",
                    path.display(),
                    face.width,
                    face.height,
                    dims.0,
                    dims.1
                )));
            }
            Some(_) => {}
        }
        combined.extend_from_slice(&face.rgba);
    }

    let (width, height) = size.unwrap_or((0, 0));
    Ok(TextureData {
        width,
        height,
        layers: 6,
        rgba: combined,
    })
}
