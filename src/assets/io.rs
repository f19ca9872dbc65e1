use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::{Result, ViewerError};

/// Asset source trait.
///
/// The viewer core never touches the filesystem directly; models, materials,
/// scene descriptions and texture images are all read through this seam.
pub trait AssetSource {
    /// Reads the raw bytes behind `path`.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Reads `path` as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read_bytes(path)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Local file source rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root_path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl AssetSource for FileSource {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let full = self.root_path.join(path);
        std::fs::read(&full).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ViewerError::AssetNotFound(full.display().to_string())
            } else {
                ViewerError::Io(e)
            }
        })
    }
}

/// In-memory source keyed by normalized relative path.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: FxHashMap<PathBuf, Vec<u8>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file, replacing any previous content at the same path.
    pub fn insert(&mut self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(normalize(path.as_ref()), bytes.into());
    }

    /// Chainable variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(&normalize(path.as_ref()))
    }
}

impl AssetSource for MemorySource {
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| ViewerError::AssetNotFound(path.display().to_string()))
    }
}

/// Directory containing `path`, used to resolve sibling references
/// (`mtllib`, `map_Kd`, ...).
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Joins a reference found inside an asset onto that asset's directory.
#[must_use]
pub fn resolve_relative(base_dir: &Path, reference: &str) -> PathBuf {
    normalize(&base_dir.join(reference))
}

/// Collapses `.` and `a/..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
