//! Wavefront OBJ Loader
//!
//! Parses the `v`, `vt`, `vn`, `f`, `mtllib` and `usemtl` records of an OBJ
//! file into a single indexed [`Mesh`] plus the material it is drawn with.
//!
//! # Pipeline
//!
//! 1. **Scan**: collect raw attribute streams and the per-face-vertex
//!    position/uv/normal index streams. Quads are split into the triangles
//!    `(0, 1, 3)` and `(1, 2, 3)`.
//! 2. **Normalize**: remap every position scalar into `[-1, 1]` using the
//!    minimum and maximum over all three axes pooled together.
//! 3. **Resolve**: deduplicate `(position, normal, uv)` index triples into one
//!    output vertex each and rewrite the triangle list against them.
//! 4. **Tangents**: for textured materials, one tangent per triangle is written
//!    to all three of its vertices (later triangles overwrite earlier ones).
//!
//! `usemtl` with a name the material library does not define keeps the
//! current material. This leniency is intentional.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Vec2, Vec3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::mtl::{MaterialLibrary, MtlLoader, parse_scalar};
use super::{LoadedModel, ModelLoader};
use crate::assets::io::{AssetSource, parent_dir, resolve_relative};
use crate::assets::storage::TextureLoader;
use crate::errors::{Result, ViewerError};
use crate::resources::{Material, Mesh};

/// Sentinel for "attribute not referenced" inside a dedup key.
const ABSENT: u32 = u32::MAX;

/// One `i[/t[/n]]` entry of a face record, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceVertex {
    position: u32,
    uv: Option<u32>,
    normal: Option<u32>,
}

/// Explicit parser state threaded through one OBJ parse.
#[derive(Debug, Default)]
struct ObjState {
    positions: Vec<f32>,
    uvs: Vec<f32>,
    normals: Vec<f32>,

    position_indices: Vec<u32>,
    uv_indices: Vec<u32>,
    normal_indices: Vec<u32>,

    materials: MaterialLibrary,
    current_material: Option<Arc<Material>>,
}

pub struct ObjLoader<'a> {
    source: &'a dyn AssetSource,
    textures: &'a mut dyn TextureLoader,
    /// Directory that model paths given to [`ModelLoader::load_model`] are relative to.
    base_dir: PathBuf,
}

impl<'a> ObjLoader<'a> {
    pub fn new(source: &'a dyn AssetSource, textures: &'a mut dyn TextureLoader) -> Self {
        Self {
            source,
            textures,
            base_dir: PathBuf::new(),
        }
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn load(&mut self, path: &Path) -> Result<LoadedModel> {
        let text = self.source.read_to_string(path)?;
        let model = self.parse(&text, &parent_dir(path))?;
        log::info!(
            "Loaded OBJ {}: {} vertices, {} triangles, material '{}'",
            path.display(),
            model.mesh.vertex_count(),
            model.mesh.index_count() / 3,
            model.material.name
        );
        Ok(model)
    }

    /// Parses OBJ text; `mtllib` references resolve against `base_dir`.
    pub fn parse(&mut self, text: &str, base_dir: &Path) -> Result<LoadedModel> {
        let mut state = ObjState::default();

        for (line_no, line) in text.lines().enumerate() {
            let line_no = line_no + 1;
            let mut tokens = line.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };

            match keyword {
                "v" => push_floats(&mut state.positions, &mut tokens, 3, line_no)?,
                "vt" => push_floats(&mut state.uvs, &mut tokens, 2, line_no)?,
                "vn" => push_floats(&mut state.normals, &mut tokens, 3, line_no)?,
                "f" => {
                    let face = parse_face(tokens, line_no)?;
                    state.push_face(&face);
                }
                "mtllib" => {
                    if let Some(file) = tokens.next() {
                        let path = resolve_relative(base_dir, file);
                        let library = MtlLoader::new(&mut *self.textures).load(self.source, &path)?;
                        state.materials.extend(library);
                    }
                }
                "usemtl" => {
                    let name = tokens.next().unwrap_or_default();
                    match state.materials.get(name) {
                        Some(material) => state.current_material = Some(material.clone()),
                        None => log::debug!("usemtl '{name}' on line {line_no} is not defined; keeping current material"),
                    }
                }
                _ => {}
            }
        }

        state.finish()
    }
}

impl ModelLoader for ObjLoader<'_> {
    fn load_model(&mut self, path: &str) -> Result<LoadedModel> {
        let path = resolve_relative(&self.base_dir, path);
        self.load(&path)
    }
}

impl ObjState {
    fn push_face(&mut self, face: &[FaceVertex]) {
        let order: &[usize] = if face.len() == 4 {
            &[0, 1, 3, 1, 2, 3]
        } else {
            &[0, 1, 2]
        };
        for &i in order {
            let v = face[i];
            self.position_indices.push(v.position);
            if let Some(uv) = v.uv {
                self.uv_indices.push(uv);
            }
            if let Some(normal) = v.normal {
                self.normal_indices.push(normal);
            }
        }
    }

    fn finish(mut self) -> Result<LoadedModel> {
        let material = self
            .current_material
            .take()
            .unwrap_or_else(|| Arc::new(Material::fallback()));
        let textured = material.has_texture();

        if textured && self.uvs.is_empty() {
            return Err(ViewerError::MissingTexCoords {
                material: material.name.clone(),
            });
        }

        normalize_positions(&mut self.positions);

        let mut mesh = self.resolve(textured)?;
        if textured {
            let (tangents, degenerate) = compute_tangents(&mesh);
            if degenerate > 0 {
                log::warn!("{degenerate} triangles have degenerate texture coordinates; their tangents are not finite");
            }
            mesh.tangents = Some(tangents);
        }

        Ok(LoadedModel {
            mesh: Arc::new(mesh),
            material,
        })
    }

    /// Rewrites the independent index streams into one deduplicated vertex set.
    fn resolve(&self, textured: bool) -> Result<Mesh> {
        let count = self.position_indices.len();
        let has_uv_stream = !self.uv_indices.is_empty();
        let has_normal_stream = !self.normal_indices.is_empty();

        if (has_uv_stream && self.uv_indices.len() != count)
            || (has_normal_stream && self.normal_indices.len() != count)
        {
            return Err(ViewerError::IndexCountMismatch {
                positions: count,
                normals: self.normal_indices.len(),
                uvs: self.uv_indices.len(),
            });
        }

        let position_len = self.positions.len() / 3;
        let normal_len = self.normals.len() / 3;
        let uv_len = self.uvs.len() / 2;

        let mut lookup: FxHashMap<(u32, u32, u32), u32> = FxHashMap::default();
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut uvs = Vec::new();
        let mut indices = Vec::with_capacity(count);

        for i in 0..count {
            let p = self.position_indices[i];
            let n = if has_normal_stream { self.normal_indices[i] } else { ABSENT };
            let t = if has_uv_stream { self.uv_indices[i] } else { ABSENT };

            let key = (p, n, t);
            let index = if let Some(&existing) = lookup.get(&key) {
                existing
            } else {
                let new_index = (positions.len() / 3) as u32;

                let p = checked(p, position_len, "position")?;
                positions.extend_from_slice(&self.positions[p * 3..p * 3 + 3]);

                if n == ABSENT {
                    normals.extend_from_slice(&[0.0; 3]);
                } else {
                    let n = checked(n, normal_len, "normal")?;
                    normals.extend_from_slice(&self.normals[n * 3..n * 3 + 3]);
                }

                if t == ABSENT {
                    uvs.extend_from_slice(&[0.0; 2]);
                } else {
                    let t = checked(t, uv_len, "texture coordinate")?;
                    uvs.extend_from_slice(&self.uvs[t * 2..t * 2 + 2]);
                }

                lookup.insert(key, new_index);
                new_index
            };
            indices.push(index);
        }

        let mut mesh = Mesh {
            positions,
            normals,
            tangents: None,
            uvs: textured.then_some(uvs),
            indices,
        };

        if !has_normal_stream {
            mesh.compute_vertex_normals();
        }
        Ok(mesh)
    }
}

fn checked(index: u32, len: usize, kind: &'static str) -> Result<usize> {
    let index = index as usize;
    if index < len {
        Ok(index)
    } else {
        Err(ViewerError::IndexOutOfRange {
            kind,
            index: index as i64 + 1,
            len,
        })
    }
}

fn push_floats<'t>(
    out: &mut Vec<f32>,
    tokens: &mut impl Iterator<Item = &'t str>,
    count: usize,
    line: usize,
) -> Result<()> {
    for _ in 0..count {
        out.push(parse_scalar(tokens.next(), line)?);
    }
    Ok(())
}

fn parse_face<'t>(tokens: impl Iterator<Item = &'t str>, line: usize) -> Result<SmallVec<[FaceVertex; 4]>> {
    let mut face = SmallVec::new();
    for token in tokens {
        let mut parts = token.split('/');
        let position = parse_index(parts.next(), "position", line)?
            .ok_or_else(|| ViewerError::InvalidNumber {
                line,
                token: token.to_string(),
            })?;
        let uv = parse_index(parts.next(), "texture coordinate", line)?;
        let normal = parse_index(parts.next(), "normal", line)?;
        face.push(FaceVertex { position, uv, normal });
    }

    if !(3..=4).contains(&face.len()) {
        return Err(ViewerError::MalformedFace {
            line,
            count: face.len(),
        });
    }
    Ok(face)
}

/// Parses a 1-based index into a 0-based one. Empty components are absent.
fn parse_index(part: Option<&str>, kind: &'static str, line: usize) -> Result<Option<u32>> {
    let Some(part) = part.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    let value: i64 = part.parse().map_err(|_| ViewerError::InvalidNumber {
        line,
        token: part.to_string(),
    })?;
    // Relative (negative) indices are not supported.
    if value < 1 {
        return Err(ViewerError::NonPositiveIndex {
            kind,
            index: value,
            line,
        });
    }
    let Ok(index) = u32::try_from(value - 1) else {
        return Err(ViewerError::InvalidNumber {
            line,
            token: part.to_string(),
        });
    };
    Ok(Some(index))
}

/// Uniform remap of every scalar into `[-1, 1]`, preserving aspect ratio.
fn normalize_positions(positions: &mut [f32]) {
    let (min, max) = positions
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let extent = max - min;
    if !(extent > 0.0 && extent.is_finite()) {
        log::warn!("Model positions have zero extent; skipping normalization");
        return;
    }
    for v in positions {
        *v = 2.0 * ((*v - min) / extent) - 1.0;
    }
}

/// Per-triangle tangents written to each corner. Returns the tangent array and
/// the number of triangles whose UV determinant was zero.
fn compute_tangents(mesh: &Mesh) -> (Vec<f32>, usize) {
    let mut tangents = vec![0.0; mesh.positions.len()];
    let Some(uvs) = &mesh.uvs else {
        return (tangents, 0);
    };
    let uv = |i: usize| Vec2::from_slice(&uvs[i * 2..i * 2 + 2]);
    let mut degenerate = 0;

    for tri in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];

        let dpos1 = mesh.position(i1) - mesh.position(i0);
        let dpos2 = mesh.position(i2) - mesh.position(i0);
        let duv1 = uv(i1) - uv(i0);
        let duv2 = uv(i2) - uv(i0);

        let det = duv1.x * duv2.y - duv1.y * duv2.x;
        if det == 0.0 {
            degenerate += 1;
        }
        let r = 1.0 / det;
        let tangent: Vec3 = (dpos1 * duv2.y - dpos2 * duv1.y) * r;

        for i in [i0, i1, i2] {
            tangents[i * 3..i * 3 + 3].copy_from_slice(&tangent.to_array());
        }
    }
    (tangents, degenerate)
}
