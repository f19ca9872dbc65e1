use glam::Vec3;

use crate::resources::bounds::BoundingBox;

/// Float offsets of each attribute inside one interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Floats per vertex.
    pub stride: usize,
    pub position: usize,
    pub normal: usize,
    pub tangent: Option<usize>,
    pub uv: Option<usize>,
}

impl VertexLayout {
    #[inline]
    #[must_use]
    pub fn stride_bytes(&self) -> usize {
        self.stride * std::mem::size_of::<f32>()
    }
}

/// Indexed triangle (or line) data ready for upload.
///
/// Attribute arrays are index-aligned: vertex `i` owns `positions[3i..3i+3]`,
/// `normals[3i..3i+3]`, and, when present, `tangents[3i..3i+3]` and `uvs[2i..2i+2]`.
/// A mesh is immutable once produced by a loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub tangents: Option<Vec<f32>>,
    pub uvs: Option<Vec<f32>>,
    pub indices: Vec<u32>,
}

impl Mesh {
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[index * 3..index * 3 + 3])
    }

    #[must_use]
    pub fn layout(&self) -> VertexLayout {
        let mut stride = 6;
        let tangent = self.tangents.as_ref().map(|_| {
            let offset = stride;
            stride += 3;
            offset
        });
        let uv = self.uvs.as_ref().map(|_| {
            let offset = stride;
            stride += 2;
            offset
        });
        VertexLayout {
            stride,
            position: 0,
            normal: 3,
            tangent,
            uv,
        }
    }

    /// Interleaves the attribute arrays as position, normal, tangent, uv.
    #[must_use]
    pub fn interleaved(&self) -> Vec<f32> {
        let layout = self.layout();
        let count = self.vertex_count();
        let mut out = Vec::with_capacity(count * layout.stride);

        for i in 0..count {
            out.extend_from_slice(&self.positions[i * 3..i * 3 + 3]);
            out.extend_from_slice(&self.normals[i * 3..i * 3 + 3]);
            if let Some(tangents) = &self.tangents {
                out.extend_from_slice(&tangents[i * 3..i * 3 + 3]);
            }
            if let Some(uvs) = &self.uvs {
                out.extend_from_slice(&uvs[i * 2..i * 2 + 2]);
            }
        }
        out
    }

    /// Checks attribute alignment and index bounds.
    #[must_use]
    pub fn validate(&self) -> bool {
        let count = self.vertex_count();
        self.positions.len() % 3 == 0
            && self.normals.len() == self.positions.len()
            && self.tangents.as_ref().is_none_or(|t| t.len() == self.positions.len())
            && self.uvs.as_ref().is_none_or(|uv| uv.len() / 2 == count && uv.len() % 2 == 0)
            && self.indices.iter().all(|&i| (i as usize) < count)
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.positions.is_empty() {
            return None;
        }
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in self.positions.chunks_exact(3) {
            let p = Vec3::from_slice(p);
            min = min.min(p);
            max = max.max(p);
        }
        Some(BoundingBox { min, max })
    }

    /// Area-weighted smooth normals from the triangle list.
    pub fn compute_vertex_normals(&mut self) {
        let count = self.vertex_count();
        let mut normals = vec![Vec3::ZERO; count];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if i0 >= count || i1 >= count || i2 >= count {
                continue;
            }
            let v0 = self.position(i0);
            let v1 = self.position(i1);
            let v2 = self.position(i2);

            // |cross| is twice the triangle area
            let face_normal = (v1 - v0).cross(v2 - v0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        self.normals = normals
            .into_iter()
            .flat_map(|n| n.normalize_or_zero().to_array())
            .collect();
    }

    /// Twelve-edge line box spanning `[-scale, scale]`, used for light gizmos.
    #[must_use]
    pub fn wire_box(scale: Vec3) -> Self {
        const CORNERS: [[f32; 3]; 8] = [
            [1.0, 1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, 1.0],
            [1.0, -1.0, 1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, -1.0, 1.0],
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        for corner in CORNERS {
            let c = Vec3::from_array(corner);
            positions.extend_from_slice(&(c * scale).to_array());
            normals.extend_from_slice(&c.normalize().to_array());
        }

        Self {
            positions,
            normals,
            tangents: None,
            uvs: None,
            indices: vec![
                0, 1, 1, 3, 3, 2, 2, 0, //
                0, 4, 1, 5, 2, 6, 3, 7, //
                4, 5, 5, 7, 7, 6, 6, 4,
            ],
        }
    }

    /// Closed cube spanning `[-1, 1]` with triangles wound to face inward,
    /// for the skybox.
    #[must_use]
    pub fn inward_cube() -> Self {
        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        for i in 0..8u32 {
            let corner = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            positions.extend_from_slice(&corner.to_array());
            normals.extend_from_slice(&(-corner.normalize()).to_array());
        }

        Self {
            positions,
            normals,
            tangents: None,
            uvs: None,
            indices: vec![
                0, 2, 1, 1, 2, 3, // -z
                4, 5, 6, 5, 7, 6, // +z
                0, 4, 2, 2, 4, 6, // -x
                1, 3, 5, 3, 7, 5, // +x
                0, 1, 4, 1, 5, 4, // -y
                2, 6, 3, 3, 6, 7, // +y
            ],
        }
    }
}
