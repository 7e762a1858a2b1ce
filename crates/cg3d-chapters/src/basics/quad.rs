//! Quad geometry shared by the indexed chapters.
//!
//! Four unique corners, two counter-clockwise triangles reusing them through
//! an index list.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use cg3d_engine::render::{AttributeLayout, VertexAttribute};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, color, uv }
    }
}

pub const POSITION_LOCATION: u32 = 0;
pub const COLOR_LOCATION: u32 = 1;
pub const UV_LOCATION: u32 = 2;

pub const VERTEX_STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;

pub const QUAD_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute::float(POSITION_LOCATION, 3, 0),
    VertexAttribute::float(COLOR_LOCATION, 3, 12),
    VertexAttribute::float(UV_LOCATION, 2, 24),
];

pub const QUAD_LAYOUT: AttributeLayout<'static> = AttributeLayout {
    stride: VERTEX_STRIDE,
    attributes: &QUAD_ATTRIBUTES,
};

/// Bottom-left, bottom-right, top-right, top-left.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex::new([-1.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
    Vertex::new([1.0, -1.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
    Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
    Vertex::new([-1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0]),
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex data as the flat float array uploaded to the GPU.
pub fn vertex_floats(vertices: &[Vertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Index list length is not a multiple of 3.
    IncompleteTriangle { len: usize },
    /// `indices[position]` does not name a vertex.
    IndexOutOfRange { position: usize, index: u32, vertex_count: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::IncompleteTriangle { len } => {
                write!(f, "{len} indices do not form whole triangles")
            }
            GeometryError::IndexOutOfRange { position, index, vertex_count } => write!(
                f,
                "index {index} at position {position} is out of range for {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Checks that `indices` is a triangle list over `vertex_count` vertices.
pub fn validate_indices(indices: &[u32], vertex_count: usize) -> Result<(), GeometryError> {
    if indices.len() % 3 != 0 {
        return Err(GeometryError::IncompleteTriangle { len: indices.len() });
    }
    for (position, &index) in indices.iter().enumerate() {
        if index as usize >= vertex_count {
            return Err(GeometryError::IndexOutOfRange { position, index, vertex_count });
        }
    }
    Ok(())
}

/// Iterates the triangles of an index list; a trailing partial triangle is ignored.
pub fn triangles(indices: &[u32]) -> impl Iterator<Item = [u32; 3]> + '_ {
    indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
}

/// Twice the signed area of a triangle in the XY plane; positive means
/// counter-clockwise.
pub fn signed_area2(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── vertex data ───────────────────────────────────────────────────────

    #[test]
    fn quad_is_thirty_two_floats() {
        assert_eq!(vertex_floats(&QUAD_VERTICES).len(), 32);
        assert_eq!(VERTEX_STRIDE, 32);
    }

    #[test]
    fn float_array_is_position_color_uv_per_vertex() {
        let floats = vertex_floats(&QUAD_VERTICES);
        assert_eq!(&floats[..8], &[-1.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(&floats[24..], &[-1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn uv_follows_position() {
        for v in QUAD_VERTICES {
            assert_eq!(v.uv[0], (v.position[0] + 1.0) / 2.0);
            assert_eq!(v.uv[1], (v.position[1] + 1.0) / 2.0);
        }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn attribute_offsets_match_struct_fields() {
        assert_eq!(QUAD_ATTRIBUTES[0].offset, std::mem::offset_of!(Vertex, position) as u64);
        assert_eq!(QUAD_ATTRIBUTES[1].offset, std::mem::offset_of!(Vertex, color) as u64);
        assert_eq!(QUAD_ATTRIBUTES[2].offset, std::mem::offset_of!(Vertex, uv) as u64);
    }

    #[test]
    fn quad_layout_is_valid() {
        assert!(QUAD_LAYOUT.validate().is_ok());
        let last = QUAD_ATTRIBUTES[2];
        assert_eq!(last.offset + last.byte_len(), QUAD_LAYOUT.stride);
    }

    // ── indices ───────────────────────────────────────────────────────────

    #[test]
    fn quad_indices_are_in_range() {
        assert_eq!(validate_indices(&QUAD_INDICES, QUAD_VERTICES.len()), Ok(()));
    }

    #[test]
    fn every_vertex_is_referenced() {
        for v in 0..QUAD_VERTICES.len() as u32 {
            assert!(QUAD_INDICES.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn triangles_share_the_diagonal() {
        let tris: Vec<_> = triangles(&QUAD_INDICES).collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn triangles_are_counter_clockwise() {
        for [a, b, c] in triangles(&QUAD_INDICES) {
            let p = |i: u32| QUAD_VERTICES[i as usize].position;
            assert!(signed_area2(p(a), p(b), p(c)) > 0.0);
        }
    }

    #[test]
    fn out_of_range_index_is_reported() {
        assert_eq!(
            validate_indices(&[0, 1, 4], 4),
            Err(GeometryError::IndexOutOfRange { position: 2, index: 4, vertex_count: 4 })
        );
    }

    #[test]
    fn partial_triangle_is_rejected() {
        assert_eq!(
            validate_indices(&[0, 1], 4),
            Err(GeometryError::IncompleteTriangle { len: 2 })
        );
    }
}
