//! Indexed triangle mesh data model shared by all drawables.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A single mesh vertex: position plus unit normal.
///
/// For a sphere the normal is the pre-scale unit direction from the center,
/// so shared vertices carry correct smooth normals for free.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Construct a vertex from glam vectors.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// An indexed triangle-list mesh.
///
/// Invariants maintained by the builders in this crate: every index is in
/// range, the index count is a multiple of 3, and no triangle repeats an
/// index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when every index refers to an existing vertex, the index count
    /// is a multiple of 3, and no triangle is degenerate.
    pub fn is_well_formed(&self) -> bool {
        if !self.indices.len().is_multiple_of(3) {
            return false;
        }
        let n = self.vertices.len() as u32;
        self.indices.chunks_exact(3).all(|tri| {
            tri.iter().all(|&i| i < n) && tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]
        })
    }
}

/// Vertex count of a geodesic sphere after `level` subdivision rounds.
///
/// Standard formula: 10·4^level + 2.
pub fn vertex_count_for_level(level: u32) -> usize {
    10 * 4usize.pow(level) + 2
}

/// Triangle count of a geodesic sphere after `level` subdivision rounds:
/// 20·4^level.
pub fn triangle_count_for_level(level: u32) -> usize {
    20 * 4usize.pow(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_pod_with_expected_size() {
        // position (f32×3) + normal (f32×3) = 24 bytes, no padding.
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_count_formulas_level_zero() {
        assert_eq!(vertex_count_for_level(0), 12);
        assert_eq!(triangle_count_for_level(0), 20);
    }

    #[test]
    fn test_count_formulas_level_one() {
        assert_eq!(vertex_count_for_level(1), 42);
        assert_eq!(triangle_count_for_level(1), 80);
    }

    #[test]
    fn test_well_formed_rejects_out_of_range_index() {
        let mesh = Mesh {
            vertices: vec![Vertex::new(Vec3::ZERO, Vec3::Z); 3],
            indices: vec![0, 1, 3],
        };
        assert!(!mesh.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_degenerate_triangle() {
        let mesh = Mesh {
            vertices: vec![Vertex::new(Vec3::ZERO, Vec3::Z); 3],
            indices: vec![0, 0, 1],
        };
        assert!(!mesh.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_partial_triangle() {
        let mesh = Mesh {
            vertices: vec![Vertex::new(Vec3::ZERO, Vec3::Z); 3],
            indices: vec![0, 1],
        };
        assert!(!mesh.is_well_formed());
    }
}
