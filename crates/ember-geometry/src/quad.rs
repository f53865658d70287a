//! The flat background quad.

use glam::Vec3;

use crate::mesh::{Mesh, Vertex};

/// Build the background quad: two triangles spanning ±1 in X/Y around
/// `center`, facing +Z.
///
/// The flat material draws this quad directly in clip space, so the ±1
/// extent covers the whole viewport regardless of camera state.
pub fn background_quad(center: Vec3) -> Mesh {
    let normal = Vec3::Z;
    let corners = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ];

    Mesh {
        vertices: corners
            .iter()
            .map(|&c| Vertex::new(c + center, normal))
            .collect(),
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_has_two_triangles() {
        let quad = background_quad(Vec3::ZERO);
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.triangle_count(), 2);
        assert!(quad.is_well_formed());
    }

    #[test]
    fn test_quad_spans_clip_extent() {
        let quad = background_quad(Vec3::ZERO);
        let xs: Vec<f32> = quad.vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = quad.vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), -1.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 1.0);
    }

    #[test]
    fn test_quad_normals_face_forward() {
        let quad = background_quad(Vec3::ZERO);
        for v in &quad.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }
}
