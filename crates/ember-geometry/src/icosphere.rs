//! Geodesic icosphere generation.
//!
//! Starts from the golden-ratio icosahedron and repeatedly splits every face
//! into four, re-projecting new edge midpoints onto the unit sphere. Midpoints
//! are deduplicated across the two faces sharing an edge, so the result is a
//! manifold mesh with exact vertex counts (10·4^level + 2) and smooth shared
//! normals. Construction order is deterministic: identical inputs yield
//! identical vertex and index streams.

use std::collections::HashMap;

use glam::Vec3;

use crate::error::GeometryError;
use crate::mesh::{Mesh, Vertex};

/// Highest supported subdivision level.
///
/// Level 8 is ~1.3M triangles; a rebuild stays well under a frame budget, but
/// anything deeper serves no visual purpose at this scene's scale.
pub const MAX_SUBDIVISIONS: u32 = 8;

/// An icosphere drawable: the generated mesh plus its generating parameters.
///
/// Replaced wholesale whenever the subdivision level changes; never mutated
/// in place.
#[derive(Clone, Debug)]
pub struct Icosphere {
    pub mesh: Mesh,
    pub center: Vec3,
    pub radius: f32,
    pub level: u32,
}

impl Icosphere {
    /// Build an icosphere of the given radius around `center`, subdivided
    /// `level` times.
    ///
    /// Fails fast on a non-positive or non-finite radius, a non-finite
    /// center, or a level above [`MAX_SUBDIVISIONS`]; no partial mesh is
    /// produced on failure.
    pub fn build(center: Vec3, radius: f32, level: u32) -> Result<Self, GeometryError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(GeometryError::NonFiniteCenter(center.x, center.y, center.z));
        }
        if level > MAX_SUBDIVISIONS {
            return Err(GeometryError::LevelOutOfRange(level));
        }

        let (mut positions, mut indices) = icosahedron();

        for _ in 0..level {
            subdivide(&mut positions, &mut indices);
        }

        // Unit-sphere direction is the normal; scale and translate afterwards.
        let vertices = positions
            .iter()
            .map(|&dir| Vertex::new(dir * radius + center, dir))
            .collect();

        Ok(Self {
            mesh: Mesh { vertices, indices },
            center,
            radius,
            level,
        })
    }
}

/// The 12 vertices and 20 faces of a regular icosahedron, vertices normalized
/// onto the unit sphere. Winding is outward-facing counter-clockwise.
fn icosahedron() -> (Vec<Vec3>, Vec<u32>) {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions = vec![
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];
    for p in &mut positions {
        *p = p.normalize();
    }

    let indices = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    (positions, indices)
}

/// One subdivision round: split each triangle into four using normalized edge
/// midpoints. An edge is keyed by its unordered endpoint pair so the midpoint
/// shared by two adjacent faces is created exactly once.
fn subdivide(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut midpoint_cache: HashMap<(u32, u32), u32> = HashMap::new();
    let mut new_indices = Vec::with_capacity(indices.len() * 4);

    let mut midpoint = |a: u32, b: u32, pos: &mut Vec<Vec3>| -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&idx) = midpoint_cache.get(&key) {
            return idx;
        }
        // Re-project onto the sphere: this is what makes the result geodesic
        // rather than a flat subdivision.
        let mid = (pos[a as usize] + pos[b as usize]).normalize();
        let idx = pos.len() as u32;
        pos.push(mid);
        midpoint_cache.insert(key, idx);
        idx
    };

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);

        new_indices.extend_from_slice(&[a, ab, ca]);
        new_indices.extend_from_slice(&[b, bc, ab]);
        new_indices.extend_from_slice(&[c, ca, bc]);
        new_indices.extend_from_slice(&[ab, bc, ca]);
    }

    *indices = new_indices;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{triangle_count_for_level, vertex_count_for_level};

    #[test]
    fn test_level_zero_is_bare_icosahedron() {
        let sphere = Icosphere::build(Vec3::ZERO, 1.0, 0).unwrap();
        assert_eq!(sphere.mesh.vertices.len(), 12);
        assert_eq!(sphere.mesh.triangle_count(), 20);
    }

    #[test]
    fn test_level_one_counts() {
        let sphere = Icosphere::build(Vec3::ZERO, 1.0, 1).unwrap();
        assert_eq!(sphere.mesh.vertices.len(), 42);
        assert_eq!(sphere.mesh.triangle_count(), 80);
    }

    #[test]
    fn test_counts_match_formula_for_all_levels() {
        // The exact dedup formula already fails if any midpoint repeats.
        for level in 0..=7 {
            let sphere = Icosphere::build(Vec3::ZERO, 1.0, level).unwrap();
            assert_eq!(
                sphere.mesh.vertices.len(),
                vertex_count_for_level(level),
                "vertex count mismatch at level {level}"
            );
            assert_eq!(
                sphere.mesh.triangle_count(),
                triangle_count_for_level(level),
                "triangle count mismatch at level {level}"
            );
        }
    }

    #[test]
    fn test_all_vertices_on_sphere_surface() {
        let center = Vec3::new(0.0, 0.09, 0.0);
        let radius = 1.0;
        let sphere = Icosphere::build(center, radius, 3).unwrap();
        for v in &sphere.mesh.vertices {
            let dist = (Vec3::from(v.position) - center).length();
            assert!(
                (dist - radius).abs() < 1e-5,
                "vertex at distance {dist} from center, expected {radius}"
            );
        }
    }

    #[test]
    fn test_normals_are_unit_radial_directions() {
        let center = Vec3::new(1.0, -2.0, 3.0);
        let radius = 2.5;
        let sphere = Icosphere::build(center, radius, 2).unwrap();
        for v in &sphere.mesh.vertices {
            let normal = Vec3::from(v.normal);
            assert!((normal.length() - 1.0).abs() < 1e-5);
            let radial = (Vec3::from(v.position) - center) / radius;
            assert!((normal - radial).length() < 1e-4);
        }
    }

    #[test]
    fn test_mesh_is_well_formed() {
        for level in 0..=3 {
            let sphere = Icosphere::build(Vec3::ZERO, 1.0, level).unwrap();
            assert!(sphere.mesh.is_well_formed(), "malformed mesh at level {level}");
        }
    }

    #[test]
    fn test_deterministic_construction() {
        let a = Icosphere::build(Vec3::ZERO, 1.0, 4).unwrap();
        let b = Icosphere::build(Vec3::ZERO, 1.0, 4).unwrap();
        assert_eq!(a.mesh, b.mesh);
    }

    #[test]
    fn test_radius_scales_positions() {
        let unit = Icosphere::build(Vec3::ZERO, 1.0, 1).unwrap();
        let scaled = Icosphere::build(Vec3::ZERO, 3.0, 1).unwrap();
        for (u, s) in unit.mesh.vertices.iter().zip(&scaled.mesh.vertices) {
            let expected = Vec3::from(u.position) * 3.0;
            assert!((Vec3::from(s.position) - expected).length() < 1e-5);
            // Normals are radius-independent.
            assert_eq!(u.normal, s.normal);
        }
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(matches!(
            Icosphere::build(Vec3::ZERO, 0.0, 1),
            Err(GeometryError::InvalidRadius(_))
        ));
        assert!(matches!(
            Icosphere::build(Vec3::ZERO, -1.0, 1),
            Err(GeometryError::InvalidRadius(_))
        ));
        assert!(matches!(
            Icosphere::build(Vec3::ZERO, f32::NAN, 1),
            Err(GeometryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_center() {
        assert!(matches!(
            Icosphere::build(Vec3::new(f32::INFINITY, 0.0, 0.0), 1.0, 1),
            Err(GeometryError::NonFiniteCenter(..))
        ));
    }

    #[test]
    fn test_rejects_level_above_maximum() {
        assert!(matches!(
            Icosphere::build(Vec3::ZERO, 1.0, MAX_SUBDIVISIONS + 1),
            Err(GeometryError::LevelOutOfRange(9))
        ));
    }

    #[test]
    fn test_max_level_is_accepted() {
        // Only verify it builds and the formula holds; the count at level 8
        // is 655_362 vertices.
        let sphere = Icosphere::build(Vec3::ZERO, 1.0, MAX_SUBDIVISIONS).unwrap();
        assert_eq!(
            sphere.mesh.vertices.len(),
            vertex_count_for_level(MAX_SUBDIVISIONS)
        );
        assert_eq!(
            sphere.mesh.triangle_count(),
            triangle_count_for_level(MAX_SUBDIVISIONS)
        );
    }
}
