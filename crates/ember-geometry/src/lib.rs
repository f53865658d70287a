//! CPU-side mesh generation for the Ember scene.
//!
//! Provides the icosphere builder (geodesic subdivision of an icosahedron),
//! the flat background quad, and the shared mesh data model. No GPU types
//! appear here; `ember-render` owns the upload path.

pub mod error;
pub mod icosphere;
pub mod mesh;
pub mod quad;

pub use error::GeometryError;
pub use icosphere::{Icosphere, MAX_SUBDIVISIONS};
pub use mesh::{Mesh, Vertex, triangle_count_for_level, vertex_count_for_level};
pub use quad::background_quad;
