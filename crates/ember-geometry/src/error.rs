//! Geometry error types.

/// Errors produced when mesh generation parameters are invalid.
///
/// Generation fails fast: no partial mesh is ever returned, so a caller that
/// holds an old mesh can keep it unchanged on failure.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// Radius must be a finite, strictly positive value.
    #[error("invalid sphere radius {0} (must be finite and > 0)")]
    InvalidRadius(f32),

    /// Every component of the center must be finite.
    #[error("non-finite sphere center ({0}, {1}, {2})")]
    NonFiniteCenter(f32, f32, f32),

    /// Subdivision level outside the supported range.
    #[error("subdivision level {0} exceeds maximum {max}", max = crate::MAX_SUBDIVISIONS)]
    LevelOutOfRange(u32),
}
