//! # Error Types
//!
//! Error types for GLB export and inspection.
//!
//! ## Error Policy
//!
//! - An empty mesh is an error, never a zero-length or partial buffer
//! - Numeric problems are reported with the offending vertex index

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while writing or reading a GLB container.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The mesh has no vertices or no faces.
    #[error("mesh is empty ({vertices} vertices, {faces} faces)")]
    EmptyMesh {
        /// Vertex count of the rejected mesh.
        vertices: usize,
        /// Face count of the rejected mesh.
        faces: usize,
    },

    /// A vertex coordinate is NaN or infinite (or overflows f32).
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteVertex {
        /// Index of the vertex in the source mesh.
        index: usize,
    },

    /// The expanded vertex stream does not fit 32-bit indices.
    #[error("too many vertices for 32-bit indices: {count}")]
    TooManyVertices {
        /// Number of emitted vertices.
        count: usize,
    },

    /// The binary chunk outgrows the 32-bit offsets GLB uses.
    #[error("binary buffer too large for GLB: {bytes} bytes")]
    BufferTooLarge {
        /// Byte offset or length that overflowed.
        bytes: usize,
    },

    /// The scene description could not be (de)serialized.
    #[error("glTF JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The bytes are not a well-formed GLB container.
    #[error("invalid GLB container: {0}")]
    InvalidContainer(String),
}

impl ExportError {
    /// Creates an invalid container error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidContainer(message.into())
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for GLB operations.
pub type ExportResult<T> = Result<T, ExportError>;

// =============================================================================
// TESTS
// =============================================================================
