//! # Mesh Errors
//!
//! Error types for mesh construction.

use thiserror::Error;

/// Errors raised when a [`Mesh`](crate::Mesh) would violate its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    /// A face has fewer than three vertices.
    #[error("face {face} has {arity} vertices (at least 3 required)")]
    DegenerateFace { face: usize, arity: usize },

    /// Color records do not line up with the element they are bound to.
    #[error("{color_count} colors cannot be bound per {binding} to {element_count} elements")]
    ColorCountMismatch {
        binding: &'static str,
        color_count: usize,
        element_count: usize,
    },

    /// More vertices than a `u32` face index can address.
    #[error("too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },
}

/// Result type alias for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;
