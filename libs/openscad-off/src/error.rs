//! # OFF Errors
//!
//! Error types for the OFF mesh reader.
//!
//! ## Example
//!
//! ```rust
//! use openscad_off::{parse_off, OffErrorKind};
//!
//! let err = parse_off("OFF\n4 1 0\n0 0 0\n").unwrap_err();
//! assert_eq!(err.line, 3);
//! assert!(matches!(err.kind, OffErrorKind::UnexpectedEof { .. }));
//! ```

use std::fmt;

use openscad_mesh::MeshError;
use thiserror::Error;

/// Longest excerpt of the offending line kept in an error.
const EXCERPT_LEN: usize = 80;

// =============================================================================
// OFF ERROR
// =============================================================================

/// A malformed-mesh error with the 1-based line it was found on.
#[derive(Debug, Clone, PartialEq)]
pub struct OffError {
    /// Line number (1-based) of the offending input line.
    pub line: usize,
    /// Error kind with details.
    pub kind: OffErrorKind,
    /// Excerpt of the offending line, empty at end of input.
    pub text: String,
}

impl OffError {
    /// Create a new error for a line.
    pub fn new(line: usize, kind: OffErrorKind, text: &str) -> Self {
        let text = match text.char_indices().nth(EXCERPT_LEN) {
            Some((cut, _)) => format!("{}...", &text[..cut]),
            None => text.to_string(),
        };
        Self { line, kind, text }
    }

    /// Create an error that is not tied to any line content.
    pub fn at(line: usize, kind: OffErrorKind) -> Self {
        Self {
            line,
            kind,
            text: String::new(),
        }
    }
}

impl fmt::Display for OffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)?;
        if !self.text.is_empty() {
            write!(f, " near {:?}", self.text)?;
        }
        Ok(())
    }
}

impl std::error::Error for OffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            OffErrorKind::InvalidMesh(err) => Some(err),
            _ => None,
        }
    }
}

// =============================================================================
// OFF ERROR KIND
// =============================================================================

/// Kinds of OFF reader errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OffErrorKind {
    /// The file does not start with `OFF`, `COFF`, or a count line.
    #[error("expected OFF header, found '{found}'")]
    MissingHeader { found: String },

    /// The count line is missing values or holds non-integers.
    #[error("invalid element counts: {details}")]
    InvalidCount { details: String },

    /// A token could not be parsed as a number.
    #[error("invalid number '{text}'")]
    InvalidNumber { text: String },

    /// The line holds fewer tokens than its arity requires.
    #[error("expected at least {expected} values, found {found}")]
    TooFewTokens { expected: usize, found: usize },

    /// Trailing values that are neither absent nor a 3/4-component color.
    #[error("{count} trailing values (expected none, 3 or 4 color components)")]
    UnexpectedTokens { count: usize },

    /// A face with fewer than three vertices.
    #[error("face has {arity} vertices (at least 3 required)")]
    DegenerateFace { arity: usize },

    /// A face index past the declared vertex count.
    #[error("vertex index {index} out of range (mesh has {vertex_count} vertices)")]
    IndexOutOfRange { index: u64, vertex_count: usize },

    /// Colors present on some but not all elements, or on both kinds.
    #[error("inconsistent colors: {details}")]
    ColorCoverage { details: String },

    /// A negative or non-finite color component.
    #[error("invalid color component {value}")]
    InvalidColor { value: f32 },

    /// The input ended before the declared counts were satisfied.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// The parsed data was rejected by the mesh model.
    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] MeshError),
}

/// Result type alias for OFF reading.
pub type OffResult<T> = Result<T, OffError>;

// =============================================================================
// TESTS
// =============================================================================
