//! # Error Types
//!
//! Error taxonomy of a conversion request.
//!
//! ## Error Policy
//!
//! - Every variant knows the [`Stage`] it belongs to, so callers can log
//!   `stage` and `error` side by side
//! - Compiler diagnostics are carried verbatim
//! - Scratch-file cleanup failures never become a request error

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use openscad_glb::ExportError;
use openscad_off::OffError;
use pipeline_types::Stage;
use thiserror::Error;

// =============================================================================
// COMPILER FAILURE REASONS
// =============================================================================

/// Why a compiler run did not produce a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The run exceeded the configured wall-clock limit and was killed.
    TimedOut(Duration),
    /// The compiler exited unsuccessfully. `None` when killed by a signal.
    ExitStatus(Option<i32>),
    /// The compiler could not be started.
    SpawnFailed,
    /// The compiler exited successfully without writing the mesh file.
    MissingOutput,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::TimedOut(limit) => write!(f, "timed out after {limit:?}"),
            FailureReason::ExitStatus(Some(code)) => write!(f, "exit status {code}"),
            FailureReason::ExitStatus(None) => write!(f, "terminated by signal"),
            FailureReason::SpawnFailed => write!(f, "could not start compiler"),
            FailureReason::MissingOutput => write!(f, "no mesh written"),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can end a conversion request.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The source text was rejected before any work started.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The compiler failed or timed out.
    #[error("compilation failed ({reason}): {diagnostics}")]
    CompilationFailed {
        /// What went wrong with the subprocess.
        reason: FailureReason,
        /// Captured stderr, or stdout when stderr is empty.
        diagnostics: String,
    },

    /// The compiler's mesh output could not be parsed.
    #[error("malformed mesh: {0}")]
    MalformedMesh(#[from] OffError),

    /// The compiler produced a mesh without vertices or faces.
    #[error("the model produced no geometry ({vertices} vertices, {faces} faces)")]
    EmptyMesh {
        /// Parsed vertex count.
        vertices: usize,
        /// Parsed face count.
        faces: usize,
    },

    /// The mesh could not be encoded as GLB.
    #[error("export failed: {0}")]
    Export(#[source] ExportError),

    /// A scratch file could not be written or read.
    #[error("I/O failure in stage {stage} on {}: {source}", .path.display())]
    Io {
        /// Stage the request was working toward.
        stage: Stage,
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl ConversionError {
    /// Stage the request was working toward when it failed.
    ///
    /// # Examples
    /// ```
    /// use openscad_convert::ConversionError;
    /// use pipeline_types::Stage;
    ///
    /// let err = ConversionError::InvalidInput("empty".into());
    /// assert_eq!(err.stage(), Stage::Received);
    /// ```
    pub fn stage(&self) -> Stage {
        match self {
            ConversionError::InvalidInput(_) => Stage::Received,
            ConversionError::CompilationFailed { .. } => Stage::CompilerInvoked,
            ConversionError::MalformedMesh(_) | ConversionError::EmptyMesh { .. } => {
                Stage::MeshParsed
            }
            ConversionError::Export(_) => Stage::Exported,
            ConversionError::Io { stage, .. } => *stage,
        }
    }

    pub(crate) fn io(stage: Stage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConversionError::Io {
            stage,
            path: path.into(),
            source,
        }
    }
}

impl From<ExportError> for ConversionError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::EmptyMesh { vertices, faces } => {
                ConversionError::EmptyMesh { vertices, faces }
            }
            other => ConversionError::Export(other),
        }
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConversionError::CompilationFailed {
            reason: FailureReason::ExitStatus(Some(1)),
            diagnostics: "Parser error in line 3".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status 1"));
        assert!(msg.contains("Parser error in line 3"));

        let err = ConversionError::io(
            Stage::CompilerInvoked,
            "/tmp/x.scad",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/x.scad"));
        assert!(err.to_string().contains("compiler-invoked"));
    }

    #[test]
    fn test_stage_of_each_variant() {
        let timed_out = ConversionError::CompilationFailed {
            reason: FailureReason::TimedOut(Duration::from_secs(30)),
            diagnostics: String::new(),
        };
        assert_eq!(timed_out.stage(), Stage::CompilerInvoked);
        assert_eq!(
            ConversionError::EmptyMesh {
                vertices: 0,
                faces: 0
            }
            .stage(),
            Stage::MeshParsed
        );
        assert_eq!(
            ConversionError::from(ExportError::NonFiniteVertex { index: 2 }).stage(),
            Stage::Exported
        );
    }

    #[test]
    fn test_export_empty_mesh_maps_to_empty_mesh() {
        let err = ConversionError::from(ExportError::EmptyMesh {
            vertices: 4,
            faces: 0,
        });
        assert!(matches!(
            err,
            ConversionError::EmptyMesh {
                vertices: 4,
                faces: 0
            }
        ));
    }

    /// Test error types are Send + Sync for async compatibility.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConversionError>();
    }
}
