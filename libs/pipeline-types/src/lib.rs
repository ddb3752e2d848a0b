use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of one conversion request.
///
/// `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Received,
    CompilerInvoked,
    MeshParsed,
    Transformed,
    Exported,
    Complete,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Complete | Stage::Failed)
    }

    /// Stage that follows `self` on the success path.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Received => Some(Stage::CompilerInvoked),
            Stage::CompilerInvoked => Some(Stage::MeshParsed),
            Stage::MeshParsed => Some(Stage::Transformed),
            Stage::Transformed => Some(Stage::Exported),
            Stage::Exported => Some(Stage::Complete),
            Stage::Complete | Stage::Failed => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::CompilerInvoked => "compiler-invoked",
            Stage::MeshParsed => "mesh-parsed",
            Stage::Transformed => "transformed",
            Stage::Exported => "exported",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a finished conversion, shaped for the web layer's JSON reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    pub vertices: usize,
    pub faces: usize,
    pub colors: usize,
    pub glb_size: usize,
    pub source_length: usize,
}
