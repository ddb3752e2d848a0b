//! Per-request state: identifier, scratch files and lifecycle stage.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use config::constants::{MESH_EXTENSION, REQUEST_SUFFIX_LEN, SOURCE_EXTENSION};
use pipeline_types::Stage;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::ConversionError;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// =============================================================================
// REQUEST ID
// =============================================================================

/// Unique name of one conversion request.
///
/// Formatted as `{prefix}{unix-millis}-{suffix}` where the suffix is
/// [`REQUEST_SUFFIX_LEN`] random lowercase alphanumerics, so concurrent
/// requests in the same millisecond still get distinct scratch files.
///
/// # Examples
/// ```
/// use openscad_convert::RequestId;
///
/// let id = RequestId::generate("job-");
/// assert!(id.as_str().starts_with("job-"));
/// assert_ne!(id, RequestId::generate("job-"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a fresh identifier starting with `prefix`.
    pub fn generate(prefix: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..REQUEST_SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
            .collect();
        RequestId(format!("{prefix}{millis}-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// SCRATCH FILES
// =============================================================================

/// The source and mesh files of one request.
///
/// Both paths are removed when the guard is dropped, whichever way the
/// request ends (success, error, panic or a cancelled future). Removal
/// errors other than `NotFound` are logged and otherwise ignored.
#[derive(Debug)]
pub struct ScratchFiles {
    source: PathBuf,
    mesh: PathBuf,
}

impl ScratchFiles {
    /// Reserves `<dir>/<id>.scad` and `<dir>/<id>.off`. Nothing is created yet.
    pub fn new(dir: &Path, id: &RequestId) -> Self {
        Self {
            source: dir.join(format!("{id}.{SOURCE_EXTENSION}")),
            mesh: dir.join(format!("{id}.{MESH_EXTENSION}")),
        }
    }

    /// Path the source text is written to.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Path the compiler writes its mesh to.
    pub fn mesh(&self) -> &Path {
        &self.mesh
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        for path in [&self.source, &self.mesh] {
            match remove_entry(path) {
                Ok(()) => debug!(path = %path.display(), "removed scratch file"),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to remove scratch file")
                }
            }
        }
    }
}

/// Removes whatever the compiler left at `path`, file or directory.
fn remove_entry(path: &Path) -> io::Result<()> {
    if std::fs::symlink_metadata(path)?.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// One conversion in flight.
#[derive(Debug)]
pub(crate) struct Request {
    pub(crate) id: RequestId,
    pub(crate) scratch: ScratchFiles,
    stage: Stage,
}

impl Request {
    pub(crate) fn new(prefix: &str, scratch_dir: &Path) -> Self {
        let id = RequestId::generate(prefix);
        let scratch = ScratchFiles::new(scratch_dir, &id);
        debug!(request = %id, "request received");
        Self {
            id,
            scratch,
            stage: Stage::Received,
        }
    }

    pub(crate) fn stage(&self) -> Stage {
        self.stage
    }

    /// Moves to the next success-path stage.
    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            debug!(request = %self.id, from = %self.stage, to = %next, "stage transition");
            self.stage = next;
        }
    }

    pub(crate) fn fail(&mut self, err: &ConversionError) {
        warn!(
            request = %self.id,
            stage = %err.stage(),
            error = %err,
            "conversion failed"
        );
        self.stage = Stage::Failed;
    }
}
