//! OpenSCAD subprocess invocation.

use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use config::constants::ConverterConfig;
use pipeline_types::Stage;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ConversionError, ConversionResult, FailureReason};

/// How long to wait for the output pipes to close once the child is gone.
const PIPE_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Runs `program [extra_args...] -o <mesh> <source>` once.
///
/// The child is killed when the timeout elapses (or when the returned future
/// is dropped). Succeeds only if the process exits with status 0 and the
/// mesh file exists afterwards. Output captured before a timeout is kept in
/// the error's diagnostics.
pub async fn run_compiler(
    config: &ConverterConfig,
    source: &Path,
    mesh: &Path,
) -> ConversionResult<()> {
    let mut command = Command::new(&config.program);
    command
        .args(&config.extra_args)
        .arg("-o")
        .arg(mesh)
        .arg(source)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program = %config.program.display(), source = %source.display(), "spawning compiler");
    let mut child = command
        .spawn()
        .map_err(|err| ConversionError::CompilationFailed {
            reason: FailureReason::SpawnFailed,
            diagnostics: format!("{}: {err}", config.program.display()),
        })?;

    let stdout = PipeCapture::start(child.stdout.take());
    let stderr = PipeCapture::start(child.stderr.take());

    let status = match tokio::time::timeout(config.timeout, child.wait()).await {
        Ok(result) => {
            Some(result.map_err(|err| ConversionError::io(Stage::CompilerInvoked, source, err))?)
        }
        Err(_) => {
            if let Err(err) = child.kill().await {
                warn!(error = %err, "failed to kill timed out compiler");
            }
            None
        }
    };

    let stdout = stdout.finish().await;
    let stderr = stderr.finish().await;
    let captured = diagnostics(&stdout, &stderr);

    let Some(status) = status else {
        let note = format!("compiler did not finish within {:?}", config.timeout);
        return Err(ConversionError::CompilationFailed {
            reason: FailureReason::TimedOut(config.timeout),
            diagnostics: if captured.is_empty() {
                note
            } else {
                format!("{captured}\n{note}")
            },
        });
    };

    if !status.success() {
        return Err(ConversionError::CompilationFailed {
            reason: FailureReason::ExitStatus(status.code()),
            diagnostics: captured,
        });
    }

    match tokio::fs::metadata(mesh).await {
        Ok(_) => Ok(()),
        Err(_) => Err(ConversionError::CompilationFailed {
            reason: FailureReason::MissingOutput,
            diagnostics: captured,
        }),
    }
}

/// Background reader collecting one output pipe.
///
/// Bytes land in a shared buffer as they arrive, so whatever was read is
/// still available if the pipe never reaches EOF.
struct PipeCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl PipeCapture {
    fn start<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let task = pipe.map(|mut pipe| {
            let buffer = Arc::clone(&buffer);
            tokio::spawn(async move {
                let mut chunk = [0u8; 4096];
                loop {
                    match pipe.read(&mut chunk).await {
                        Ok(0) => break,
                        Ok(n) => {
                            if let Ok(mut buffer) = buffer.lock() {
                                buffer.extend_from_slice(&chunk[..n]);
                            }
                        }
                        Err(err) => {
                            debug!(error = %err, "compiler pipe read failed");
                            break;
                        }
                    }
                }
            })
        });
        Self { buffer, task }
    }

    /// Waits briefly for EOF, then returns everything read so far.
    async fn finish(mut self) -> Vec<u8> {
        if let Some(task) = self.task.as_mut() {
            if tokio::time::timeout(PIPE_DRAIN_GRACE, &mut *task).await.is_err() {
                task.abort();
            }
        }
        let mut captured = Vec::new();
        if let Ok(mut buffer) = self.buffer.lock() {
            captured = std::mem::take(&mut *buffer);
        }
        captured
    }
}

/// Captured stderr, falling back to stdout when stderr is blank.
fn diagnostics(stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }
    String::from_utf8_lossy(stdout).trim().to_string()
}
