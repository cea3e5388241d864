use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};

use crate::docker::DockerError;

/// Most output kept from a streamed command, in bytes. Older lines are
/// dropped first; the tail is where build errors end up.
pub const STREAM_CAPTURE_LIMIT: usize = 64 * 1024;

/// Abstraction over container runtime CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait DockerExecutor: Send + Sync {
    /// Execute a runtime command and capture stdout and stderr combined.
    ///
    /// On failure the combined output is carried verbatim in
    /// [`DockerError::CommandFailed`].
    async fn exec(&self, args: &[String]) -> Result<String, DockerError>;

    /// Execute a runtime command, streaming its output to our stderr.
    ///
    /// stdout is kept free for text the invoker may `eval`. On failure the
    /// last [`STREAM_CAPTURE_LIMIT`] bytes of output are carried in
    /// [`DockerError::CommandFailed`].
    async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
}

/// Real container runtime CLI executor.
///
/// Children are killed when their future is dropped, so a timeout or a
/// cancelled task never leaves a stray `docker` process behind.
#[derive(Debug, Clone)]
pub struct RealExecutor {
    program: String,
    timeout: Option<Duration>,
}

impl RealExecutor {
    pub fn new() -> Self {
        Self {
            program: "docker".to_owned(),
            timeout: None,
        }
    }

    /// Use another Docker-compatible CLI, e.g. `podman`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Abort any single command that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> DockerError {
        DockerError::NotFound {
            program: self.program.clone(),
            source,
        }
    }

    fn failed(&self, args: &[String], status: std::process::ExitStatus, output: String) -> DockerError {
        DockerError::CommandFailed {
            program: self.program.clone(),
            args: args.to_vec(),
            status: status.to_string(),
            output,
        }
    }

    async fn deadline<F>(&self, args: &[String], fut: F) -> Result<F::Output, DockerError>
    where
        F: std::future::Future,
    {
        match self.timeout {
            Some(after) => tokio::time::timeout(after, fut).await.map_err(|elapsed| {
                tracing::debug!(%elapsed, program = %self.program, "command deadline reached");
                DockerError::TimedOut {
                    program: self.program.clone(),
                    args: args.to_vec(),
                    after,
                }
            }),
            None => Ok(fut.await),
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, DockerError> {
        tracing::debug!(program = %self.program, ?args, "exec");

        let output = self
            .deadline(
                args,
                self.command(args)
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output(),
            )
            .await?
            .map_err(|e| self.not_found(e))?;

        let combined = combine(&output.stdout, &output.stderr);
        if output.status.success() {
            Ok(combined)
        } else {
            Err(self.failed(args, output.status, combined))
        }
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError> {
        tracing::debug!(program = %self.program, ?args, "exec (streaming)");

        let mut child = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (stdout_tail, stderr_tail, status) = self
            .deadline(args, async {
                tokio::join!(tee(stdout), tee(stderr), child.wait())
            })
            .await?;

        let stream_error = |source| DockerError::Stream {
            program: self.program.clone(),
            source,
        };
        let status = status.map_err(stream_error)?;
        let mut output = stdout_tail.map_err(stream_error)?;
        output.push_str(&stderr_tail.map_err(stream_error)?);

        if status.success() {
            Ok(())
        } else {
            Err(self.failed(args, status, output))
        }
    }
}

/// Copy a child stream to our stderr line by line, keeping the tail.
async fn tee<R: AsyncRead + Unpin>(stream: Option<R>) -> std::io::Result<String> {
    let mut tail = String::new();
    let Some(stream) = stream else {
        return Ok(tail);
    };

    let mut reader = BufReader::new(stream);
    let mut sink = tokio::io::stderr();
    let mut line = Vec::new();
    while reader.read_until(b'\n', &mut line).await? > 0 {
        sink.write_all(&line).await?;
        push_bounded(&mut tail, &String::from_utf8_lossy(&line), STREAM_CAPTURE_LIMIT);
        line.clear();
    }
    sink.flush().await?;
    Ok(tail)
}

/// Append `text`, then drop whole characters from the front until `buf`
/// fits in `limit` bytes.
fn push_bounded(buf: &mut String, text: &str, limit: usize) {
    buf.push_str(text);
    if buf.len() > limit {
        let mut cut = buf.len() - limit;
        while !buf.is_char_boundary(cut) {
            cut += 1;
        }
        buf.drain(..cut);
    }
}

fn combine(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(stderr));
    combined
}
