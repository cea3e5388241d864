use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("{program} CLI not found; is it installed and on PATH?")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} command failed ({status}): {args:?}\n{output}")]
    CommandFailed {
        program: String,
        args: Vec<String>,
        status: String,
        output: String,
    },

    #[error("{program} command timed out after {after:?}: {args:?}")]
    TimedOut {
        program: String,
        args: Vec<String>,
        after: Duration,
    },

    #[error("no such container: {name}")]
    NoSuchContainer { name: String, output: String },

    #[error("failed to read {program} output")]
    Stream {
        program: String,
        source: std::io::Error,
    },
}

impl DockerError {
    /// Combined stdout/stderr of the failed command, verbatim.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } | Self::NoSuchContainer { output, .. } => {
                Some(output)
            }
            Self::NotFound { .. } | Self::TimedOut { .. } | Self::Stream { .. } => None,
        }
    }

    pub fn is_no_such_container(&self) -> bool {
        matches!(self, Self::NoSuchContainer { .. })
    }

    pub fn timed_out(&self) -> Option<Duration> {
        match self {
            Self::TimedOut { after, .. } => Some(*after),
            _ => None,
        }
    }
}

/// Whether a failed `rm` reported a missing container rather than a real error.
///
/// Docker prints `No such container: <name>`; Podman prints
/// `no container with name or ID "<name>" found`.
pub(crate) fn reports_missing_container(output: &str) -> bool {
    let lower = output.to_ascii_lowercase();
    lower.contains("no such container") || lower.contains("no container with name or id")
}
