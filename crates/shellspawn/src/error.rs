//! Error taxonomy for command construction and execution.

use crate::result::CommandResult;

/// Errors surfaced by the execution entry points.
///
/// A non-zero exit is not an error for [`run`](crate::run); it comes back
/// as a [`CommandResult`] with `success() == false`, and only
/// [`run_checked`](crate::run_checked) turns it into [`CommandFailed`](Self::CommandFailed).
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The caller supplied an option combination the entry point cannot
    /// honor. Detected before any process is spawned; every conflicting
    /// option is listed.
    #[error("options cannot contain {}", .options.join(", "))]
    UsageError { options: Vec<&'static str> },

    /// The command line is empty or does not tokenize under shell rules.
    #[error("malformed command line: {reason}")]
    MalformedCommandLine { reason: String },

    /// The executable could not be located. Carries only the command
    /// token, never the argument list, which may hold sensitive values.
    #[error("No such file or directory - {command}")]
    NoSuchCommand { command: String },

    /// The process ran and exited non-zero (checked entry points only).
    #[error("{message}")]
    CommandFailed {
        message: String,
        result: CommandResult,
    },

    /// Any other operating-system failure (permission denied, resource
    /// exhaustion), propagated unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SpawnError {
    /// The captured result behind a [`CommandFailed`](Self::CommandFailed)
    /// error, if that is what this is.
    pub fn result(&self) -> Option<&CommandResult> {
        match self {
            SpawnError::CommandFailed { result, .. } => Some(result),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
