//! Captured outcome of one command execution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fully-populated outcome of running a command.
///
/// `output` and `error` are never absent (they are empty strings on every
/// failure path), so callers can always inspect them without unwrapping.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// The built command line that was executed (pipeline stages joined
    /// with `" | "`).
    pub command_line: String,
    /// Complete stdout captured from the process.
    pub output: String,
    /// Complete stderr captured from the process; empty in combined-output
    /// mode.
    pub error: String,
    /// Process exit code (`-1` if the process was killed by a signal).
    pub exit_status: i32,
    /// OS process id, when a single process identifies the execution.
    pub pid: Option<u32>,
}

impl CommandResult {
    /// Whether the process exited with status `0`.
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }

    /// Whether the process exited with a non-zero status.
    pub fn failure(&self) -> bool {
        !self.success()
    }
}

// The captured streams can be arbitrarily large; keep them out of the
// Debug representation.
impl fmt::Debug for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResult")
            .field("command_line", &self.command_line)
            .field("exit_status", &self.exit_status)
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
