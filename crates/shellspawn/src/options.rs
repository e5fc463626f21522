//! Caller-facing execution options.
//!
//! [`RunOptions`] enumerates every recognized option explicitly, with
//! [`SpawnFlags`] as the typed escape hatch for platform-specific spawn
//! behavior. Validation runs before any process is spawned and reports
//! every conflicting option in a single error.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use crate::error::SpawnError;
use crate::params::Params;

/// Disposition for one of the child's standard streams.
///
/// Capturing entry points own their streams and reject explicit stdout/
/// stderr dispositions; [`run_detached`](crate::run_detached) honors all
/// three, and `stdin` is honored by capturing entry points when no
/// `in_data` is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdioSpec {
    /// Connect the stream to the null device.
    Null,
    /// Inherit the corresponding stream of the calling process.
    Inherit,
    /// Open `path`: for reading on stdin, created/truncated on stdout
    /// and stderr.
    File(PathBuf),
}

impl StdioSpec {
    /// Stdio handle for a stream the child reads from.
    pub(crate) fn open_read(&self) -> io::Result<Stdio> {
        Ok(match self {
            StdioSpec::Null => Stdio::null(),
            StdioSpec::Inherit => Stdio::inherit(),
            StdioSpec::File(path) => File::open(path)?.into(),
        })
    }

    /// Stdio handle for a stream the child writes to.
    pub(crate) fn open_write(&self) -> io::Result<Stdio> {
        Ok(match self {
            StdioSpec::Null => Stdio::null(),
            StdioSpec::Inherit => Stdio::inherit(),
            StdioSpec::File(path) => File::create(path)?.into(),
        })
    }
}

/// Typed escape hatch for platform-specific spawn flags.
///
/// Stream redirection deliberately has no representation here; it is
/// either owned by the launcher or expressed through [`StdioSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnFlags {
    /// Unix: put the child in process group `pgid` via `setpgid`; `0`
    /// creates a new group led by the child.
    #[cfg(unix)]
    pub process_group: Option<i32>,
    /// Unix: run the child under this user id.
    #[cfg(unix)]
    pub uid: Option<u32>,
    /// Unix: run the child under this group id.
    #[cfg(unix)]
    pub gid: Option<u32>,
}

/// Options accepted by every execution entry point.
///
/// Construct with struct-update syntax over [`Default`]:
///
/// ```
/// use shellspawn::RunOptions;
///
/// let options = RunOptions {
///     in_data: Some(b"line1\nline2".to_vec()),
///     ..Default::default()
/// };
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Structured parameters appended to the command line by the builder.
    pub params: Option<Params>,
    /// Raw bytes written to the child's stdin, which is then closed.
    pub in_data: Option<Vec<u8>>,
    /// Environment overlay, merged on top of the inherited environment.
    pub env: Vec<(String, String)>,
    /// Working directory for the child.
    pub chdir: Option<PathBuf>,
    /// Redirect stderr into the stdout stream; the captured `error` is
    /// then empty for that invocation.
    pub combined_output: bool,
    /// Explicit stdin disposition.
    pub stdin: Option<StdioSpec>,
    /// Explicit stdout disposition (detached mode only).
    pub stdout: Option<StdioSpec>,
    /// Explicit stderr disposition (detached mode only).
    pub stderr: Option<StdioSpec>,
    /// Platform-specific spawn flags.
    pub spawn: SpawnFlags,
}

impl RunOptions {
    /// Validation for the capturing entry points: stdout/stderr belong to
    /// the launcher, and stdin cannot be both redirected and fed
    /// `in_data`.
    pub(crate) fn validate_capture(&self) -> Result<(), SpawnError> {
        let mut conflicting = Vec::new();
        if self.stdout.is_some() {
            conflicting.push("out");
        }
        if self.stderr.is_some() {
            conflicting.push("err");
        }
        if self.stdin.is_some() && self.in_data.is_some() {
            conflicting.push("in");
        }
        reject(conflicting)
    }

    /// Validation for pipelines: capture rules, plus `params` (stages are
    /// pre-built command lines).
    pub(crate) fn validate_pipeline(&self) -> Result<(), SpawnError> {
        let mut conflicting = Vec::new();
        if self.params.is_some() {
            conflicting.push("params");
        }
        if self.stdout.is_some() {
            conflicting.push("out");
        }
        if self.stderr.is_some() {
            conflicting.push("err");
        }
        if self.stdin.is_some() && self.in_data.is_some() {
            conflicting.push("in");
        }
        reject(conflicting)
    }

    /// Validation for detached mode: nobody waits on the child, so there
    /// is no synchronization point to write `in_data` through.
    pub(crate) fn validate_detached(&self) -> Result<(), SpawnError> {
        let mut conflicting = Vec::new();
        if self.in_data.is_some() {
            conflicting.push("in_data");
        }
        reject(conflicting)
    }
}

fn reject(conflicting: Vec<&'static str>) -> Result<(), SpawnError> {
    if conflicting.is_empty() {
        Ok(())
    } else {
        Err(SpawnError::UsageError {
            options: conflicting,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
