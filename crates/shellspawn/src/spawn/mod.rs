//! Process execution engine and public entry points.
//!
//! [`run`] builds the command line, spawns the process, drains its streams
//! concurrently, and wraps the outcome in a [`CommandResult`].
//! [`run_checked`] additionally fails on a non-zero exit. [`run_pipeline`]
//! connects stages stdout-to-stdin, and [`run_detached`] spawns without
//! waiting. The built command line is re-split with shell tokenization
//! rules and the program is executed directly. No shell is ever invoked,
//! so metacharacters in the command string are not interpreted.

use std::io;
use std::process::Command;

use crate::command_line;
use crate::error::SpawnError;
use crate::options::RunOptions;
#[cfg(unix)]
use crate::options::SpawnFlags;
use crate::params::{Params, Scalar};
use crate::result::CommandResult;

pub(crate) mod capture;
pub(crate) mod detached;
pub(crate) mod pipeline;

/// Raw streams and status captured from one execution, before being
/// wrapped into a [`CommandResult`].
#[derive(Debug)]
pub(crate) struct RawOutcome {
    pub output: String,
    pub error: String,
    pub exit_status: i32,
    pub pid: Option<u32>,
}

/// Run `command` synchronously and gather its output stream, error
/// stream, and exit status into a [`CommandResult`].
///
/// A non-zero exit is reported through the result, not as an error; the
/// error cases are invalid options, a missing executable, and unexpected
/// OS failures.
///
/// # Examples
///
/// ```
/// use shellspawn::{run, RunOptions};
///
/// let result = run("echo hi", RunOptions::default()).expect("echo should spawn");
/// assert_eq!(result.output, "hi\n");
/// assert_eq!(result.error, "");
/// assert!(result.success());
/// ```
pub fn run(command: impl Into<Scalar>, options: RunOptions) -> Result<CommandResult, SpawnError> {
    options.validate_capture()?;
    let command_line = build_line(command.into(), options.params.as_ref());
    let outcome = capture::launch(&command_line, &options)?;
    Ok(wrap(command_line, outcome))
}

/// Same as [`run`], but a non-zero exit becomes
/// [`SpawnError::CommandFailed`] with the message
/// `"<command> exit code: <status>"`, logged together with the captured
/// stderr before returning.
pub fn run_checked(
    command: impl Into<Scalar>,
    options: RunOptions,
) -> Result<CommandResult, SpawnError> {
    let command = command.into();
    let result = run(command.clone(), options)?;
    if result.failure() {
        let message = format!("{} exit code: {}", command.as_str(), result.exit_status);
        tracing::error!(
            command = command.as_str(),
            exit_status = result.exit_status,
            stderr = %result.error,
            "{message}",
        );
        return Err(SpawnError::CommandFailed { message, result });
    }
    Ok(result)
}

/// Run a series of pre-built command lines with the standard output of
/// each stage feeding the standard input of the next.
///
/// `in_data` feeds the first stage; the captured output and error are the
/// last stage's, and so is the exit status, regardless of earlier stages'
/// outcomes (conventional shell pipeline semantics). The result's
/// `command_line` is the stages joined with `" | "` and its `pid` is
/// `None`.
pub fn run_pipeline<S: AsRef<str>>(
    commands: &[S],
    options: RunOptions,
) -> Result<CommandResult, SpawnError> {
    options.validate_pipeline()?;
    let stages: Vec<&str> = commands.iter().map(AsRef::as_ref).collect();
    let outcome = pipeline::launch(&stages, &options)?;
    Ok(wrap(stages.join(" | "), outcome))
}

/// Spawn `command` and return its pid immediately, without waiting for
/// completion or capturing output.
///
/// Both output streams default to the null device unless the caller
/// supplied an explicit disposition, and the child is placed in a new
/// process group unless [`SpawnFlags::process_group`] was already set, so
/// signals aimed at the caller's group do not reach it.
pub fn run_detached(command: impl Into<Scalar>, options: RunOptions) -> Result<u32, SpawnError> {
    options.validate_detached()?;
    let command_line = build_line(command.into(), options.params.as_ref());
    detached::launch(&command_line, &options)
}

fn build_line(command: Scalar, params: Option<&Params>) -> String {
    match params {
        Some(params) => command_line::build(command, params),
        None => command.into_string(),
    }
}

fn wrap(command_line: String, outcome: RawOutcome) -> CommandResult {
    CommandResult {
        command_line,
        output: outcome.output,
        error: outcome.error,
        exit_status: outcome.exit_status,
        pid: outcome.pid,
    }
}

/// Split a built command line into program and argv with shell
/// tokenization rules. The sanitizer guarantees built lines re-tokenize
/// to the exact values that went in.
pub(crate) fn split_command_line(command_line: &str) -> Result<(String, Vec<String>), SpawnError> {
    let mut tokens = shell_words::split(command_line)
        .map_err(|err| SpawnError::MalformedCommandLine {
            reason: err.to_string(),
        })?;
    if tokens.is_empty() {
        return Err(SpawnError::MalformedCommandLine {
            reason: "empty command".to_string(),
        });
    }
    let program = tokens.remove(0);
    Ok((program, tokens))
}

/// Translate a spawn failure, surfacing a missing executable as the typed
/// error that carries only the command token.
pub(crate) fn spawn_failure(err: io::Error, program: &str) -> SpawnError {
    if err.kind() == io::ErrorKind::NotFound {
        SpawnError::NoSuchCommand {
            command: program.to_string(),
        }
    } else {
        SpawnError::Io(err)
    }
}

/// Apply the environment overlay and working directory. The overlay
/// merges on top of the inherited environment; it never replaces it.
pub(crate) fn configure(cmd: &mut Command, options: &RunOptions) {
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    if let Some(dir) = &options.chdir {
        cmd.current_dir(dir);
    }
}

#[cfg(unix)]
pub(crate) fn apply_spawn_flags(cmd: &mut Command, flags: &SpawnFlags) {
    use std::os::unix::process::CommandExt;

    if let Some(pgid) = flags.process_group {
        cmd.process_group(pgid);
    }
    if let Some(uid) = flags.uid {
        cmd.uid(uid);
    }
    if let Some(gid) = flags.gid {
        cmd.gid(gid);
    }
}

#[cfg(not(unix))]
pub(crate) fn apply_spawn_flags(_cmd: &mut Command, _flags: &crate::options::SpawnFlags) {}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
