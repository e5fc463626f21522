//! Fire-and-forget launcher.
//!
//! Spawns the process and returns its pid immediately; nothing is waited
//! on or captured. Both output streams default to the null device and the
//! child is placed in a new process group, with caller-supplied
//! dispositions and flags always taking precedence over those defaults.

use std::process::Stdio;
use std::thread;

use crate::error::SpawnError;
use crate::options::RunOptions;

pub(crate) fn launch(command_line: &str, options: &RunOptions) -> Result<u32, SpawnError> {
    let (program, args) = super::split_command_line(command_line)?;
    let mut cmd = std::process::Command::new(&program);
    cmd.args(&args);
    super::configure(&mut cmd, options);

    let mut flags = options.spawn.clone();
    #[cfg(unix)]
    if flags.process_group.is_none() {
        // Fresh process group, so signals aimed at the caller's group do
        // not reach the detached child.
        flags.process_group = Some(0);
    }
    super::apply_spawn_flags(&mut cmd, &flags);

    cmd.stdin(match &options.stdin {
        Some(spec) => spec.open_read()?,
        None => Stdio::null(),
    });
    cmd.stdout(match &options.stdout {
        Some(spec) => spec.open_write()?,
        None => Stdio::null(),
    });
    cmd.stderr(match &options.stderr {
        Some(spec) => spec.open_write()?,
        None => Stdio::null(),
    });

    let mut child = cmd.spawn().map_err(|err| super::spawn_failure(err, &program))?;
    let pid = child.id();
    tracing::debug!(pid, program = %program, "Spawned detached process");

    // Reap in the background so the child cannot linger as a zombie.
    thread::spawn(move || {
        let _ = child.wait();
    });

    Ok(pid)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
