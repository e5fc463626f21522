//! Single-process launcher with concurrent stream draining.
//!
//! OS pipe buffers are bounded (commonly 64 KiB), so a launcher that
//! writes all stdin, then reads all stdout, then all stderr can deadlock
//! once the child fills one pipe while blocked on another. Stdout and
//! stderr are drained by scoped threads running concurrently with each
//! other, with the optional stdin writer, and with waiting for process
//! exit; the result is only assembled after all four have finished.

use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::thread;

use super::RawOutcome;
use crate::error::SpawnError;
use crate::options::RunOptions;

/// Spawn one process for `command_line` and block until it exits and both
/// output streams have reached end-of-stream.
pub(crate) fn launch(
    command_line: &str,
    options: &RunOptions,
) -> Result<RawOutcome, SpawnError> {
    let (program, args) = super::split_command_line(command_line)?;
    let mut cmd = Command::new(&program);
    cmd.args(&args);
    super::configure(&mut cmd, options);
    super::apply_spawn_flags(&mut cmd, &options.spawn);

    if options.in_data.is_some() {
        cmd.stdin(Stdio::piped());
    } else if let Some(spec) = &options.stdin {
        cmd.stdin(spec.open_read()?);
    } else {
        cmd.stdin(Stdio::null());
    }

    // In combined mode both fds share one pipe write end, so interleaving
    // is exactly what the child wrote.
    let mut combined = None;
    if options.combined_output {
        let (reader, writer) = io::pipe()?;
        let err_writer = writer.try_clone()?;
        cmd.stdout(writer);
        cmd.stderr(err_writer);
        combined = Some(reader);
    } else {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    }

    let mut child = cmd.spawn().map_err(|err| super::spawn_failure(err, &program))?;
    // Release the parent's copies of the pipe write ends; the drain
    // threads would otherwise never observe end-of-stream.
    drop(cmd);

    let pid = child.id();
    tracing::debug!(pid, program = %program, "Spawned child process");

    let (output, error, exit_status) =
        drain(&mut child, options.in_data.as_deref(), combined)?;
    Ok(RawOutcome {
        output,
        error,
        exit_status,
        pid: Some(pid),
    })
}

fn drain(
    child: &mut Child,
    in_data: Option<&[u8]>,
    combined: Option<io::PipeReader>,
) -> Result<(String, String, i32), SpawnError> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (output, error, status) = thread::scope(|scope| {
        let out_reader = scope.spawn(move || match (combined, stdout) {
            (Some(mut reader), _) => read_stream(&mut reader),
            (None, Some(mut stdout)) => read_stream(&mut stdout),
            (None, None) => Vec::new(),
        });
        let err_reader = scope.spawn(move || match stderr {
            Some(mut stderr) => read_stream(&mut stderr),
            None => Vec::new(),
        });
        if let (Some(data), Some(mut handle)) = (in_data, stdin) {
            scope.spawn(move || {
                // The child may exit without reading; a broken pipe is not
                // an error here. The handle drops at thread end, closing
                // the child's stdin.
                let _ = handle.write_all(data);
            });
        }

        let status = child.wait();
        let output = out_reader.join().unwrap_or_default();
        let error = err_reader.join().unwrap_or_default();
        (output, error, status)
    });

    let status = status?;
    Ok((
        String::from_utf8_lossy(&output).into_owned(),
        String::from_utf8_lossy(&error).into_owned(),
        status.code().unwrap_or(-1),
    ))
}

/// Best-effort read to end-of-stream; a mid-stream error truncates rather
/// than failing the whole invocation.
fn read_stream<R: Read>(stream: &mut R) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf);
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
