//! Pipeline launcher: the standard output of each stage feeds the
//! standard input of the next.
//!
//! Only stdout is piped between stages; intermediate stderr goes to the
//! null device. The externally visible streams are the first stage's
//! stdin and the last stage's stdout/stderr, and the reported exit status
//! is the last stage's regardless of earlier outcomes, mirroring
//! conventional shell pipelines. Every spawned stage is reaped on every
//! exit path.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

use super::RawOutcome;
use crate::error::SpawnError;
use crate::options::RunOptions;

/// Spawn all stages, wire them together, and block until every stage has
/// exited and the last stage's streams have been drained.
pub(crate) fn launch(stages: &[&str], options: &RunOptions) -> Result<RawOutcome, SpawnError> {
    if stages.is_empty() {
        return Err(SpawnError::MalformedCommandLine {
            reason: "empty pipeline".to_string(),
        });
    }

    let last = stages.len() - 1;
    let mut children: Vec<Child> = Vec::with_capacity(stages.len());
    let mut combined = None;

    for (index, stage) in stages.iter().enumerate() {
        let (program, args) = match super::split_command_line(stage) {
            Ok(parsed) => parsed,
            Err(err) => return Err(abort(children, err)),
        };
        let mut cmd = Command::new(&program);
        cmd.args(&args);
        super::configure(&mut cmd, options);
        super::apply_spawn_flags(&mut cmd, &options.spawn);

        if index == 0 {
            if options.in_data.is_some() {
                cmd.stdin(Stdio::piped());
            } else if let Some(spec) = &options.stdin {
                match spec.open_read() {
                    Ok(stdio) => {
                        cmd.stdin(stdio);
                    }
                    Err(err) => return Err(abort(children, err.into())),
                }
            } else {
                cmd.stdin(Stdio::null());
            }
        } else if let Some(upstream) = children.last_mut().and_then(|child| child.stdout.take()) {
            cmd.stdin(upstream);
        } else {
            cmd.stdin(Stdio::null());
        }

        if index == last {
            if options.combined_output {
                match combined_pipe(&mut cmd) {
                    Ok(reader) => combined = Some(reader),
                    Err(err) => return Err(abort(children, err.into())),
                }
            } else {
                cmd.stdout(Stdio::piped());
                cmd.stderr(Stdio::piped());
            }
        } else {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::null());
        }

        match cmd.spawn() {
            Ok(child) => children.push(child),
            Err(err) => return Err(abort(children, super::spawn_failure(err, &program))),
        }
        // cmd drops here, releasing the parent's copies of this stage's
        // pipe ends.
    }

    let stdin = children.first_mut().and_then(|child| child.stdin.take());
    let (stdout, stderr) = match children.last_mut() {
        Some(child) => (child.stdout.take(), child.stderr.take()),
        None => (None, None),
    };

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
        if let (Some(data), Some(mut handle)) = (options.in_data.as_deref(), stdin) {
            scope.spawn(move || {
                // The first stage may exit without reading; a broken pipe
                // is not an error here.
                let _ = handle.write_all(data);
            });
        }

        // Reap every stage in order; only the last status is reported.
        let mut status: Option<io::Result<ExitStatus>> = None;
        for child in children.iter_mut() {
            status = Some(child.wait());
        }

        let output = out_reader.join().unwrap_or_default();
        let error = err_reader.join().unwrap_or_default();
        (output, error, status)
    });

    let exit_status = match status {
        Some(result) => result?.code().unwrap_or(-1),
        None => -1,
    };
    Ok(RawOutcome {
        output: String::from_utf8_lossy(&output).into_owned(),
        error: String::from_utf8_lossy(&error).into_owned(),
        exit_status,
        pid: None,
    })
}

/// One pipe write end shared by stdout and stderr, so the merged stream
/// interleaves exactly as written.
fn combined_pipe(cmd: &mut Command) -> io::Result<io::PipeReader> {
    let (reader, writer) = io::pipe()?;
    let err_writer = writer.try_clone()?;
    cmd.stdout(writer);
    cmd.stderr(err_writer);
    Ok(reader)
}

/// Kill and reap every already-spawned stage, then hand back the error.
fn abort(mut children: Vec<Child>, err: SpawnError) -> SpawnError {
    for child in children.iter_mut() {
        let _ = child.kill();
        let _ = child.wait();
    }
    err
}

fn read_stream<R: Read>(stream: &mut R) -> Vec<u8> {
    let mut buf = Vec::new();
    let _ = stream.read_to_end(&mut buf);
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
