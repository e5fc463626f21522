//! Integration tests exercising the public surface end to end: building
//! parameterized command lines, running real processes, pipelines, and
//! the checked and detached entry points.

use assert_matches::assert_matches;
use shellspawn::{
    build_command_line, run, run_checked, run_detached, run_pipeline, Params, RunOptions,
    SpawnError,
};

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// The injection-safety property: a hostile parameter value is escaped so
/// the executed command receives it as one literal argument.
#[test]
fn hostile_parameter_values_cannot_inject_commands() {
    let params = Params::new().opt("out", "; rm /some/file");
    let line = build_command_line("echo", &params);
    assert_eq!(line, "echo --out \\;\\ rm\\ /some/file");

    let result = run("echo", RunOptions {
        params: Some(params),
        ..Default::default()
    })
    .expect("run echo");
    assert_eq!(result.output, "--out ; rm /some/file\n");
    assert!(result.success());
}

#[test]
fn built_command_line_is_reported_in_the_result() {
    let options = RunOptions {
        params: Some(Params::new().flag("version")),
        ..Default::default()
    };
    let err = run("doesnotexist123", options).expect_err("missing executable");
    // The typed error carries the command token only, never the params.
    assert_eq!(err.to_string(), "No such file or directory - doesnotexist123");
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

#[test]
fn run_collects_output_error_and_status() {
    let result = run("sh -c 'echo out; echo err >&2; exit 2'", RunOptions::default())
        .expect("run sh");
    assert_eq!(result.output, "out\n");
    assert_eq!(result.error, "err\n");
    assert_eq!(result.exit_status, 2);
    assert!(result.failure());
}

#[test]
fn run_feeds_stdin_data() {
    let options = RunOptions {
        in_data: Some(b"line1\nline2".to_vec()),
        ..Default::default()
    };
    let result = run("cat", options).expect("run cat");
    assert_eq!(result.output, "line1\nline2");
}

#[test]
fn run_checked_message_matches_the_documented_format() {
    let err = run_checked("false", RunOptions::default()).expect_err("false fails");
    assert_eq!(err.to_string(), "false exit code: 1");
    assert_matches!(err, SpawnError::CommandFailed { .. });
}

#[test]
fn usage_errors_are_detected_before_spawning() {
    let options = RunOptions {
        in_data: Some(b"x".to_vec()),
        stdin: Some(shellspawn::StdioSpec::Null),
        ..Default::default()
    };
    // The command does not exist, but validation fires first.
    let err = run("doesnotexist123", options).expect_err("conflicting options");
    assert_eq!(err.to_string(), "options cannot contain in");
}

// ---------------------------------------------------------------------------
// Pipelines
// ---------------------------------------------------------------------------

#[test]
fn pipeline_threads_data_from_stdin_to_final_output() {
    let options = RunOptions {
        in_data: Some(b"x".to_vec()),
        ..Default::default()
    };
    let result = run_pipeline(&["cat", "cat"], options).expect("run pipeline");
    assert_eq!(result.output, "x");
    assert_eq!(result.command_line, "cat | cat");
    assert_eq!(result.pid, None);
}

#[test]
fn pipeline_exit_status_is_the_final_stage() {
    let result =
        run_pipeline(&["false", "cat"], RunOptions::default()).expect("run pipeline");
    assert_eq!(result.exit_status, 0);
}

// ---------------------------------------------------------------------------
// Detached
// ---------------------------------------------------------------------------

#[test]
fn detached_processes_outlive_the_call() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let marker = dir.path().join("detached-marker");
    let command = format!("sh -c 'touch {}'", marker.display());
    let pid = run_detached(&command[..], RunOptions::default()).expect("detach");
    assert!(pid > 0);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while !marker.exists() {
        assert!(
            std::time::Instant::now() < deadline,
            "detached child never created its marker"
        );
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
}

#[test]
fn detached_rejects_stdin_data() {
    let options = RunOptions {
        in_data: Some(b"x".to_vec()),
        ..Default::default()
    };
    let err = run_detached("true", options).expect_err("in_data is a usage error");
    assert_eq!(err.to_string(), "options cannot contain in_data");
}
