//! Safe command-line construction and synchronous process capture.
//!
//! Builds correctly escaped command lines from structured parameters
//! ([`build_command_line`]), runs them while concurrently draining the
//! child's streams ([`run`], [`run_checked`]), connects commands into
//! pipelines ([`run_pipeline`]), and fires processes off without waiting
//! ([`run_detached`]). Failures are typed: a missing executable, an
//! invalid option combination, and (for the checked entry point) a
//! non-zero exit each have their own [`SpawnError`] variant, while plain
//! [`run`] reports a non-zero exit through the [`CommandResult`] itself.

pub mod command_line;
pub mod error;
pub mod escape;
pub mod options;
pub mod params;
pub mod result;
pub mod spawn;

pub use command_line::build as build_command_line;
pub use error::SpawnError;
pub use escape::shell_escape;
pub use options::{RunOptions, SpawnFlags, StdioSpec};
pub use params::{Key, Param, Params, Scalar, Value};
pub use result::CommandResult;
pub use spawn::{run, run_checked, run_detached, run_pipeline};
