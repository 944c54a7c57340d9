//! # shell-relay
//!
//! Lightweight subprocess execution helper.
//!
//! This crate spawns one external process per invocation, wires its
//! standard streams (live passthrough or captured pipes, separate or
//! combined out/err), optionally feeds its stdin, waits for termination,
//! and returns an immutable [`ExecResult`] exposing exit code, success,
//! and captured output.
//!
//! ## Features
//!
//! - **Shell or argv commands**: a shell-interpretable string, or discrete
//!   arguments that are never re-parsed by a shell
//! - **Deadlock-free piping**: stdin feeding and output draining run
//!   concurrently, so large payloads cannot stall each other
//! - **Explicit redirections**: caller-supplied stream redirections always
//!   win over the engine's capture wiring
//! - **Assert-success contract**: a non-zero exit is a normal outcome
//!   until the caller opts into the assertion
//!
//! ## Quick Start
//!
//! ```no_run
//! use shell_relay::{run, Invocation};
//!
//! fn main() -> shell_relay::Result<()> {
//!     // Initialize logging
//!     shell_relay::logging::try_init().ok();
//!
//!     // One-shot capture of stdout and stderr
//!     let result = run("echo Hello; echo World >&2")?;
//!     assert_eq!(result.stdout(), "Hello");
//!     assert_eq!(result.stderr(), "World");
//!
//!     // Environment, stdin, and the assert-success chain
//!     let greeting = Invocation::new("read NAME; echo Hello, $NAME")
//!         .env("LC_ALL", "C")
//!         .stdin("world")
//!         .capture_stdout(true)
//!         .run()?
//!         .assert_success()?
//!         .stdout()
//!         .to_string();
//!     assert_eq!(greeting, "Hello, world");
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
pub mod logging;

// Re-export commonly used types
pub use error::{Result, ShellRelayError};
pub use execution::{
    run, run_async, run_combined, run_passthrough, CommandLine, ExecResult, Executor, Invocation,
    Redirect, StdinSource,
};
