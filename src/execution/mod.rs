//! Subprocess execution engine.
//!
//! This module runs one external process per invocation:
//! - Captured or passthrough stdout/stderr, separate or combined
//! - Stdin feeding from bytes, readable sources, or a writer callback
//! - An immutable result with an assert-success contract
//!
//! # Example
//!
//! ```no_run
//! use shell_relay::{run, Invocation};
//!
//! // Simple one-shot execution
//! let result = run("echo hello").unwrap();
//! println!("Output: {}", result.stdout());
//!
//! // Invocation with options
//! let result = Invocation::new("read A; echo $A")
//!     .stdin("Hello")
//!     .capture_stdout(true)
//!     .run()
//!     .unwrap();
//! assert_eq!(result.stdout(), "Hello");
//! ```

mod command;
mod executor;
mod result;

pub use command::{CommandLine, Invocation, Redirect, StdinSource};
pub use executor::{run, run_async, run_combined, run_passthrough, Executor};
pub use result::ExecResult;
