//! Error types for shell-relay.

use thiserror::Error;

/// Main error type for shell-relay operations.
#[derive(Error, Debug)]
pub enum ShellRelayError {
    /// The invocation was malformed (empty command, conflicting options).
    ///
    /// Raised before any process is spawned.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The OS could not create the child process.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Display form of the command that could not be started.
        command: String,
        /// The OS-level cause (executable not found, permission denied, ...).
        #[source]
        source: std::io::Error,
    },

    /// The command ran to completion but reported non-success.
    ///
    /// Only raised by [`ExecResult::assert_success`](crate::ExecResult::assert_success)
    /// or the `assert_success` invocation flag, never by `run` itself.
    #[error("command failed with exit code {exit_code}: `{command}`")]
    CommandFailed {
        /// Display form of the failed command.
        command: String,
        /// The exit code the child reported.
        exit_code: i32,
    },

    /// I/O error while waiting on or draining the child.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for shell-relay operations.
pub type Result<T> = std::result::Result<T, ShellRelayError>;
