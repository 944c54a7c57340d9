//! Execution result types.

use std::fmt;

use crate::error::ShellRelayError;
use crate::Result;

/// Immutable outcome of one subprocess invocation.
///
/// Built by the executor only after the child has terminated and every
/// capture pipe has been drained and closed. All fields are populated
/// eagerly, so accessors are plain reads and never touch the closed OS
/// streams again. The value can be shared and read from any number of
/// threads without synchronization.
#[derive(Debug, Clone)]
pub struct ExecResult {
    command: String,
    exit_code: i32,
    success: bool,
    stdout: String,
    stderr: String,
    combined: String,
}

impl ExecResult {
    pub(crate) fn new(
        command: String,
        exit_code: i32,
        success: bool,
        stdout: String,
        stderr: String,
        combined: String,
    ) -> Self {
        Self {
            command,
            exit_code,
            success,
            stdout,
            stderr,
            combined,
        }
    }

    /// Display form of the command that produced this result.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The raw exit status the child reported.
    ///
    /// For a child killed by a signal on Unix this is `128 + signal`,
    /// matching what a shell would report.
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Whether the OS reported the child as successful.
    ///
    /// Taken directly from the wait status, not re-derived from the
    /// exit code.
    pub fn success(&self) -> bool {
        self.success
    }

    /// Captured stdout text.
    ///
    /// Empty when stdout was not captured (passthrough or redirected)
    /// or produced no output.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured stderr text.
    ///
    /// Empty when stderr was not captured or produced no output.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Combined stdout/stderr text, interleaved in the order the OS
    /// delivered it.
    ///
    /// Empty unless combined capture was requested.
    pub fn combined(&self) -> &str {
        &self.combined
    }

    /// Return `self` if the child succeeded, or fail with
    /// [`CommandFailed`](ShellRelayError::CommandFailed) carrying the
    /// command for diagnostics.
    ///
    /// Returning `self` allows assert-then-read chaining:
    ///
    /// ```no_run
    /// # fn main() -> shell_relay::Result<()> {
    /// let stdout = shell_relay::run("git rev-parse HEAD")?
    ///     .assert_success()?
    ///     .stdout()
    ///     .to_string();
    /// # Ok(())
    /// # }
    /// ```
    pub fn assert_success(&self) -> Result<&Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ShellRelayError::CommandFailed {
                command: self.command.clone(),
                exit_code: self.exit_code,
            })
        }
    }
}

/// Renders the captured stdout.
impl fmt::Display for ExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stdout)
    }
}
