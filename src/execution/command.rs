//! Invocation building and representation.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::error::ShellRelayError;
use crate::Result;

/// A command in exactly one of its two representations.
///
/// A `Shell` command is handed to the platform shell for interpretation.
/// An `Argv` command is passed to the OS as discrete elements and is never
/// re-parsed by a shell, so its arguments cannot be re-interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// A single shell-interpretable string (`/bin/sh -c` on Unix,
    /// `cmd /C` on Windows).
    Shell(String),
    /// Program and arguments as discrete elements.
    Argv(Vec<String>),
}

impl CommandLine {
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Shell(line) if line.trim().is_empty() => Err(ShellRelayError::InvalidArgument(
                "command string is empty".into(),
            )),
            Self::Argv(argv) if argv.is_empty() => Err(ShellRelayError::InvalidArgument(
                "argument vector is empty".into(),
            )),
            Self::Argv(argv) if argv[0].is_empty() => Err(ShellRelayError::InvalidArgument(
                "program name is empty".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell(line) => f.write_str(line),
            Self::Argv(argv) => f.write_str(&argv.join(" ")),
        }
    }
}

impl From<&str> for CommandLine {
    fn from(line: &str) -> Self {
        Self::Shell(line.to_string())
    }
}

impl From<String> for CommandLine {
    fn from(line: String) -> Self {
        Self::Shell(line)
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(argv: Vec<String>) -> Self {
        Self::Argv(argv)
    }
}

impl From<&[&str]> for CommandLine {
    fn from(argv: &[&str]) -> Self {
        Self::Argv(argv.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for CommandLine {
    fn from(argv: [&str; N]) -> Self {
        Self::Argv(argv.iter().map(|s| s.to_string()).collect())
    }
}

/// Explicit redirection for one of the child's standard streams.
///
/// An explicit redirect always wins over the engine's capture wiring:
/// a redirected stream is not captured even when its capture flag is set,
/// and its captured text stays empty.
#[derive(Debug)]
pub enum Redirect {
    /// Inherit the parent's stream.
    Inherit,
    /// Connect the stream to the null device.
    Null,
    /// Connect the stream to an open file.
    File(File),
}

/// Payload for the child's standard input.
///
/// Whatever the variant, the child's input handle is closed once the
/// payload has been delivered, so the child observes end-of-input.
pub enum StdinSource {
    /// Precomputed bytes, written verbatim.
    Bytes(Vec<u8>),
    /// A readable source, copied to end-of-stream.
    Reader(Box<dyn Read + Send>),
    /// A single-shot callback given the writable handle.
    Writer(Box<dyn FnOnce(&mut dyn Write) -> std::io::Result<()> + Send>),
}

impl StdinSource {
    /// Stream the full contents of a readable source into the child.
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Invoke a callback exactly once with the child's input handle.
    pub fn writer(
        write: impl FnOnce(&mut dyn Write) -> std::io::Result<()> + Send + 'static,
    ) -> Self {
        Self::Writer(Box::new(write))
    }
}

impl fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl From<&str> for StdinSource {
    fn from(text: &str) -> Self {
        Self::Bytes(text.as_bytes().to_vec())
    }
}

impl From<String> for StdinSource {
    fn from(text: String) -> Self {
        Self::Bytes(text.into_bytes())
    }
}

impl From<Vec<u8>> for StdinSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for StdinSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// Options bag for one subprocess invocation.
///
/// Built fluent-style and consumed by [`Executor::run`](super::Executor::run).
/// Capture flags are independent booleans validated at call time; combined
/// capture is mutually exclusive with separate capture.
#[derive(Debug)]
pub struct Invocation {
    /// The command to execute.
    pub(crate) command: CommandLine,
    /// Environment variables merged over the ambient environment.
    pub(crate) env: HashMap<String, String>,
    /// Working directory override (if any).
    pub(crate) working_dir: Option<PathBuf>,
    /// Capture stdout into its own buffer.
    pub(crate) capture_stdout: bool,
    /// Capture stderr into its own buffer.
    pub(crate) capture_stderr: bool,
    /// Capture stdout and stderr interleaved into one buffer.
    pub(crate) capture_combined: bool,
    /// Fail the run when the child reports non-success.
    pub(crate) assert_success: bool,
    /// Explicit stdin redirection.
    pub(crate) stdin_redirect: Option<Redirect>,
    /// Explicit stdout redirection.
    pub(crate) stdout_redirect: Option<Redirect>,
    /// Explicit stderr redirection.
    pub(crate) stderr_redirect: Option<Redirect>,
    /// Payload for the child's stdin.
    pub(crate) stdin: Option<StdinSource>,
}

impl Invocation {
    /// Create a new invocation for the given command.
    ///
    /// No streams are captured by default; the child inherits the
    /// parent's stdout and stderr.
    pub fn new(command: impl Into<CommandLine>) -> Self {
        Self {
            command: command.into(),
            env: HashMap::new(),
            working_dir: None,
            capture_stdout: false,
            capture_stderr: false,
            capture_combined: false,
            assert_success: false,
            stdin_redirect: None,
            stdout_redirect: None,
            stderr_redirect: None,
            stdin: None,
        }
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add multiple environment variables.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    /// Set the working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Capture stdout into its own buffer.
    pub fn capture_stdout(mut self, capture: bool) -> Self {
        self.capture_stdout = capture;
        self
    }

    /// Capture stderr into its own buffer.
    pub fn capture_stderr(mut self, capture: bool) -> Self {
        self.capture_stderr = capture;
        self
    }

    /// Capture stdout and stderr interleaved into one buffer, in the
    /// order the OS delivers them.
    pub fn capture_combined(mut self, capture: bool) -> Self {
        self.capture_combined = capture;
        self
    }

    /// Fail the run with `CommandFailed` when the child reports
    /// non-success, as if `assert_success` had been chained on the result.
    pub fn assert_success(mut self, assert: bool) -> Self {
        self.assert_success = assert;
        self
    }

    /// Explicitly redirect the child's stdin.
    ///
    /// Mutually exclusive with [`stdin`](Self::stdin).
    pub fn stdin_redirect(mut self, redirect: Redirect) -> Self {
        self.stdin_redirect = Some(redirect);
        self
    }

    /// Explicitly redirect the child's stdout.
    pub fn stdout_redirect(mut self, redirect: Redirect) -> Self {
        self.stdout_redirect = Some(redirect);
        self
    }

    /// Explicitly redirect the child's stderr.
    pub fn stderr_redirect(mut self, redirect: Redirect) -> Self {
        self.stderr_redirect = Some(redirect);
        self
    }

    /// Provide the child's stdin payload.
    ///
    /// Accepts text or bytes directly, or a [`StdinSource`] for readable
    /// sources and single-shot writer callbacks.
    pub fn stdin(mut self, source: impl Into<StdinSource>) -> Self {
        self.stdin = Some(source.into());
        self
    }

    /// Run this invocation to completion.
    pub fn run(self) -> Result<super::ExecResult> {
        super::Executor::new(self).run()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.command.validate()?;
        if self.capture_combined && (self.capture_stdout || self.capture_stderr) {
            return Err(ShellRelayError::InvalidArgument(
                "combined capture cannot be mixed with separate stdout/stderr capture".into(),
            ));
        }
        if self.stdin.is_some() && self.stdin_redirect.is_some() {
            return Err(ShellRelayError::InvalidArgument(
                "stdin payload conflicts with an explicit stdin redirection".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_defaults() {
        let inv = Invocation::new("echo hello");
        assert_eq!(inv.command, CommandLine::Shell("echo hello".into()));
        assert!(inv.env.is_empty());
        assert!(inv.working_dir.is_none());
        assert!(!inv.capture_stdout);
        assert!(!inv.capture_stderr);
        assert!(!inv.capture_combined);
        assert!(!inv.assert_success);
        assert!(inv.stdin.is_none());
    }

    #[test]
    fn test_invocation_builder_chain() {
        let inv = Invocation::new("cargo build")
            .working_dir("/project")
            .env("RUST_LOG", "debug")
            .capture_stdout(true)
            .capture_stderr(true);

        assert_eq!(inv.working_dir, Some(PathBuf::from("/project")));
        assert_eq!(inv.env.get("RUST_LOG"), Some(&"debug".to_string()));
        assert!(inv.capture_stdout);
        assert!(inv.capture_stderr);
    }

    #[test]
    fn test_invocation_envs() {
        let vars = [("KEY1", "val1"), ("KEY2", "val2")];
        let inv = Invocation::new("env").envs(vars);

        assert_eq!(inv.env.len(), 2);
        assert_eq!(inv.env.get("KEY1"), Some(&"val1".to_string()));
        assert_eq!(inv.env.get("KEY2"), Some(&"val2".to_string()));
    }

    #[test]
    fn test_command_line_from_str_is_shell() {
        let cmd: CommandLine = "ls -la".into();
        assert_eq!(cmd, CommandLine::Shell("ls -la".into()));
    }

    #[test]
    fn test_command_line_from_vec_is_argv() {
        let cmd: CommandLine = vec!["ls".to_string(), "-la".to_string()].into();
        assert_eq!(cmd, CommandLine::Argv(vec!["ls".into(), "-la".into()]));
    }

    #[test]
    fn test_command_line_from_array_is_argv() {
        let cmd: CommandLine = ["echo", "hello world"].into();
        assert_eq!(
            cmd,
            CommandLine::Argv(vec!["echo".into(), "hello world".into()])
        );
    }

    #[test]
    fn test_command_line_display() {
        let shell: CommandLine = "echo hi".into();
        assert_eq!(shell.to_string(), "echo hi");

        let argv: CommandLine = ["echo", "hi"].into();
        assert_eq!(argv.to_string(), "echo hi");
    }

    #[test]
    fn test_validate_empty_shell_string() {
        let err = Invocation::new("   ").validate().unwrap_err();
        assert!(matches!(err, ShellRelayError::InvalidArgument(_)));
    }

    #[test]
    fn test_validate_empty_argv() {
        let inv = Invocation::new(CommandLine::Argv(vec![]));
        assert!(inv.validate().is_err());
    }

    #[test]
    fn test_validate_empty_program_name() {
        let inv = Invocation::new(CommandLine::Argv(vec![String::new(), "arg".into()]));
        assert!(inv.validate().is_err());
    }

    #[test]
    fn test_validate_combined_excludes_separate() {
        let inv = Invocation::new("echo hi")
            .capture_combined(true)
            .capture_stdout(true);
        let err = inv.validate().unwrap_err();
        assert!(err.to_string().contains("combined"));

        let inv = Invocation::new("echo hi")
            .capture_combined(true)
            .capture_stderr(true);
        assert!(inv.validate().is_err());
    }

    #[test]
    fn test_validate_stdin_conflicts_with_redirect() {
        let inv = Invocation::new("cat")
            .stdin("hello")
            .stdin_redirect(Redirect::Null);
        let err = inv.validate().unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn test_validate_accepts_combined_alone() {
        let inv = Invocation::new("echo hi").capture_combined(true);
        assert!(inv.validate().is_ok());
    }

    #[test]
    fn test_stdin_source_from_text() {
        let source: StdinSource = "Hello".into();
        match source {
            StdinSource::Bytes(bytes) => assert_eq!(bytes, b"Hello"),
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    #[test]
    fn test_stdin_source_debug_is_opaque() {
        let reader = StdinSource::reader(std::io::empty());
        assert_eq!(format!("{reader:?}"), "Reader(..)");

        let writer = StdinSource::writer(|_| Ok(()));
        assert_eq!(format!("{writer:?}"), "Writer(..)");
    }
}
