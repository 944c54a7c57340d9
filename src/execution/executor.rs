//! Subprocess execution engine.

use std::io::{self, Read, Write};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use super::command::{CommandLine, Invocation, Redirect, StdinSource};
use super::result::ExecResult;
use crate::error::ShellRelayError;
use crate::Result;

/// Runs exactly one subprocess invocation to completion.
///
/// The executor owns every pipe descriptor and the child handle for the
/// duration of [`run`](Self::run); none of them escape to the caller.
/// Stdin feeding and output draining happen on dedicated threads so that
/// neither side can stall the other once OS pipe buffers fill.
pub struct Executor {
    invocation: Invocation,
}

impl Executor {
    /// Create an executor for the given invocation.
    pub fn new(invocation: Invocation) -> Self {
        Self { invocation }
    }

    /// Spawn the child, feed its stdin, wait for termination, drain the
    /// capture pipes, and assemble the result.
    ///
    /// A non-zero exit is a normal outcome; the call only fails for a
    /// malformed invocation, a spawn-level failure, an I/O failure while
    /// waiting or draining, or (when the `assert_success` flag is set) a
    /// child that reports non-success.
    pub fn run(mut self) -> Result<ExecResult> {
        self.invocation.validate()?;
        let command_display = self.invocation.command.to_string();

        let mut cmd = build_os_command(&self.invocation);

        // Stdin gets a pipe unless explicitly redirected, so the engine
        // can either feed it or close it immediately.
        match self.invocation.stdin_redirect.take() {
            Some(redirect) => cmd.stdin(stdio_for(redirect)),
            None => cmd.stdin(Stdio::piped()),
        };

        // Out/err wiring: an explicit redirect wins over capture, capture
        // wins over inheriting the parent's streams.
        let mut combined_reader = None;
        if self.invocation.capture_combined {
            let (reader, writer) = io::pipe()?;
            match self.invocation.stdout_redirect.take() {
                Some(redirect) => cmd.stdout(stdio_for(redirect)),
                None => cmd.stdout(writer.try_clone()?),
            };
            match self.invocation.stderr_redirect.take() {
                Some(redirect) => cmd.stderr(stdio_for(redirect)),
                None => cmd.stderr(writer),
            };
            combined_reader = Some(reader);
        } else {
            match self.invocation.stdout_redirect.take() {
                Some(redirect) => cmd.stdout(stdio_for(redirect)),
                None if self.invocation.capture_stdout => cmd.stdout(Stdio::piped()),
                None => cmd.stdout(Stdio::inherit()),
            };
            match self.invocation.stderr_redirect.take() {
                Some(redirect) => cmd.stderr(stdio_for(redirect)),
                None if self.invocation.capture_stderr => cmd.stderr(Stdio::piped()),
                None => cmd.stderr(Stdio::inherit()),
            };
        }

        debug!(command = %command_display, "spawning child process");
        let mut child = cmd.spawn().map_err(|source| ShellRelayError::Spawn {
            command: command_display.clone(),
            source,
        })?;
        // The Command keeps its Stdio handles alive; drop it so the parent
        // holds no write end of the capture pipes, or the drains would
        // never see end-of-stream.
        drop(cmd);

        // Feed stdin on its own thread. With no payload the handle is
        // dropped right away, so the child observes immediate end-of-input.
        let feeder = match (child.stdin.take(), self.invocation.stdin.take()) {
            (Some(handle), Some(source)) => {
                Some(thread::spawn(move || feed_stdin(source, handle)))
            }
            (Some(handle), None) => {
                drop(handle);
                None
            }
            (None, _) => None,
        };

        // Start every drain before blocking in wait; a child writing more
        // than an OS pipe buffer would otherwise stall forever.
        let stdout_drain = child.stdout.take().map(spawn_drain);
        let stderr_drain = child.stderr.take().map(spawn_drain);
        let combined_drain = combined_reader.take().map(spawn_drain);

        let status = child.wait()?;

        let stdout_bytes = join_drain("stdout", stdout_drain)?;
        let stderr_bytes = join_drain("stderr", stderr_drain)?;
        let combined_bytes = join_drain("combined", combined_drain)?;
        if let Some(handle) = feeder {
            let _ = handle.join();
        }

        let exit_code = exit_code_of(&status);
        debug!(
            command = %command_display,
            exit_code,
            success = status.success(),
            "child process terminated"
        );

        let result = ExecResult::new(
            command_display,
            exit_code,
            status.success(),
            chomp(decode(stdout_bytes)),
            chomp(decode(stderr_bytes)),
            chomp(decode(combined_bytes)),
        );
        if self.invocation.assert_success {
            result.assert_success()?;
        }
        Ok(result)
    }
}

/// Run a command, capturing stdout and stderr into separate buffers.
pub fn run(command: impl Into<CommandLine>) -> Result<ExecResult> {
    Invocation::new(command)
        .capture_stdout(true)
        .capture_stderr(true)
        .run()
}

/// Run a command with no capture; the child inherits the parent's
/// stdout and stderr.
pub fn run_passthrough(command: impl Into<CommandLine>) -> Result<ExecResult> {
    Invocation::new(command).run()
}

/// Run a command with stdout and stderr interleaved into one buffer,
/// in the order the OS delivers them.
pub fn run_combined(command: impl Into<CommandLine>) -> Result<ExecResult> {
    Invocation::new(command).capture_combined(true).run()
}

/// Run an invocation without blocking the async runtime.
///
/// Wraps the blocking engine in [`tokio::task::spawn_blocking`]; the
/// result contract is identical to [`Invocation::run`].
pub async fn run_async(invocation: Invocation) -> Result<ExecResult> {
    tokio::task::spawn_blocking(move || Executor::new(invocation).run())
        .await
        .map_err(|join_err| ShellRelayError::Io(io::Error::other(join_err)))?
}

fn build_os_command(invocation: &Invocation) -> Command {
    let mut cmd = match &invocation.command {
        CommandLine::Shell(line) => {
            let mut cmd = shell_command();
            cmd.arg(line);
            cmd
        }
        CommandLine::Argv(argv) => {
            let mut cmd = Command::new(&argv[0]);
            cmd.args(&argv[1..]);
            cmd
        }
    };
    cmd.envs(&invocation.env);
    if let Some(dir) = &invocation.working_dir {
        cmd.current_dir(dir);
    }
    cmd
}

#[cfg(unix)]
fn shell_command() -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c");
    cmd
}

#[cfg(windows)]
fn shell_command() -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C");
    cmd
}

fn stdio_for(redirect: Redirect) -> Stdio {
    match redirect {
        Redirect::Inherit => Stdio::inherit(),
        Redirect::Null => Stdio::null(),
        Redirect::File(file) => Stdio::from(file),
    }
}

/// Deliver the stdin payload, then drop the handle so the child sees
/// end-of-input. Errors are recorded and swallowed: the child may
/// legitimately exit without consuming its input, and the engine must
/// still wait on and drain it.
fn feed_stdin(source: StdinSource, mut handle: ChildStdin) {
    let outcome = match source {
        StdinSource::Bytes(bytes) => handle.write_all(&bytes),
        StdinSource::Reader(mut reader) => io::copy(&mut reader, &mut handle).map(|_| ()),
        StdinSource::Writer(write) => write(&mut handle),
    };
    if let Err(err) = outcome {
        debug!(error = %err, "stdin feed ended early");
    }
}

fn spawn_drain(mut reader: impl Read + Send + 'static) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_drain(
    label: &'static str,
    handle: Option<JoinHandle<io::Result<Vec<u8>>>>,
) -> Result<Vec<u8>> {
    match handle {
        None => Ok(Vec::new()),
        Some(handle) => match handle.join() {
            Ok(bytes) => {
                let bytes = bytes.map_err(ShellRelayError::Io)?;
                debug!(stream = label, bytes = bytes.len(), "drained capture pipe");
                Ok(bytes)
            }
            Err(join_err) => {
                warn!(stream = label, ?join_err, "drain thread panicked");
                Err(ShellRelayError::Io(io::Error::other(format!(
                    "{label} drain thread panicked"
                ))))
            }
        },
    }
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Strip exactly one trailing line terminator, if present. Interior
/// content is preserved byte-for-byte.
fn chomp(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

fn exit_code_of(status: &ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .or_else(|| status.signal().map(|sig| 128 + sig))
            .unwrap_or(-1)
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(-1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chomp_strips_one_newline() {
        assert_eq!(chomp("hello\n".into()), "hello");
        assert_eq!(chomp("hello\r\n".into()), "hello");
    }

    #[test]
    fn test_chomp_strips_only_one_terminator() {
        assert_eq!(chomp("hello\n\n".into()), "hello\n");
        assert_eq!(chomp("a\nb\n".into()), "a\nb");
    }

    #[test]
    fn test_chomp_leaves_unterminated_text() {
        assert_eq!(chomp("hello".into()), "hello");
        assert_eq!(chomp(String::new()), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_simple_echo() {
        let result = run("echo test").unwrap();
        assert!(result.success());
        assert_eq!(result.stdout(), "test");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_nonzero_exit_is_ok() {
        let result = run("exit 1").unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_error_for_missing_program() {
        let invocation = Invocation::new(["/nonexistent/definitely-not-a-binary"]);
        let err = Executor::new(invocation).run().unwrap_err();
        assert!(matches!(err, ShellRelayError::Spawn { .. }));
    }
}
