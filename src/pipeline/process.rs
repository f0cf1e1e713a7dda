//! Shell command execution with concurrent output relay.
//!
//! This is the only place that talks to the OS process API. Commands run
//! through the platform shell (`sh -c` / `cmd /C`).
//!
//! On Windows the command text is appended to the `cmd /C` line verbatim.
//! Regular argument quoting would wrap it in quotes and escape its inner
//! quotes as `\"`, which `cmd` passes through to the program unchanged.
//!
//! A timeout kills the shell only. Programs the shell started may outlive
//! it until they notice their output pipe has closed.
//!
//! When an observer is supplied, stdout and stderr are each drained on their
//! own tokio task. Both tasks forward lines into one channel and a single
//! consumer echoes every line and then hands it to the observer, so the
//! observer never runs concurrently with itself and needs no locking. Lines
//! of one stream keep their order; stdout and stderr interleave arbitrarily.

use crate::{
    cli::OutputManager,
    pipeline::{Error, Platform, Result},
};
use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::{Child, Command},
    sync::mpsc,
    task::JoinHandle,
};

/// Exit code reported for a child that ended without one (killed by signal).
pub const NO_EXIT_CODE: i32 = -1;

/// One command to run.
#[derive(Debug, Clone)]
pub struct Invocation {
    command: String,
    current_dir: Option<PathBuf>,
    dry_run: bool,
}

impl Invocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            current_dir: None,
            dry_run: false,
        }
    }

    /// Working directory. Defaults to the process's current directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Echo only; report success without executing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Runs shell commands and relays their output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    platform: Platform,
    output: OutputManager,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// `timeout` bounds each command; `None` waits indefinitely.
    pub fn new(platform: Platform, output: OutputManager, timeout: Option<Duration>) -> Self {
        Self {
            platform,
            output,
            timeout,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn output(&self) -> &OutputManager {
        &self.output
    }

    /// Runs a command with its streams inherited from this process.
    ///
    /// Returns the exit code; non-zero is passed through uninterpreted.
    pub async fn run(&self, invocation: Invocation) -> Result<i32> {
        self.execute(invocation, None).await
    }

    /// Runs a command, capturing both streams line by line.
    ///
    /// Every line is echoed to the console first, then passed to `on_line`.
    /// Returns once the process has exited and both streams are drained.
    pub async fn run_observed<F>(&self, invocation: Invocation, mut on_line: F) -> Result<i32>
    where
        F: FnMut(&str),
    {
        self.execute(invocation, Some(&mut on_line)).await
    }

    async fn execute(
        &self,
        invocation: Invocation,
        on_line: Option<&mut dyn FnMut(&str)>,
    ) -> Result<i32> {
        self.output.command(&invocation.command)?;

        if invocation.dry_run {
            log::info!("dry run, not executing: {}", invocation.command);
            return Ok(0);
        }

        let (shell, flag) = self.platform.shell();
        let mut command = shell_command(shell, flag, &invocation.command);
        command.kill_on_drop(true);
        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }
        if on_line.is_some() {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        log::debug!("spawning {shell} {flag} {:?}", invocation.command);
        let mut child = command.spawn().map_err(|error| Error::CommandFailed {
            command: invocation.command.clone(),
            error,
        })?;

        let finished = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, self.drive(&mut child, on_line)).await {
                    Ok(result) => result,
                    Err(_elapsed) => {
                        self.output.warn(&format!(
                            "`{}` timed out after {limit:?}, terminating...",
                            invocation.command
                        ))?;
                        if let Err(e) = child.kill().await {
                            log::warn!("failed to kill timed-out process: {e}");
                        }
                        return Err(Error::CommandTimedOut {
                            command: invocation.command,
                            timeout: limit,
                        });
                    }
                }
            }
            None => self.drive(&mut child, on_line).await,
        };

        let status = finished.map_err(|error| Error::CommandFailed {
            command: invocation.command.clone(),
            error,
        })?;

        let code = status.code().unwrap_or(NO_EXIT_CODE);
        log::debug!("`{}` exited with {code}", invocation.command);
        Ok(code)
    }

    /// Relays output (if captured) until both streams close, then reaps the
    /// child.
    async fn drive(
        &self,
        child: &mut Child,
        on_line: Option<&mut dyn FnMut(&str)>,
    ) -> std::io::Result<std::process::ExitStatus> {
        if let Some(on_line) = on_line {
            let (tx, mut rx) = mpsc::unbounded_channel::<String>();

            let relays: Vec<JoinHandle<()>> = [
                child.stdout.take().map(|s| spawn_relay(s, tx.clone())),
                child.stderr.take().map(|s| spawn_relay(s, tx.clone())),
            ]
            .into_iter()
            .flatten()
            .collect();
            // The channel closes once both relays have dropped their senders.
            drop(tx);

            while let Some(line) = rx.recv().await {
                self.output.indent(&line)?;
                on_line(&line);
            }

            for relay in relays {
                if let Err(e) = relay.await {
                    log::warn!("output relay task failed: {e}");
                }
            }
        }

        child.wait().await
    }
}

/// `shell flag text`, with `text` passed as a single shell argument.
fn shell_command(shell: &str, flag: &str, text: &str) -> Command {
    let mut command = Command::new(shell);
    command.arg(flag);
    #[cfg(windows)]
    command.raw_arg(text);
    #[cfg(not(windows))]
    command.arg(text);
    command
}

/// Forwards each line of `stream` into `tx` until EOF.
///
/// Lines are decoded lossily so invalid UTF-8 never stops the drain (a
/// stalled reader would block the child on a full pipe).
fn spawn_relay<R>(stream: R, tx: mpsc::UnboundedSender<String>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']).to_string();
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("error reading process output: {e}");
                    break;
                }
            }
        }
    })
}
