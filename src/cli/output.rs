//! Console output for pipeline progress and relayed process output.
//!
//! Diagnostics go through `log`; this is the operator-facing stream. Command
//! echoes, relayed process lines, warnings and errors are always printed;
//! `quiet` only silences progress chatter.

use std::io::{self, Write};

/// Terminal output with verbose/quiet switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Echoes a command line before it runs.
    pub fn command(&self, command: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "> {command}")
    }

    /// Prints one relayed line of process output.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "    {message}")
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        writeln!(out)?;
        writeln!(out, "==> {title}")
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout().lock(), "  ✓ {message}")
    }

    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        writeln!(io::stdout().lock(), "    {message}")
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "  ! {message}")
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "  ✗ {message}")
    }
}
