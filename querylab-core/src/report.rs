//! Console status lines
//!
//! Each line carries a [`Severity`]. When colour is on the severity selects
//! the ANSI colour of the whole line; otherwise the text is written bare.

use std::io::{self, IsTerminal, Write};

use crate::error::Result;

/// Severity class of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Notice,
    Error,
    Success,
}

impl Severity {
    fn ansi(self) -> &'static str {
        match self {
            Severity::Warning => "\x1b[33m",
            Severity::Notice => "\x1b[36m",
            Severity::Error => "\x1b[31m",
            Severity::Success => "\x1b[32m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Line-oriented writer for run status
pub struct Console<W: Write> {
    out: W,
    color: bool,
}

impl Console<io::Stdout> {
    /// Stdout console; colour only on a terminal and when `NO_COLOR` is unset.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { out, color }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn line(&mut self, severity: Severity, message: impl AsRef<str>) -> Result<()> {
        let message = message.as_ref();
        if self.color {
            writeln!(self.out, "{}{}{}", severity.ansi(), message, RESET)?;
        } else {
            writeln!(self.out, "{}", message)?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn warning(&mut self, message: impl AsRef<str>) -> Result<()> {
        self.line(Severity::Warning, message)
    }

    pub fn notice(&mut self, message: impl AsRef<str>) -> Result<()> {
        self.line(Severity::Notice, message)
    }

    pub fn error(&mut self, message: impl AsRef<str>) -> Result<()> {
        self.line(Severity::Error, message)
    }

    pub fn success(&mut self, message: impl AsRef<str>) -> Result<()> {
        self.line(Severity::Success, message)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
