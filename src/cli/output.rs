//! Colored terminal output.
//!
//! Progress and success lines go to stdout, warnings and errors to stderr.
//! Colors are chosen automatically (disabled when not writing to a terminal).

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, Write};

/// Writes user-facing messages honoring verbose and quiet modes.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Detail line, verbose mode only.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        write_colored(StandardStream::stdout(ColorChoice::Auto), None, "", message)
    }

    /// Progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        write_colored(
            StandardStream::stdout(ColorChoice::Auto),
            Some(Color::Cyan),
            "→ ",
            message,
        )
    }

    /// Success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        write_colored(
            StandardStream::stdout(ColorChoice::Auto),
            Some(Color::Green),
            "✓ ",
            message,
        )
    }

    /// Warning line on stderr.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        write_colored(
            StandardStream::stderr(ColorChoice::Auto),
            Some(Color::Yellow),
            "warning: ",
            message,
        )
    }

    /// Error line on stderr, printed even in quiet mode.
    pub fn error(&self, message: &str) -> io::Result<()> {
        write_colored(
            StandardStream::stderr(ColorChoice::Auto),
            Some(Color::Red),
            "error: ",
            message,
        )
    }

    /// Section header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        stream.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(stream, "{title}")?;
        stream.reset()
    }

    /// Indented plain line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        writeln!(stream, "  {message}")
    }

    /// Prompt text without a trailing newline.
    pub fn prompt(&self, message: &str) -> io::Result<()> {
        let mut stream = StandardStream::stdout(ColorChoice::Auto);
        stream.set_color(ColorSpec::new().set_bold(true))?;
        write!(stream, "{message}")?;
        stream.reset()?;
        stream.flush()
    }
}

fn write_colored(
    mut stream: StandardStream,
    color: Option<Color>,
    prefix: &str,
    message: &str,
) -> io::Result<()> {
    if let Some(color) = color {
        stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stream, "{prefix}")?;
        stream.reset()?;
    } else {
        write!(stream, "{prefix}")?;
    }
    writeln!(stream, "{message}")
}
