//! Output sinks for the result of an invocation

use std::fs::OpenOptions;
use std::io::{self, Stderr, Stdout, Write};
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

/// Receives step outputs and the failure reason of an invocation
pub trait Reporter {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()>;

    fn set_failed(&mut self, message: &str) -> io::Result<()>;

    /// Flush anything buffered; called once after the last output
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reports through GitHub Actions step outputs and workflow commands
pub struct GitHubReporter<W: Write = Stdout> {
    output_file: Option<PathBuf>,
    out: W,
}

impl GitHubReporter<Stdout> {
    pub fn new(output_file: Option<PathBuf>) -> Self {
        Self::with_writer(output_file, io::stdout())
    }
}

impl<W: Write> GitHubReporter<W> {
    pub fn with_writer(output_file: Option<PathBuf>, out: W) -> Self {
        Self { output_file, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for GitHubReporter<W> {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        let Some(path) = &self.output_file else {
            return writeln!(self.out, "{name}={value}");
        };

        debug!("Appending output '{}' to {:?}", name, path);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(format_output_line(name, value).as_bytes())
    }

    fn set_failed(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::error::{}", escape_command_data(message))
    }
}

/// Format one entry of the `GITHUB_OUTPUT` file.
///
/// Multi-line values use the `name<<DELIMITER` form with a delimiter that
/// does not occur in the value.
fn format_output_line(name: &str, value: &str) -> String {
    if !value.contains(['\n', '\r']) {
        return format!("{name}={value}\n");
    }

    let mut delimiter = String::from("EOF");
    while value.lines().any(|line| line == delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Escape the message part of a workflow command
fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format of [`ConsoleReporter`] output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFormat {
    /// `name=value` lines
    Text,
    /// A single JSON object written on finish
    Json,
}

/// Reports on stdout, failures on stderr
pub struct ConsoleReporter<O: Write = Stdout, E: Write = Stderr> {
    format: ConsoleFormat,
    outputs: IndexMap<String, String>,
    failed: bool,
    out: O,
    err: E,
}

impl ConsoleReporter {
    pub fn new(format: ConsoleFormat) -> Self {
        Self::with_writers(format, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn with_writers(format: ConsoleFormat, out: O, err: E) -> Self {
        Self {
            format,
            outputs: IndexMap::new(),
            failed: false,
            out,
            err,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        match self.format {
            ConsoleFormat::Text => writeln!(self.out, "{name}={value}"),
            ConsoleFormat::Json => {
                self.outputs.insert(name.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    fn set_failed(&mut self, message: &str) -> io::Result<()> {
        self.failed = true;
        match self.format {
            ConsoleFormat::Text => writeln!(self.err, "Error: {message}"),
            ConsoleFormat::Json => {
                let body = serde_json::json!({ "error": message });
                serde_json::to_writer(&mut self.err, &body)?;
                writeln!(self.err)
            }
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        // A failed run has no outputs object
        if self.format == ConsoleFormat::Json && !self.failed {
            serde_json::to_writer(&mut self.out, &self.outputs)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}
