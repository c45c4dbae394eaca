//! Markup conversion: page body bytes in, HTML bytes out.
//!
//! The rest of the pipeline only sees the [`MarkupConverter`] trait, so the
//! converter can be swapped without touching page processing.
//!
//! | Converter | Runs | Used by |
//! |-----------|------|---------|
//! | [`ExternalConverter`] | the `markdown` command, body on stdin, HTML on stdout | the CLI |
//! | [`BuiltinConverter`] | `pulldown-cmark` in-process | tests and library callers |
//!
//! Each external conversion spawns its own process, so conversions never
//! share a pipe.

use pulldown_cmark::{Parser, html as md_html};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::thread;
use thiserror::Error;

/// Command run by the CLI to convert page bodies.
pub const MARKDOWN_COMMAND: &str = "markdown";

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("markup converter `{command}` not found: {source}")]
    NotFound {
        command: String,
        #[source]
        source: which::Error,
    },
    #[error("IO error talking to `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Converts a page body to HTML.
pub trait MarkupConverter {
    /// Confirm the converter can run. Called once before any work starts.
    fn check(&self) -> Result<(), ConvertError> {
        Ok(())
    }

    /// The body is raw page bytes, not necessarily UTF-8.
    fn convert(&self, body: &[u8]) -> Result<Vec<u8>, ConvertError>;
}

/// Pipes the body through an external command.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    command: String,
    args: Vec<String>,
}

impl ExternalConverter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Full path of the command on `PATH`.
    pub fn locate(&self) -> Result<PathBuf, ConvertError> {
        which::which(&self.command).map_err(|source| ConvertError::NotFound {
            command: self.command.clone(),
            source,
        })
    }

    fn io_error(&self, source: std::io::Error) -> ConvertError {
        ConvertError::Io {
            command: self.command.clone(),
            source,
        }
    }
}

impl Default for ExternalConverter {
    fn default() -> Self {
        Self::new(MARKDOWN_COMMAND)
    }
}

impl MarkupConverter for ExternalConverter {
    fn check(&self) -> Result<(), ConvertError> {
        self.locate().map(|_| ())
    }

    fn convert(&self, body: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.io_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.io_error(std::io::Error::other("stdin not captured")))?;

        // Feed stdin from a separate thread so a large body cannot block
        // against a full stdout pipe.
        let output = thread::scope(|s| -> std::io::Result<Output> {
            let writer = s.spawn(move || stdin.write_all(body));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            let output = output?;
            // A converter that exits without reading all input closes the
            // pipe early; its exit status is the better error.
            if output.status.success() {
                written?;
            }
            Ok(output)
        })
        .map_err(|e| self.io_error(e))?;

        if !output.status.success() {
            return Err(ConvertError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// In-process CommonMark conversion with `pulldown-cmark`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinConverter;

impl MarkupConverter for BuiltinConverter {
    fn convert(&self, body: &[u8]) -> Result<Vec<u8>, ConvertError> {
        // CommonMark input is text; invalid sequences become U+FFFD.
        let text = String::from_utf8_lossy(body);
        let parser = Parser::new(&text);
        let mut html = String::with_capacity(body.len() * 3 / 2);
        md_html::push_html(&mut html, parser);
        Ok(html.into_bytes())
    }
}
