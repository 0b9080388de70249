//! Error listener shim between the template engine and the log.
//!
//! Engine errors and group file parse errors are turned into [`Diagnostic`]s,
//! sorted into four categories and handed to an [`ErrorListener`]. The
//! default listener logs them with a localized category prefix.

use std::error::Error as _;
use std::fmt;

use minijinja::ErrorKind;
use tracing::error;

use crate::messages::{format_positional, MessageKey, Messages};

/// At most this many arguments are kept for a diagnostic message
pub const MAX_ARGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    CompileTime,
    RunTime,
    Io,
    Internal,
}

impl DiagnosticKind {
    pub fn of(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::SyntaxError | ErrorKind::BadEscape | ErrorKind::InvalidDelimiter => {
                DiagnosticKind::CompileTime
            }
            ErrorKind::TemplateNotFound | ErrorKind::WriteFailure => DiagnosticKind::Io,
            ErrorKind::BadSerialization => DiagnosticKind::Internal,
            _ => DiagnosticKind::RunTime,
        }
    }

    pub fn prefix_key(self) -> MessageKey {
        match self {
            DiagnosticKind::CompileTime => MessageKey::CompileTimeError,
            DiagnosticKind::RunTime => MessageKey::RunTimeError,
            DiagnosticKind::Io => MessageKey::IoError,
            DiagnosticKind::Internal => MessageKey::InternalError,
        }
    }
}

/// A single problem reported while loading or rendering templates
#[derive(Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    message: String,
    args: Vec<String>,
    debug_info: Option<String>,
}

impl Diagnostic {
    /// A diagnostic with a `{0}`..`{2}` message template; surplus arguments are dropped
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, args: &[&dyn fmt::Display]) -> Self {
        Self {
            kind,
            message: message.into(),
            args: args.iter().take(MAX_ARGS).map(|a| a.to_string()).collect(),
            debug_info: None,
        }
    }

    pub fn from_engine(err: &minijinja::Error) -> Self {
        let summary = match err.detail() {
            Some(detail) => format!("{}: {}", err.kind(), detail),
            None => err.kind().to_string(),
        };
        let mut diagnostic = match (err.name(), err.line()) {
            (Some(name), Some(line)) => Diagnostic::new(
                DiagnosticKind::of(err.kind()),
                "{0} (in {1}:{2})",
                &[&summary, &name, &line],
            ),
            _ => Diagnostic::new(DiagnosticKind::of(err.kind()), "{0}", &[&summary]),
        };
        diagnostic.debug_info = Some(debug_info(err));
        diagnostic
    }

    /// The formatted message template
    pub fn terse(&self) -> String {
        let args: Vec<&dyn fmt::Display> = self.args.iter().map(|a| a as &dyn fmt::Display).collect();
        format_positional(&self.message, &args)
    }

    /// The formatted message plus the engine's debug info and source chain
    pub fn verbose(&self) -> String {
        match &self.debug_info {
            Some(info) if !info.is_empty() => format!("{}\n{}", self.terse(), info),
            _ => self.terse(),
        }
    }
}

fn debug_info(err: &minijinja::Error) -> String {
    let mut lines = Vec::new();
    if err.name().is_some() {
        lines.push(err.display_debug_info().to_string());
    }
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.terse())
    }
}

/// Receives template diagnostics by category
pub trait ErrorListener {
    fn compile_time_error(&self, diagnostic: &Diagnostic);
    fn run_time_error(&self, diagnostic: &Diagnostic);
    fn io_error(&self, diagnostic: &Diagnostic);
    fn internal_error(&self, diagnostic: &Diagnostic);

    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::CompileTime => self.compile_time_error(diagnostic),
            DiagnosticKind::RunTime => self.run_time_error(diagnostic),
            DiagnosticKind::Io => self.io_error(diagnostic),
            DiagnosticKind::Internal => self.internal_error(diagnostic),
        }
    }
}

/// Logs every diagnostic at error level with its localized category prefix
pub struct LoggingErrorListener<'a> {
    verbose: bool,
    messages: &'a Messages,
}

impl<'a> LoggingErrorListener<'a> {
    pub fn new(messages: &'a Messages, verbose: bool) -> Self {
        Self { verbose, messages }
    }

    fn log(&self, diagnostic: &Diagnostic) {
        let text = if self.verbose {
            diagnostic.verbose()
        } else {
            diagnostic.terse()
        };
        error!("{} {}", self.messages.get(diagnostic.kind.prefix_key()), text);
    }
}

impl ErrorListener for LoggingErrorListener<'_> {
    fn compile_time_error(&self, diagnostic: &Diagnostic) {
        self.log(diagnostic);
    }

    fn run_time_error(&self, diagnostic: &Diagnostic) {
        self.log(diagnostic);
    }

    fn io_error(&self, diagnostic: &Diagnostic) {
        self.log(diagnostic);
    }

    fn internal_error(&self, diagnostic: &Diagnostic) {
        self.log(diagnostic);
    }
}
