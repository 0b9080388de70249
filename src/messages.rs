//! User-facing message table.
//!
//! Every diagnostic the tool prints goes through a [`Messages`] table keyed by
//! [`MessageKey`]. Formats use `{0}`, `{1}`, ... for positional arguments. The
//! English table is built in; a properties file (`Key=Value` per line) can
//! replace any subset of it.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::StstError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    VersionBanner,
    Timing,
    InvalidDirectory,
    InvalidStartStop,
    NoSuchRenderer,
    TooManyParameters,
    UnknownEncoding,
    MessageTable,
    DataFileNotFound,
    ErrorReadingData,
    JsonError,
    DataNotObject,
    NoSuchTemplate,
    ErrorGettingTemplate,
    TemplateOutsideDirectory,
    CircularImport,
    IgnoreAttribute,
    RuntimeError,
    OutputFileNotFound,
    ErrorWritingOutput,
    CompileTimeError,
    RunTimeError,
    IoError,
    InternalError,
}

impl MessageKey {
    pub const ALL: [MessageKey; 24] = [
        MessageKey::VersionBanner,
        MessageKey::Timing,
        MessageKey::InvalidDirectory,
        MessageKey::InvalidStartStop,
        MessageKey::NoSuchRenderer,
        MessageKey::TooManyParameters,
        MessageKey::UnknownEncoding,
        MessageKey::MessageTable,
        MessageKey::DataFileNotFound,
        MessageKey::ErrorReadingData,
        MessageKey::JsonError,
        MessageKey::DataNotObject,
        MessageKey::NoSuchTemplate,
        MessageKey::ErrorGettingTemplate,
        MessageKey::TemplateOutsideDirectory,
        MessageKey::CircularImport,
        MessageKey::IgnoreAttribute,
        MessageKey::RuntimeError,
        MessageKey::OutputFileNotFound,
        MessageKey::ErrorWritingOutput,
        MessageKey::CompileTimeError,
        MessageKey::RunTimeError,
        MessageKey::IoError,
        MessageKey::InternalError,
    ];

    /// The key as it appears in a properties file
    pub fn name(self) -> &'static str {
        match self {
            MessageKey::VersionBanner => "VersionBanner",
            MessageKey::Timing => "Timing",
            MessageKey::InvalidDirectory => "InvalidDirectory",
            MessageKey::InvalidStartStop => "InvalidStartStop",
            MessageKey::NoSuchRenderer => "NoSuchRenderer",
            MessageKey::TooManyParameters => "TooManyParameters",
            MessageKey::UnknownEncoding => "UnknownEncoding",
            MessageKey::MessageTable => "MessageTable",
            MessageKey::DataFileNotFound => "DataFileNotFound",
            MessageKey::ErrorReadingData => "ErrorReadingData",
            MessageKey::JsonError => "JSONError",
            MessageKey::DataNotObject => "DataNotObject",
            MessageKey::NoSuchTemplate => "NoSuchTemplate",
            MessageKey::ErrorGettingTemplate => "ErrorGettingTemplate",
            MessageKey::TemplateOutsideDirectory => "TemplateOutsideDirectory",
            MessageKey::CircularImport => "CircularImport",
            MessageKey::IgnoreAttribute => "IgnoreAttribute",
            MessageKey::RuntimeError => "RuntimeError",
            MessageKey::OutputFileNotFound => "OutputFileNotFound",
            MessageKey::ErrorWritingOutput => "ErrorWritingOutput",
            MessageKey::CompileTimeError => "CompileTimeError",
            MessageKey::RunTimeError => "RunTimeError",
            MessageKey::IoError => "IOError",
            MessageKey::InternalError => "InternalError",
        }
    }

    pub fn from_name(name: &str) -> Option<MessageKey> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    fn english(self) -> &'static str {
        match self {
            MessageKey::VersionBanner => "stst version {0}",
            MessageKey::Timing => "Generation took {0} seconds",
            MessageKey::InvalidDirectory => {
                "'{0}' is not a directory, using the current directory instead"
            }
            MessageKey::InvalidStartStop => {
                "Start/stop delimiters must be exactly two characters, ignoring '{0}'"
            }
            MessageKey::NoSuchRenderer => "No such format renderer '{0}'",
            MessageKey::TooManyParameters => "Too many parameters, ignoring '{0}'",
            MessageKey::UnknownEncoding => "Unknown character encoding '{0}'",
            MessageKey::MessageTable => "Failed to read message table '{0}': {1}",
            MessageKey::DataFileNotFound => "Data file '{0}' not found",
            MessageKey::ErrorReadingData => "Error reading data: {0}",
            MessageKey::JsonError => "Error parsing JSON data: {0}",
            MessageKey::DataNotObject => "JSON data must be an object but found {0}",
            MessageKey::NoSuchTemplate => "No such template '{0}'",
            MessageKey::ErrorGettingTemplate => "Error getting template '{0}'",
            MessageKey::TemplateOutsideDirectory => {
                "Template '{0}' is outside the template directory"
            }
            MessageKey::CircularImport => "Circular group import of '{0}'",
            MessageKey::IgnoreAttribute => "Ignoring attribute '{0}' not defined by the template",
            MessageKey::RuntimeError => "Runtime error:",
            MessageKey::OutputFileNotFound => "Unable to write output file '{0}': {1}",
            MessageKey::ErrorWritingOutput => "Error writing output: {0}",
            MessageKey::CompileTimeError => "Compile time error:",
            MessageKey::RunTimeError => "Run time error:",
            MessageKey::IoError => "I/O error:",
            MessageKey::InternalError => "Internal error:",
        }
    }
}

/// Lookup table of message formats
#[derive(Debug, Clone)]
pub struct Messages {
    table: HashMap<MessageKey, String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self::english()
    }
}

impl Messages {
    pub fn english() -> Self {
        let table = MessageKey::ALL
            .into_iter()
            .map(|key| (key, key.english().to_string()))
            .collect();
        Self { table }
    }

    /// Load the English table, then apply overrides from `path` if given
    pub fn load(path: Option<&Path>) -> Result<Self, StstError> {
        let mut messages = Self::english();
        if let Some(path) = path {
            let text = fs::read_to_string(path).map_err(|e| StstError::MessageTable {
                path: path.to_path_buf(),
                source: e,
            })?;
            messages.apply_properties(&text);
        }
        Ok(messages)
    }

    /// Apply `Key=Value` lines. Blank lines and lines starting with `#` or `!`
    /// are skipped; unknown keys are reported and ignored.
    pub fn apply_properties(&mut self, text: &str) {
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((name, value)) = line.split_once('=') else {
                warn!("message table line {} has no '=', skipped", index + 1);
                continue;
            };
            match MessageKey::from_name(name.trim()) {
                Some(key) => {
                    self.table.insert(key, value.trim().replace("\\n", "\n"));
                }
                None => warn!("unknown message key '{}' skipped", name.trim()),
            }
        }
    }

    pub fn get(&self, key: MessageKey) -> &str {
        self.table
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.english())
    }

    /// Format the message for `key`, substituting `{n}` with `args[n]`
    pub fn format(&self, key: MessageKey, args: &[&dyn fmt::Display]) -> String {
        format_positional(self.get(key), args)
    }

    /// Localized, user-facing description of an error
    pub fn describe(&self, err: &StstError) -> String {
        match err {
            StstError::UnknownEncoding(label) => self.format(MessageKey::UnknownEncoding, &[label]),
            StstError::MessageTable { path, source } => {
                self.format(MessageKey::MessageTable, &[&path.display(), source])
            }
            StstError::DataFileNotFound { path } => {
                self.format(MessageKey::DataFileNotFound, &[&path.display()])
            }
            StstError::DataRead { source } => self.format(MessageKey::ErrorReadingData, &[source]),
            StstError::DataParse { source } => self.format(MessageKey::JsonError, &[source]),
            StstError::DataNotObject { found } => self.format(MessageKey::DataNotObject, &[found]),
            StstError::NoSuchTemplate { name } => self.format(MessageKey::NoSuchTemplate, &[name]),
            StstError::TemplateLoad { name, .. } => {
                self.format(MessageKey::ErrorGettingTemplate, &[name])
            }
            StstError::PathTraversal { name } => {
                self.format(MessageKey::TemplateOutsideDirectory, &[name])
            }
            StstError::CircularImport { path } => {
                self.format(MessageKey::CircularImport, &[&path.display()])
            }
            StstError::Render { source } => {
                format!("{} {}", self.get(MessageKey::RuntimeError), source)
            }
            StstError::OutputFile { path, source } => {
                self.format(MessageKey::OutputFileNotFound, &[&path.display(), source])
            }
            StstError::Io(source) => self.format(MessageKey::ErrorWritingOutput, &[source]),
        }
    }
}

/// Replace `{0}`, `{1}`, ... in `template` with the matching argument.
/// Placeholders without an argument are left as they are.
pub fn format_positional(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let index = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));
        match index {
            Some((i, close)) if i < args.len() => {
                result.push_str(&args[i].to_string());
                rest = &after[close + 1..];
            }
            _ => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}
