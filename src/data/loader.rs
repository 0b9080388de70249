use crate::error::StstError;
use encoding_rs::Encoding;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::encoding;

/// Where the data document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Stdin,
}

impl DataSource {
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) => DataSource::File(path.to_path_buf()),
            None => DataSource::Stdin,
        }
    }
}

/// Syntax of the data document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// `.yaml` and `.yml` files are YAML, everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => DataFormat::Yaml,
            _ => DataFormat::Json,
        }
    }
}

pub struct DataLoader {
    encoding: &'static Encoding,
}

impl DataLoader {
    pub fn new(encoding: &'static Encoding) -> Self {
        Self { encoding }
    }

    /// Load the top-level data object from a file or stdin
    pub fn load(&self, source: &DataSource) -> Result<Map<String, Value>, StstError> {
        match source {
            DataSource::File(path) => self.load_file(path),
            DataSource::Stdin => self.load_reader(io::stdin().lock(), "<stdin>", DataFormat::Json),
        }
    }

    /// Load a single data file (JSON, or YAML by extension)
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Map<String, Value>, StstError> {
        let path = path.as_ref();

        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StstError::DataFileNotFound {
                path: path.to_path_buf(),
            },
            _ => StstError::DataRead { source: e },
        })?;

        let text = encoding::decode(&bytes, self.encoding, &path.display().to_string());
        self.parse(&text, DataFormat::from_path(path))
    }

    /// Read the whole stream and parse it
    pub fn load_reader<R: Read>(
        &self,
        mut reader: R,
        origin: &str,
        format: DataFormat,
    ) -> Result<Map<String, Value>, StstError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| StstError::DataRead { source: e })?;

        let text = encoding::decode(&bytes, self.encoding, origin);
        self.parse(&text, format)
    }

    /// Parse text into the top-level object; anything but an object is rejected
    pub fn parse(&self, text: &str, format: DataFormat) -> Result<Map<String, Value>, StstError> {
        let value: Value = match format {
            DataFormat::Json => serde_json::from_str(text).map_err(|e| StstError::DataParse {
                source: anyhow::Error::new(e),
            })?,
            DataFormat::Yaml => serde_yaml::from_str(text).map_err(|e| StstError::DataParse {
                source: anyhow::Error::new(e),
            })?,
        };

        match value {
            Value::Object(map) => {
                debug!("loaded {} top-level data fields", map.len());
                Ok(map)
            }
            other => Err(StstError::DataNotObject {
                found: json_type_name(&other),
            }),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
