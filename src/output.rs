use std::io::{self, Write};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::data::encoding;
use crate::error::StstError;

/// Where rendered text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    /// Written through a temporary file next to the destination, so the
    /// destination only appears once everything has been written
    File(PathBuf),
}

impl Output {
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Output::File(path.to_path_buf()),
            None => Output::Stdout,
        }
    }

    /// Encode `text` and write all of it
    pub fn write(&self, text: &str, encoding: &'static Encoding) -> Result<(), StstError> {
        let bytes = encoding::encode(text, encoding);
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(&bytes)?;
                stdout.flush()?;
                Ok(())
            }
            Output::File(path) => write_file(path, &bytes),
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StstError> {
    let output_error = |source: io::Error| StstError::OutputFile {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(output_error)?;
    temp.write_all(bytes).map_err(output_error)?;
    temp.flush().map_err(output_error)?;
    temp.persist(path).map_err(|e| output_error(e.error))?;

    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
