use std::path::PathBuf;

/// Exit codes for the `stst` binary
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Main error type for stst.
///
/// Every variant aborts the run. Recoverable conditions (unknown attributes,
/// missing properties) have their own types next to the code that raises them.
#[derive(Debug, thiserror::Error)]
pub enum StstError {
    // Configuration errors
    #[error("Unknown character encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Failed to read message table '{}': {source}", path.display())]
    MessageTable {
        path: PathBuf,
        source: std::io::Error,
    },

    // Data loading errors
    #[error("Data file '{}' not found", path.display())]
    DataFileNotFound { path: PathBuf },

    #[error("Error reading data: {source}")]
    DataRead { source: std::io::Error },

    #[error("Error parsing JSON data: {source}")]
    DataParse { source: anyhow::Error },

    #[error("JSON data must be an object but found {found}")]
    DataNotObject { found: &'static str },

    // Template resolution errors
    #[error("No such template '{name}'")]
    NoSuchTemplate { name: String },

    #[error("Error getting template '{name}'")]
    TemplateLoad {
        name: String,
        #[source]
        source: Option<minijinja::Error>,
    },

    #[error("Template '{name}' is outside the template directory")]
    PathTraversal { name: String },

    #[error("Circular group import of '{}'", path.display())]
    CircularImport { path: PathBuf },

    // Rendering errors
    #[error("Runtime error: {source}")]
    Render { source: minijinja::Error },

    #[error("Unable to write output file '{}': {source}", path.display())]
    OutputFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error writing output: {0}")]
    Io(#[from] std::io::Error),
}

impl StstError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }
}
