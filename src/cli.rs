use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use crate::config::{Delimiters, Settings, TemplateMode};
use crate::data::encoding;
use crate::error::StstError;
use crate::messages::{MessageKey, Messages};
use crate::template::renderer::RendererKind;

#[derive(Parser, Debug)]
#[command(
    name = "stst",
    version,
    about = "Render a template against JSON data",
    long_about = "Renders a named template with the top-level fields of a JSON document bound as \
                  template attributes. The template is looked up in the template directory, either \
                  as <name>.st or as a template inside the group file <group>.stg when the \
                  specifier has the form <group>.<name>. Expressions are written between the start \
                  and stop delimiters ($name$ by default), statements as $% ... %$ and comments as \
                  $! ... !$."
)]
pub struct Cli {
    /// Template to render: <template-name> or <group-name>.<template-name>
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// JSON data file. If not specified, data is read from stdin.
    #[arg(value_name = "JSON-FILE")]
    pub data: Option<PathBuf>,

    /// Surplus positional arguments, reported and ignored
    #[arg(value_name = "EXTRA", hide = true)]
    pub extra: Vec<String>,

    /// Do not indent multi-line attribute values
    #[arg(short = 'n', long = "no-indent")]
    pub no_indent: bool,

    /// Wrap output lines at this width (ignored with --no-indent)
    #[arg(short = 'w', long = "width", value_name = "N")]
    pub width: Option<usize>,

    /// Template files have no declaration header
    #[arg(short = 'r', long = "raw")]
    pub raw: bool,

    /// The template is a single raw file; the specifier is its path
    #[arg(short = 'R', long = "raw-file")]
    pub raw_single_file: bool,

    /// Format renderer: basic or javascript
    #[arg(short = 'f', long = "format", value_name = "NAME")]
    pub renderer: Option<String>,

    /// Print an inspection report of the template instance to stderr
    #[arg(short = 'i', short_alias = 'd', long = "inspect")]
    pub inspect: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Start and stop characters around expressions, exactly two characters (e.g. <>)
    #[arg(
        short = 's',
        long = "delimiters",
        value_name = "START-STOP",
        env = "STST_DELIMITERS"
    )]
    pub delimiters: Option<String>,

    /// Character encoding for templates, data and output
    #[arg(
        short = 'e',
        long = "encoding",
        value_name = "ENCODING",
        env = "STST_ENCODING"
    )]
    pub encoding: Option<String>,

    /// Output file path. If not specified, output goes to stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Template directory. If not specified, the current directory is used.
    #[arg(
        short = 't',
        long = "template-dir",
        value_name = "DIR",
        env = "STST_TEMPLATE_DIR"
    )]
    pub template_dir: Option<PathBuf>,

    /// Properties file overriding the built-in messages
    #[arg(long = "messages", value_name = "FILE", env = "STST_MESSAGES")]
    pub messages: Option<PathBuf>,
}

impl Cli {
    /// Validate the arguments and turn them into [`Settings`].
    ///
    /// A template directory that is not a directory, a delimiter value that is
    /// not two characters, an unknown renderer and surplus positional arguments
    /// are reported and skipped. An unknown encoding is an error.
    pub fn into_settings(self, messages: &Messages) -> Result<Settings, StstError> {
        let cwd = std::env::current_dir()?;
        self.into_settings_in(messages, cwd)
    }

    fn into_settings_in(self, messages: &Messages, cwd: PathBuf) -> Result<Settings, StstError> {
        for arg in &self.extra {
            warn!("{}", messages.format(MessageKey::TooManyParameters, &[arg]));
        }

        let template_dir = match self.template_dir {
            Some(dir) if dir.is_dir() => dir,
            Some(dir) => {
                warn!(
                    "{}",
                    messages.format(MessageKey::InvalidDirectory, &[&dir.display()])
                );
                cwd
            }
            None => cwd,
        };

        let mut settings = Settings::new(self.template, template_dir);
        settings.data = self.data;
        settings.output = self.output;
        settings.indent = !self.no_indent;
        settings.line_width = self.width;
        settings.verbose = self.verbose;
        settings.inspect = self.inspect;

        settings.mode = if self.raw_single_file {
            TemplateMode::RawSingleFile
        } else if self.raw {
            TemplateMode::Raw
        } else {
            TemplateMode::Declared
        };

        if let Some(value) = self.delimiters {
            match Delimiters::parse(&value) {
                Some(delimiters) => settings.delimiters = delimiters,
                None => warn!("{}", messages.format(MessageKey::InvalidStartStop, &[&value])),
            }
        }

        if let Some(name) = self.renderer.filter(|name| !name.is_empty()) {
            match RendererKind::from_name(&name) {
                Some(kind) => settings.renderer = Some(kind),
                None => warn!("{}", messages.format(MessageKey::NoSuchRenderer, &[&name])),
            }
        }

        if let Some(label) = self.encoding {
            settings.encoding =
                encoding::resolve(&label).ok_or(StstError::UnknownEncoding(label))?;
        }

        Ok(settings)
    }
}
