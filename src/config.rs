use std::fmt;
use std::path::PathBuf;

use encoding_rs::Encoding;

use crate::template::renderer::RendererKind;

/// Default expression delimiters, `$name$`
pub const DEFAULT_DELIMITERS: Delimiters = Delimiters {
    start: '$',
    stop: '$',
};

/// Start and stop characters around template expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub start: char,
    pub stop: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        DEFAULT_DELIMITERS
    }
}

impl Delimiters {
    /// Parse a start/stop pair such as `<>`; the value must be exactly two characters
    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(start), Some(stop), None) => Some(Self { start, stop }),
            _ => None,
        }
    }
}

/// How the template specifier is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateMode {
    /// Template files carry a `name(args) ::= ...` declaration
    #[default]
    Declared,
    /// Template files are the body only
    Raw,
    /// The specifier is the path of a single raw template file
    RawSingleFile,
}

/// Run configuration, fixed once the command line has been parsed
#[derive(Debug, Clone)]
pub struct Settings {
    pub template_spec: String,
    pub data: Option<PathBuf>,
    pub delimiters: Delimiters,
    pub mode: TemplateMode,
    pub renderer: Option<RendererKind>,
    pub indent: bool,
    pub line_width: Option<usize>,
    pub encoding: &'static Encoding,
    pub output: Option<PathBuf>,
    pub template_dir: PathBuf,
    pub verbose: bool,
    pub inspect: bool,
}

impl Settings {
    /// Settings with every option at its default
    pub fn new(template_spec: impl Into<String>, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_spec: template_spec.into(),
            data: None,
            delimiters: Delimiters::default(),
            mode: TemplateMode::default(),
            renderer: None,
            indent: true,
            line_width: None,
            encoding: encoding_rs::UTF_8,
            output: None,
            template_dir: template_dir.into(),
            verbose: false,
            inspect: false,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "stst settings:")?;
        writeln!(f, "  Template: {}", self.template_spec)?;
        writeln!(f, "  Template Dir: {}", self.template_dir.display())?;
        writeln!(f, "  Raw: {}", yes_no(self.mode == TemplateMode::Raw))?;
        writeln!(
            f,
            "  Raw Single File: {}",
            yes_no(self.mode == TemplateMode::RawSingleFile)
        )?;
        writeln!(f, "  Indent: {}", yes_no(self.indent))?;
        match self.line_width {
            Some(width) => writeln!(f, "  Line Width: {}", width)?,
            None => writeln!(f, "  Line Width: no wrap")?,
        }
        writeln!(
            f,
            "  Renderer: {}",
            self.renderer.map(RendererKind::name).unwrap_or("none")
        )?;
        writeln!(f, "  Verbose: {}", yes_no(self.verbose))?;
        writeln!(f, "  Inspect: {}", yes_no(self.inspect))?;
        writeln!(f, "  Start Char: {}", self.delimiters.start)?;
        writeln!(f, "  Stop Char: {}", self.delimiters.stop)?;
        writeln!(f, "  Encoding: {}", self.encoding.name())?;
        match &self.data {
            Some(path) => writeln!(f, "  Data: {}", path.display())?,
            None => writeln!(f, "  Data: <stdin>")?,
        }
        match &self.output {
            Some(path) => write!(f, "  Output: {}", path.display()),
            None => write!(f, "  Output: <stdout>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiters() {
        assert_eq!(
            Delimiters::parse("<>"),
            Some(Delimiters {
                start: '<',
                stop: '>'
            })
        );
        assert_eq!(Delimiters::parse("$$"), Some(DEFAULT_DELIMITERS));
    }

    #[test]
    fn test_parse_delimiters_wrong_length() {
        assert_eq!(Delimiters::parse(""), None);
        assert_eq!(Delimiters::parse("<"), None);
        assert_eq!(Delimiters::parse("<<>>"), None);
    }

    #[test]
    fn test_parse_delimiters_counts_chars_not_bytes() {
        assert_eq!(
            Delimiters::parse("«»"),
            Some(Delimiters {
                start: '«',
                stop: '»'
            })
        );
    }

    #[test]
    fn test_settings_summary() {
        let mut settings = Settings::new("page", "/templates");
        settings.mode = TemplateMode::Raw;
        settings.line_width = Some(72);

        let summary = settings.to_string();
        assert!(summary.contains("Raw: yes"));
        assert!(summary.contains("Line Width: 72"));
        assert!(summary.contains("Output: <stdout>"));
        assert!(summary.contains("Encoding: UTF-8"));
    }
}
