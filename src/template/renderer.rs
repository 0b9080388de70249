//! Format renderers applied to string attributes through the `fmt` filter,
//! e.g. `$name|fmt("upper")$`.

use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").unwrap();
}

const JS_RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported format name '{format}' for the {renderer} renderer")]
pub struct UnsupportedFormat {
    pub renderer: &'static str,
    pub format: String,
}

/// Turns a string value into output text according to a named format
pub trait AttributeRenderer: Send + Sync {
    /// `format` is `None` when the template asked for no particular format
    fn render(&self, value: &str, format: Option<&str>) -> Result<String, UnsupportedFormat>;
}

/// The renderers that can be selected with `-f`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Basic,
    JavaScript,
}

impl RendererKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(RendererKind::Basic),
            "javascript" => Some(RendererKind::JavaScript),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RendererKind::Basic => "basic",
            RendererKind::JavaScript => "javascript",
        }
    }

    pub fn build(self) -> Arc<dyn AttributeRenderer> {
        match self {
            RendererKind::Basic => Arc::new(BasicRenderer),
            RendererKind::JavaScript => Arc::new(JavaScriptRenderer),
        }
    }
}

/// `upper`, `lower`, `cap` and `xml-encode`
#[derive(Debug, Default)]
pub struct BasicRenderer;

impl AttributeRenderer for BasicRenderer {
    fn render(&self, value: &str, format: Option<&str>) -> Result<String, UnsupportedFormat> {
        match format {
            None => Ok(value.to_string()),
            Some("upper") => Ok(value.to_uppercase()),
            Some("lower") => Ok(value.to_lowercase()),
            Some("cap") => Ok(capitalize(value)),
            Some("xml-encode") => Ok(xml_encode(value)),
            Some(other) => Err(UnsupportedFormat {
                renderer: RendererKind::Basic.name(),
                format: other.to_string(),
            }),
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn xml_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' | '\n' | '\t' => out.push(c),
            c if c < ' ' || c > '~' => out.push_str(&format!("&#{};", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// `string` escapes a value for a double-quoted JavaScript literal; `key`
/// leaves valid identifiers bare and quotes everything else
#[derive(Debug, Default)]
pub struct JavaScriptRenderer;

impl JavaScriptRenderer {
    pub fn escape_string(value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 8);
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\u{2028}' => out.push_str("\\u2028"),
                '\u{2029}' => out.push_str("\\u2029"),
                c => out.push(c),
            }
        }
        out
    }

    pub fn needs_quotes(key: &str) -> bool {
        JS_RESERVED_WORDS.contains(&key) || !IDENTIFIER.is_match(key)
    }
}

impl AttributeRenderer for JavaScriptRenderer {
    fn render(&self, value: &str, format: Option<&str>) -> Result<String, UnsupportedFormat> {
        match format {
            None | Some("none") => Ok(value.to_string()),
            Some("string") => Ok(Self::escape_string(value)),
            Some("key") if Self::needs_quotes(value) => {
                Ok(format!("\"{}\"", Self::escape_string(value)))
            }
            Some("key") => Ok(value.to_string()),
            Some(other) => Err(UnsupportedFormat {
                renderer: RendererKind::JavaScript.name(),
                format: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_names() {
        assert_eq!(RendererKind::from_name("basic"), Some(RendererKind::Basic));
        assert_eq!(
            RendererKind::from_name("javascript"),
            Some(RendererKind::JavaScript)
        );
        assert_eq!(RendererKind::from_name("JavaScript"), None);
        assert_eq!(RendererKind::from_name(""), None);
        assert_eq!(RendererKind::JavaScript.name(), "javascript");
    }

    #[test]
    fn test_basic_formats() {
        let r = BasicRenderer;
        assert_eq!(r.render("Hello", None).unwrap(), "Hello");
        assert_eq!(r.render("Hello", Some("upper")).unwrap(), "HELLO");
        assert_eq!(r.render("Hello", Some("lower")).unwrap(), "hello");
        assert_eq!(r.render("élan vital", Some("cap")).unwrap(), "Élan vital");
        assert_eq!(r.render("", Some("cap")).unwrap(), "");
        assert_eq!(
            r.render("<b>Tom & Jerry</b>", Some("xml-encode")).unwrap(),
            "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"
        );
        assert_eq!(r.render("café\n", Some("xml-encode")).unwrap(), "caf&#233;\n");
    }

    #[test]
    fn test_basic_unsupported_format() {
        let err = BasicRenderer.render("x", Some("shout")).unwrap_err();
        assert_eq!(err.renderer, "basic");
        assert_eq!(err.format, "shout");
    }

    #[test]
    fn test_js_string_is_single_line_and_quote_safe() {
        let r = JavaScriptRenderer;
        let out = r
            .render("He said \"hi\"\nthen left", Some("string"))
            .unwrap();
        assert_eq!(out, r#"He said \"hi\"\nthen left"#);
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_js_string_escapes_backslash_once() {
        let r = JavaScriptRenderer;
        assert_eq!(r.render(r"C:\dir", Some("string")).unwrap(), r"C:\\dir");
        assert_eq!(r.render("a\"b", Some("string")).unwrap(), r#"a\"b"#);
        assert_eq!(r.render("\t\r", Some("string")).unwrap(), r"\t\r");
        assert_eq!(
            r.render("x\u{2028}y", Some("string")).unwrap(),
            r"x\u2028y"
        );
    }

    #[test]
    fn test_js_key() {
        let r = JavaScriptRenderer;
        assert_eq!(r.render("name", Some("key")).unwrap(), "name");
        assert_eq!(r.render("$el_2", Some("key")).unwrap(), "$el_2");
        assert_eq!(r.render("this", Some("key")).unwrap(), "\"this\"");
        assert_eq!(r.render("default", Some("key")).unwrap(), "\"default\"");
        assert_eq!(r.render("first name", Some("key")).unwrap(), "\"first name\"");
        assert_eq!(r.render("2nd", Some("key")).unwrap(), "\"2nd\"");
        assert_eq!(r.render("a\"b", Some("key")).unwrap(), r#""a\"b""#);
    }

    #[test]
    fn test_js_none() {
        let r = JavaScriptRenderer;
        assert_eq!(r.render("a\"b", None).unwrap(), "a\"b");
        assert_eq!(r.render("a\"b", Some("none")).unwrap(), "a\"b");
        assert!(r.render("x", Some("upper")).is_err());
    }
}
