//! Parser for template declarations and `.stg` group files.
//!
//! ```text
//! // comment
//! import "common.stg"
//! delimiters "<", ">"
//!
//! page(title, footer="(c) us") ::= <<
//! <h1>$title$</h1>
//! $footer$
//! >>
//! short(x) ::= "[$x$]"
//! joined(items) ::= <%
//!     $items|join(",")$
//! %>
//! home ::= page
//! ```

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Delimiters;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct GroupParseError {
    pub line: usize,
    pub message: String,
}

/// Default value of a formal argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    String(String),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(&self) -> minijinja::Value {
        match self {
            DefaultValue::String(s) => minijinja::Value::from(s.as_str()),
            DefaultValue::Bool(b) => minijinja::Value::from(*b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalArg {
    pub name: String,
    pub default: Option<DefaultValue>,
}

impl fmt::Display for FormalArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            None => write!(f, "{}", self.name),
            Some(DefaultValue::String(s)) => write!(f, "{}={:?}", self.name, s),
            Some(DefaultValue::Bool(b)) => write!(f, "{}={}", self.name, b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDecl {
    pub name: String,
    pub args: Vec<FormalArg>,
    pub body: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub target: String,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFile {
    pub imports: Vec<String>,
    pub delimiters: Option<Delimiters>,
    pub templates: Vec<TemplateDecl>,
    pub aliases: Vec<Alias>,
}

/// Parse the contents of a group file
pub fn parse_group(text: &str) -> Result<GroupFile, GroupParseError> {
    let mut parser = Parser::new(text);
    let mut group = GroupFile::default();

    loop {
        parser.skip_trivia()?;
        if parser.at_end() {
            break;
        }
        let line = parser.line();
        let name = parser.identifier()?;
        let directive = match name {
            "import" | "delimiters" => !parser.declaration_follows()?,
            _ => false,
        };
        match name {
            "import" if directive => {
                parser.skip_trivia()?;
                group.imports.push(parser.string()?);
            }
            "delimiters" if directive => {
                parser.skip_trivia()?;
                let start = parser.string()?;
                parser.skip_trivia()?;
                parser.expect(",")?;
                parser.skip_trivia()?;
                let stop = parser.string()?;
                group.delimiters = Some(single_chars(&start, &stop).ok_or_else(|| {
                    GroupParseError {
                        line,
                        message: "delimiters must be single characters".to_string(),
                    }
                })?);
            }
            _ => {
                parser.skip_trivia()?;
                if parser.eat("::=") {
                    parser.skip_trivia()?;
                    let target = parser.identifier()?.to_string();
                    group.aliases.push(Alias {
                        name: name.to_string(),
                        target,
                        line,
                    });
                } else {
                    let args = parser.formal_args()?;
                    parser.skip_trivia()?;
                    parser.expect("::=")?;
                    parser.skip_trivia()?;
                    let body = parser.body()?;
                    group.templates.push(TemplateDecl {
                        name: name.to_string(),
                        args,
                        body,
                        line,
                    });
                }
            }
        }
    }

    Ok(group)
}

/// Parse a template file holding exactly one declaration named `expected`
pub fn parse_template_file(text: &str, expected: &str) -> Result<TemplateDecl, GroupParseError> {
    let group = parse_group(text)?;
    if !group.imports.is_empty() || group.delimiters.is_some() || !group.aliases.is_empty() {
        return Err(GroupParseError {
            line: 1,
            message: "a template file may only contain a single template declaration".to_string(),
        });
    }

    let mut templates = group.templates.into_iter();
    match (templates.next(), templates.next()) {
        (Some(decl), None) if decl.name == expected => Ok(decl),
        (Some(decl), None) => Err(GroupParseError {
            line: decl.line,
            message: format!(
                "template file for '{}' declares '{}' instead",
                expected, decl.name
            ),
        }),
        (None, _) => Err(GroupParseError {
            line: 1,
            message: format!("no declaration of '{}' found", expected),
        }),
        (Some(_), Some(extra)) => Err(GroupParseError {
            line: extra.line,
            message: "a template file may only contain a single template declaration"
                .to_string(),
        }),
    }
}

fn single_chars(start: &str, stop: &str) -> Option<Delimiters> {
    let mut both = start.chars().chain(stop.chars());
    if start.chars().count() != 1 || stop.chars().count() != 1 {
        return None;
    }
    Some(Delimiters {
        start: both.next()?,
        stop: both.next()?,
    })
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn line(&self) -> usize {
        self.line_at(self.pos)
    }

    fn line_at(&self, pos: usize) -> usize {
        self.text[..pos].matches('\n').count() + 1
    }

    fn error(&self, message: impl Into<String>) -> GroupParseError {
        GroupParseError {
            line: self.line(),
            message: message.into(),
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<(), GroupParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", token)))
        }
    }

    /// Skip whitespace, `//` and `/* */` comments
    fn skip_trivia(&mut self) -> Result<(), GroupParseError> {
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.text.len() - trimmed.len();
            if self.eat("//") {
                match self.rest().find('\n') {
                    Some(end) => self.pos += end + 1,
                    None => self.pos = self.text.len(),
                }
            } else if self.rest().starts_with("/*") {
                let start = self.pos;
                match self.rest()[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => {
                        return Err(GroupParseError {
                            line: self.line_at(start),
                            message: "unterminated comment".to_string(),
                        })
                    }
                }
            } else {
                return Ok(());
            }
        }
    }

    /// Whether `(` or `::=` comes next, so the name just read is declared
    /// rather than used as a keyword. Does not move the cursor.
    fn declaration_follows(&mut self) -> Result<bool, GroupParseError> {
        let pos = self.pos;
        self.skip_trivia()?;
        let follows = self.rest().starts_with('(') || self.rest().starts_with("::=");
        self.pos = pos;
        Ok(follows)
    }

    fn identifier(&mut self) -> Result<&'a str, GroupParseError> {
        let rest = self.rest();
        match IDENTIFIER.find(rest) {
            Some(m) => {
                self.pos += m.end();
                Ok(&rest[..m.end()])
            }
            None => Err(self.error("expected a template name")),
        }
    }

    /// A double-quoted string with `\"`, `\\`, `\n`, `\r` and `\t` escapes
    fn string(&mut self) -> Result<String, GroupParseError> {
        let start = self.pos;
        self.expect("\"")?;
        let mut value = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(value);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, other)) => value.push(other),
                    None => break,
                },
                c => value.push(c),
            }
        }
        Err(GroupParseError {
            line: self.line_at(start),
            message: "unterminated string".to_string(),
        })
    }

    fn formal_args(&mut self) -> Result<Vec<FormalArg>, GroupParseError> {
        self.expect("(")?;
        let mut args: Vec<FormalArg> = Vec::new();
        self.skip_trivia()?;
        if self.eat(")") {
            return Ok(args);
        }
        loop {
            self.skip_trivia()?;
            let name = self.identifier()?.to_string();
            if args.iter().any(|a| a.name == name) {
                return Err(self.error(format!("duplicate formal argument '{}'", name)));
            }
            self.skip_trivia()?;
            let default = if self.eat("=") {
                self.skip_trivia()?;
                Some(self.default_value()?)
            } else {
                None
            };
            args.push(FormalArg { name, default });
            self.skip_trivia()?;
            if self.eat(")") {
                return Ok(args);
            }
            self.expect(",")?;
        }
    }

    fn default_value(&mut self) -> Result<DefaultValue, GroupParseError> {
        if self.rest().starts_with('"') {
            return Ok(DefaultValue::String(self.string()?));
        }
        match self.identifier() {
            Ok("true") => Ok(DefaultValue::Bool(true)),
            Ok("false") => Ok(DefaultValue::Bool(false)),
            _ => Err(self.error("default values must be strings, true or false")),
        }
    }

    fn body(&mut self) -> Result<String, GroupParseError> {
        let start = self.pos;
        if self.eat("<<") {
            let raw = self.big_string().ok_or_else(|| GroupParseError {
                line: self.line_at(start),
                message: "unterminated template body, missing '>>'".to_string(),
            })?;
            Ok(trim_one_newline(&raw).to_string())
        } else if self.eat("<%") {
            let end = self.rest().find("%>").ok_or_else(|| GroupParseError {
                line: self.line_at(start),
                message: "unterminated template body, missing '%>'".to_string(),
            })?;
            let raw = &self.rest()[..end];
            self.pos += end + 2;
            Ok(raw.lines().map(str::trim_start).collect())
        } else if self.rest().starts_with('"') {
            self.string()
        } else {
            Err(self.error("expected a template body: <<...>>, <%...%> or \"...\""))
        }
    }

    /// Text up to the closing `>>`, where `\>` stands for `>`
    fn big_string(&mut self) -> Option<String> {
        let rest = self.rest();
        let mut value = String::new();
        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' if matches!(chars.peek(), Some((_, '>'))) => {
                    chars.next();
                    value.push('>');
                }
                '>' if rest[i + 1..].starts_with('>') => {
                    self.pos += i + 2;
                    return Some(value);
                }
                _ => value.push(c),
            }
        }
        None
    }
}

/// Drop one leading and one trailing line break
fn trim_one_newline(body: &str) -> &str {
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);
    body.strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigstring_trims_outer_newlines() {
        let group = parse_group("page(title) ::= <<\n<h1>$title$</h1>\n\n>>\n").unwrap();
        assert_eq!(group.templates.len(), 1);
        let decl = &group.templates[0];
        assert_eq!(decl.name, "page");
        assert_eq!(decl.args[0].name, "title");
        assert_eq!(decl.body, "<h1>$title$</h1>\n");
    }

    #[test]
    fn test_string_body_and_escapes() {
        let group = parse_group(r#"quote(x) ::= "say \"$x$\"\n""#).unwrap();
        assert_eq!(group.templates[0].body, "say \"$x$\"\n");
    }

    #[test]
    fn test_percent_body_drops_newlines_and_indentation() {
        let group = parse_group("list(items) ::= <%\n    [\n    $items$\n    ]\n%>").unwrap();
        assert_eq!(group.templates[0].body, "[$items$]");
    }

    #[test]
    fn test_defaults() {
        let group =
            parse_group(r#"t(a, b="x, y", c=true, d=false) ::= "$a$""#).unwrap();
        let args = &group.templates[0].args;
        assert_eq!(args.len(), 4);
        assert_eq!(args[0].default, None);
        assert_eq!(args[1].default, Some(DefaultValue::String("x, y".to_string())));
        assert_eq!(args[2].default, Some(DefaultValue::Bool(true)));
        assert_eq!(args[3].default, Some(DefaultValue::Bool(false)));
        assert_eq!(args[1].to_string(), "b=\"x, y\"");
    }

    #[test]
    fn test_imports_delimiters_aliases_and_comments() {
        let text = r#"
// leading comment
import "base.stg"
/* block
   comment */
delimiters "<", ">"
main() ::= "<x>"
alias ::= main
"#;
        let group = parse_group(text).unwrap();
        assert_eq!(group.imports, vec!["base.stg".to_string()]);
        assert_eq!(group.delimiters, Some(Delimiters { start: '<', stop: '>' }));
        assert_eq!(group.templates.len(), 1);
        assert_eq!(
            group.aliases,
            vec![Alias {
                name: "alias".to_string(),
                target: "main".to_string(),
                line: 8,
            }]
        );
    }

    #[test]
    fn test_comment_markers_inside_body_are_kept() {
        let group = parse_group("t() ::= <<a // b /* c */>>").unwrap();
        assert_eq!(group.templates[0].body, "a // b /* c */");
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let err = parse_group("ok() ::= \"x\"\n\nbad( ::= \"y\"").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse_group("t() ::= <<\nnever closed\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains(">>"));

        let err = parse_group("/* open").unwrap_err();
        assert!(err.message.contains("comment"));
    }

    #[test]
    fn test_duplicate_argument_rejected() {
        assert!(parse_group("t(a, a) ::= \"\"").is_err());
    }

    #[test]
    fn test_bad_delimiters() {
        let err = parse_group(r#"delimiters "<<", ">""#).unwrap_err();
        assert!(err.message.contains("single characters"));
    }

    #[test]
    fn test_keywords_can_name_templates() {
        let group = parse_group(
            "import(x) ::= \"$x$\"\ndelimiters() ::= <<d>>\nimport \"other.stg\"\n",
        )
        .unwrap();
        let names: Vec<&str> = group.templates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["import", "delimiters"]);
        assert_eq!(group.imports, vec!["other.stg"]);
        assert_eq!(group.delimiters, None);
    }

    #[test]
    fn test_keywords_can_be_aliases() {
        let group = parse_group("t() ::= \"x\"\ndelimiters ::= t\nimport /* c */ ::= t\n").unwrap();
        let aliases: Vec<&str> = group.aliases.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(aliases, vec!["delimiters", "import"]);
        assert!(group.imports.is_empty());
    }

    #[test]
    fn test_escaped_angle_in_bigstring() {
        let group = parse_group("t() ::= <<a \\>> b \\> c>>\nu() ::= \"y\"").unwrap();
        assert_eq!(group.templates[0].body, "a >> b > c");
        assert_eq!(group.templates[1].name, "u");
    }

    #[test]
    fn test_template_file_name_must_match() {
        let decl = parse_template_file("hello(name) ::= <<Hi $name$>>", "hello").unwrap();
        assert_eq!(decl.body, "Hi $name$");

        let err = parse_template_file("other() ::= \"x\"", "hello").unwrap_err();
        assert!(err.message.contains("other"));

        assert!(parse_template_file("a() ::= \"x\"\nb() ::= \"y\"", "a").is_err());
        assert!(parse_template_file("", "a").is_err());
    }
}
