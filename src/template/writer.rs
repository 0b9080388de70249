//! Output writers and the value formatter that feeds them.
//!
//! When indenting, line breaks inside attribute values reach the rendered
//! text as [`NEWLINE_MARKER`]. Line breaks in template text are left alone,
//! so the writer can tell the two apart: a marked break continues the value
//! at the indentation of the line it started on.
//!
//! The formatter itself writes plain `\n`. It raises a [`ValueMarks`] flag
//! for the duration of the write, and only [`MarkedText`], the sink the
//! template renders into, turns the breaks it receives under that flag into
//! markers. Output captured by `set` blocks, macros or filters never reaches
//! the sink, so captured strings keep real line breaks.

use std::fmt;
use std::io;
use std::string::FromUtf8Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use minijinja::value::{Value, ValueKind};
use minijinja::{Error, ErrorKind, Output};

/// Private-use character standing in for a line break inside a value
pub const NEWLINE_MARKER: char = '\u{E000}';

#[cfg(windows)]
const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_SEPARATOR: &str = "\n";

/// Set while the formatter writes a multi-line value
#[derive(Debug, Clone, Default)]
pub struct ValueMarks(Arc<AtomicBool>);

impl ValueMarks {
    fn set(&self, active: bool) {
        self.0.store(active, Ordering::Relaxed);
    }

    fn is_active(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Render a value the way templates print it: nothing for undefined and
/// none, sequences as the concatenation of their elements, everything else
/// in its display form. With `marks`, multi-line text is flagged for
/// [`MarkedText`].
pub fn format_value(
    out: &mut Output<'_>,
    value: &Value,
    marks: Option<&ValueMarks>,
) -> Result<(), Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(());
    }
    if value.kind() == ValueKind::Seq {
        for item in value.try_iter()? {
            format_value(out, &item, marks)?;
        }
        return Ok(());
    }
    match value.as_str() {
        Some(text) => write_text(out, text, marks),
        None => write_text(out, &value.to_string(), marks),
    }
}

fn write_text(out: &mut Output<'_>, text: &str, marks: Option<&ValueMarks>) -> Result<(), Error> {
    let result = match marks {
        Some(marks) if text.contains('\n') => {
            marks.set(true);
            let result = out.write_str(&text.replace("\r\n", "\n"));
            marks.set(false);
            result
        }
        _ => out.write_str(text),
    };
    result.map_err(|_| Error::new(ErrorKind::WriteFailure, "formatting failed"))
}

/// Collects rendered output, replacing line breaks written while `marks` is
/// raised with [`NEWLINE_MARKER`]
#[derive(Debug, Default)]
pub struct MarkedText {
    bytes: Vec<u8>,
    marks: ValueMarks,
}

impl MarkedText {
    pub fn new(marks: ValueMarks) -> Self {
        Self {
            bytes: Vec::new(),
            marks,
        }
    }

    pub fn into_string(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.bytes)
    }
}

impl io::Write for MarkedText {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.marks.is_active() {
            let mut marker = [0; 4];
            let marker = NEWLINE_MARKER.encode_utf8(&mut marker).as_bytes();
            for &byte in buf {
                if byte == b'\n' {
                    self.bytes.extend_from_slice(marker);
                } else {
                    self.bytes.push(byte);
                }
            }
        } else {
            self.bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Receives rendered template text
pub trait TemplateWriter {
    fn write(&mut self, text: &str) -> fmt::Result;

    /// Write out anything still buffered
    fn flush(&mut self) -> fmt::Result;
}

/// Re-indents multi-line values and optionally wraps long lines at spaces
pub struct AutoIndentWriter<W: fmt::Write> {
    out: W,
    line_width: Option<usize>,
    line: String,
    pending_cr: bool,
}

impl<W: fmt::Write> AutoIndentWriter<W> {
    pub fn new(out: W, line_width: Option<usize>) -> Self {
        Self {
            out,
            line_width: line_width.filter(|w| *w > 0),
            line: String::new(),
            pending_cr: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn indentation(&self) -> String {
        self.line
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }

    fn end_line(&mut self) -> fmt::Result {
        match self.line_width {
            Some(width) if self.line.chars().count() > width => {
                let wrapped = wrap_line(&self.line, width);
                let last = wrapped.len() - 1;
                for (i, piece) in wrapped.iter().enumerate() {
                    self.out.write_str(piece)?;
                    if i < last {
                        self.out.write_str(LINE_SEPARATOR)?;
                    }
                }
            }
            _ => self.out.write_str(&self.line)?,
        }
        self.line.clear();
        Ok(())
    }
}

impl<W: fmt::Write> TemplateWriter for AutoIndentWriter<W> {
    fn write(&mut self, text: &str) -> fmt::Result {
        for c in text.chars() {
            if self.pending_cr {
                self.pending_cr = false;
                if c != '\n' {
                    self.line.push('\r');
                }
            }
            match c {
                '\r' => self.pending_cr = true,
                '\n' => {
                    self.end_line()?;
                    self.out.write_str(LINE_SEPARATOR)?;
                }
                NEWLINE_MARKER => {
                    let indent = self.indentation();
                    self.end_line()?;
                    self.out.write_str(LINE_SEPARATOR)?;
                    self.line.push_str(&indent);
                }
                c => self.line.push(c),
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> fmt::Result {
        if self.pending_cr {
            self.pending_cr = false;
            self.line.push('\r');
        }
        self.end_line()
    }
}

/// Split `line` at spaces into pieces no wider than `width` where possible.
/// Continuation pieces start with the line's own indentation.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let body = line.trim_start_matches([' ', '\t']);
    let indent = &line[..line.len() - body.len()];

    let mut pieces = Vec::new();
    let mut current = indent.to_string();
    let mut current_width = indent.chars().count();
    let mut has_word = false;

    for word in body.split(' ') {
        let word_width = word.chars().count();
        if has_word && current_width + 1 + word_width > width {
            pieces.push(std::mem::take(&mut current));
            current.push_str(indent);
            current.push_str(word);
            current_width = indent.chars().count() + word_width;
        } else {
            if has_word {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += word_width;
        }
        has_word = true;
    }
    pieces.push(current);
    pieces
}

/// Writes text as rendered; marked breaks become plain line breaks
pub struct NoIndentWriter<W: fmt::Write> {
    out: W,
    pending_cr: bool,
}

impl<W: fmt::Write> NoIndentWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending_cr: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: fmt::Write> TemplateWriter for NoIndentWriter<W> {
    fn write(&mut self, text: &str) -> fmt::Result {
        for c in text.chars() {
            if self.pending_cr {
                self.pending_cr = false;
                if c != '\n' {
                    self.out.write_char('\r')?;
                }
            }
            match c {
                '\r' => self.pending_cr = true,
                '\n' | NEWLINE_MARKER => self.out.write_str(LINE_SEPARATOR)?,
                c => self.out.write_char(c)?,
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> fmt::Result {
        if self.pending_cr {
            self.pending_cr = false;
            self.out.write_char('\r')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nl(text: &str) -> String {
        text.replace('\n', LINE_SEPARATOR)
    }

    fn auto(text: &str, width: Option<usize>) -> String {
        let mut writer = AutoIndentWriter::new(String::new(), width);
        writer.write(text).unwrap();
        writer.flush().unwrap();
        writer.into_inner()
    }

    fn plain(text: &str) -> String {
        let mut writer = NoIndentWriter::new(String::new());
        writer.write(text).unwrap();
        writer.flush().unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_marked_text_marks_only_flagged_breaks() {
        use std::io::Write as _;

        let marks = ValueMarks::default();
        let mut text = MarkedText::new(marks.clone());
        text.write_all(b"a\n").unwrap();
        marks.set(true);
        text.write_all(b"b\nc").unwrap();
        marks.set(false);
        text.write_all(b"\n").unwrap();
        assert_eq!(text.into_string().unwrap(), "a\nb\u{E000}c\n");
    }

    #[test]
    fn test_marked_break_keeps_indentation() {
        let text = "list:\n    first\u{E000}second\u{E000}third\nend";
        assert_eq!(
            auto(text, None),
            nl("list:\n    first\n    second\n    third\nend")
        );
    }

    #[test]
    fn test_template_breaks_are_not_indented() {
        assert_eq!(auto("  a\nb", None), nl("  a\nb"));
    }

    #[test]
    fn test_no_indent_writer_passes_through() {
        let text = "list:\n    first\u{E000}second";
        assert_eq!(plain(text), nl("list:\n    first\nsecond"));
    }

    #[test]
    fn test_crlf_is_normalized() {
        assert_eq!(auto("a\r\nb\r\n", None), nl("a\nb\n"));
        assert_eq!(plain("a\r\nb"), nl("a\nb"));
    }

    #[test]
    fn test_crlf_split_across_writes() {
        let mut writer = NoIndentWriter::new(String::new());
        writer.write("a\r").unwrap();
        writer.write("\nb").unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), nl("a\nb"));
    }

    #[test]
    fn test_lone_cr_is_kept() {
        assert_eq!(plain("a\rb"), "a\rb");
        assert_eq!(auto("a\rb", None), "a\rb");
    }

    #[test]
    fn test_wrap_at_width() {
        let text = "  one two three four five";
        assert_eq!(auto(text, Some(12)), nl("  one two\n  three four\n  five"));
    }

    #[test]
    fn test_short_lines_are_not_wrapped() {
        assert_eq!(auto("one two\nthree", Some(10)), nl("one two\nthree"));
    }

    #[test]
    fn test_long_word_is_not_split() {
        assert_eq!(
            auto("a supercalifragilistic b", Some(5)),
            nl("a\nsupercalifragilistic\nb")
        );
    }

    #[test]
    fn test_zero_width_means_no_wrap() {
        assert_eq!(auto("one two three", Some(0)), "one two three");
    }
}
