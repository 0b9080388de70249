use std::collections::BTreeMap;
use std::fmt::Write as _;

use minijinja::{Error, ErrorKind, Template, Value};

use super::group_file::FormalArg;
use super::writer::{MarkedText, ValueMarks};

/// The template declares formal arguments and `name` is not one of them
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attribute '{name}' is not defined by template '{template}'")]
pub struct NoSuchAttribute {
    pub template: String,
    pub name: String,
}

/// A template together with the attributes bound to it
pub struct TemplateInstance<'env> {
    template: Template<'env, 'env>,
    formal_args: Option<Vec<FormalArg>>,
    attributes: Vec<(String, Value)>,
    marks: ValueMarks,
}

impl<'env> TemplateInstance<'env> {
    pub fn new(template: Template<'env, 'env>, formal_args: Option<Vec<FormalArg>>) -> Self {
        Self {
            template,
            formal_args,
            attributes: Vec::new(),
            marks: ValueMarks::default(),
        }
    }

    /// Share the flag the group's value formatter raises for multi-line values
    pub fn with_value_marks(mut self, marks: ValueMarks) -> Self {
        self.marks = marks;
        self
    }

    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Bind `value` to `name`. Binding a name again replaces the value.
    pub fn add(&mut self, name: &str, value: Value) -> Result<(), NoSuchAttribute> {
        if let Some(args) = &self.formal_args {
            if !args.iter().any(|a| a.name == name) {
                return Err(NoSuchAttribute {
                    template: self.name().to_string(),
                    name: name.to_string(),
                });
            }
        }
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        Ok(())
    }

    /// Render with the bound attributes. Formal arguments that are unbound,
    /// or bound to an absent value, take their declared default.
    pub fn render(&self) -> Result<String, Error> {
        let mut context: BTreeMap<String, Value> = BTreeMap::new();
        for arg in self.formal_args.iter().flatten() {
            if let Some(default) = &arg.default {
                context.insert(arg.name.clone(), default.to_value());
            }
        }
        for (name, value) in &self.attributes {
            if !value.is_undefined() {
                context.insert(name.clone(), value.clone());
            }
        }
        let mut text = MarkedText::new(self.marks.clone());
        self.template
            .render_to_write(Value::from_iter(context), &mut text)?;
        text.into_string().map_err(|e| {
            Error::new(ErrorKind::WriteFailure, "rendered text is not UTF-8").with_source(e)
        })
    }

    /// Text report of the template, its arguments, attributes and source
    pub fn inspect(&self) -> String {
        let mut report = String::new();
        let _ = writeln!(report, "Template: {}", self.name());
        match &self.formal_args {
            Some(args) => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                let _ = writeln!(report, "Formal arguments: ({})", args.join(", "));
            }
            None => {
                let _ = writeln!(report, "Formal arguments: none declared, any attribute accepted");
            }
        }
        let _ = writeln!(report, "Attributes:");
        for (name, value) in &self.attributes {
            let _ = writeln!(report, "  {} = {:?}", name, value);
        }
        let _ = writeln!(report, "Source:");
        report.push_str(self.template.source());
        report
    }
}
