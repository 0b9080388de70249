use std::fmt;
use std::io;
use std::time::Instant;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info};

use crate::config::Settings;
use crate::data::{adaptor, DataLoader, DataSource};
use crate::error::StstError;
use crate::messages::{MessageKey, Messages};
use crate::output::Output;
use crate::template::{
    AutoIndentWriter, Diagnostic, ErrorListener, GroupOptions, GroupSource, LoggingErrorListener,
    NoIndentWriter, TemplateGroup, TemplateInstance, TemplateSpec, TemplateWriter,
};

/// Outcome of binding the data fields onto a template instance
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BindReport {
    pub bound: Vec<String>,
    pub ignored: Vec<String>,
}

/// Resolve the template, bind the data, render and write the result
pub fn run(settings: &Settings, messages: &Messages) -> Result<(), StstError> {
    let started = Instant::now();
    let listener = LoggingErrorListener::new(messages, settings.verbose);

    if settings.verbose {
        info!(
            "{}",
            messages.format(MessageKey::VersionBanner, &[&env!("CARGO_PKG_VERSION")])
        );
        info!("{}", settings);
    }

    let text = render(settings, messages, &listener)?;
    Output::from_arg(settings.output.as_deref()).write(&text, settings.encoding)?;

    if settings.verbose {
        let seconds = format!("{:.3}", started.elapsed().as_secs_f64());
        info!("{}", messages.format(MessageKey::Timing, &[&seconds]));
    }
    Ok(())
}

/// Everything up to and including formatting; nothing is written here
pub fn render(
    settings: &Settings,
    messages: &Messages,
    listener: &dyn ErrorListener,
) -> Result<String, StstError> {
    let spec = TemplateSpec::parse(&settings.template_spec, settings.mode);
    let source = GroupSource::for_spec(&spec, settings.mode, &settings.template_dir);
    debug!("resolving '{}' from {}", settings.template_spec, source);
    let group = TemplateGroup::load(source, &GroupOptions::from(settings), listener)?;
    let delimiters = group.delimiters();
    debug!("delimiters {}{}", delimiters.start, delimiters.stop);

    let data = DataLoader::new(settings.encoding)
        .load(&DataSource::from_arg(settings.data.as_deref()))?;

    let mut instance = group.instance_of(&spec.template_name(), listener)?;
    let report = bind(&mut instance, &data, messages);
    debug!(
        "bound {} attribute(s), ignored {}",
        report.bound.len(),
        report.ignored.len()
    );

    if settings.inspect {
        eprintln!("{}", instance.inspect());
    }

    let rendered = instance.render().map_err(|err| {
        listener.report(&Diagnostic::from_engine(&err));
        StstError::Render { source: err }
    })?;

    format_output(&rendered, settings.indent, settings.line_width)
        .map_err(|_| StstError::Io(io::Error::other("failed to format template output")))
}

/// Add every top-level field to `instance`, in document order.
/// Fields the template does not declare are skipped and logged.
pub fn bind(
    instance: &mut TemplateInstance<'_>,
    data: &Map<String, JsonValue>,
    messages: &Messages,
) -> BindReport {
    let mut report = BindReport::default();
    for key in data.keys() {
        let value = match adaptor::get_property(data, Some(key)) {
            Ok(value) => value,
            Err(err) => {
                debug!("{}", err);
                continue;
            }
        };
        match instance.add(key, value) {
            Ok(()) => report.bound.push(key.clone()),
            Err(err) => {
                debug!("{}", err);
                info!("{}", messages.format(MessageKey::IgnoreAttribute, &[key]));
                report.ignored.push(key.clone());
            }
        }
    }
    report
}

fn format_output(text: &str, indent: bool, line_width: Option<usize>) -> Result<String, fmt::Error> {
    if indent {
        let mut writer = AutoIndentWriter::new(String::new(), line_width);
        drain(&mut writer, text)?;
        Ok(writer.into_inner())
    } else {
        let mut writer = NoIndentWriter::new(String::new());
        drain(&mut writer, text)?;
        Ok(writer.into_inner())
    }
}

fn drain<W: TemplateWriter>(writer: &mut W, text: &str) -> fmt::Result {
    writer.write(text)?;
    writer.flush()
}
