pub mod group;
pub mod group_file;
pub mod instance;
pub mod listener;
pub mod renderer;
pub mod spec;
pub mod writer;

pub use group::{GroupOptions, GroupSource, TemplateGroup};
pub use instance::TemplateInstance;
pub use listener::{Diagnostic, ErrorListener, LoggingErrorListener};
pub use spec::TemplateSpec;
pub use writer::{AutoIndentWriter, NoIndentWriter, TemplateWriter};
