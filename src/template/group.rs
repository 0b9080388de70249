//! Template groups: where templates come from and how the engine is set up.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use encoding_rs::Encoding;
use minijinja::syntax::SyntaxConfig;
use minijinja::value::{Value, ValueKind};
use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior};
use path_clean::PathClean;
use tracing::{debug, warn};

use super::group_file::{parse_group, parse_template_file, FormalArg, GroupParseError};
use super::instance::TemplateInstance;
use super::listener::{Diagnostic, DiagnosticKind, ErrorListener};
use super::renderer::{AttributeRenderer, RendererKind};
use super::spec::{TemplateSpec, TEMPLATE_EXTENSION};
use super::writer::{format_value, ValueMarks};
use crate::config::{Delimiters, Settings, TemplateMode};
use crate::data::encoding;
use crate::error::StstError;

/// Formal arguments per loaded template; `None` for raw templates
type Signatures = Arc<Mutex<HashMap<String, Option<Vec<FormalArg>>>>>;

/// Where the templates of a group live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSource {
    /// `<name>.st` files with a declaration header
    Dir(PathBuf),
    /// `<name>.st` files holding only the template body
    RawDir(PathBuf),
    /// A `.stg` group file
    File(PathBuf),
    /// One raw template file
    SingleFile(PathBuf),
}

impl GroupSource {
    pub fn for_spec(spec: &TemplateSpec, mode: TemplateMode, template_dir: &Path) -> Self {
        if let Some(path) = spec.group_file(template_dir) {
            return GroupSource::File(path);
        }
        match (spec, mode) {
            (TemplateSpec::File { path }, _) => GroupSource::SingleFile(path.clone()),
            (_, TemplateMode::Raw) => GroupSource::RawDir(template_dir.to_path_buf()),
            _ => GroupSource::Dir(template_dir.to_path_buf()),
        }
    }
}

impl fmt::Display for GroupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSource::Dir(dir) => write!(f, "directory {}", dir.display()),
            GroupSource::RawDir(dir) => write!(f, "raw directory {}", dir.display()),
            GroupSource::File(path) => write!(f, "group file {}", path.display()),
            GroupSource::SingleFile(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Engine settings shared by every template of a group
#[derive(Debug, Clone, Copy)]
pub struct GroupOptions {
    pub delimiters: Delimiters,
    pub encoding: &'static Encoding,
    pub indent: bool,
    pub renderer: Option<RendererKind>,
}

impl From<&Settings> for GroupOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            delimiters: settings.delimiters,
            encoding: settings.encoding,
            indent: settings.indent,
            renderer: settings.renderer,
        }
    }
}

/// A configured engine environment plus the signatures of its templates
pub struct TemplateGroup {
    source: GroupSource,
    delimiters: Delimiters,
    env: Environment<'static>,
    signatures: Signatures,
    marks: ValueMarks,
}

impl fmt::Debug for TemplateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateGroup")
            .field("source", &self.source)
            .field("delimiters", &self.delimiters)
            .finish()
    }
}

/// A declared template held in memory (group files and single files)
#[derive(Debug, Clone)]
struct Entry {
    body: String,
    args: Option<Vec<FormalArg>>,
}

impl TemplateGroup {
    pub fn load(
        source: GroupSource,
        options: &GroupOptions,
        listener: &dyn ErrorListener,
    ) -> Result<Self, StstError> {
        let signatures: Signatures = Arc::default();
        let mut delimiters = options.delimiters;

        let mut env = Environment::new();
        match &source {
            GroupSource::Dir(root) | GroupSource::RawDir(root) => {
                let root = root.clone();
                let raw = matches!(source, GroupSource::RawDir(_));
                let encoding = options.encoding;
                let signatures = Arc::clone(&signatures);
                env.set_loader(move |name| {
                    load_from_dir(&root, name, raw, encoding, &signatures)
                });
            }
            GroupSource::File(path) => {
                let mut table = HashMap::new();
                let mut stack = Vec::new();
                if let Some(declared) =
                    load_group_file(path, options.encoding, &mut stack, &mut table, listener)?
                {
                    debug!(
                        "group file declares delimiters {}{}",
                        declared.start, declared.stop
                    );
                    delimiters = declared;
                }
                serve_table(&mut env, table, &signatures);
            }
            GroupSource::SingleFile(path) => {
                let text = read_text(path, options.encoding).map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => StstError::NoSuchTemplate {
                        name: path.display().to_string(),
                    },
                    _ => {
                        listener.report(&Diagnostic::new(
                            DiagnosticKind::Io,
                            "could not read template file '{0}': {1}",
                            &[&path.display(), &e],
                        ));
                        StstError::TemplateLoad {
                            name: path.display().to_string(),
                            source: None,
                        }
                    }
                })?;
                let mut table = HashMap::new();
                table.insert(
                    path.display().to_string(),
                    Entry {
                        body: text,
                        args: None,
                    },
                );
                serve_table(&mut env, table, &signatures);
            }
        }

        let marks = ValueMarks::default();
        configure(&mut env, delimiters, options, &marks).map_err(|err| {
            listener.report(&Diagnostic::from_engine(&err));
            StstError::TemplateLoad {
                name: source.to_string(),
                source: Some(err),
            }
        })?;

        debug!("template group ready: {}", source);
        Ok(Self {
            source,
            delimiters,
            env,
            signatures,
            marks,
        })
    }

    /// Delimiters in effect, after any group file override
    pub fn delimiters(&self) -> Delimiters {
        self.delimiters
    }

    /// Look up a template and create a fresh instance of it
    pub fn instance_of(
        &self,
        name: &str,
        listener: &dyn ErrorListener,
    ) -> Result<TemplateInstance<'_>, StstError> {
        let key = match &self.source {
            GroupSource::Dir(root) | GroupSource::RawDir(root) => {
                let key = name.trim_start_matches('/');
                if template_path(root, key).is_none() {
                    return Err(StstError::PathTraversal {
                        name: name.to_string(),
                    });
                }
                key
            }
            _ => name,
        };

        match self.env.get_template(key) {
            Ok(template) => {
                let args = self
                    .signatures
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get(key)
                    .cloned()
                    .flatten();
                Ok(TemplateInstance::new(template, args).with_value_marks(self.marks.clone()))
            }
            Err(err) if err.kind() == ErrorKind::TemplateNotFound => {
                Err(StstError::NoSuchTemplate {
                    name: name.to_string(),
                })
            }
            Err(err) => {
                listener.report(&Diagnostic::from_engine(&err));
                Err(StstError::TemplateLoad {
                    name: name.to_string(),
                    source: Some(err),
                })
            }
        }
    }
}

/// Start/stop pair `S`,`T` gives `S expr T`, `S% stmt %T` and `S! comment !T`
pub fn syntax_for(delimiters: Delimiters) -> Result<SyntaxConfig, Error> {
    let Delimiters { start, stop } = delimiters;
    SyntaxConfig::builder()
        .variable_delimiters(start.to_string(), stop.to_string())
        .block_delimiters(format!("{}%", start), format!("%{}", stop))
        .comment_delimiters(format!("{}!", start), format!("!{}", stop))
        .build()
}

fn configure(
    env: &mut Environment<'static>,
    delimiters: Delimiters,
    options: &GroupOptions,
    marks: &ValueMarks,
) -> Result<(), Error> {
    env.set_syntax(syntax_for(delimiters)?);
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_debug(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Lenient);

    let marks = options.indent.then(|| marks.clone());
    env.set_formatter(move |out, _state, value| format_value(out, value, marks.as_ref()));

    let renderer = options.renderer.map(RendererKind::build);
    env.add_filter(
        "fmt",
        move |value: Value, format: Option<String>| -> Result<Value, Error> {
            match &renderer {
                Some(renderer) => apply_renderer(renderer.as_ref(), value, format.as_deref()),
                None => Ok(value),
            }
        },
    );
    Ok(())
}

/// Run string values, and strings inside sequences, through the renderer
fn apply_renderer(
    renderer: &dyn AttributeRenderer,
    value: Value,
    format: Option<&str>,
) -> Result<Value, Error> {
    if let Some(text) = value.as_str() {
        return renderer
            .render(text, format)
            .map(Value::from)
            .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()));
    }
    if value.kind() == ValueKind::Seq {
        let items = value
            .try_iter()?
            .map(|item| apply_renderer(renderer, item, format))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::from(items));
    }
    Ok(value)
}

/// Resolve a template name to its file, refusing names that leave `root`
fn template_path(root: &Path, name: &str) -> Option<PathBuf> {
    let relative = PathBuf::from(format!("{}.{}", name, TEMPLATE_EXTENSION)).clean();
    let escapes = relative.is_absolute()
        || matches!(
            relative.components().next(),
            Some(Component::ParentDir | Component::Prefix(_))
        );
    (!escapes).then(|| root.join(relative))
}

fn read_text(path: &Path, encoding: &'static Encoding) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(encoding::decode(&bytes, encoding, &path.display().to_string()).into_owned())
}

fn load_from_dir(
    root: &Path,
    name: &str,
    raw: bool,
    encoding: &'static Encoding,
    signatures: &Signatures,
) -> Result<Option<String>, Error> {
    let name = name.trim_start_matches('/');
    let path = template_path(root, name).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("template '{}' is outside the template directory", name),
        )
    })?;

    let text = match read_text(&path, encoding) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("could not read template file '{}'", path.display()),
            )
            .with_source(e))
        }
    };
    debug!("loaded template '{}' from {}", name, path.display());

    let (body, args) = if raw {
        (text, None)
    } else {
        let expected = name.rsplit('/').next().unwrap_or(name);
        let decl = parse_template_file(&text, expected)
            .map_err(|e| group_syntax_error(&path, &e))?;
        (decl.body, Some(decl.args))
    };

    signatures
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.to_string(), args);
    Ok(Some(body))
}

fn group_syntax_error(path: &Path, err: &GroupParseError) -> Error {
    Error::new(
        ErrorKind::SyntaxError,
        format!("{}:{}: {}", path.display(), err.line, err.message),
    )
}

/// Hand an in-memory template table to the engine through its loader
fn serve_table(env: &mut Environment<'static>, table: HashMap<String, Entry>, signatures: &Signatures) {
    {
        let mut signatures = signatures.lock().unwrap_or_else(PoisonError::into_inner);
        for (name, entry) in &table {
            signatures.insert(name.clone(), entry.args.clone());
        }
    }
    env.set_loader(move |name| Ok(table.get(name).map(|entry| entry.body.clone())));
}

/// Read a group file and its imports into `table`. Templates already in the
/// table win over imported ones; returns the file's delimiter declaration.
fn load_group_file(
    path: &Path,
    encoding: &'static Encoding,
    stack: &mut Vec<PathBuf>,
    table: &mut HashMap<String, Entry>,
    listener: &dyn ErrorListener,
) -> Result<Option<Delimiters>, StstError> {
    let path = path.clean();
    if stack.contains(&path) {
        return Err(StstError::CircularImport { path });
    }

    let text = match read_text(&path, encoding) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(StstError::NoSuchTemplate {
                name: path.display().to_string(),
            })
        }
        Err(e) => {
            listener.report(&Diagnostic::new(
                DiagnosticKind::Io,
                "could not read group file '{0}': {1}",
                &[&path.display(), &e],
            ));
            return Err(StstError::TemplateLoad {
                name: path.display().to_string(),
                source: None,
            });
        }
    };

    let group = parse_group(&text).map_err(|e| {
        listener.report(&Diagnostic::new(
            DiagnosticKind::CompileTime,
            "{0}:{1}: {2}",
            &[&path.display(), &e.line, &e.message],
        ));
        StstError::TemplateLoad {
            name: path.display().to_string(),
            source: Some(group_syntax_error(&path, &e)),
        }
    })?;
    debug!(
        "group file {}: {} templates, {} imports",
        path.display(),
        group.templates.len(),
        group.imports.len()
    );

    let mut local: HashMap<String, Entry> = HashMap::new();
    for decl in group.templates {
        if local.contains_key(&decl.name) {
            listener.report(&Diagnostic::new(
                DiagnosticKind::CompileTime,
                "{0}:{1}: redefinition of template '{2}'",
                &[&path.display(), &decl.line, &decl.name],
            ));
            return Err(StstError::TemplateLoad {
                name: path.display().to_string(),
                source: None,
            });
        }
        local.insert(
            decl.name,
            Entry {
                body: decl.body,
                args: Some(decl.args),
            },
        );
    }
    for (name, entry) in local {
        table.entry(name).or_insert(entry);
    }

    stack.push(path.clone());
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for import in &group.imports {
        let imported = load_group_file(&base.join(import), encoding, stack, table, listener)?;
        if imported.is_some() {
            warn!(
                "delimiters declared in imported group file '{}' are ignored",
                import
            );
        }
    }
    stack.pop();

    for alias in group.aliases {
        let target = table.get(&alias.target).cloned().ok_or_else(|| {
            listener.report(&Diagnostic::new(
                DiagnosticKind::CompileTime,
                "{0}:{1}: alias target '{2}' is not defined",
                &[&path.display(), &alias.line, &alias.target],
            ));
            StstError::TemplateLoad {
                name: path.display().to_string(),
                source: None,
            }
        })?;
        table.entry(alias.name).or_insert(target);
    }

    Ok(group.delimiters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::listener::testing::CollectingListener;
    use tempfile::tempdir;

    fn options() -> GroupOptions {
        GroupOptions {
            delimiters: Delimiters::default(),
            encoding: encoding_rs::UTF_8,
            indent: true,
            renderer: None,
        }
    }

    fn render(group: &TemplateGroup, name: &str, attrs: &[(&str, Value)]) -> String {
        let listener = CollectingListener::default();
        let mut instance = group.instance_of(name, &listener).unwrap();
        for (key, value) in attrs {
            instance.add(key, value.clone()).unwrap();
        }
        instance.render().unwrap()
    }

    #[test]
    fn test_source_for_spec() {
        let dir = Path::new("/t");
        assert_eq!(
            GroupSource::for_spec(
                &TemplateSpec::parse("site.page", TemplateMode::Raw),
                TemplateMode::Raw,
                dir
            ),
            GroupSource::File(PathBuf::from("/t/site.stg"))
        );
        assert_eq!(
            GroupSource::for_spec(
                &TemplateSpec::parse("page", TemplateMode::Raw),
                TemplateMode::Raw,
                dir
            ),
            GroupSource::RawDir(PathBuf::from("/t"))
        );
        assert_eq!(
            GroupSource::for_spec(
                &TemplateSpec::parse("page", TemplateMode::Declared),
                TemplateMode::Declared,
                dir
            ),
            GroupSource::Dir(PathBuf::from("/t"))
        );
        assert_eq!(
            GroupSource::for_spec(
                &TemplateSpec::parse("a.b", TemplateMode::RawSingleFile),
                TemplateMode::RawSingleFile,
                dir
            ),
            GroupSource::SingleFile(PathBuf::from("a.b"))
        );
    }

    #[test]
    fn test_declared_dir_template() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("hello.st"),
            "hello(name) ::= <<\nHello $name$!\n>>\n",
        )
        .unwrap();

        let listener = CollectingListener::default();
        let group =
            TemplateGroup::load(GroupSource::Dir(dir.path().to_path_buf()), &options(), &listener)
                .unwrap();
        let out = render(&group, "hello", &[("name", Value::from("World"))]);
        assert_eq!(out, "Hello World!");
    }

    #[test]
    fn test_raw_dir_template_with_include() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("parts")).unwrap();
        fs::write(dir.path().join("page.st"), "[$% include \"parts/inner\" %$]\n").unwrap();
        fs::write(dir.path().join("parts/inner.st"), "$x$").unwrap();

        let listener = CollectingListener::default();
        let group = TemplateGroup::load(
            GroupSource::RawDir(dir.path().to_path_buf()),
            &options(),
            &listener,
        )
        .unwrap();
        let out = render(&group, "page", &[("x", Value::from(42))]);
        assert_eq!(out, "[42]\n");
    }

    #[test]
    fn test_missing_template() {
        let dir = tempdir().unwrap();
        let listener = CollectingListener::default();
        let group =
            TemplateGroup::load(GroupSource::Dir(dir.path().to_path_buf()), &options(), &listener)
                .unwrap();
        match group.instance_of("nope", &listener) {
            Err(StstError::NoSuchTemplate { name }) => assert_eq!(name, "nope"),
            other => panic!("Expected NoSuchTemplate, got {:?}", other.err()),
        }
        assert!(listener.categories().is_empty());
    }

    #[test]
    fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let listener = CollectingListener::default();
        let group = TemplateGroup::load(
            GroupSource::RawDir(dir.path().to_path_buf()),
            &options(),
            &listener,
        )
        .unwrap();
        assert!(matches!(
            group.instance_of("../../etc/passwd", &listener),
            Err(StstError::PathTraversal { .. })
        ));
    }

    #[test]
    fn test_declaration_name_mismatch_is_compile_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("hello.st"), "other() ::= \"x\"").unwrap();

        let listener = CollectingListener::default();
        let group =
            TemplateGroup::load(GroupSource::Dir(dir.path().to_path_buf()), &options(), &listener)
                .unwrap();
        assert!(matches!(
            group.instance_of("hello", &listener),
            Err(StstError::TemplateLoad { .. })
        ));
        assert_eq!(listener.categories(), vec!["compile"]);
    }

    #[test]
    fn test_engine_syntax_error_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.st"), "$% if %$").unwrap();

        let listener = CollectingListener::default();
        let group = TemplateGroup::load(
            GroupSource::RawDir(dir.path().to_path_buf()),
            &options(),
            &listener,
        )
        .unwrap();
        assert!(group.instance_of("bad", &listener).is_err());
        assert_eq!(listener.categories(), vec!["compile"]);
    }

    #[test]
    fn test_group_file_with_import_alias_and_delimiters() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("base.stg"),
            "shared() ::= \"base\"\ngreet(name) ::= \"base greet\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("site.stg"),
            "import \"base.stg\"\ndelimiters \"<\", \">\"\n\
             greet(name) ::= <<Hi <name>, <% include \"shared\" %>!>>\n\
             welcome ::= greet\n",
        )
        .unwrap();

        let listener = CollectingListener::default();
        let group = TemplateGroup::load(
            GroupSource::File(dir.path().join("site.stg")),
            &options(),
            &listener,
        )
        .unwrap();
        assert_eq!(group.delimiters(), Delimiters { start: '<', stop: '>' });

        let out = render(&group, "greet", &[("name", Value::from("Ann"))]);
        assert_eq!(out, "Hi Ann, base!");
        let out = render(&group, "welcome", &[("name", Value::from("Bo"))]);
        assert_eq!(out, "Hi Bo, base!");
    }

    #[test]
    fn test_circular_import() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.stg"), "import \"b.stg\"\n").unwrap();
        fs::write(dir.path().join("b.stg"), "import \"a.stg\"\n").unwrap();

        let listener = CollectingListener::default();
        let result = TemplateGroup::load(
            GroupSource::File(dir.path().join("a.stg")),
            &options(),
            &listener,
        );
        assert!(matches!(result, Err(StstError::CircularImport { .. })));
    }

    #[test]
    fn test_group_file_parse_error_is_compile_time() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("g.stg"), "t( ::= \"x\"").unwrap();

        let listener = CollectingListener::default();
        let result = TemplateGroup::load(
            GroupSource::File(dir.path().join("g.stg")),
            &options(),
            &listener,
        );
        assert!(matches!(result, Err(StstError::TemplateLoad { .. })));
        assert_eq!(listener.categories(), vec!["compile"]);
    }

    #[test]
    fn test_missing_group_file() {
        let dir = tempdir().unwrap();
        let listener = CollectingListener::default();
        let result = TemplateGroup::load(
            GroupSource::File(dir.path().join("none.stg")),
            &options(),
            &listener,
        );
        assert!(matches!(result, Err(StstError::NoSuchTemplate { .. })));
    }

    #[test]
    fn test_fmt_filter_uses_renderer() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("t.st"),
            "$ s|fmt(\"upper\") $ $ n|fmt(\"upper\") $ $ l|fmt(\"cap\")|join(\",\") $",
        )
        .unwrap();

        let mut opts = options();
        opts.renderer = Some(RendererKind::Basic);
        let listener = CollectingListener::default();
        let group =
            TemplateGroup::load(GroupSource::RawDir(dir.path().to_path_buf()), &opts, &listener)
                .unwrap();
        let out = render(
            &group,
            "t",
            &[
                ("s", Value::from("abc")),
                ("n", Value::from(7)),
                ("l", Value::from(vec!["x", "y"])),
            ],
        );
        assert_eq!(out, "ABC 7 X,Y");
    }

    #[test]
    fn test_fmt_filter_without_renderer_is_identity() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("t.st"), "$ s|fmt(\"upper\") $").unwrap();

        let listener = CollectingListener::default();
        let group = TemplateGroup::load(
            GroupSource::RawDir(dir.path().to_path_buf()),
            &options(),
            &listener,
        )
        .unwrap();
        assert_eq!(render(&group, "t", &[("s", Value::from("abc"))]), "abc");
    }

    #[test]
    fn test_unsupported_format_is_render_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("t.st"), "$ s|fmt(\"shout\") $").unwrap();

        let mut opts = options();
        opts.renderer = Some(RendererKind::JavaScript);
        let listener = CollectingListener::default();
        let group =
            TemplateGroup::load(GroupSource::RawDir(dir.path().to_path_buf()), &opts, &listener)
                .unwrap();
        let mut instance = group.instance_of("t", &listener).unwrap();
        instance.add("s", Value::from("abc")).unwrap();
        let err = instance.render().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_single_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.txt");
        fs::write(&path, "<$a$>\n").unwrap();

        let listener = CollectingListener::default();
        let group =
            TemplateGroup::load(GroupSource::SingleFile(path.clone()), &options(), &listener)
                .unwrap();
        let name = path.display().to_string();
        assert_eq!(render(&group, &name, &[("a", Value::from("z"))]), "<z>\n");
    }
}
