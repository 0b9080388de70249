use std::path::{Path, PathBuf};

use crate::config::TemplateMode;

/// File extension of template files in a template directory
pub const TEMPLATE_EXTENSION: &str = "st";
/// File extension of group files
pub const GROUP_EXTENSION: &str = "stg";

/// A parsed `[<group>.]<template>` specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSpec {
    /// A template file `<name>.st` in the template directory
    Bare { name: String },
    /// Template `name` of the group file `<group>.stg`
    Grouped { group: String, name: String },
    /// A single raw template file, relative to the current directory
    File { path: PathBuf },
}

impl TemplateSpec {
    /// The specifier is split at its first `.` unless it names a single file
    pub fn parse(spec: &str, mode: TemplateMode) -> Self {
        if mode == TemplateMode::RawSingleFile {
            return TemplateSpec::File {
                path: PathBuf::from(spec),
            };
        }
        match spec.split_once('.') {
            Some((group, name)) => TemplateSpec::Grouped {
                group: group.to_string(),
                name: name.to_string(),
            },
            None => TemplateSpec::Bare {
                name: spec.to_string(),
            },
        }
    }

    /// The name the template is looked up by inside its group
    pub fn template_name(&self) -> String {
        match self {
            TemplateSpec::Bare { name } | TemplateSpec::Grouped { name, .. } => name.clone(),
            TemplateSpec::File { path } => path.display().to_string(),
        }
    }

    /// Path of the group file for a grouped specifier
    pub fn group_file(&self, template_dir: &Path) -> Option<PathBuf> {
        match self {
            TemplateSpec::Grouped { group, .. } => {
                Some(template_dir.join(format!("{}.{}", group, GROUP_EXTENSION)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_name() {
        let spec = TemplateSpec::parse("page", TemplateMode::Declared);
        assert_eq!(
            spec,
            TemplateSpec::Bare {
                name: "page".to_string()
            }
        );
        assert_eq!(spec.template_name(), "page");
        assert_eq!(spec.group_file(Path::new("/t")), None);
    }

    #[test]
    fn test_split_at_first_dot() {
        let spec = TemplateSpec::parse("site.page.v2", TemplateMode::Raw);
        assert_eq!(
            spec,
            TemplateSpec::Grouped {
                group: "site".to_string(),
                name: "page.v2".to_string()
            }
        );
        assert_eq!(
            spec.group_file(Path::new("/t")),
            Some(PathBuf::from("/t/site.stg"))
        );
    }

    #[test]
    fn test_single_file_is_not_split() {
        let spec = TemplateSpec::parse("dir/page.txt", TemplateMode::RawSingleFile);
        assert_eq!(
            spec,
            TemplateSpec::File {
                path: PathBuf::from("dir/page.txt")
            }
        );
        assert_eq!(spec.template_name(), "dir/page.txt");
    }
}
