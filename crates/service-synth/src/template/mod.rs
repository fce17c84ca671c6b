//! Service templates.
//!
//! A template is ordinary TypeScript in which certain identifiers are holes
//! (see [`placeholder`]). Both templates are parsed once into a [`Templates`]
//! value which is never mutated afterwards; each synthesis works on a clone.

pub mod parser;

use std::path::{Path, PathBuf};

use crate::ast::Program;
use crate::config::SynthConfig;
use crate::diagnostic::SynthError;
pub use parser::TemplateParser;

/// Placeholder identifiers understood by the synthesizer.
///
/// Every placeholder is required: if a template uses one, the substitution
/// mapping must provide it. Other identifiers pass through unchanged.
pub mod placeholder {
    pub const ENTITY: &str = "ENTITY";
    pub const SERVICE: &str = "SERVICE";
    pub const SERVICE_BASE: &str = "SERVICE_BASE";
    pub const DELEGATE: &str = "DELEGATE";
    pub const FIND_MANY_ARGS: &str = "FIND_MANY_ARGS";
    pub const FIND_ONE_ARGS: &str = "FIND_ONE_ARGS";
    pub const CREATE_ARGS: &str = "CREATE_ARGS";
    pub const UPDATE_ARGS: &str = "UPDATE_ARGS";
    pub const DELETE_ARGS: &str = "DELETE_ARGS";
    pub const CREATE_ARGS_MAPPING: &str = "CREATE_ARGS_MAPPING";
    pub const UPDATE_ARGS_MAPPING: &str = "UPDATE_ARGS_MAPPING";

    pub const ALL: &[&str] = &[
        ENTITY,
        SERVICE,
        SERVICE_BASE,
        DELEGATE,
        FIND_MANY_ARGS,
        FIND_ONE_ARGS,
        CREATE_ARGS,
        UPDATE_ARGS,
        DELETE_ARGS,
        CREATE_ARGS_MAPPING,
        UPDATE_ARGS_MAPPING,
    ];

    pub fn is_placeholder(name: &str) -> bool {
        ALL.contains(&name)
    }
}

/// Which of the two artifacts a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// `{Type}Service`, the user-editable subclass.
    Concrete,
    /// `{Type}ServiceBase`, the regenerated CRUD implementation.
    Base,
}

impl TemplateKind {
    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Concrete => "service.template.ts",
            TemplateKind::Base => "service.base.template.ts",
        }
    }

    fn embedded_source(self) -> &'static str {
        match self {
            TemplateKind::Concrete => include_str!("../../templates/service.template.ts"),
            TemplateKind::Base => include_str!("../../templates/service.base.template.ts"),
        }
    }
}

/// Parsed templates for both artifacts.
#[derive(Debug, Clone)]
pub struct Templates {
    concrete: Program,
    base: Program,
}

impl Templates {
    /// Parses the templates compiled into the crate.
    pub fn embedded() -> Result<Self, SynthError> {
        let mut parser = TemplateParser::new()?;
        let mut parse = |kind: TemplateKind| {
            parser.parse(kind.embedded_source(), Path::new(kind.file_name()))
        };
        Ok(Self {
            concrete: parse(TemplateKind::Concrete)?,
            base: parse(TemplateKind::Base)?,
        })
    }

    /// Reads and parses both templates from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, SynthError> {
        let mut parser = TemplateParser::new()?;
        let mut load = |kind: TemplateKind| -> Result<Program, SynthError> {
            let path: PathBuf = dir.join(kind.file_name());
            let source = std::fs::read_to_string(&path)
                .map_err(|e| SynthError::io(&path, e.to_string()))?;
            parser.parse(&source, &path)
        };
        Ok(Self {
            concrete: load(TemplateKind::Concrete)?,
            base: load(TemplateKind::Base)?,
        })
    }

    /// Loads the templates selected by `config`.
    pub fn load(config: &SynthConfig) -> Result<Self, SynthError> {
        match &config.template_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    pub fn get(&self, kind: TemplateKind) -> &Program {
        match kind {
            TemplateKind::Concrete => &self.concrete,
            TemplateKind::Base => &self.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Stmt, StmtKind};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn templates_are_shareable_across_threads() {
        assert_send_sync::<Templates>();
    }

    #[test]
    fn embedded_templates_declare_their_target_classes() {
        let templates = Templates::embedded().unwrap();
        assert!(templates
            .get(TemplateKind::Concrete)
            .find_class(placeholder::SERVICE)
            .is_some());

        let base = templates.get(TemplateKind::Base);
        let class = base.find_class(placeholder::SERVICE_BASE).unwrap();
        for method in ["count", "findMany", "findOne", "create", "update", "delete"] {
            assert!(class.method(method).is_some(), "missing {}", method);
        }
    }

    #[test]
    fn base_template_keeps_mapping_holes_as_ambient_constants() {
        let templates = Templates::embedded().unwrap();
        let ambient: Vec<&Stmt> = templates
            .get(TemplateKind::Base)
            .body
            .iter()
            .filter(|stmt| stmt.is_ambient())
            .collect();
        assert_eq!(ambient.len(), 2);
        assert!(ambient.iter().all(|stmt| matches!(stmt.kind, StmtKind::Var(_))));
    }

    #[test]
    fn missing_template_dir_is_io_error() {
        let err = Templates::from_dir(Path::new("/nonexistent/templates")).unwrap_err();
        assert!(matches!(err, SynthError::IoError { .. }));
    }
}
