//! Per-entity service synthesis.
//!
//! For one entity both artifacts are produced together:
//!
//! ```text
//! template ─▶ interpolate ─▶ mutate (shared Decision) ─▶ strip scaffold ─▶ render
//! ```
//!
//! The concrete service imports the base service, so their paths are always
//! computed in the same call.

pub mod interpolate;
pub mod mapping;
pub mod mutate;
pub mod naming;
pub mod scaffold;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::ast::{Ident, ImportDecl, Program};
use crate::codegen::printer::render;
use crate::config::SynthConfig;
use crate::diagnostic::SynthError;
use crate::entity::Entity;
use crate::template::{placeholder, TemplateKind, Templates};

use interpolate::{interpolate_template, Substitutions};
use mapping::{create_mapping, update_mapping, MappingContext};
use mutate::{add_imports, relative_import_path, Decision};
use naming::ServiceNames;

/// Fixed identity of the hashing collaborator and the names the generated
/// code uses to reach it.
pub mod collaborator {
    pub const PASSWORD_SERVICE: &str = "PasswordService";
    pub const PASSWORD_SERVICE_MEMBER: &str = "passwordService";
    pub const HASH_METHOD: &str = "hash";
    pub const TRANSFORM_HELPER: &str = "transformStringFieldInUpdate";
    pub const ARGS: &str = "args";
    pub const DATA: &str = "data";
    /// Methods that await the collaborator once it is injected.
    pub const ASYNC_METHODS: &[&str] = &["create", "update"];
}

/// A generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub path: PathBuf,
    pub code: String,
}

/// Produces the `{Type}Service` / `{Type}ServiceBase` pair for entities.
///
/// Templates are parsed once at construction and shared read-only, so a
/// `Synthesizer` can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: SynthConfig,
    templates: Templates,
}

impl Synthesizer {
    /// Creates a synthesizer, loading the templates selected by `config`.
    pub fn new(config: SynthConfig) -> Result<Self, SynthError> {
        let templates = Templates::load(&config)?;
        Ok(Self { config, templates })
    }

    pub fn with_templates(config: SynthConfig, templates: Templates) -> Self {
        Self { config, templates }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Destination of the concrete service.
    pub fn service_path(&self, entity_name: &str) -> PathBuf {
        self.config
            .src_dir
            .join(entity_name)
            .join(format!("{}.service.ts", entity_name))
    }

    /// Destination of the base service.
    pub fn service_base_path(&self, entity_name: &str) -> PathBuf {
        self.config
            .src_dir
            .join(entity_name)
            .join("base")
            .join(format!("{}.service.base.ts", entity_name))
    }

    /// Synthesizes `[concrete, base]` for one entity.
    ///
    /// `entity_name` is the module directory name (`customer`), `entity_type`
    /// the generated type name (`Customer`).
    #[instrument(level = "info", skip_all, fields(entity = %entity_name, entity_type = %entity_type))]
    pub fn synthesize(
        &self,
        entity_name: &str,
        entity_type: &str,
        entity: &Entity,
    ) -> Result<[Module; 2], SynthError> {
        let names = ServiceNames::new(entity_type);
        let subs = substitutions(&names, entity);
        let decision = Decision::for_entity(entity, &self.config);

        let service_path = self.service_path(entity_name);
        let base_path = self.service_base_path(entity_name);

        let mut concrete = self.instantiate(TemplateKind::Concrete, &subs)?;
        add_imports(
            &mut concrete,
            vec![ImportDecl::named(
                [Ident::new(&names.service_base)],
                relative_import_path(&service_path, &base_path)?,
            )],
        );
        let concrete = finalize(concrete, &decision, TemplateKind::Concrete, &names.service, &service_path)?;

        let base = self.instantiate(TemplateKind::Base, &subs)?;
        let base = finalize(base, &decision, TemplateKind::Base, &names.service_base, &base_path)?;

        debug!(state = "finalized", "synthesized service modules");
        Ok([
            Module {
                path: service_path,
                code: concrete,
            },
            Module {
                path: base_path,
                code: base,
            },
        ])
    }

    /// Synthesizes an entity using its camel-cased name as the module name.
    pub fn synthesize_entity(&self, entity: &Entity) -> Result<[Module; 2], SynthError> {
        self.synthesize(&naming::camel_case(&entity.name), &entity.name, entity)
    }

    /// Synthesizes a batch. A failing entity does not affect the others.
    pub fn synthesize_all<'a>(
        &self,
        entities: impl IntoIterator<Item = (&'a str, &'a str, &'a Entity)>,
    ) -> Vec<Result<[Module; 2], SynthError>> {
        entities
            .into_iter()
            .map(|(entity_name, entity_type, entity)| self.synthesize(entity_name, entity_type, entity))
            .collect()
    }

    /// Clones the template of `kind` and fills in its placeholders.
    fn instantiate(&self, kind: TemplateKind, subs: &Substitutions) -> Result<Program, SynthError> {
        let mut program = self.templates.get(kind).clone();
        interpolate_template(&mut program, subs, kind.file_name())?;
        Ok(program)
    }
}

/// Substitutions shared by both templates of an entity.
fn substitutions(names: &ServiceNames, entity: &Entity) -> Substitutions {
    let fields: Vec<&str> = entity.sensitive_fields().map(|f| f.name.as_str()).collect();
    let ctx = MappingContext::default();

    let mut subs = Substitutions::new();
    subs.insert_ident(placeholder::ENTITY, &names.entity);
    subs.insert_ident(placeholder::SERVICE, &names.service);
    subs.insert_ident(placeholder::SERVICE_BASE, &names.service_base);
    subs.insert_ident(placeholder::DELEGATE, &names.delegate);
    subs.insert_ident(placeholder::FIND_MANY_ARGS, &names.find_many_args);
    subs.insert_ident(placeholder::FIND_ONE_ARGS, &names.find_one_args);
    subs.insert_ident(placeholder::CREATE_ARGS, &names.create_args);
    subs.insert_ident(placeholder::UPDATE_ARGS, &names.update_args);
    subs.insert_ident(placeholder::DELETE_ARGS, &names.delete_args);
    subs.insert(placeholder::CREATE_ARGS_MAPPING, create_mapping(&fields, &ctx));
    subs.insert(placeholder::UPDATE_ARGS_MAPPING, update_mapping(&fields, &ctx));
    subs
}

/// Applies the decision, strips scaffold and renders.
fn finalize(
    mut program: Program,
    decision: &Decision,
    kind: TemplateKind,
    class_name: &str,
    path: &Path,
) -> Result<String, SynthError> {
    if program.find_class(class_name).is_none() {
        return Err(SynthError::TargetNotFound {
            class: class_name.to_string(),
        });
    }
    decision.apply(&mut program, kind, class_name, path)?;
    scaffold::strip(&mut program);
    Ok(render(&program))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{DataType, Field};

    fn synthesizer() -> Synthesizer {
        Synthesizer::new(SynthConfig::default()).unwrap()
    }

    #[test]
    fn places_modules_by_convention() {
        let synth = synthesizer();
        let [concrete, base] = synth
            .synthesize("orderItem", "OrderItem", &Entity::new("OrderItem", vec![]))
            .unwrap();
        assert_eq!(concrete.path, PathBuf::from("src/orderItem/orderItem.service.ts"));
        assert_eq!(base.path, PathBuf::from("src/orderItem/base/orderItem.service.base.ts"));
    }

    #[test]
    fn concrete_service_extends_base() {
        let [concrete, _] = synthesizer()
            .synthesize("tag", "Tag", &Entity::new("Tag", vec![]))
            .unwrap();
        assert!(concrete
            .code
            .contains("import { TagServiceBase } from \"./base/tag.service.base\";"));
        assert!(concrete.code.contains("export class TagService extends TagServiceBase {"));
        assert!(!concrete.code.contains("declare"));
    }

    #[test]
    fn base_service_delegates_to_prisma() {
        let [_, base] = synthesizer()
            .synthesize("tag", "Tag", &Entity::new("Tag", vec![]))
            .unwrap();
        assert!(base.code.contains("export class TagServiceBase {"));
        assert!(base.code.contains("return this.prisma.tag.findMany(args);"));
        assert!(base.code.contains("return this.prisma.tag.create<T>(args);"));
        assert!(!base.code.contains("@ts-ignore"));
        assert!(!base.code.contains("eslint-disable"));
    }

    #[test]
    fn with_templates_reuses_loaded_templates() {
        let config = SynthConfig {
            src_dir: PathBuf::from("apps/api/src"),
            ..SynthConfig::default()
        };
        let templates = Templates::load(&config).unwrap();
        let synth = Synthesizer::with_templates(config.clone(), templates);

        assert_eq!(synth.config().src_dir, config.src_dir);
        let [concrete, _] = synth
            .synthesize("tag", "Tag", &Entity::new("Tag", vec![]))
            .unwrap();
        assert_eq!(concrete.path, PathBuf::from("apps/api/src/tag/tag.service.ts"));
    }

    #[test]
    fn synthesize_entity_uses_camel_case_module_name() {
        let entity = Entity::new("OrderItem", vec![Field::new("password", DataType::Password)]);
        let [concrete, _] = synthesizer().synthesize_entity(&entity).unwrap();
        assert_eq!(concrete.path, PathBuf::from("src/orderItem/orderItem.service.ts"));
    }
}
