//! Structural mutations applied after interpolation.
//!
//! Whether an entity needs the password collaborator is decided once per
//! entity ([`Decision::for_entity`]) and the same decision is applied to both
//! artifacts:
//!
//! ```text
//! interpolated ──▶ sensitive-fields-checked ──┬──▶ no-change ─────────────┬──▶ finalized
//!                                              └──▶ collaborator-injected ─┘
//! ```
//!
//! Every mutation is idempotent: applying a decision twice leaves the tree as
//! applying it once.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::ast::{
    Accessibility, ClassDecl, Expr, Ident, ImportDecl, Param, Program, Stmt, StmtKind, TsType,
};
use crate::config::SynthConfig;
use crate::diagnostic::SynthError;
use crate::entity::Entity;
use crate::template::TemplateKind;

use super::collaborator;

/// The injected hashing collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Collaborator {
    /// `PasswordService`
    pub type_name: Ident,
    /// `passwordService`
    pub member: Ident,
    pub module: PathBuf,
    /// `transformStringFieldInUpdate`
    pub transform_helper: Ident,
    pub transform_helper_module: PathBuf,
}

impl Collaborator {
    pub fn from_config(config: &SynthConfig) -> Self {
        Self {
            type_name: Ident::new(collaborator::PASSWORD_SERVICE),
            member: Ident::new(collaborator::PASSWORD_SERVICE_MEMBER),
            module: config.password_service_module.clone(),
            transform_helper: Ident::new(collaborator::TRANSFORM_HELPER),
            transform_helper_module: config.transform_helper_module.clone(),
        }
    }
}

/// Per-entity mutation decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No sensitive fields: templates are used as interpolated.
    NoChange,
    /// At least one sensitive field: inject the collaborator.
    InjectCollaborator(Collaborator),
}

impl Decision {
    pub fn for_entity(entity: &Entity, config: &SynthConfig) -> Self {
        let sensitive = entity.sensitive_fields().count();
        debug!(state = "sensitive-fields-checked", sensitive, "checked sensitive fields");
        if sensitive == 0 {
            Decision::NoChange
        } else {
            Decision::InjectCollaborator(Collaborator::from_config(config))
        }
    }

    /// Applies the decision to the artifact of `kind` whose target class is
    /// `class_name` and which will be written to `module_path`.
    pub fn apply(
        &self,
        program: &mut Program,
        kind: TemplateKind,
        class_name: &str,
        module_path: &Path,
    ) -> Result<(), SynthError> {
        let collaborator = match self {
            Decision::NoChange => {
                debug!(state = "no-change", ?kind, "left structure unchanged");
                return Ok(());
            }
            Decision::InjectCollaborator(collaborator) => collaborator,
        };

        let class = program
            .find_class_mut(class_name)
            .ok_or_else(|| SynthError::TargetNotFound {
                class: class_name.to_string(),
            })?;

        add_injectable_dependency(class, &collaborator.member, &collaborator.type_name)?;
        match kind {
            TemplateKind::Concrete => {
                append_super_argument(class, &collaborator.member)?;
                mark_async(class, collaborator::ASYNC_METHODS, false)?;
            }
            TemplateKind::Base => {
                mark_async(class, collaborator::ASYNC_METHODS, true)?;
            }
        }

        let mut imports = vec![ImportDecl::named(
            [collaborator.type_name.clone()],
            relative_import_path(module_path, &collaborator.module)?,
        )];
        if kind == TemplateKind::Base {
            imports.push(ImportDecl::named(
                [collaborator.transform_helper.clone()],
                relative_import_path(module_path, &collaborator.transform_helper_module)?,
            ));
        }
        add_imports(program, imports);

        debug!(state = "collaborator-injected", ?kind, "injected collaborator");
        Ok(())
    }
}

/// Adds `protected readonly <name>: <ty>` to the constructor parameters.
pub fn add_injectable_dependency(
    class: &mut ClassDecl,
    name: &Ident,
    ty: &Ident,
) -> Result<(), SynthError> {
    let class_name = class.name.name.clone();
    let ctor = class
        .constructor_mut()
        .ok_or_else(|| SynthError::missing_member(&class_name, "constructor"))?;

    if ctor.params.iter().any(|param| param.name == *name) {
        return Ok(());
    }
    ctor.params.push(Param {
        accessibility: Some(Accessibility::Protected),
        readonly: true,
        name: name.clone(),
        optional: false,
        type_ann: Some(TsType::named(ty.clone())),
        default: None,
    });
    Ok(())
}

/// Appends `name` to the arguments of the constructor's `super(...)` call.
pub fn append_super_argument(class: &mut ClassDecl, name: &Ident) -> Result<(), SynthError> {
    let class_name = class.name.name.clone();
    let args = class
        .constructor_mut()
        .and_then(|ctor| ctor.body.as_mut())
        .and_then(|body| body.iter_mut().find_map(super_call_args))
        .ok_or_else(|| SynthError::missing_member(&class_name, "super(...)"))?;

    let arg = Expr::Ident(name.clone());
    if !args.contains(&arg) {
        args.push(arg);
    }
    Ok(())
}

fn super_call_args(stmt: &mut Stmt) -> Option<&mut Vec<Expr>> {
    match &mut stmt.kind {
        StmtKind::Expr(Expr::Call { callee, args, .. }) if **callee == Expr::Super => Some(args),
        _ => None,
    }
}

/// Marks the named methods `async`. With `required`, a missing method is an error.
pub fn mark_async(class: &mut ClassDecl, names: &[&str], required: bool) -> Result<(), SynthError> {
    for name in names {
        match class.method_mut(name) {
            Some(method) => method.is_async = true,
            None if required => {
                return Err(SynthError::missing_member(&class.name.name, *name));
            }
            None => {}
        }
    }
    Ok(())
}

/// Inserts imports after the existing ones. Specifiers whose local name is
/// already imported are dropped; an import left without specifiers is skipped.
pub fn add_imports(program: &mut Program, imports: Vec<ImportDecl>) {
    for mut import in imports {
        let bound: Vec<String> = program
            .imports()
            .flat_map(|existing| existing.local_names().map(str::to_string).collect::<Vec<_>>())
            .collect();
        import
            .named
            .retain(|spec| !bound.iter().any(|name| *name == spec.local_name().name));

        if import.named.is_empty() && import.default.is_none() && import.namespace.is_none() {
            debug!(source = %import.source, "skipped duplicate import");
            continue;
        }

        let position = program
            .body
            .iter()
            .rposition(|stmt| matches!(stmt.kind, StmtKind::Import(_)))
            .map_or(0, |last| last + 1);
        debug!(source = %import.source, "added import");
        program.body.insert(position, Stmt::new(StmtKind::Import(import)));
    }
}

/// Import specifier leading from the module at `from` to the module at `to`,
/// e.g. `./base/customer.service.base` or `../../auth/password.service`.
pub fn relative_import_path(from: &Path, to: &Path) -> Result<String, SynthError> {
    let fail = || SynthError::PathResolutionFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
    };
    if from.is_absolute() != to.is_absolute() {
        return Err(fail());
    }

    let from_norm = normalize(from).ok_or_else(fail)?;
    let target = strip_module_extension(&normalize(to).ok_or_else(fail)?);
    let dir = from_norm.parent().ok_or_else(fail)?;
    let relative = pathdiff::diff_paths(&target, dir).ok_or_else(fail)?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return Err(fail());
    }

    let joined = parts.join("/");
    if parts[0] == ".." {
        Ok(joined)
    } else {
        Ok(format!("./{}", joined))
    }
}

/// Collapses `.` and `..` without touching the filesystem. Returns `None` if
/// an absolute path climbs above its root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => return None,
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    Some(parts.iter().collect())
}

fn strip_module_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ts" | "tsx" | "js") => path.with_extension(""),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::printer::render;
    use crate::entity::{DataType, Field};
    use crate::template::TemplateParser;

    fn parse(source: &str) -> Program {
        TemplateParser::new()
            .unwrap()
            .parse(source, Path::new("test.ts"))
            .unwrap()
    }

    fn inject() -> Decision {
        Decision::InjectCollaborator(Collaborator::from_config(&SynthConfig::default()))
    }

    const CONCRETE: &str = r#"import { PrismaService } from "nestjs-prisma";

export class UserService extends UserServiceBase {
  constructor(protected readonly prisma: PrismaService) {
    super(prisma);
  }
}
"#;

    const BASE: &str = r#"export class UserServiceBase {
  constructor(protected readonly prisma: PrismaService) {}

  findMany(args: A): Promise<User[]> {
    return this.prisma.user.findMany(args);
  }

  create(args: A): Promise<User> {
    return this.prisma.user.create(args);
  }

  update(args: A): Promise<User> {
    return this.prisma.user.update(args);
  }
}
"#;

    #[test]
    fn decision_follows_sensitive_fields() {
        let config = SynthConfig::default();
        let tag = Entity::new("Tag", vec![Field::new("label", DataType::SingleLineText)]);
        assert_eq!(Decision::for_entity(&tag, &config), Decision::NoChange);

        let user = Entity::new("User", vec![Field::new("password", DataType::Password)]);
        assert!(matches!(
            Decision::for_entity(&user, &config),
            Decision::InjectCollaborator(_)
        ));
    }

    #[test]
    fn no_change_leaves_tree_untouched() {
        let mut program = parse(BASE);
        let before = program.clone();
        Decision::NoChange
            .apply(&mut program, TemplateKind::Base, "UserServiceBase", Path::new("src/user/base/user.service.base.ts"))
            .unwrap();
        assert_eq!(program, before);
    }

    #[test]
    fn injects_into_concrete_service() {
        let mut program = parse(CONCRETE);
        inject()
            .apply(&mut program, TemplateKind::Concrete, "UserService", Path::new("src/user/user.service.ts"))
            .unwrap();
        let code = render(&program);

        assert!(code.contains("import { PasswordService } from \"../auth/password.service\";"));
        assert!(code.contains("protected readonly passwordService: PasswordService"));
        assert!(code.contains("super(prisma, passwordService);"));
        assert!(!code.contains("transformStringFieldInUpdate"));
    }

    #[test]
    fn injects_into_base_service() {
        let mut program = parse(BASE);
        inject()
            .apply(&mut program, TemplateKind::Base, "UserServiceBase", Path::new("src/user/base/user.service.base.ts"))
            .unwrap();
        let code = render(&program);

        assert!(code.contains("import { PasswordService } from \"../../auth/password.service\";"));
        assert!(code.contains("import { transformStringFieldInUpdate } from \"../../prisma.util\";"));
        assert!(code.contains("async create(args: A)"));
        assert!(code.contains("async update(args: A)"));
        assert!(code.contains("  findMany(args: A)"));
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        let path = Path::new("src/user/user.service.ts");
        let mut once = parse(CONCRETE);
        inject().apply(&mut once, TemplateKind::Concrete, "UserService", path).unwrap();

        let mut twice = once.clone();
        inject().apply(&mut twice, TemplateKind::Concrete, "UserService", path).unwrap();
        assert_eq!(render(&twice), render(&once));
    }

    #[test]
    fn missing_target_class_is_reported() {
        let mut program = parse(CONCRETE);
        let err = inject()
            .apply(&mut program, TemplateKind::Concrete, "OtherService", Path::new("src/o/o.service.ts"))
            .unwrap_err();
        assert!(matches!(err, SynthError::TargetNotFound { .. }));
    }

    #[test]
    fn missing_async_method_in_base_is_reported() {
        let mut program = parse(
            "export class UserServiceBase {\n  constructor(protected readonly prisma: PrismaService) {}\n}\n",
        );
        let err = inject()
            .apply(&mut program, TemplateKind::Base, "UserServiceBase", Path::new("src/user/base/user.service.base.ts"))
            .unwrap_err();
        assert!(matches!(err, SynthError::MemberNotFound { ref member, .. } if member == "create"));
    }

    #[test]
    fn missing_super_call_is_reported() {
        let mut program = parse("export class UserService {\n  constructor(protected readonly prisma: PrismaService) {}\n}\n");
        let err = inject()
            .apply(&mut program, TemplateKind::Concrete, "UserService", Path::new("src/user/user.service.ts"))
            .unwrap_err();
        assert!(matches!(err, SynthError::MemberNotFound { ref member, .. } if member == "super(...)"));
    }

    #[test]
    fn duplicate_imports_are_skipped() {
        let mut program = parse(CONCRETE);
        add_imports(
            &mut program,
            vec![ImportDecl::named([Ident::new("PrismaService")], "./elsewhere")],
        );
        assert_eq!(program.imports().count(), 1);
    }

    #[test]
    fn imports_go_after_existing_imports() {
        let mut program = parse(CONCRETE);
        add_imports(&mut program, vec![ImportDecl::named([Ident::new("X")], "./x")]);
        assert!(matches!(program.body[1].kind, StmtKind::Import(_)));
        assert!(matches!(program.body[2].kind, StmtKind::Class(_)));
    }

    #[test]
    fn relative_paths_between_artifacts() {
        let concrete = Path::new("src/customer/customer.service.ts");
        let base = Path::new("src/customer/base/customer.service.base.ts");
        assert_eq!(
            relative_import_path(concrete, base).unwrap(),
            "./base/customer.service.base"
        );
        assert_eq!(
            relative_import_path(base, Path::new("src/auth/password.service.ts")).unwrap(),
            "../../auth/password.service"
        );
        assert_eq!(
            relative_import_path(Path::new("./src/a/../b/b.service.ts"), Path::new("src/util.ts")).unwrap(),
            "../util"
        );
    }

    #[test]
    fn relative_path_is_independent_of_root() {
        for root in ["src", "server/src", "/abs/project/src"] {
            let root = Path::new(root);
            let concrete = root.join("e/e.service.ts");
            let base = root.join("e/base/e.service.base.ts");
            assert_eq!(relative_import_path(&concrete, &base).unwrap(), "./base/e.service.base");
        }
    }

    #[test]
    fn mixed_absolute_and_relative_paths_fail() {
        let err = relative_import_path(Path::new("/src/a.ts"), Path::new("src/b.ts")).unwrap_err();
        assert!(matches!(err, SynthError::PathResolutionFailure { .. }));
    }
}
