//! Placeholder interpolation.
//!
//! Replaces placeholder identifiers by structural substitution. A placeholder
//! used as an expression may be replaced by any expression. A shorthand
//! property `{ NAME }` becomes `{ NAME: <replacement> }` when the replacement
//! is not an identifier. In every other position (declaration name, type name,
//! property, import specifier) only an identifier replacement is valid.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::visit::{walk_expr, walk_prop, walk_stmt, IdentRole, VisitMut};
use crate::ast::{Expr, Ident, Program, Prop, PropKey, Stmt};
use crate::diagnostic::SynthError;
use crate::template::placeholder;

/// Placeholder name to replacement.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    entries: BTreeMap<String, Expr>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, placeholder: impl Into<String>, replacement: Expr) {
        self.entries.insert(placeholder.into(), replacement);
    }

    /// Maps a placeholder to a plain identifier.
    pub fn insert_ident(&mut self, placeholder: impl Into<String>, name: impl Into<String>) {
        self.insert(placeholder, Expr::Ident(Ident::new(name)));
    }

    pub fn get(&self, placeholder: &str) -> Option<&Expr> {
        self.entries.get(placeholder)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Substitutes every mapped identifier in `program`. Unmapped identifiers
/// are left as they are.
pub fn interpolate(program: &mut Program, subs: &Substitutions) -> Result<(), SynthError> {
    let mut interpolator = Interpolator::new(subs);
    interpolator.visit_program(program);
    interpolator.finish()
}

/// Like [`interpolate`], but fails if `program` uses a placeholder from the
/// template vocabulary that `subs` does not map.
pub fn interpolate_template(
    program: &mut Program,
    subs: &Substitutions,
    template: &str,
) -> Result<(), SynthError> {
    let mut interpolator = Interpolator::new(subs);
    interpolator.visit_program(program);

    if let Some(name) = interpolator.unmapped.iter().next() {
        return Err(SynthError::UnmappedRequiredPlaceholder {
            placeholder: name.clone(),
            template: template.to_string(),
        });
    }
    interpolator.finish()
}

struct Interpolator<'a> {
    subs: &'a Substitutions,
    /// Inside a `declare` statement.
    ambient: bool,
    /// Vocabulary placeholders seen without a mapping.
    unmapped: BTreeSet<String>,
    error: Option<SynthError>,
}

impl<'a> Interpolator<'a> {
    fn new(subs: &'a Substitutions) -> Self {
        Self {
            subs,
            ambient: false,
            unmapped: BTreeSet::new(),
            error: None,
        }
    }

    fn finish(self) -> Result<(), SynthError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn lookup(&mut self, name: &str) -> Option<&'a Expr> {
        let replacement = self.subs.get(name);
        if replacement.is_none() && placeholder::is_placeholder(name) {
            self.unmapped.insert(name.to_string());
        }
        replacement
    }
}

impl VisitMut for Interpolator<'_> {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        let outer = self.ambient;
        self.ambient = outer || stmt.is_ambient();
        walk_stmt(self, stmt);
        self.ambient = outer;
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        if let Expr::Ident(ident) = expr {
            if let Some(replacement) = self.lookup(&ident.name) {
                // The replacement is final; placeholders inside it are not expanded.
                *expr = replacement.clone();
                return;
            }
        }
        walk_expr(self, expr);
    }

    fn visit_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(ident) = prop {
            if let Some(replacement) = self.lookup(&ident.name) {
                if !matches!(replacement, Expr::Ident(_)) {
                    *prop = Prop::KeyValue {
                        key: PropKey::Ident(ident.clone()),
                        value: replacement.clone(),
                    };
                    return;
                }
            }
        }
        walk_prop(self, prop);
    }

    fn visit_ident(&mut self, ident: &mut Ident, role: IdentRole) {
        let Some(replacement) = self.lookup(&ident.name) else {
            return;
        };
        match replacement {
            Expr::Ident(name) => ident.name = name.name.clone(),
            // Stand-in declarations are removed later and only need to keep their shape.
            _ if self.ambient && role == IdentRole::Binding => {}
            _ => {
                if self.error.is_none() {
                    self.error = Some(SynthError::InvalidReplacement {
                        placeholder: ident.name.clone(),
                        position: role.describe().to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;
    use crate::codegen::printer::render;
    use crate::template::TemplateParser;
    use std::path::Path;

    fn parse(source: &str) -> Program {
        TemplateParser::new()
            .unwrap()
            .parse(source, Path::new("test.ts"))
            .unwrap()
    }

    const SOURCE: &str = r#"import { ENTITY } from "@prisma/client";

declare const CREATE_ARGS_MAPPING: CREATE_ARGS;

export class SERVICE_BASE {
  create<T extends CREATE_ARGS>(args: CREATE_ARGS): Promise<ENTITY> {
    return this.prisma.DELEGATE.create<T>(CREATE_ARGS_MAPPING);
  }
}
"#;

    fn subs() -> Substitutions {
        let mut subs = Substitutions::new();
        subs.insert_ident("ENTITY", "User");
        subs.insert_ident("SERVICE_BASE", "UserServiceBase");
        subs.insert_ident("DELEGATE", "user");
        subs.insert_ident("CREATE_ARGS", "UserCreateArgs");
        subs.insert(
            "CREATE_ARGS_MAPPING",
            object(vec![spread_prop(Expr::Ident(ident("args")))]),
        );
        subs
    }

    #[test]
    fn empty_mapping_leaves_text_unchanged() {
        let mut program = parse(SOURCE);
        let before = render(&program);
        interpolate(&mut program, &Substitutions::new()).unwrap();
        assert_eq!(render(&program), before);
    }

    #[test]
    fn replaces_placeholders_in_every_role() {
        let mut program = parse(SOURCE);
        interpolate_template(&mut program, &subs(), "base").unwrap();
        let code = render(&program);

        assert!(code.contains("import { User } from \"@prisma/client\";"));
        assert!(code.contains("export class UserServiceBase {"));
        assert!(code.contains("create<T extends UserCreateArgs>(args: UserCreateArgs): Promise<User>"));
        assert!(code.contains("return this.prisma.user.create<T>({ ...args });"));
        // The stand-in keeps its name: an object is not a valid binding.
        assert!(code.contains("declare const CREATE_ARGS_MAPPING: UserCreateArgs;"));
    }

    #[test]
    fn unmapped_vocabulary_placeholder_fails() {
        let mut program = parse(SOURCE);
        let mut partial = subs();
        partial.entries.remove("DELEGATE");

        let err = interpolate_template(&mut program, &partial, "base").unwrap_err();
        assert!(matches!(
            err,
            SynthError::UnmappedRequiredPlaceholder { ref placeholder, .. } if placeholder == "DELEGATE"
        ));
    }

    #[test]
    fn unknown_identifiers_pass_through() {
        let mut program = parse("const x = CUSTOM_HOLE;");
        interpolate_template(&mut program, &Substitutions::new(), "custom").unwrap();
        assert_eq!(render(&program), "const x = CUSTOM_HOLE;\n");
    }

    #[test]
    fn expression_in_type_position_is_rejected() {
        let mut program = parse("export class A { run(args: ENTITY) {} }");
        let mut subs = Substitutions::new();
        subs.insert("ENTITY", object(vec![]));

        let err = interpolate(&mut program, &subs).unwrap_err();
        assert!(matches!(err, SynthError::InvalidReplacement { .. }));
    }

    #[test]
    fn shorthand_placeholder_takes_expression_as_value() {
        let mut program = parse("f({ CREATE_ARGS_MAPPING, DELEGATE });");
        interpolate(&mut program, &subs()).unwrap();
        assert_eq!(
            render(&program),
            "f({ CREATE_ARGS_MAPPING: { ...args }, user });\n"
        );
    }

    #[test]
    fn empty_substitutions_report_empty() {
        let mut subs = Substitutions::new();
        assert!(subs.is_empty());
        subs.insert_ident("ENTITY", "User");
        assert!(!subs.is_empty());
    }

    #[test]
    fn replacement_is_not_expanded_again() {
        let mut program = parse("f(A);");
        let mut subs = Substitutions::new();
        subs.insert("A", call(Expr::Ident(ident("A")), vec![]));
        interpolate(&mut program, &subs).unwrap();
        assert_eq!(render(&program), "f(A());\n");
    }
}
