//! Removal of template-only constructs.
//!
//! Templates carry `declare` stand-ins and diagnostic suppression comments so
//! they type-check on their own. Neither belongs in a generated module.

use tracing::debug;

use crate::ast::visit::{walk_class_member, walk_stmt, VisitMut};
use crate::ast::{ClassMember, Comment, Program, Stmt, StmtKind};

const SUPPRESSION_MARKERS: &[&str] = &[
    "eslint-disable",
    "eslint-enable",
    "@ts-ignore",
    "@ts-expect-error",
    "@ts-nocheck",
];

/// True for lint and type-check suppression comments.
pub fn is_suppression(comment: &Comment) -> bool {
    let body = comment.body();
    SUPPRESSION_MARKERS.iter().any(|marker| body.starts_with(marker))
}

/// Removes ambient declarations and suppression comments from `program`.
pub fn strip(program: &mut Program) {
    program.body.retain(|stmt| {
        if !stmt.is_ambient() {
            return true;
        }
        debug!(declaration = %declared_name(stmt), "removed scaffold declaration");
        false
    });
    Stripper.visit_program(program);
}

fn declared_name(stmt: &Stmt) -> String {
    match &stmt.kind {
        StmtKind::Class(class) => class.name.name.clone(),
        StmtKind::Interface(interface) => interface.name.name.clone(),
        StmtKind::TypeAlias(alias) => alias.name.name.clone(),
        StmtKind::Var(var) => var
            .decls
            .iter()
            .map(|decl| decl.name.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn strip_comments(comments: &mut Vec<Comment>) {
    comments.retain(|comment| {
        if is_suppression(comment) {
            debug!(comment = comment.body(), "removed suppression comment");
            return false;
        }
        true
    });
}

struct Stripper;

impl VisitMut for Stripper {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        strip_comments(&mut stmt.comments);
        walk_stmt(self, stmt);
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        strip_comments(&mut member.comments);
        walk_class_member(self, member);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::printer::render;
    use crate::template::TemplateParser;
    use std::path::Path;

    fn parse(source: &str) -> Program {
        TemplateParser::new()
            .unwrap()
            .parse(source, Path::new("test.ts"))
            .unwrap()
    }

    #[test]
    fn recognizes_suppression_comments() {
        let comment = |text: &str| Comment { text: text.to_string() };
        assert!(is_suppression(&comment("// @ts-ignore")));
        assert!(is_suppression(&comment("/* eslint-disable @typescript-eslint/no-unused-vars */")));
        assert!(is_suppression(&comment("// eslint-disable-next-line")));
        assert!(!is_suppression(&comment("// hashes the password")));
    }

    #[test]
    fn removes_stand_ins_and_keeps_target() {
        let mut program = parse(
            r#"
/* header */
/* eslint-disable */
import { A } from "./a";

declare class BASE {}
declare const MAPPING: Args;
declare interface Args {}

export class Target extends BASE {
  run() {
    // @ts-ignore
    return this.a.run(MAPPING);
  }
}
"#,
        );
        strip(&mut program);

        assert_eq!(
            render(&program),
            r#"/* header */
import { A } from "./a";

export class Target extends BASE {
  run() {
    return this.a.run(MAPPING);
  }
}
"#
        );
    }
}
