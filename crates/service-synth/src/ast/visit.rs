//! Mutable tree traversal.
//!
//! Implementors override the `visit_*` hooks they care about and call the
//! matching `walk_*` function to keep descending. Identifiers are reported
//! with the syntactic role they occupy, so a rewrite can decide whether an
//! arbitrary expression may replace them or only another identifier.

use super::*;

/// The syntactic position an identifier occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentRole {
    /// An identifier used as an expression.
    Reference,
    /// A declared name: class, interface, alias, variable, parameter or type parameter.
    Binding,
    /// A segment of a type reference.
    TypeName,
    /// A method or property name, member-access property or object key.
    Property,
    /// The exported name inside `import { name as local }`.
    ImportName,
    /// A shorthand object property (`{ name }`), both key and reference.
    Shorthand,
}

impl IdentRole {
    pub fn describe(self) -> &'static str {
        match self {
            IdentRole::Reference => "an expression",
            IdentRole::Binding => "a declaration name",
            IdentRole::TypeName => "a type name",
            IdentRole::Property => "a property name",
            IdentRole::ImportName => "an imported name",
            IdentRole::Shorthand => "a shorthand property",
        }
    }
}

pub trait VisitMut {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_import(&mut self, import: &mut ImportDecl) {
        walk_import(self, import);
    }

    fn visit_class(&mut self, class: &mut ClassDecl) {
        walk_class(self, class);
    }

    fn visit_class_member(&mut self, member: &mut ClassMember) {
        walk_class_member(self, member);
    }

    fn visit_param(&mut self, param: &mut Param) {
        walk_param(self, param);
    }

    fn visit_type_param(&mut self, param: &mut TypeParam) {
        walk_type_param(self, param);
    }

    fn visit_ts_member(&mut self, member: &mut TsMember) {
        walk_ts_member(self, member);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }

    fn visit_prop(&mut self, prop: &mut Prop) {
        walk_prop(self, prop);
    }

    fn visit_type(&mut self, ty: &mut TsType) {
        walk_type(self, ty);
    }

    fn visit_ident(&mut self, _ident: &mut Ident, _role: IdentRole) {}
}

pub fn walk_program<V: VisitMut + ?Sized>(v: &mut V, program: &mut Program) {
    for stmt in &mut program.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmts<V: VisitMut + ?Sized>(v: &mut V, stmts: &mut [Stmt]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match &mut stmt.kind {
        StmtKind::Import(import) => v.visit_import(import),
        StmtKind::Class(class) => v.visit_class(class),
        StmtKind::Interface(interface) => {
            v.visit_ident(&mut interface.name, IdentRole::Binding);
            for param in &mut interface.type_params {
                v.visit_type_param(param);
            }
            for ty in &mut interface.extends {
                v.visit_type(ty);
            }
            for member in &mut interface.body {
                v.visit_ts_member(member);
            }
        }
        StmtKind::TypeAlias(alias) => {
            v.visit_ident(&mut alias.name, IdentRole::Binding);
            for param in &mut alias.type_params {
                v.visit_type_param(param);
            }
            v.visit_type(&mut alias.ty);
        }
        StmtKind::Var(var) => {
            for decl in &mut var.decls {
                v.visit_ident(&mut decl.name, IdentRole::Binding);
                if let Some(ty) = &mut decl.type_ann {
                    v.visit_type(ty);
                }
                if let Some(init) = &mut decl.init {
                    v.visit_expr(init);
                }
            }
        }
        StmtKind::Expr(expr) => v.visit_expr(expr),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
    }
}

pub fn walk_import<V: VisitMut + ?Sized>(v: &mut V, import: &mut ImportDecl) {
    if let Some(default) = &mut import.default {
        v.visit_ident(default, IdentRole::Binding);
    }
    if let Some(namespace) = &mut import.namespace {
        v.visit_ident(namespace, IdentRole::Binding);
    }
    for spec in &mut import.named {
        v.visit_ident(&mut spec.imported, IdentRole::ImportName);
        if let Some(local) = &mut spec.local {
            v.visit_ident(local, IdentRole::Binding);
        }
    }
}

pub fn walk_class<V: VisitMut + ?Sized>(v: &mut V, class: &mut ClassDecl) {
    for decorator in &mut class.decorators {
        v.visit_expr(decorator);
    }
    v.visit_ident(&mut class.name, IdentRole::Binding);
    for param in &mut class.type_params {
        v.visit_type_param(param);
    }
    if let Some(super_class) = &mut class.super_class {
        v.visit_expr(super_class);
    }
    for ty in &mut class.super_type_args {
        v.visit_type(ty);
    }
    for member in &mut class.members {
        v.visit_class_member(member);
    }
}

pub fn walk_class_member<V: VisitMut + ?Sized>(v: &mut V, member: &mut ClassMember) {
    match &mut member.kind {
        ClassMemberKind::Constructor(ctor) => {
            for param in &mut ctor.params {
                v.visit_param(param);
            }
            if let Some(body) = &mut ctor.body {
                walk_stmts(v, body);
            }
        }
        ClassMemberKind::Method(method) => {
            v.visit_ident(&mut method.name, IdentRole::Property);
            for param in &mut method.type_params {
                v.visit_type_param(param);
            }
            for param in &mut method.params {
                v.visit_param(param);
            }
            if let Some(ty) = &mut method.return_type {
                v.visit_type(ty);
            }
            if let Some(body) = &mut method.body {
                walk_stmts(v, body);
            }
        }
        ClassMemberKind::Property(prop) => {
            v.visit_ident(&mut prop.name, IdentRole::Property);
            if let Some(ty) = &mut prop.type_ann {
                v.visit_type(ty);
            }
            if let Some(value) = &mut prop.value {
                v.visit_expr(value);
            }
        }
    }
}

pub fn walk_param<V: VisitMut + ?Sized>(v: &mut V, param: &mut Param) {
    v.visit_ident(&mut param.name, IdentRole::Binding);
    if let Some(ty) = &mut param.type_ann {
        v.visit_type(ty);
    }
    if let Some(default) = &mut param.default {
        v.visit_expr(default);
    }
}

pub fn walk_type_param<V: VisitMut + ?Sized>(v: &mut V, param: &mut TypeParam) {
    v.visit_ident(&mut param.name, IdentRole::Binding);
    if let Some(constraint) = &mut param.constraint {
        v.visit_type(constraint);
    }
    if let Some(default) = &mut param.default {
        v.visit_type(default);
    }
}

pub fn walk_ts_member<V: VisitMut + ?Sized>(v: &mut V, member: &mut TsMember) {
    match member {
        TsMember::Property { name, type_ann, .. } => {
            v.visit_ident(name, IdentRole::Property);
            if let Some(ty) = type_ann {
                v.visit_type(ty);
            }
        }
        TsMember::Method {
            name,
            type_params,
            params,
            return_type,
            ..
        } => {
            v.visit_ident(name, IdentRole::Property);
            for param in type_params {
                v.visit_type_param(param);
            }
            for param in params {
                v.visit_param(param);
            }
            if let Some(ty) = return_type {
                v.visit_type(ty);
            }
        }
    }
}

pub fn walk_prop<V: VisitMut + ?Sized>(v: &mut V, prop: &mut Prop) {
    match prop {
        Prop::KeyValue { key, value } => {
            if let PropKey::Ident(ident) = key {
                v.visit_ident(ident, IdentRole::Property);
            }
            v.visit_expr(value);
        }
        Prop::Shorthand(ident) => v.visit_ident(ident, IdentRole::Shorthand),
        Prop::Spread(arg) => v.visit_expr(arg),
    }
}

pub fn walk_expr<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Ident(ident) => v.visit_ident(ident, IdentRole::Reference),
        Expr::This
        | Expr::Super
        | Expr::Str(_)
        | Expr::Num(_)
        | Expr::Bool(_)
        | Expr::Null => {}
        Expr::Member { object, property } => {
            v.visit_expr(object);
            v.visit_ident(property, IdentRole::Property);
        }
        Expr::Call {
            callee,
            type_args,
            args,
        }
        | Expr::New {
            callee,
            type_args,
            args,
        } => {
            v.visit_expr(callee);
            for ty in type_args {
                v.visit_type(ty);
            }
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                v.visit_prop(prop);
            }
        }
        Expr::Array(elements) => {
            for element in elements {
                v.visit_expr(element);
            }
        }
        Expr::Spread(arg) | Expr::Await(arg) | Expr::Unary { arg, .. } => v.visit_expr(arg),
        Expr::Logical { left, right, .. } | Expr::Binary { left, right, .. } => {
            v.visit_expr(left);
            v.visit_expr(right);
        }
        Expr::Arrow { params, body, .. } => {
            for param in params {
                v.visit_param(param);
            }
            match body {
                ArrowBody::Expr(expr) => v.visit_expr(expr),
                ArrowBody::Block(stmts) => walk_stmts(v, stmts),
            }
        }
        Expr::As { expr, ty } => {
            v.visit_expr(expr);
            v.visit_type(ty);
        }
    }
}

pub fn walk_type<V: VisitMut + ?Sized>(v: &mut V, ty: &mut TsType) {
    match ty {
        TsType::Keyword(_) | TsType::Literal(_) => {}
        TsType::Ref { name, type_args } => {
            for segment in name {
                v.visit_ident(segment, IdentRole::TypeName);
            }
            for arg in type_args {
                v.visit_type(arg);
            }
        }
        TsType::Array(inner) => v.visit_type(inner),
        TsType::Union(variants) => {
            for variant in variants {
                v.visit_type(variant);
            }
        }
        TsType::Object(members) => {
            for member in members {
                v.visit_ts_member(member);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::{ident, member};

    struct Collect(Vec<(String, IdentRole)>);

    impl VisitMut for Collect {
        fn visit_ident(&mut self, ident: &mut Ident, role: IdentRole) {
            self.0.push((ident.name.clone(), role));
        }
    }

    #[test]
    fn reports_member_property_and_object_separately() {
        let mut expr = member(Expr::Ident(ident("prisma")), "DELEGATE");
        let mut collect = Collect(Vec::new());
        collect.visit_expr(&mut expr);

        assert_eq!(
            collect.0,
            vec![
                ("prisma".to_string(), IdentRole::Reference),
                ("DELEGATE".to_string(), IdentRole::Property),
            ]
        );
    }

    #[test]
    fn reports_every_segment_of_qualified_type() {
        let mut ty = TsType::Ref {
            name: vec![ident("Prisma"), ident("SelectSubset")],
            type_args: vec![TsType::named(ident("T"))],
        };
        let mut collect = Collect(Vec::new());
        collect.visit_type(&mut ty);

        let names: Vec<_> = collect.0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Prisma", "SelectSubset", "T"]);
        assert!(collect.0.iter().all(|(_, role)| *role == IdentRole::TypeName));
    }
}
