//! Renders a syntax tree back to TypeScript source.
//!
//! Output is deterministic: two-space indentation, double-quoted strings,
//! semicolons. Parentheses come from operator precedence plus the few token
//! level rules precedence misses (`??` mixing, `new` callees, adjacent signs,
//! a leading `{`), so a placeholder replaced by any expression still prints
//! as valid source.

use crate::ast::*;

const INDENT: &str = "  ";
/// Object literals, argument and parameter lists wider than this are broken
/// across lines.
const MAX_INLINE_WIDTH: usize = 80;

/// Renders a program to source text.
pub fn render(program: &Program) -> String {
    let mut printer = Printer::default();
    printer.program(program);
    printer.out
}

/// Renders a single expression as if it started a line at column zero.
pub fn render_expr(expr: &Expr) -> String {
    print_expr(expr, 0)
}

/// Renders a single type.
pub fn render_type(ty: &TsType) -> String {
    print_type(ty)
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn line(&mut self, indent: usize, text: &str) {
        if !text.is_empty() {
            self.out.push_str(&INDENT.repeat(indent));
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn program(&mut self, program: &Program) {
        let mut previous: Option<&Stmt> = None;
        for stmt in &program.body {
            if let Some(prev) = previous {
                let both_imports = matches!(prev.kind, StmtKind::Import(_))
                    && matches!(stmt.kind, StmtKind::Import(_))
                    && stmt.comments.is_empty();
                if !both_imports {
                    self.blank();
                }
            }
            self.stmt(stmt, 0);
            previous = Some(stmt);
        }
    }

    fn comments(&mut self, comments: &[Comment], indent: usize) {
        for comment in comments {
            for (i, line) in comment.text.lines().enumerate() {
                let trimmed = line.trim();
                if i > 0 && trimmed.starts_with('*') {
                    // Keep the conventional one-column offset of block comment continuations.
                    self.line(indent, &format!(" {}", trimmed));
                } else {
                    self.line(indent, trimmed);
                }
            }
        }
    }

    fn stmts(&mut self, stmts: &[Stmt], indent: usize) {
        for stmt in stmts {
            self.stmt(stmt, indent);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, indent: usize) {
        self.comments(&stmt.comments, indent);
        match &stmt.kind {
            StmtKind::Import(import) => {
                let text = print_import(import);
                self.line(indent, &text);
            }
            StmtKind::Class(class) => self.class(class, indent),
            StmtKind::Interface(interface) => self.interface(interface, indent),
            StmtKind::TypeAlias(alias) => {
                let text = format!(
                    "{}type {}{} = {};",
                    decl_prefix(alias.exported, alias.declare),
                    alias.name,
                    print_type_params(&alias.type_params),
                    print_type(&alias.ty)
                );
                self.line(indent, &text);
            }
            StmtKind::Var(var) => {
                let decls: Vec<String> = var
                    .decls
                    .iter()
                    .map(|decl| {
                        let mut text = decl.name.name.clone();
                        if let Some(ty) = &decl.type_ann {
                            text.push_str(": ");
                            text.push_str(&print_type(ty));
                        }
                        if let Some(init) = &decl.init {
                            text.push_str(" = ");
                            text.push_str(&print_expr_in(init, PREC_ASSIGN, indent));
                        }
                        text
                    })
                    .collect();
                let text = format!(
                    "{}{} {};",
                    decl_prefix(var.exported, var.declare),
                    var.kind.as_str(),
                    decls.join(", ")
                );
                self.line(indent, &text);
            }
            StmtKind::Expr(expr) => {
                let mut text = print_expr(expr, indent);
                if starts_with_brace(&text) || matches!(expr, Expr::Arrow { .. }) {
                    text = format!("({})", text);
                }
                self.line(indent, &format!("{};", text));
            }
            StmtKind::Return(value) => match value {
                Some(value) => {
                    let text = format!("return {};", print_expr(value, indent));
                    self.line(indent, &text);
                }
                None => self.line(indent, "return;"),
            },
        }
    }

    fn class(&mut self, class: &ClassDecl, indent: usize) {
        for decorator in &class.decorators {
            let text = format!("@{}", print_expr_in(decorator, PREC_MEMBER, indent));
            self.line(indent, &text);
        }

        let mut header = format!(
            "{}class {}{}",
            decl_prefix(class.exported, class.declare),
            class.name,
            print_type_params(&class.type_params)
        );
        if let Some(super_class) = &class.super_class {
            header.push_str(" extends ");
            header.push_str(&print_expr_in(super_class, PREC_MEMBER, indent));
            header.push_str(&print_type_args(&class.super_type_args));
        }

        if class.members.is_empty() {
            self.line(indent, &format!("{} {{}}", header));
            return;
        }

        self.line(indent, &format!("{} {{", header));
        for (i, member) in class.members.iter().enumerate() {
            if i > 0 {
                self.blank();
            }
            self.comments(&member.comments, indent + 1);
            self.class_member(&member.kind, indent + 1);
        }
        self.line(indent, "}");
    }

    fn class_member(&mut self, member: &ClassMemberKind, indent: usize) {
        match member {
            ClassMemberKind::Constructor(ctor) => {
                let head = "constructor".to_string();
                let params = print_params(&ctor.params, indent, head.len(), 2);
                self.signature_with_body(indent, &format!("{}{}", head, params), ctor.body.as_deref());
            }
            ClassMemberKind::Method(method) => {
                let mut head = String::new();
                if let Some(acc) = method.accessibility {
                    head.push_str(acc.as_str());
                    head.push(' ');
                }
                if method.is_static {
                    head.push_str("static ");
                }
                if method.is_async {
                    head.push_str("async ");
                }
                head.push_str(&method.name.name);
                head.push_str(&print_type_params(&method.type_params));
                let ret = method
                    .return_type
                    .as_ref()
                    .map(|ret| format!(": {}", print_type(ret)))
                    .unwrap_or_default();
                let params = print_params(&method.params, indent, head.len(), ret.len() + 2);
                let signature = format!("{}{}{}", head, params, ret);
                self.signature_with_body(indent, &signature, method.body.as_deref());
            }
            ClassMemberKind::Property(prop) => {
                let mut text = String::new();
                if let Some(acc) = prop.accessibility {
                    text.push_str(acc.as_str());
                    text.push(' ');
                }
                if prop.is_static {
                    text.push_str("static ");
                }
                if prop.readonly {
                    text.push_str("readonly ");
                }
                if prop.declare {
                    text.push_str("declare ");
                }
                text.push_str(&prop.name.name);
                if prop.optional {
                    text.push('?');
                }
                if let Some(ty) = &prop.type_ann {
                    text.push_str(": ");
                    text.push_str(&print_type(ty));
                }
                if let Some(value) = &prop.value {
                    text.push_str(" = ");
                    text.push_str(&print_expr_in(value, PREC_ASSIGN, indent));
                }
                text.push(';');
                self.line(indent, &text);
            }
        }
    }

    fn signature_with_body(&mut self, indent: usize, signature: &str, body: Option<&[Stmt]>) {
        match body {
            None => self.line(indent, &format!("{};", signature)),
            Some([]) => self.line(indent, &format!("{} {{}}", signature)),
            Some(stmts) => {
                self.line(indent, &format!("{} {{", signature));
                self.stmts(stmts, indent + 1);
                self.line(indent, "}");
            }
        }
    }

    fn interface(&mut self, interface: &InterfaceDecl, indent: usize) {
        let mut header = format!(
            "{}interface {}{}",
            decl_prefix(interface.exported, interface.declare),
            interface.name,
            print_type_params(&interface.type_params)
        );
        if !interface.extends.is_empty() {
            let extends: Vec<String> = interface.extends.iter().map(print_type).collect();
            header.push_str(" extends ");
            header.push_str(&extends.join(", "));
        }

        if interface.body.is_empty() {
            self.line(indent, &format!("{} {{}}", header));
            return;
        }

        self.line(indent, &format!("{} {{", header));
        for member in &interface.body {
            let text = format!("{};", print_ts_member(member));
            self.line(indent + 1, &text);
        }
        self.line(indent, "}");
    }
}

fn decl_prefix(exported: bool, declare: bool) -> &'static str {
    match (exported, declare) {
        (true, true) => "export declare ",
        (true, false) => "export ",
        (false, true) => "declare ",
        (false, false) => "",
    }
}

fn print_import(import: &ImportDecl) -> String {
    let mut clauses = Vec::new();
    if let Some(default) = &import.default {
        clauses.push(default.name.clone());
    }
    if let Some(namespace) = &import.namespace {
        clauses.push(format!("* as {}", namespace));
    }
    if !import.named.is_empty() {
        let specs: Vec<String> = import
            .named
            .iter()
            .map(|spec| match &spec.local {
                Some(local) if *local != spec.imported => format!("{} as {}", spec.imported, local),
                _ => spec.imported.name.clone(),
            })
            .collect();
        let inline = format!("{{ {} }}", specs.join(", "));
        let source_len = import.source.len() + 16;
        if inline.len() + source_len > MAX_INLINE_WIDTH && specs.len() > 1 {
            let lines: Vec<String> = specs.iter().map(|s| format!("{}{},", INDENT, s)).collect();
            clauses.push(format!("{{\n{}\n}}", lines.join("\n")));
        } else {
            clauses.push(inline);
        }
    }

    let type_kw = if import.type_only { "type " } else { "" };
    if clauses.is_empty() {
        format!("import {}{};", type_kw, quote(&import.source))
    } else {
        format!("import {}{} from {};", type_kw, clauses.join(", "), quote(&import.source))
    }
}

fn print_type_params(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let params: Vec<String> = params
        .iter()
        .map(|param| {
            let mut text = param.name.name.clone();
            if let Some(constraint) = &param.constraint {
                text.push_str(" extends ");
                text.push_str(&print_type(constraint));
            }
            if let Some(default) = &param.default {
                text.push_str(" = ");
                text.push_str(&print_type(default));
            }
            text
        })
        .collect();
    format!("<{}>", params.join(", "))
}

fn print_type_args(args: &[TsType]) -> String {
    if args.is_empty() {
        return String::new();
    }
    let args: Vec<String> = args.iter().map(print_type).collect();
    format!("<{}>", args.join(", "))
}

fn print_param(param: &Param, indent: usize) -> String {
    let mut text = String::new();
    if let Some(acc) = param.accessibility {
        text.push_str(acc.as_str());
        text.push(' ');
    }
    if param.readonly {
        text.push_str("readonly ");
    }
    text.push_str(&param.name.name);
    if param.optional {
        text.push('?');
    }
    if let Some(ty) = &param.type_ann {
        text.push_str(": ");
        text.push_str(&print_type(ty));
    }
    if let Some(default) = &param.default {
        text.push_str(" = ");
        text.push_str(&print_expr_in(default, PREC_ASSIGN, indent));
    }
    text
}

/// Prints a parenthesized parameter list, one parameter per line when the
/// signature line (`prefix_len` columns before the list, `suffix_len` after)
/// would be wider than [`MAX_INLINE_WIDTH`].
fn print_params(params: &[Param], indent: usize, prefix_len: usize, suffix_len: usize) -> String {
    let printed: Vec<String> = params.iter().map(|p| print_param(p, indent + 1)).collect();
    let inline = printed.join(", ");
    let width = indent * INDENT.len() + prefix_len + inline.len() + 2 + suffix_len;
    if width <= MAX_INLINE_WIDTH || printed.is_empty() {
        return format!("({})", inline);
    }
    let pad = INDENT.repeat(indent + 1);
    let lines: Vec<String> = printed.iter().map(|p| format!("{}{}", pad, p)).collect();
    format!("(\n{}\n{})", lines.join(",\n"), INDENT.repeat(indent))
}

fn print_ts_member(member: &TsMember) -> String {
    match member {
        TsMember::Property {
            readonly,
            name,
            optional,
            type_ann,
        } => {
            let mut text = String::new();
            if *readonly {
                text.push_str("readonly ");
            }
            text.push_str(&name.name);
            if *optional {
                text.push('?');
            }
            if let Some(ty) = type_ann {
                text.push_str(": ");
                text.push_str(&print_type(ty));
            }
            text
        }
        TsMember::Method {
            name,
            optional,
            type_params,
            params,
            return_type,
        } => {
            let params: Vec<String> = params.iter().map(|p| print_param(p, 0)).collect();
            let mut text = format!(
                "{}{}{}({})",
                name,
                if *optional { "?" } else { "" },
                print_type_params(type_params),
                params.join(", ")
            );
            if let Some(ret) = return_type {
                text.push_str(": ");
                text.push_str(&print_type(ret));
            }
            text
        }
    }
}

fn print_type(ty: &TsType) -> String {
    match ty {
        TsType::Keyword(kw) => kw.clone(),
        TsType::Literal(lit) => lit.clone(),
        TsType::Ref { name, type_args } => {
            let path: Vec<&str> = name.iter().map(|i| i.name.as_str()).collect();
            format!("{}{}", path.join("."), print_type_args(type_args))
        }
        TsType::Array(inner) => match **inner {
            TsType::Union(_) => format!("({})[]", print_type(inner)),
            _ => format!("{}[]", print_type(inner)),
        },
        TsType::Union(variants) => {
            let variants: Vec<String> = variants.iter().map(print_type).collect();
            variants.join(" | ")
        }
        TsType::Object(members) => {
            if members.is_empty() {
                return "{}".to_string();
            }
            let members: Vec<String> = members.iter().map(print_ts_member).collect();
            format!("{{ {} }}", members.join("; "))
        }
    }
}

// Binding strength, loosely following the ECMAScript operator table.
const PREC_SPREAD: u8 = 1;
const PREC_ASSIGN: u8 = 2;
const PREC_NULLISH: u8 = 3;
const PREC_OR: u8 = 4;
const PREC_AND: u8 = 5;
const PREC_RELATIONAL: u8 = 10;
const PREC_UNARY: u8 = 15;
const PREC_MEMBER: u8 = 18;
const PREC_PRIMARY: u8 = 20;

fn binary_precedence(op: &str) -> u8 {
    match op {
        "|" => 6,
        "^" => 7,
        "&" => 8,
        "==" | "!=" | "===" | "!==" => 9,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => PREC_RELATIONAL,
        "<<" | ">>" | ">>>" => 11,
        "+" | "-" => 12,
        "*" | "/" | "%" => 13,
        "**" => 14,
        _ => PREC_ASSIGN,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Ident(_)
        | Expr::This
        | Expr::Super
        | Expr::Str(_)
        | Expr::Num(_)
        | Expr::Bool(_)
        | Expr::Null
        | Expr::Object(_)
        | Expr::Array(_) => PREC_PRIMARY,
        Expr::Member { .. } | Expr::Call { .. } | Expr::New { .. } => PREC_MEMBER,
        Expr::Await(_) | Expr::Unary { .. } => PREC_UNARY,
        Expr::As { .. } => PREC_RELATIONAL,
        Expr::Binary { op, .. } => binary_precedence(op),
        Expr::Logical { op, .. } => match op {
            LogicalOp::And => PREC_AND,
            LogicalOp::Or => PREC_OR,
            LogicalOp::Nullish => PREC_NULLISH,
        },
        Expr::Arrow { .. } => PREC_ASSIGN,
        Expr::Spread(_) => PREC_SPREAD,
    }
}

/// True when printed source would open with `{`, which a statement or an
/// arrow body reads as a block.
fn starts_with_brace(text: &str) -> bool {
    text.starts_with('{')
}

/// True when the callee chain of `expr` contains a call, so that `new`
/// would take the call's argument list as its own.
fn has_call_in_chain(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } => true,
        Expr::Member { object, .. } => has_call_in_chain(object),
        _ => false,
    }
}

/// Prints `expr`, parenthesized when it binds looser than `min`.
fn print_expr_in(expr: &Expr, min: u8, indent: usize) -> String {
    let text = print_expr(expr, indent);
    if precedence(expr) < min {
        format!("({})", text)
    } else {
        text
    }
}

fn print_expr(expr: &Expr, indent: usize) -> String {
    match expr {
        Expr::Ident(ident) => ident.name.clone(),
        Expr::This => "this".to_string(),
        Expr::Super => "super".to_string(),
        Expr::Str(value) => quote(value),
        Expr::Num(value) => value.clone(),
        Expr::Bool(value) => value.to_string(),
        Expr::Null => "null".to_string(),
        Expr::Member { object, property } => {
            format!("{}.{}", print_expr_in(object, PREC_MEMBER, indent), property)
        }
        Expr::Call {
            callee,
            type_args,
            args,
        } => format!(
            "{}{}{}",
            print_expr_in(callee, PREC_MEMBER, indent),
            print_type_args(type_args),
            print_args(args, indent)
        ),
        Expr::New {
            callee,
            type_args,
            args,
        } => {
            let callee_text = if has_call_in_chain(callee) {
                format!("({})", print_expr(callee, indent))
            } else {
                print_expr_in(callee, PREC_MEMBER, indent)
            };
            format!("new {}{}{}", callee_text, print_type_args(type_args), print_args(args, indent))
        }
        Expr::Object(props) => print_object(props, indent),
        Expr::Array(elements) => {
            let items: Vec<String> = elements
                .iter()
                .map(|e| print_expr_in(e, PREC_SPREAD, indent + 1))
                .collect();
            wrap_list("[", "]", &items, indent, false)
        }
        Expr::Spread(arg) => format!("...{}", print_expr_in(arg, PREC_ASSIGN, indent)),
        Expr::Await(arg) => format!("await {}", print_expr_in(arg, PREC_UNARY, indent)),
        Expr::Unary { op, arg } => {
            let sep = if op.chars().all(|c| c.is_ascii_alphabetic()) { " " } else { "" };
            let mut operand = print_expr_in(arg, PREC_UNARY, indent);
            // `-(-a)`, never the `--` operator.
            if matches!(op.as_str(), "-" | "+") && operand.starts_with(op.as_str()) {
                operand = format!("({})", operand);
            }
            format!("{}{}{}", op, sep, operand)
        }
        Expr::Logical { op, left, right } => {
            let prec = precedence(expr);
            let operand = |e: &Expr, min: u8| {
                // `??` may not be mixed with `&&` or `||` without parentheses.
                let mixed = *op == LogicalOp::Nullish
                    && matches!(e, Expr::Logical { op: LogicalOp::And | LogicalOp::Or, .. });
                if mixed {
                    format!("({})", print_expr(e, indent))
                } else {
                    print_expr_in(e, min, indent)
                }
            };
            format!("{} {} {}", operand(left, prec), op.as_str(), operand(right, prec + 1))
        }
        Expr::Binary { op, left, right } => {
            let prec = binary_precedence(op);
            format!(
                "{} {} {}",
                print_expr_in(left, prec, indent),
                op,
                print_expr_in(right, prec + 1, indent)
            )
        }
        Expr::Arrow {
            is_async,
            params,
            body,
        } => {
            let params: Vec<String> = params.iter().map(|p| print_param(p, indent)).collect();
            let head = format!(
                "{}({}) =>",
                if *is_async { "async " } else { "" },
                params.join(", ")
            );
            match body {
                ArrowBody::Expr(body) => {
                    let text = print_expr_in(body, PREC_ASSIGN, indent);
                    if starts_with_brace(&text) {
                        format!("{} ({})", head, text)
                    } else {
                        format!("{} {}", head, text)
                    }
                }
                ArrowBody::Block(stmts) if stmts.is_empty() => format!("{} {{}}", head),
                ArrowBody::Block(stmts) => {
                    let mut inner = Printer::default();
                    inner.stmts(stmts, indent + 1);
                    format!("{} {{\n{}{}}}", head, inner.out, INDENT.repeat(indent))
                }
            }
        }
        Expr::As { expr, ty } => format!(
            "{} as {}",
            print_expr_in(expr, PREC_RELATIONAL + 1, indent),
            print_type(ty)
        ),
    }
}

fn print_args(args: &[Expr], indent: usize) -> String {
    let items: Vec<String> = args
        .iter()
        .map(|arg| print_expr_in(arg, PREC_SPREAD, indent))
        .collect();
    let inline = items.join(", ");
    // A sole multi-line argument hugs the parentheses: `f({\n ... \n})`.
    if items.len() == 1 || (!inline.contains('\n') && inline.len() + indent * INDENT.len() <= MAX_INLINE_WIDTH) {
        return format!("({})", inline);
    }
    let items: Vec<String> = args
        .iter()
        .map(|arg| print_expr_in(arg, PREC_SPREAD, indent + 1))
        .collect();
    wrap_list("(", ")", &items, indent, true)
}

fn print_object(props: &[Prop], indent: usize) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }
    let items: Vec<String> = props.iter().map(|p| print_prop(p, indent + 1)).collect();
    wrap_list("{", "}", &items, indent, false)
}

fn print_prop(prop: &Prop, indent: usize) -> String {
    match prop {
        Prop::KeyValue { key, value } => {
            let key = match key {
                PropKey::Ident(ident) => ident.name.clone(),
                PropKey::Str(s) => quote(s),
            };
            format!("{}: {}", key, print_expr_in(value, PREC_ASSIGN, indent))
        }
        Prop::Shorthand(ident) => ident.name.clone(),
        Prop::Spread(arg) => format!("...{}", print_expr_in(arg, PREC_ASSIGN, indent)),
    }
}

/// Joins rendered items inline when they fit, otherwise one per line.
///
/// Items must already be rendered for `indent + 1`.
fn wrap_list(open: &str, close: &str, items: &[String], indent: usize, force: bool) -> String {
    if items.is_empty() {
        return format!("{}{}", open, close);
    }
    let inline = items.join(", ");
    let pad = if open == "{" { " " } else { "" };
    let width = indent * INDENT.len() + inline.len() + 2 * pad.len() + 2;
    if !force && !inline.contains('\n') && width <= MAX_INLINE_WIDTH {
        return format!("{}{}{}{}{}", open, pad, inline, pad, close);
    }
    let inner_pad = INDENT.repeat(indent + 1);
    let lines: Vec<String> = items.iter().map(|item| format!("{}{}", inner_pad, item)).collect();
    format!("{}\n{}\n{}{}", open, lines.join(",\n"), INDENT.repeat(indent), close)
}

/// Wraps a string value in double quotes, escaping bare double quotes.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut escaped = false;
    for c in value.chars() {
        if c == '"' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;

    #[test]
    fn parenthesizes_by_precedence() {
        let inner = Expr::Logical {
            op: LogicalOp::Or,
            left: Box::new(Expr::Ident(ident("b"))),
            right: Box::new(Expr::Ident(ident("c"))),
        };
        let expr = and(Expr::Ident(ident("a")), inner);
        assert_eq!(render_expr(&expr), "a && (b || c)");

        let awaited = member(await_expr(Expr::Ident(ident("p"))), "then");
        assert_eq!(render_expr(&awaited), "(await p).then");
    }

    #[test]
    fn await_binds_tighter_than_and() {
        let expr = and(
            member_path(Expr::Ident(ident("args")), &["data", "password"]),
            await_expr(call(Expr::Ident(ident("transform")), vec![])),
        );
        assert_eq!(render_expr(&expr), "args.data.password && await transform()");
    }

    #[test]
    fn arrow_returning_object_is_wrapped() {
        let expr = arrow(ident("x"), object(vec![Prop::Shorthand(ident("x"))]));
        assert_eq!(render_expr(&expr), "(x) => ({ x })");
    }

    #[test]
    fn long_objects_break_one_property_per_line() {
        let props = (0..6)
            .map(|i| key_value(ident(format!("property{}", i)), Expr::Str(format!("value{}", i))))
            .collect();
        let text = render_expr(&object(props));
        assert!(text.starts_with("{\n  property0: \"value0\",\n"));
        assert!(text.ends_with("\n}"));
    }

    #[test]
    fn renders_imports_and_blank_lines() {
        let program = Program {
            body: vec![
                Stmt::new(StmtKind::Import(ImportDecl::named([ident("A")], "./a"))),
                Stmt::new(StmtKind::Import(ImportDecl::named([ident("B"), ident("C")], "./bc"))),
                Stmt::new(StmtKind::Return(None)),
            ],
        };
        assert_eq!(
            render(&program),
            "import { A } from \"./a\";\nimport { B, C } from \"./bc\";\n\nreturn;\n"
        );
    }

    fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
        Expr::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn var(name: &str) -> Expr {
        Expr::Ident(ident(name))
    }

    fn spread_args() -> Expr {
        object(vec![spread_prop(var("args"))])
    }

    #[test]
    fn nullish_never_mixes_with_and_or() {
        let left = logical(LogicalOp::Nullish, and(var("a"), var("b")), var("c"));
        assert_eq!(render_expr(&left), "(a && b) ?? c");

        let right = logical(
            LogicalOp::Nullish,
            var("c"),
            logical(LogicalOp::Or, var("a"), var("b")),
        );
        assert_eq!(render_expr(&right), "c ?? (a || b)");

        let outer = and(var("a"), logical(LogicalOp::Nullish, var("b"), var("c")));
        assert_eq!(render_expr(&outer), "a && (b ?? c)");
    }

    #[test]
    fn new_wraps_callee_containing_call() {
        let new = |callee: Expr| Expr::New {
            callee: Box::new(callee),
            type_args: vec![],
            args: vec![],
        };
        assert_eq!(render_expr(&new(call(var("f"), vec![]))), "new (f())()");
        assert_eq!(
            render_expr(&new(member(call(var("f"), vec![]), "Service"))),
            "new (f().Service)()"
        );
        assert_eq!(render_expr(&new(member(var("ns"), "Service"))), "new ns.Service()");
    }

    #[test]
    fn same_sign_unary_operands_stay_apart() {
        let unary = |op: &str, arg: Expr| Expr::Unary {
            op: op.to_string(),
            arg: Box::new(arg),
        };
        assert_eq!(render_expr(&unary("-", unary("-", var("a")))), "-(-a)");
        assert_eq!(render_expr(&unary("+", unary("+", var("a")))), "+(+a)");
        assert_eq!(render_expr(&unary("-", unary("+", var("a")))), "-+a");
        assert_eq!(render_expr(&unary("!", unary("!", var("a")))), "!!a");
    }

    #[test]
    fn leading_object_is_wrapped_in_statements_and_arrow_bodies() {
        let program = Program {
            body: vec![Stmt::new(StmtKind::Expr(member(spread_args(), "z")))],
        };
        assert_eq!(render(&program), "({ ...args }.z);\n");

        let body = arrow(ident("x"), member(spread_args(), "z"));
        assert_eq!(render_expr(&body), "(x) => ({ ...args }.z)");

        let call_first = arrow(ident("x"), call(member(spread_args(), "z"), vec![]));
        assert_eq!(render_expr(&call_first), "(x) => ({ ...args }.z())");

        let not_leading = arrow(ident("x"), call(var("f"), vec![spread_args()]));
        assert_eq!(render_expr(&not_leading), "(x) => f({ ...args })");
    }

    #[test]
    fn long_single_parameter_signatures_wrap() {
        let source = "class A {\n  count<T extends FindManyCustomerArgs>(args: Prisma.SelectSubset<T, FindManyCustomerArgs>): Promise<number> {\n    return 0;\n  }\n}\n";
        let program = crate::template::TemplateParser::new()
            .unwrap()
            .parse(source, std::path::Path::new("test.ts"))
            .unwrap();
        let text = render(&program);
        assert!(text.contains(
            "  count<T extends FindManyCustomerArgs>(\n    args: Prisma.SelectSubset<T, FindManyCustomerArgs>\n  ): Promise<number> {\n"
        ));
        for line in text.lines() {
            assert!(line.len() <= MAX_INLINE_WIDTH, "too wide: {}", line);
        }
    }

    #[test]
    fn renders_types() {
        let union = TsType::Union(vec![
            TsType::Keyword("string".to_string()),
            TsType::Literal("null".to_string()),
        ]);
        assert_eq!(render_type(&TsType::Array(Box::new(union))), "(string | null)[]");
    }

    #[test]
    fn quote_escapes_bare_double_quotes_only() {
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("it\\'s"), "\"it\\'s\"");
    }
}
