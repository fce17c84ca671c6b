//! TypeScript template parser using tree-sitter.
//!
//! Converts the concrete syntax tree into [`crate::ast`]. Any node outside the
//! supported vocabulary is rejected with [`SynthError::UnsupportedSyntax`]
//! instead of being approximated.

use std::path::Path;
use tree_sitter::{Node, Parser};

use crate::ast::*;
use crate::diagnostic::{Span, SynthError};

/// TypeScript template parser.
pub struct TemplateParser {
    parser: Parser,
}

impl TemplateParser {
    /// Creates a new parser.
    pub fn new() -> Result<Self, SynthError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| SynthError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses template source. `path` is only used for diagnostics.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<Program, SynthError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| SynthError::ParseFailed { path: path.to_path_buf() })?;

        let root = tree.root_node();
        if root.has_error() {
            let node = first_error(root).unwrap_or(root);
            let span = Span::new(path, node.start_position().row + 1, node.start_position().column + 1);
            return Err(SynthError::SyntaxError {
                message: format!("unexpected '{}'", node.utf8_text(source.as_bytes()).unwrap_or("")),
                file: span.file,
                line: span.line,
                column: span.column,
            });
        }

        Reader { source, path }.program(root)
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    children(node).into_iter().find_map(first_error)
}

fn children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Named children, comments included.
fn named_children_with_comments(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Named children, comments skipped.
fn named_children(node: Node) -> Vec<Node> {
    named_children_with_comments(node)
        .into_iter()
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// True if `node` has an anonymous child token of the given kind (`async`, `static`, ...).
fn has_token(node: Node, kind: &str) -> bool {
    children(node)
        .iter()
        .any(|child| !child.is_named() && child.kind() == kind)
}

/// Converts tree-sitter nodes into [`Program`] nodes.
struct Reader<'a> {
    source: &'a str,
    path: &'a Path,
}

impl<'a> Reader<'a> {
    fn span(&self, node: Node) -> Span {
        Span::new(
            self.path,
            node.start_position().row + 1,
            node.start_position().column + 1,
        )
    }

    fn unsupported(&self, node: Node) -> SynthError {
        let span = self.span(node);
        SynthError::UnsupportedSyntax {
            kind: node.kind().to_string(),
            file: span.file,
            line: span.line,
            column: span.column,
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn ident(&self, node: Node) -> Ident {
        Ident::new(self.node_text(node))
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, SynthError> {
        node.child_by_field_name(name)
            .ok_or_else(|| self.unsupported(node))
    }

    fn program(&self, node: Node) -> Result<Program, SynthError> {
        Ok(Program {
            body: self.statement_list(node)?,
        })
    }

    /// Reads statements, attaching each run of comments to the statement after it.
    fn statement_list(&self, node: Node) -> Result<Vec<Stmt>, SynthError> {
        let mut stmts = Vec::new();
        let mut pending = Vec::new();

        for child in named_children_with_comments(node) {
            match child.kind() {
                "comment" => pending.push(Comment {
                    text: self.node_text(child).to_string(),
                }),
                "empty_statement" => {}
                _ => {
                    let kind = self.statement(child, false, false, Vec::new())?;
                    stmts.push(Stmt {
                        comments: std::mem::take(&mut pending),
                        kind,
                    });
                }
            }
        }

        Ok(stmts)
    }

    fn statement(
        &self,
        node: Node,
        exported: bool,
        declare: bool,
        decorators: Vec<Expr>,
    ) -> Result<StmtKind, SynthError> {
        match node.kind() {
            "import_statement" => Ok(StmtKind::Import(self.import(node)?)),
            "export_statement" => {
                let decorators = self.decorators(node)?;
                let declaration = node
                    .child_by_field_name("declaration")
                    .ok_or_else(|| self.unsupported(node))?;
                self.statement(declaration, true, declare, decorators)
            }
            "ambient_declaration" => {
                let declaration = named_children(node)
                    .into_iter()
                    .next()
                    .ok_or_else(|| self.unsupported(node))?;
                self.statement(declaration, exported, true, decorators)
            }
            "class_declaration" => {
                let mut class = self.class(node, exported, declare)?;
                let mut all = decorators;
                all.append(&mut class.decorators);
                class.decorators = all;
                Ok(StmtKind::Class(class))
            }
            "interface_declaration" => Ok(StmtKind::Interface(InterfaceDecl {
                exported,
                declare,
                name: self.ident(self.field(node, "name")?),
                type_params: self.optional_type_params(node)?,
                extends: self.interface_extends(node)?,
                body: self.ts_members(self.field(node, "body")?)?,
            })),
            "type_alias_declaration" => Ok(StmtKind::TypeAlias(TypeAliasDecl {
                exported,
                declare,
                name: self.ident(self.field(node, "name")?),
                type_params: self.optional_type_params(node)?,
                ty: self.ty(self.field(node, "value")?)?,
            })),
            "lexical_declaration" | "variable_declaration" => {
                Ok(StmtKind::Var(self.var_decl(node, exported, declare)?))
            }
            "expression_statement" => {
                let expr = named_children(node)
                    .into_iter()
                    .next()
                    .ok_or_else(|| self.unsupported(node))?;
                Ok(StmtKind::Expr(self.expr(expr)?))
            }
            "return_statement" => {
                let value = match named_children(node).into_iter().next() {
                    Some(child) => Some(self.expr(child)?),
                    None => None,
                };
                Ok(StmtKind::Return(value))
            }
            _ => Err(self.unsupported(node)),
        }
    }

    // =========================================================================
    // Imports
    // =========================================================================

    fn import(&self, node: Node) -> Result<ImportDecl, SynthError> {
        let source = self.string_value(self.field(node, "source")?);
        let mut import = ImportDecl {
            type_only: has_token(node, "type"),
            default: None,
            namespace: None,
            named: Vec::new(),
            source,
        };

        for child in named_children(node) {
            if child.kind() != "import_clause" {
                continue;
            }
            for clause in named_children(child) {
                match clause.kind() {
                    "identifier" => import.default = Some(self.ident(clause)),
                    "namespace_import" => {
                        let name = named_children(clause)
                            .into_iter()
                            .next()
                            .ok_or_else(|| self.unsupported(clause))?;
                        import.namespace = Some(self.ident(name));
                    }
                    "named_imports" => {
                        for spec in named_children(clause) {
                            if spec.kind() != "import_specifier" {
                                return Err(self.unsupported(spec));
                            }
                            import.named.push(ImportSpecifier {
                                imported: self.ident(self.field(spec, "name")?),
                                local: spec.child_by_field_name("alias").map(|a| self.ident(a)),
                            });
                        }
                    }
                    _ => return Err(self.unsupported(clause)),
                }
            }
        }

        Ok(import)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    fn decorators(&self, node: Node) -> Result<Vec<Expr>, SynthError> {
        named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "decorator")
            .map(|decorator| {
                let expr = named_children(decorator)
                    .into_iter()
                    .next()
                    .ok_or_else(|| self.unsupported(decorator))?;
                self.expr(expr)
            })
            .collect()
    }

    fn class(&self, node: Node, exported: bool, declare: bool) -> Result<ClassDecl, SynthError> {
        let mut class = ClassDecl {
            decorators: self.decorators(node)?,
            exported,
            declare,
            name: self.ident(self.field(node, "name")?),
            type_params: self.optional_type_params(node)?,
            super_class: None,
            super_type_args: Vec::new(),
            members: Vec::new(),
        };

        for child in named_children(node) {
            if child.kind() != "class_heritage" {
                continue;
            }
            for clause in named_children(child) {
                if clause.kind() != "extends_clause" {
                    return Err(self.unsupported(clause));
                }
                class.super_class = Some(self.expr(self.field(clause, "value")?)?);
                if let Some(args) = clause.child_by_field_name("type_arguments") {
                    class.super_type_args = self.type_args(args)?;
                }
            }
        }

        let body = self.field(node, "body")?;
        let mut pending = Vec::new();
        for child in named_children_with_comments(body) {
            match child.kind() {
                "comment" => pending.push(Comment {
                    text: self.node_text(child).to_string(),
                }),
                "method_definition" | "method_signature" => class.members.push(ClassMember {
                    comments: std::mem::take(&mut pending),
                    kind: self.method(child)?,
                }),
                "public_field_definition" => class.members.push(ClassMember {
                    comments: std::mem::take(&mut pending),
                    kind: ClassMemberKind::Property(self.class_prop(child)?),
                }),
                _ => return Err(self.unsupported(child)),
            }
        }

        Ok(class)
    }

    fn accessibility(&self, node: Node) -> Option<Accessibility> {
        named_children(node)
            .into_iter()
            .find(|child| child.kind() == "accessibility_modifier")
            .map(|child| match self.node_text(child) {
                "private" => Accessibility::Private,
                "protected" => Accessibility::Protected,
                _ => Accessibility::Public,
            })
    }

    fn method(&self, node: Node) -> Result<ClassMemberKind, SynthError> {
        if ["get", "set", "*"].iter().any(|kind| has_token(node, kind)) {
            return Err(self.unsupported(node));
        }

        let name = self.field(node, "name")?;
        if name.kind() != "property_identifier" {
            return Err(self.unsupported(name));
        }
        let params = self.params(self.field(node, "parameters")?)?;
        let body = match node.child_by_field_name("body") {
            Some(block) => Some(self.statement_list(block)?),
            None => None,
        };

        if self.node_text(name) == "constructor" {
            return Ok(ClassMemberKind::Constructor(Constructor { params, body }));
        }

        Ok(ClassMemberKind::Method(Method {
            accessibility: self.accessibility(node),
            is_static: has_token(node, "static"),
            is_async: has_token(node, "async"),
            name: self.ident(name),
            type_params: self.optional_type_params(node)?,
            params,
            return_type: self.optional_type_annotation(node, "return_type")?,
            body,
        }))
    }

    fn class_prop(&self, node: Node) -> Result<ClassProp, SynthError> {
        let name = self.field(node, "name")?;
        if name.kind() != "property_identifier" {
            return Err(self.unsupported(name));
        }
        Ok(ClassProp {
            accessibility: self.accessibility(node),
            is_static: has_token(node, "static"),
            readonly: has_token(node, "readonly"),
            declare: has_token(node, "declare"),
            name: self.ident(name),
            optional: has_token(node, "?"),
            type_ann: self.optional_type_annotation(node, "type")?,
            value: match node.child_by_field_name("value") {
                Some(value) => Some(self.expr(value)?),
                None => None,
            },
        })
    }

    fn params(&self, node: Node) -> Result<Vec<Param>, SynthError> {
        named_children(node)
            .into_iter()
            .map(|child| match child.kind() {
                "required_parameter" | "optional_parameter" => self.param(child),
                _ => Err(self.unsupported(child)),
            })
            .collect()
    }

    fn param(&self, node: Node) -> Result<Param, SynthError> {
        let pattern = self.field(node, "pattern")?;
        if pattern.kind() != "identifier" {
            return Err(self.unsupported(pattern));
        }
        Ok(Param {
            accessibility: self.accessibility(node),
            readonly: has_token(node, "readonly"),
            name: self.ident(pattern),
            optional: node.kind() == "optional_parameter",
            type_ann: self.optional_type_annotation(node, "type")?,
            default: match node.child_by_field_name("value") {
                Some(value) => Some(self.expr(value)?),
                None => None,
            },
        })
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn var_decl(&self, node: Node, exported: bool, declare: bool) -> Result<VarDecl, SynthError> {
        let kind = if has_token(node, "const") {
            VarKind::Const
        } else if has_token(node, "let") {
            VarKind::Let
        } else {
            VarKind::Var
        };

        let decls = named_children(node)
            .into_iter()
            .map(|declarator| {
                if declarator.kind() != "variable_declarator" {
                    return Err(self.unsupported(declarator));
                }
                let name = self.field(declarator, "name")?;
                if name.kind() != "identifier" {
                    return Err(self.unsupported(name));
                }
                Ok(VarDeclarator {
                    name: self.ident(name),
                    type_ann: self.optional_type_annotation(declarator, "type")?,
                    init: match declarator.child_by_field_name("value") {
                        Some(value) => Some(self.expr(value)?),
                        None => None,
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VarDecl {
            exported,
            declare,
            kind,
            decls,
        })
    }

    fn interface_extends(&self, node: Node) -> Result<Vec<TsType>, SynthError> {
        let mut extends = Vec::new();
        for child in named_children(node) {
            if child.kind() == "extends_type_clause" {
                for ty in named_children(child) {
                    extends.push(self.ty(ty)?);
                }
            }
        }
        Ok(extends)
    }

    fn ts_members(&self, node: Node) -> Result<Vec<TsMember>, SynthError> {
        named_children(node)
            .into_iter()
            .map(|child| match child.kind() {
                "property_signature" => {
                    let name = self.field(child, "name")?;
                    Ok(TsMember::Property {
                        readonly: has_token(child, "readonly"),
                        name: self.ident(name),
                        optional: has_token(child, "?"),
                        type_ann: self.optional_type_annotation(child, "type")?,
                    })
                }
                "method_signature" => Ok(TsMember::Method {
                    name: self.ident(self.field(child, "name")?),
                    optional: has_token(child, "?"),
                    type_params: self.optional_type_params(child)?,
                    params: self.params(self.field(child, "parameters")?)?,
                    return_type: self.optional_type_annotation(child, "return_type")?,
                }),
                _ => Err(self.unsupported(child)),
            })
            .collect()
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn optional_type_params(&self, node: Node) -> Result<Vec<TypeParam>, SynthError> {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return Ok(Vec::new());
        };
        named_children(params)
            .into_iter()
            .map(|param| {
                let inner = |field: &str| -> Result<Option<TsType>, SynthError> {
                    match param.child_by_field_name(field) {
                        Some(wrapper) => {
                            let ty = named_children(wrapper)
                                .into_iter()
                                .next()
                                .ok_or_else(|| self.unsupported(wrapper))?;
                            Ok(Some(self.ty(ty)?))
                        }
                        None => Ok(None),
                    }
                };
                Ok(TypeParam {
                    name: self.ident(self.field(param, "name")?),
                    constraint: inner("constraint")?,
                    default: inner("value")?,
                })
            })
            .collect()
    }

    /// Reads `field` as a `: Type` annotation.
    fn optional_type_annotation(&self, node: Node, field: &str) -> Result<Option<TsType>, SynthError> {
        let Some(annotation) = node.child_by_field_name(field) else {
            return Ok(None);
        };
        let ty = named_children(annotation)
            .into_iter()
            .next()
            .ok_or_else(|| self.unsupported(annotation))?;
        Ok(Some(self.ty(ty)?))
    }

    fn type_args(&self, node: Node) -> Result<Vec<TsType>, SynthError> {
        named_children(node)
            .into_iter()
            .map(|child| self.ty(child))
            .collect()
    }

    fn qualified_name(&self, node: Node) -> Result<Vec<Ident>, SynthError> {
        match node.kind() {
            "identifier" | "type_identifier" | "property_identifier" => Ok(vec![self.ident(node)]),
            "nested_type_identifier" | "nested_identifier" | "member_expression" => {
                let mut path = Vec::new();
                for child in named_children(node) {
                    path.extend(self.qualified_name(child)?);
                }
                Ok(path)
            }
            _ => Err(self.unsupported(node)),
        }
    }

    fn ty(&self, node: Node) -> Result<TsType, SynthError> {
        match node.kind() {
            "predefined_type" | "this_type" => Ok(TsType::Keyword(self.node_text(node).to_string())),
            "type_identifier" | "nested_type_identifier" => Ok(TsType::Ref {
                name: self.qualified_name(node)?,
                type_args: Vec::new(),
            }),
            "generic_type" => Ok(TsType::Ref {
                name: self.qualified_name(self.field(node, "name")?)?,
                type_args: self.type_args(self.field(node, "type_arguments")?)?,
            }),
            "array_type" => {
                let inner = named_children(node)
                    .into_iter()
                    .next()
                    .ok_or_else(|| self.unsupported(node))?;
                Ok(TsType::Array(Box::new(self.ty(inner)?)))
            }
            "union_type" => {
                let mut variants = Vec::new();
                for child in named_children(node) {
                    match self.ty(child)? {
                        TsType::Union(nested) => variants.extend(nested),
                        other => variants.push(other),
                    }
                }
                Ok(TsType::Union(variants))
            }
            "literal_type" => Ok(TsType::Literal(self.node_text(node).to_string())),
            "parenthesized_type" => {
                let inner = named_children(node)
                    .into_iter()
                    .next()
                    .ok_or_else(|| self.unsupported(node))?;
                self.ty(inner)
            }
            "object_type" => Ok(TsType::Object(self.ts_members(node)?)),
            _ => Err(self.unsupported(node)),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&self, node: Node) -> Result<Expr, SynthError> {
        match node.kind() {
            "identifier" | "undefined" => Ok(Expr::Ident(self.ident(node))),
            "this" => Ok(Expr::This),
            "super" => Ok(Expr::Super),
            "string" => Ok(Expr::Str(self.string_value(node))),
            "number" => Ok(Expr::Num(self.node_text(node).to_string())),
            "true" => Ok(Expr::Bool(true)),
            "false" => Ok(Expr::Bool(false)),
            "null" => Ok(Expr::Null),
            "member_expression" => {
                if has_token(node, "?.") {
                    return Err(self.unsupported(node));
                }
                let property = self.field(node, "property")?;
                if property.kind() != "property_identifier" {
                    return Err(self.unsupported(property));
                }
                Ok(Expr::Member {
                    object: Box::new(self.expr(self.field(node, "object")?)?),
                    property: self.ident(property),
                })
            }
            "call_expression" => {
                let args = self.field(node, "arguments")?;
                if args.kind() != "arguments" {
                    return Err(self.unsupported(args));
                }
                Ok(Expr::Call {
                    callee: Box::new(self.expr(self.field(node, "function")?)?),
                    type_args: match node.child_by_field_name("type_arguments") {
                        Some(ty_args) => self.type_args(ty_args)?,
                        None => Vec::new(),
                    },
                    args: self.args(args)?,
                })
            }
            "new_expression" => Ok(Expr::New {
                callee: Box::new(self.expr(self.field(node, "constructor")?)?),
                type_args: match node.child_by_field_name("type_arguments") {
                    Some(ty_args) => self.type_args(ty_args)?,
                    None => Vec::new(),
                },
                args: match node.child_by_field_name("arguments") {
                    Some(args) => self.args(args)?,
                    None => Vec::new(),
                },
            }),
            "object" => {
                let props = named_children(node)
                    .into_iter()
                    .map(|child| self.prop(child))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expr::Object(props))
            }
            "array" => Ok(Expr::Array(self.args(node)?)),
            "spread_element" => Ok(Expr::Spread(Box::new(self.only_child_expr(node)?))),
            "await_expression" => Ok(Expr::Await(Box::new(self.only_child_expr(node)?))),
            "parenthesized_expression" => self.only_child_expr(node),
            "binary_expression" => {
                let op = self.field(node, "operator")?.kind();
                let left = Box::new(self.expr(self.field(node, "left")?)?);
                let right = Box::new(self.expr(self.field(node, "right")?)?);
                let logical = match op {
                    "&&" => Some(LogicalOp::And),
                    "||" => Some(LogicalOp::Or),
                    "??" => Some(LogicalOp::Nullish),
                    _ => None,
                };
                Ok(match logical {
                    Some(op) => Expr::Logical { op, left, right },
                    None => Expr::Binary {
                        op: op.to_string(),
                        left,
                        right,
                    },
                })
            }
            "unary_expression" => Ok(Expr::Unary {
                op: self.field(node, "operator")?.kind().to_string(),
                arg: Box::new(self.expr(self.field(node, "argument")?)?),
            }),
            "arrow_function" => {
                if node.child_by_field_name("return_type").is_some() {
                    return Err(self.unsupported(node));
                }
                let params = match node.child_by_field_name("parameter") {
                    Some(param) => vec![Param::ident(self.ident(param))],
                    None => self.params(self.field(node, "parameters")?)?,
                };
                let body = self.field(node, "body")?;
                let body = if body.kind() == "statement_block" {
                    ArrowBody::Block(self.statement_list(body)?)
                } else {
                    ArrowBody::Expr(Box::new(self.expr(body)?))
                };
                Ok(Expr::Arrow {
                    is_async: has_token(node, "async"),
                    params,
                    body,
                })
            }
            "as_expression" => {
                let parts = named_children(node);
                match parts.as_slice() {
                    [expr, ty] => Ok(Expr::As {
                        expr: Box::new(self.expr(*expr)?),
                        ty: self.ty(*ty)?,
                    }),
                    _ => Err(self.unsupported(node)),
                }
            }
            _ => Err(self.unsupported(node)),
        }
    }

    fn only_child_expr(&self, node: Node) -> Result<Expr, SynthError> {
        let child = named_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| self.unsupported(node))?;
        self.expr(child)
    }

    fn args(&self, node: Node) -> Result<Vec<Expr>, SynthError> {
        named_children(node)
            .into_iter()
            .map(|child| self.expr(child))
            .collect()
    }

    fn prop(&self, node: Node) -> Result<Prop, SynthError> {
        match node.kind() {
            "pair" => {
                let key = self.field(node, "key")?;
                let key = match key.kind() {
                    "property_identifier" => PropKey::Ident(self.ident(key)),
                    "string" => PropKey::Str(self.string_value(key)),
                    _ => return Err(self.unsupported(key)),
                };
                Ok(Prop::KeyValue {
                    key,
                    value: self.expr(self.field(node, "value")?)?,
                })
            }
            "shorthand_property_identifier" => Ok(Prop::Shorthand(self.ident(node))),
            "spread_element" => Ok(Prop::Spread(self.only_child_expr(node)?)),
            _ => Err(self.unsupported(node)),
        }
    }

    fn string_value(&self, node: Node) -> String {
        let text = self.node_text(node);
        if text.len() >= 2
            && ((text.starts_with('"') && text.ends_with('"'))
                || (text.starts_with('\'') && text.ends_with('\'')))
        {
            text[1..text.len() - 1].to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::printer::render;

    fn parse(source: &str) -> Result<Program, SynthError> {
        TemplateParser::new().unwrap().parse(source, Path::new("test.ts"))
    }

    #[test]
    fn parses_imports() {
        let program = parse(
            r#"
import { Injectable } from "@nestjs/common";
import { Prisma, User as Account } from "@prisma/client";
import type * as fs from "fs";
"#,
        )
        .unwrap();

        let imports: Vec<_> = program.imports().collect();
        assert_eq!(imports.len(), 3);
        assert_eq!(imports[0].source, "@nestjs/common");
        assert_eq!(imports[1].named[1].local_name().name, "Account");
        assert!(imports[2].type_only);
        assert_eq!(imports[2].namespace.as_ref().unwrap().name, "fs");
    }

    #[test]
    fn parses_decorated_exported_class() {
        let program = parse(
            r#"
@Injectable()
export class SERVICE extends SERVICE_BASE {
  constructor(protected readonly prisma: PrismaService) {
    super(prisma);
  }
}
"#,
        )
        .unwrap();

        let class = program.find_class("SERVICE").unwrap();
        assert!(class.exported);
        assert_eq!(class.decorators.len(), 1);
        assert_eq!(class.super_class, Some(Expr::Ident(Ident::new("SERVICE_BASE"))));

        let ClassMemberKind::Constructor(ctor) = &class.members[0].kind else {
            panic!("expected constructor");
        };
        assert_eq!(ctor.params[0].accessibility, Some(Accessibility::Protected));
        assert!(ctor.params[0].readonly);
        assert_eq!(ctor.body.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn parses_ambient_declarations() {
        let program = parse(
            r#"
declare class BASE {
  constructor(prisma: PrismaService);
}
declare const MAPPING: Args;
declare interface Args {
  data: any;
}
"#,
        )
        .unwrap();

        assert_eq!(program.body.len(), 3);
        assert!(program.body.iter().all(Stmt::is_ambient));
        assert!(program.find_class("BASE").is_none());
    }

    #[test]
    fn attaches_leading_comments() {
        let program = parse(
            r#"
class A {
  run() {
    // @ts-ignore
    return this.x.run<T>(ARGS);
  }
}
"#,
        )
        .unwrap();

        let class = program.find_class("A").unwrap();
        let body = class.method("run").unwrap().body.as_ref().unwrap();
        assert_eq!(body[0].comments[0].body(), "@ts-ignore");
    }

    #[test]
    fn parses_generic_method_signature() {
        let program = parse(
            r#"
class A {
  async findMany<T extends FindManyArgs>(args: Prisma.SelectSubset<T, FindManyArgs>): Promise<User[]> {
    return this.prisma.user.findMany(args);
  }
}
"#,
        )
        .unwrap();

        let method = program.find_class("A").unwrap().method("findMany").unwrap();
        assert!(method.is_async);
        assert_eq!(method.type_params[0].name.name, "T");
        let Some(TsType::Ref { name, type_args }) = &method.params[0].type_ann else {
            panic!("expected type reference");
        };
        assert_eq!(name.len(), 2);
        assert_eq!(type_args.len(), 2);
    }

    #[test]
    fn rejects_unsupported_syntax() {
        let err = parse("for (const x of xs) {}").unwrap_err();
        assert!(matches!(err, SynthError::UnsupportedSyntax { .. }));
    }

    #[test]
    fn rejects_invalid_source() {
        let err = parse("class {").unwrap_err();
        assert!(matches!(err, SynthError::SyntaxError { .. }));
    }

    #[test]
    fn round_trips_through_printer() {
        let source = r#"import { A } from "./a";

export class B extends A {
  constructor(protected readonly a: A) {
    super(a);
  }

  run(args: Args): Promise<number> {
    return this.a.run({ ...args, data: { ...args.data } });
  }
}
"#;
        assert_eq!(render(&parse(source).unwrap()), source);
    }
}
