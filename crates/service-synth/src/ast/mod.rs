//! Syntax tree for the TypeScript subset used by service templates.
//!
//! The tree only models the shapes template authors agree to use: imports,
//! classes, interfaces, type aliases, variable declarations and a small set of
//! expressions and types. Templates are parsed into this tree, rewritten, and
//! rendered back to text by [`crate::codegen::printer`].

pub mod build;
pub mod visit;

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    /// Finds a non-ambient class declaration by name.
    pub fn find_class_mut(&mut self, name: &str) -> Option<&mut ClassDecl> {
        self.body.iter_mut().find_map(|stmt| match &mut stmt.kind {
            StmtKind::Class(class) if !class.declare && class.name.name == name => Some(class),
            _ => None,
        })
    }

    /// Finds a non-ambient class declaration by name.
    pub fn find_class(&self, name: &str) -> Option<&ClassDecl> {
        self.body.iter().find_map(|stmt| match &stmt.kind {
            StmtKind::Class(class) if !class.declare && class.name.name == name => Some(class),
            _ => None,
        })
    }

    /// Iterates over the import declarations of the file.
    pub fn imports(&self) -> impl Iterator<Item = &ImportDecl> {
        self.body.iter().filter_map(|stmt| match &stmt.kind {
            StmtKind::Import(import) => Some(import),
            _ => None,
        })
    }
}

/// An identifier. The same node type is used for every syntactic role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A source comment, stored with its delimiters (`// ...` or `/* ... */`).
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    /// The comment body without delimiters, trimmed.
    pub fn body(&self) -> &str {
        let text = self.text.trim();
        if let Some(line) = text.strip_prefix("//") {
            line.trim()
        } else {
            text.trim_start_matches("/*")
                .trim_end_matches("*/")
                .trim()
        }
    }
}

/// A statement together with its leading comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub comments: Vec<Comment>,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            comments: Vec::new(),
            kind,
        }
    }

    /// True for `declare ...` statements.
    pub fn is_ambient(&self) -> bool {
        match &self.kind {
            StmtKind::Class(class) => class.declare,
            StmtKind::Interface(interface) => interface.declare,
            StmtKind::TypeAlias(alias) => alias.declare,
            StmtKind::Var(var) => var.declare,
            _ => false,
        }
    }
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Import(ImportDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Var(VarDecl),
    Expr(Expr),
    Return(Option<Expr>),
}

/// An import declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub type_only: bool,
    pub default: Option<Ident>,
    pub namespace: Option<Ident>,
    pub named: Vec<ImportSpecifier>,
    pub source: String,
}

impl ImportDecl {
    /// `import { a, b } from "source";`
    pub fn named(names: impl IntoIterator<Item = Ident>, source: impl Into<String>) -> Self {
        Self {
            type_only: false,
            default: None,
            namespace: None,
            named: names
                .into_iter()
                .map(|imported| ImportSpecifier { imported, local: None })
                .collect(),
            source: source.into(),
        }
    }

    /// Every local binding this declaration introduces.
    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.default
            .iter()
            .chain(self.namespace.iter())
            .chain(self.named.iter().map(ImportSpecifier::local_name))
            .map(|ident| ident.name.as_str())
    }
}

/// `imported as local` inside `{ ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub imported: Ident,
    pub local: Option<Ident>,
}

impl ImportSpecifier {
    pub fn local_name(&self) -> &Ident {
        self.local.as_ref().unwrap_or(&self.imported)
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    Protected,
    Private,
}

impl Accessibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Protected => "protected",
            Accessibility::Private => "private",
        }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub decorators: Vec<Expr>,
    pub exported: bool,
    pub declare: bool,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub super_class: Option<Expr>,
    pub super_type_args: Vec<TsType>,
    pub members: Vec<ClassMember>,
}

impl ClassDecl {
    pub fn constructor_mut(&mut self) -> Option<&mut Constructor> {
        self.members.iter_mut().find_map(|member| match &mut member.kind {
            ClassMemberKind::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.members.iter().find_map(|member| match &member.kind {
            ClassMemberKind::Method(method) if method.name.name == name => Some(method),
            _ => None,
        })
    }

    pub fn method_mut(&mut self, name: &str) -> Option<&mut Method> {
        self.members.iter_mut().find_map(|member| match &mut member.kind {
            ClassMemberKind::Method(method) if method.name.name == name => Some(method),
            _ => None,
        })
    }
}

/// A class member with its leading comments.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub comments: Vec<Comment>,
    pub kind: ClassMemberKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMemberKind {
    Constructor(Constructor),
    Method(Method),
    Property(ClassProp),
}

/// A constructor. `body` is `None` for signatures in ambient classes.
#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub params: Vec<Param>,
    pub body: Option<Vec<Stmt>>,
}

/// A method. `body` is `None` for signatures in ambient classes.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub accessibility: Option<Accessibility>,
    pub is_static: bool,
    pub is_async: bool,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Option<TsType>,
    pub body: Option<Vec<Stmt>>,
}

/// A class property.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProp {
    pub accessibility: Option<Accessibility>,
    pub is_static: bool,
    pub readonly: bool,
    pub declare: bool,
    pub name: Ident,
    pub optional: bool,
    pub type_ann: Option<TsType>,
    pub value: Option<Expr>,
}

/// A function, method or constructor parameter.
///
/// `accessibility` and `readonly` make a constructor parameter a parameter
/// property (a constructor-assigned class member).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub accessibility: Option<Accessibility>,
    pub readonly: bool,
    pub name: Ident,
    pub optional: bool,
    pub type_ann: Option<TsType>,
    pub default: Option<Expr>,
}

impl Param {
    /// A plain `name` parameter.
    pub fn ident(name: Ident) -> Self {
        Self {
            accessibility: None,
            readonly: false,
            name,
            optional: false,
            type_ann: None,
            default: None,
        }
    }
}

/// `<T extends C = D>`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: Ident,
    pub constraint: Option<TsType>,
    pub default: Option<TsType>,
}

/// An interface declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub exported: bool,
    pub declare: bool,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TsType>,
    pub body: Vec<TsMember>,
}

/// A type alias declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub exported: bool,
    pub declare: bool,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub ty: TsType,
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

/// A variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub exported: bool,
    pub declare: bool,
    pub kind: VarKind,
    pub decls: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Ident,
    pub type_ann: Option<TsType>,
    pub init: Option<Expr>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    This,
    Super,
    Str(String),
    /// Numeric literal, kept as written.
    Num(String),
    Bool(bool),
    Null,
    Member {
        object: Box<Expr>,
        property: Ident,
    },
    Call {
        callee: Box<Expr>,
        type_args: Vec<TsType>,
        args: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        type_args: Vec<TsType>,
        args: Vec<Expr>,
    },
    Object(Vec<Prop>),
    Array(Vec<Expr>),
    /// `...expr` in call arguments and array elements.
    Spread(Box<Expr>),
    Await(Box<Expr>),
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: String,
        arg: Box<Expr>,
    },
    Arrow {
        is_async: bool,
        params: Vec<Param>,
        body: ArrowBody,
    },
    As {
        expr: Box<Expr>,
        ty: TsType,
    },
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

/// Arrow function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Expr>),
    Block(Vec<Stmt>),
}

/// An object literal property.
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue { key: PropKey, value: Expr },
    Shorthand(Ident),
    Spread(Expr),
}

impl Prop {
    /// The key name of a key-value or shorthand property.
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Prop::KeyValue { key: PropKey::Ident(ident), .. } | Prop::Shorthand(ident) => {
                Some(&ident.name)
            }
            Prop::KeyValue { key: PropKey::Str(s), .. } => Some(s),
            Prop::Spread(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(Ident),
    Str(String),
}

/// A type.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// `string`, `number`, `unknown`, `void`, ...
    Keyword(String),
    /// `A.B.C<Args>`
    Ref {
        name: Vec<Ident>,
        type_args: Vec<TsType>,
    },
    Array(Box<TsType>),
    Union(Vec<TsType>),
    /// `null`, `"literal"`, `42`, kept as written.
    Literal(String),
    Object(Vec<TsMember>),
}

impl TsType {
    /// A reference to a single type name without arguments.
    pub fn named(ident: Ident) -> Self {
        TsType::Ref {
            name: vec![ident],
            type_args: Vec::new(),
        }
    }
}

/// A member of an interface body or object type literal.
#[derive(Debug, Clone, PartialEq)]
pub enum TsMember {
    Property {
        readonly: bool,
        name: Ident,
        optional: bool,
        type_ann: Option<TsType>,
    },
    Method {
        name: Ident,
        optional: bool,
        type_params: Vec<TypeParam>,
        params: Vec<Param>,
        return_type: Option<TsType>,
    },
}
