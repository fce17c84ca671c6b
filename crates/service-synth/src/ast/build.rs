//! Constructors for small tree fragments.

use super::*;

pub fn ident(name: impl Into<String>) -> Ident {
    Ident::new(name)
}

/// `object.property`
pub fn member(object: Expr, property: impl Into<String>) -> Expr {
    Expr::Member {
        object: Box::new(object),
        property: Ident::new(property),
    }
}

/// Builds a member chain: `member_path(Expr::This, &["a", "b"])` is `this.a.b`.
pub fn member_path(root: Expr, properties: &[&str]) -> Expr {
    properties
        .iter()
        .fold(root, |object, property| member(object, *property))
}

/// `callee(args...)`
pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        type_args: Vec::new(),
        args,
    }
}

/// `await argument`
pub fn await_expr(argument: Expr) -> Expr {
    Expr::Await(Box::new(argument))
}

/// `left && right`
pub fn and(left: Expr, right: Expr) -> Expr {
    Expr::Logical {
        op: LogicalOp::And,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// `(param) => body`
pub fn arrow(param: Ident, body: Expr) -> Expr {
    Expr::Arrow {
        is_async: false,
        params: vec![Param::ident(param)],
        body: ArrowBody::Expr(Box::new(body)),
    }
}

/// `{ props... }`
pub fn object(props: Vec<Prop>) -> Expr {
    Expr::Object(props)
}

/// `...argument` inside an object literal.
pub fn spread_prop(argument: Expr) -> Prop {
    Prop::Spread(argument)
}

/// `key: value`
pub fn key_value(key: Ident, value: Expr) -> Prop {
    Prop::KeyValue {
        key: PropKey::Ident(key),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_path_chains_properties() {
        let expr = member_path(Expr::This, &["passwordService", "hash"]);
        let Expr::Member { object, property } = expr else {
            panic!("expected member expression");
        };
        assert_eq!(property.name, "hash");
        assert_eq!(*object, member(Expr::This, "passwordService"));
    }

    #[test]
    fn member_path_without_properties_is_root() {
        assert_eq!(member_path(Expr::Ident(ident("args")), &[]), Expr::Ident(ident("args")));
    }
}
