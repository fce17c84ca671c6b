//! Create/update argument mappings.
//!
//! The base service forwards `args` to Prisma. When an entity has sensitive
//! fields the forwarded value is rebuilt so that every sensitive field of
//! `args.data` is hashed first:
//!
//! ```text
//! create: { ...args, data: { ...args.data, password: await this.passwordService.hash(args.data.password) } }
//! update: { ...args, data: { ...args.data, password: args.data.password && await transformStringFieldInUpdate(...) } }
//! ```

use crate::ast::build::*;
use crate::ast::{Expr, Ident};

use super::collaborator;

/// Identifiers and collaborator references the mappings are built from.
#[derive(Debug, Clone)]
pub struct MappingContext {
    pub args: Ident,
    pub data: Ident,
    /// The hashing callee, `this.passwordService.hash`.
    pub hash: Expr,
    /// The conditional update helper, `transformStringFieldInUpdate`.
    pub transform_helper: Ident,
}

impl Default for MappingContext {
    fn default() -> Self {
        Self {
            args: ident(collaborator::ARGS),
            data: ident(collaborator::DATA),
            hash: member_path(
                Expr::This,
                &[collaborator::PASSWORD_SERVICE_MEMBER, collaborator::HASH_METHOD],
            ),
            transform_helper: ident(collaborator::TRANSFORM_HELPER),
        }
    }
}

impl MappingContext {
    /// `args.data.<field>`
    fn field_value(&self, field: &str) -> Expr {
        member_path(Expr::Ident(self.args.clone()), &[self.data.name.as_str(), field])
    }

    /// `{ ...args, data: { ...args.data, <overrides> } }`, or `args` when there are none.
    fn rebuild_data(&self, fields: &[&str], value: impl Fn(&str) -> Expr) -> Expr {
        if fields.is_empty() {
            return Expr::Ident(self.args.clone());
        }

        let args = Expr::Ident(self.args.clone());
        let mut data = vec![spread_prop(member(args.clone(), self.data.name.clone()))];
        // Overrides follow the spread so the transformed value wins.
        data.extend(fields.iter().map(|field| key_value(ident(*field), value(*field))));

        object(vec![
            spread_prop(args),
            key_value(self.data.clone(), object(data)),
        ])
    }
}

/// Mapping passed to `create`: each sensitive field is hashed unconditionally.
pub fn create_mapping(fields: &[&str], ctx: &MappingContext) -> Expr {
    ctx.rebuild_data(fields, |field| {
        await_expr(call(ctx.hash.clone(), vec![ctx.field_value(field)]))
    })
}

/// Mapping passed to `update`: a sensitive field is hashed only when a new
/// value was supplied, so a partial update leaves it untouched.
pub fn update_mapping(fields: &[&str], ctx: &MappingContext) -> Expr {
    ctx.rebuild_data(fields, |field| {
        let value = ident("value");
        let transform = call(
            Expr::Ident(ctx.transform_helper.clone()),
            vec![
                ctx.field_value(field),
                arrow(value.clone(), call(ctx.hash.clone(), vec![Expr::Ident(value)])),
            ],
        );
        and(ctx.field_value(field), await_expr(transform))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LogicalOp, Prop};
    use crate::codegen::printer::render_expr;

    fn compact(text: &str) -> String {
        text.split_whitespace().collect()
    }

    fn data_props(mapping: &Expr) -> &[Prop] {
        let Expr::Object(outer) = mapping else {
            panic!("expected object mapping");
        };
        match &outer[1] {
            Prop::KeyValue { value: Expr::Object(props), .. } => props.as_slice(),
            other => panic!("expected data object, got {:?}", other),
        }
    }

    #[test]
    fn without_sensitive_fields_arguments_pass_through() {
        let ctx = MappingContext::default();
        assert_eq!(create_mapping(&[], &ctx), Expr::Ident(ident("args")));
        assert_eq!(update_mapping(&[], &ctx), Expr::Ident(ident("args")));
    }

    #[test]
    fn create_mapping_hashes_password() {
        let mapping = create_mapping(&["password"], &MappingContext::default());
        assert_eq!(
            compact(&render_expr(&mapping)),
            compact(
                "{ ...args, data: { ...args.data, password: await this.passwordService.hash(args.data.password) } }"
            )
        );
    }

    #[test]
    fn overrides_follow_the_data_spread() {
        let mapping = create_mapping(&["secret", "password"], &MappingContext::default());
        let props = data_props(&mapping);

        assert!(matches!(props[0], Prop::Spread(_)));
        let keys: Vec<_> = props.iter().filter_map(Prop::key_name).collect();
        assert_eq!(keys, vec!["secret", "password"]);
        for prop in &props[1..] {
            let Prop::KeyValue { value, .. } = prop else {
                panic!("expected override");
            };
            assert!(matches!(value, Expr::Await(_)));
        }
    }

    #[test]
    fn update_mapping_short_circuits_omitted_fields() {
        let ctx = MappingContext::default();
        let mapping = update_mapping(&["password"], &ctx);
        let Prop::KeyValue { value, .. } = &data_props(&mapping)[1] else {
            panic!("expected override");
        };

        let Expr::Logical { op, left, right } = value else {
            panic!("expected short-circuit");
        };
        assert_eq!(*op, LogicalOp::And);
        assert_eq!(**left, ctx.field_value("password"));
        assert!(matches!(**right, Expr::Await(_)));

        assert_eq!(
            compact(&render_expr(value)),
            compact(
                "args.data.password && await transformStringFieldInUpdate(args.data.password, (value) => this.passwordService.hash(value))"
            )
        );
    }
}
