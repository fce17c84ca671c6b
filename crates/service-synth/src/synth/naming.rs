//! Identifier naming for generated services.

/// Names derived from an entity type name such as `Customer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNames {
    pub entity: String,
    pub service: String,
    pub service_base: String,
    /// Prisma client delegate property, e.g. `customer`.
    pub delegate: String,
    pub find_many_args: String,
    pub find_one_args: String,
    pub create_args: String,
    pub update_args: String,
    pub delete_args: String,
}

impl ServiceNames {
    pub fn new(entity_type: &str) -> Self {
        Self {
            entity: entity_type.to_string(),
            service: format!("{}Service", entity_type),
            service_base: format!("{}ServiceBase", entity_type),
            delegate: camel_case(entity_type),
            find_many_args: format!("FindMany{}Args", entity_type),
            find_one_args: format!("FindOne{}Args", entity_type),
            create_args: format!("{}CreateArgs", entity_type),
            update_args: format!("{}UpdateArgs", entity_type),
            delete_args: format!("{}DeleteArgs", entity_type),
        }
    }
}

/// Lowercases the first character: `OrderItem` -> `orderItem`.
pub fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_all_names_from_type() {
        let names = ServiceNames::new("Customer");
        assert_eq!(names.service, "CustomerService");
        assert_eq!(names.service_base, "CustomerServiceBase");
        assert_eq!(names.delegate, "customer");
        assert_eq!(names.find_many_args, "FindManyCustomerArgs");
        assert_eq!(names.find_one_args, "FindOneCustomerArgs");
        assert_eq!(names.create_args, "CustomerCreateArgs");
        assert_eq!(names.update_args, "CustomerUpdateArgs");
        assert_eq!(names.delete_args, "CustomerDeleteArgs");
    }

    #[test]
    fn camel_case_only_touches_first_character() {
        assert_eq!(camel_case("OrderItem"), "orderItem");
        assert_eq!(camel_case("URL"), "uRL");
        assert_eq!(camel_case(""), "");
    }
}
