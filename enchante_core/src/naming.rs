//! Name derivation shared by the scaffolder and the sync engine.

use convert_case::{Case, Casing};

/// Table/directory name for an entity: snake_case, pluralized unless the
/// caller supplied an explicit table name.
pub fn table_name(name: &str, explicit: Option<&str>) -> String {
    match explicit {
        Some(table) => table.to_case(Case::Snake),
        None => format!("{}s", name).to_case(Case::Snake),
    }
}

/// Logical object name for an entity: PascalCase, singular.
pub fn object_name(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// The declaration name expected inside a table directory's definition
/// files. `users` maps to `User`, `order_items` to `OrderItem`.
pub fn declaration_name(table: &str) -> String {
    let singular = table.strip_suffix('s').unwrap_or(table);
    singular.to_case(Case::Pascal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_defaults_to_plural_snake() {
        assert_eq!(table_name("OrderItem", None), "order_items");
        assert_eq!(table_name("user", None), "users");
    }

    #[test]
    fn test_table_name_respects_explicit_override() {
        assert_eq!(table_name("Person", Some("People")), "people");
    }

    #[test]
    fn test_object_name_is_pascal() {
        assert_eq!(object_name("order_item"), "OrderItem");
        assert_eq!(object_name("user"), "User");
    }

    #[test]
    fn test_declaration_name_singularizes() {
        assert_eq!(declaration_name("users"), "User");
        assert_eq!(declaration_name("order_items"), "OrderItem");
        assert_eq!(declaration_name("staff"), "Staff");
    }
}
