//! Field extraction - projects a declaration block onto an ordered map of
//! field statements keyed by normalized root identifier.

use super::parser::{ClassDef, FieldStmt};
use tracing::trace;

/// An insertion-ordered map from field identifier to field statement.
/// Inserting an existing key replaces the statement in place, so duplicate
/// identifiers resolve last-write-wins while keeping first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: Vec<(String, FieldStmt)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, field: FieldStmt) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = field,
            None => self.entries.push((key, field)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldStmt> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, field)| field)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldStmt)> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract the annotated field declarations of a block, in first-seen order.
/// Non-field members are left alone; duplicate identifiers keep the later
/// statement.
pub fn extract_fields(block: &ClassDef) -> FieldMap {
    let mut fields = FieldMap::new();
    for member in &block.body {
        if let Some(field) = member.as_field() {
            trace!(
                "extracted field '{}' from declaration '{}'",
                field.target.root_id(),
                block.name
            );
            fields.insert(field.target.root_id().to_string(), field.clone());
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemasync::parser::parse_module;
    use pretty_assertions::assert_eq;

    fn class_of(source: &str, name: &str) -> ClassDef {
        parse_module(source).unwrap().find_class(name).unwrap().clone()
    }

    #[test]
    fn test_extract_preserves_first_seen_order() {
        let class = class_of(
            "class User(Base):\n    uid: int\n    name: str\n    email: str\n",
            "User",
        );
        let fields = extract_fields(&class);
        let keys: Vec<&str> = fields.keys().collect();
        assert_eq!(keys, vec!["uid", "name", "email"]);
    }

    #[test]
    fn test_extract_skips_non_field_members() {
        let class = class_of(
            "class User(Base):\n    __tablename__ = \"users\"\n    uid: int\n\n    def greet(self):\n        pass\n",
            "User",
        );
        let fields = extract_fields(&class);
        assert_eq!(fields.len(), 1);
        assert!(fields.contains("uid"));
    }

    #[test]
    fn test_extract_normalizes_target_shapes_to_root() {
        let class = class_of(
            "class Holder(Base):\n    plain: int\n    obj.attr: str\n    slot[0]: bool\n",
            "Holder",
        );
        let fields = extract_fields(&class);
        let keys: Vec<&str> = fields.keys().collect();
        assert_eq!(keys, vec!["plain", "obj", "slot"]);
    }

    #[test]
    fn test_duplicate_identifier_last_write_wins() {
        let class = class_of(
            "class User(Base):\n    uid: int\n    uid: str\n",
            "User",
        );
        let fields = extract_fields(&class);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("uid").unwrap().annotation.render(), "str");
    }
}
