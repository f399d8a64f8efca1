//! Serialization - re-emits a mutated module tree as source text.
//!
//! Opaque statements are emitted byte-for-byte; field declarations are
//! re-rendered from the AST at the block's body indent. The output re-parses
//! to an observably equivalent tree; whitespace fidelity beyond that is
//! best-effort.

use super::parser::{ClassStmt, Module, Stmt};

/// Render a module back into source text, ending with a single newline.
pub fn render_module(module: &Module) -> String {
    let mut out = String::new();
    for stmt in &module.statements {
        match stmt {
            Stmt::Opaque(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Stmt::Class(class) => {
                out.push_str(&class.header);
                out.push('\n');
                for member in &class.body {
                    match member {
                        ClassStmt::Opaque(text) => {
                            out.push_str(text);
                            out.push('\n');
                        }
                        ClassStmt::Field(field) => {
                            out.push_str(&class.body_indent);
                            out.push_str(&field.render());
                            out.push('\n');
                        }
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemasync::parser::parse_module;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_round_trips_untouched_module() {
        let source = r#"import uuid
from pydantic import BaseModel


class User(BaseModel):
    uid: uuid.UUID
    name: str

    class Config:
        from_attributes = True
"#;
        let module = parse_module(source).unwrap();
        assert_eq!(render_module(&module), source);
    }

    #[test]
    fn test_render_output_reparses_equivalently() {
        let source = "class User(Base):\n    tags: List[\n        str\n    ]\n    name: str = \"x\"\n";
        let module = parse_module(source).unwrap();
        let rendered = render_module(&module);
        let reparsed = parse_module(&rendered).unwrap();

        let original = module.find_class("User").unwrap();
        let round_tripped = reparsed.find_class("User").unwrap();
        assert_eq!(original.name, round_tripped.name);
        assert_eq!(
            original
                .body
                .iter()
                .filter_map(|s| s.as_field().map(|f| f.render()))
                .collect::<Vec<_>>(),
            round_tripped
                .body
                .iter()
                .filter_map(|s| s.as_field().map(|f| f.render()))
                .collect::<Vec<_>>(),
        );
    }

    #[test]
    fn test_render_normalizes_multiline_fields() {
        let source = "class User(Base):\n    tags: List[\n        str\n    ]\n";
        let module = parse_module(source).unwrap();
        assert_eq!(render_module(&module), "class User(Base):\n    tags: List[str]\n");
    }
}
