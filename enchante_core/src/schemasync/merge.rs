//! The diff engine - merges a schema declaration block with the fields
//! derived from its model.
//!
//! The schema block is the base: its fields keep their position, annotation,
//! and default unless a model field overrides them. Model fields with a
//! parametrized annotation force-update their schema counterpart (or are
//! appended when missing); model fields with a simple annotation only
//! protect their counterpart from deletion. Non-field member statements are
//! never touched.

use super::extract::FieldMap;
use super::parser::{ClassDef, ClassStmt};
use super::reconcile::reconcile;
use tracing::{debug, trace};

/// Merge the model's field set into the schema declaration block, returning
/// the updated block.
pub fn merge_class(schema: &ClassDef, model_fields: &FieldMap) -> ClassDef {
    let mut body = schema.body.clone();

    for (key, model_field) in model_fields.iter() {
        if !model_field.annotation.is_parametrized() {
            continue;
        }
        let reconciled = reconcile(model_field);
        let existing = body.iter_mut().find_map(|stmt| match stmt {
            ClassStmt::Field(field) if field.target.root_id() == key => Some(field),
            _ => None,
        });
        match existing {
            Some(field) => {
                // Identifier and any existing default stay; only the
                // annotation is replaced with the unwrapped form.
                trace!("updating schema field '{}' to '{}'", key, reconciled.annotation.render());
                field.annotation = reconciled.annotation;
            }
            None => {
                trace!("appending schema field '{}' as '{}'", key, reconciled.annotation.render());
                body.push(ClassStmt::Field(reconciled));
            }
        }
    }

    // Deletion is judged against the complete model field set, so scalar
    // model fields still protect their schema counterpart.
    let before = body.len();
    body.retain(|stmt| match stmt {
        ClassStmt::Field(field) => model_fields.contains(field.target.root_id()),
        ClassStmt::Opaque(_) => true,
    });
    if body.len() < before {
        debug!(
            "removed {} schema field(s) absent from model '{}'",
            before - body.len(),
            schema.name
        );
    }

    ClassDef {
        name: schema.name.clone(),
        header: schema.header.clone(),
        body_indent: schema.body_indent.clone(),
        body,
    }
}
