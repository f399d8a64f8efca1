//! Annotation reconciliation - computes the schema-side statement a model
//! field should map to.
//!
//! Container annotations on the model side (`Mapped[UUID]`, `Optional[int]`,
//! `List[str]`) describe storage wrapping the API does not want; the schema
//! side carries the inner type alone. Only one level is ever unwrapped - the
//! immediate inner expression - and nested parametrization is left as-is.
//! Scalar model annotations are copied unchanged; whether they overwrite an
//! existing schema field is the diff engine's decision, not ours.

use super::parser::{FieldStmt, TypeExpr};

/// The statement to place or merge into the schema for a model field. The
/// identifier is preserved and no model default is carried over: the schema
/// keeps its own default if it already has one.
pub fn reconcile(model_field: &FieldStmt) -> FieldStmt {
    let annotation = match &model_field.annotation {
        TypeExpr::Parametrized { inner, .. } => (**inner).clone(),
        simple @ TypeExpr::Simple(_) => simple.clone(),
    };
    FieldStmt {
        target: model_field.target.clone(),
        annotation,
        value: None,
    }
}
