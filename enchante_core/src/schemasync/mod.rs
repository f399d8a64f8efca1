//! SchemaSync - keeps the API-facing schema definition of every entity
//! consistent with its persistence model.
//!
//! For each entity directory the engine parses both definition files,
//! reconciles the schema's field set against the model's, and rewrites the
//! schema file in place. Entities are independent: a failure in one is
//! recorded and the run continues with the next. The schema file is only
//! written after a successful render, so a failed entity is left untouched.

pub mod extract;
pub mod merge;
pub mod parser;
pub mod reconcile;
pub mod render;

use crate::error::{EnchanteError, Result};
use crate::naming;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

pub use extract::{FieldMap, extract_fields};
pub use merge::merge_class;
pub use parser::{ClassDef, FieldStmt, Module, ParseError, Target, TypeExpr, parse_module};
pub use reconcile::reconcile;
pub use render::render_module;

/// Explicit parameters for a sync run. The engine never reads ambient
/// configuration; the caller decides where entities live and what the
/// definition files are called.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory containing one sub-directory per entity.
    pub tables_dir: PathBuf,
    /// Filename of the persistence-entity definition within each directory.
    pub model_filename: String,
    /// Filename of the API-facing definition within each directory.
    pub schema_filename: String,
}

impl SyncOptions {
    pub fn new(tables_dir: impl Into<PathBuf>) -> Self {
        Self {
            tables_dir: tables_dir.into(),
            model_filename: "model.py".to_string(),
            schema_filename: "schema.py".to_string(),
        }
    }
}

/// A per-entity failure surfaced to the caller.
#[derive(Debug)]
pub struct EntityFailure {
    pub entity: String,
    pub error: EnchanteError,
}

/// Outcome of a sync run across all entities.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<String>,
    pub failures: Vec<EntityFailure>,
}

impl SyncReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// One line per entity, successes first.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for entity in &self.synced {
            lines.push(format!("synced {}", entity));
        }
        for failure in &self.failures {
            lines.push(format!("skipped {}: {}", failure.entity, failure.error));
        }
        lines.join("\n")
    }
}

/// The synchronization engine.
#[derive(Debug, Default)]
pub struct Schemasync {
    options: Option<SyncOptions>,
}

impl Schemasync {
    /// Create a new empty Schemasync instance
    pub fn new() -> Self {
        trace!("Creating new Schemasync instance");
        Self { options: None }
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        debug!("Configuring Schemasync for tables dir {:?}", options.tables_dir);
        self.options = Some(options);
        self
    }

    /// Synchronize every entity directory, recovering failures at the
    /// entity boundary.
    pub fn run(&self) -> Result<SyncReport> {
        let options = self
            .options
            .as_ref()
            .ok_or_else(|| EnchanteError::config("Schemasync options not set"))?;

        info!("Syncing tables with schemas in {:?}", options.tables_dir);

        let mut entities: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&options.tables_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                entities.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
            }
        }
        entities.sort();

        let mut report = SyncReport::default();
        for (entity, dir) in entities {
            info!("Syncing {}...", entity);
            match sync_entity(&entity, &dir, options) {
                Ok(()) => {
                    debug!("Synced entity '{}'", entity);
                    report.synced.push(entity);
                }
                Err(error) => {
                    warn!("Skipping entity '{}': {}", entity, error);
                    report.failures.push(EntityFailure { entity, error });
                }
            }
        }

        info!(
            "Sync finished: {} synced, {} failed",
            report.synced.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

/// Synchronize a single entity directory: parse both definitions, merge the
/// schema declaration against the model's fields, and rewrite the schema
/// file. Nothing is written unless every step succeeds.
fn sync_entity(entity: &str, dir: &Path, options: &SyncOptions) -> Result<()> {
    let model_path = dir.join(&options.model_filename);
    let schema_path = dir.join(&options.schema_filename);
    let declaration = naming::declaration_name(entity);
    trace!(
        "entity '{}': expecting declaration '{}' in {:?} and {:?}",
        entity, declaration, model_path, schema_path
    );

    let model_source = fs::read_to_string(&model_path)?;
    let schema_source = fs::read_to_string(&schema_path)?;

    let model_module = parse_module(&model_source)
        .map_err(|e| EnchanteError::parse_error(&model_path, e.to_string()))?;
    let mut schema_module = parse_module(&schema_source)
        .map_err(|e| EnchanteError::parse_error(&schema_path, e.to_string()))?;

    let model_class = model_module
        .find_class(&declaration)
        .ok_or_else(|| EnchanteError::entity_mismatch(entity, &declaration, &model_path))?;
    let model_fields = extract_fields(model_class);
    debug!(
        "entity '{}': {} model field(s) extracted",
        entity,
        model_fields.len()
    );

    let merged = {
        let schema_class = schema_module
            .find_class(&declaration)
            .ok_or_else(|| EnchanteError::entity_mismatch(entity, &declaration, &schema_path))?;
        merge_class(schema_class, &model_fields)
    };
    if let Some(class) = schema_module.find_class_mut(&declaration) {
        *class = merged;
    }

    let rendered = render_module(&schema_module);
    fs::write(&schema_path, rendered)?;
    Ok(())
}
