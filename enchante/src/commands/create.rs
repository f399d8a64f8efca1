use crate::cli::{Cli, CreateArgs};
use enchante_core::error::{EnchanteError, Result};
use enchante_core::naming;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

const MODEL_TEMPLATE: &str = include_str!("../../templates/model.py.tmpl");
const SCHEMA_TEMPLATE: &str = include_str!("../../templates/schema.py.tmpl");

/// Scaffold a model/schema pair under `tables/<table_name>/` and register
/// both in the package-level re-export modules.
pub fn run(cli: &Cli, args: CreateArgs) -> Result<()> {
    let config = super::load_config(cli)?;
    let table = naming::table_name(&args.name, args.table_name.as_deref());
    let object = naming::object_name(&args.name);
    info!("Creating entity '{}' (table '{}')", object, table);

    let dir = config.tables_path().join(&table);
    if dir.exists() {
        return Err(EnchanteError::template(format!(
            "table directory '{}' already exists",
            dir.display()
        )));
    }
    fs::create_dir_all(&dir)?;

    let files = [
        (&config.sync.model_filename, MODEL_TEMPLATE),
        (&config.sync.schema_filename, SCHEMA_TEMPLATE),
    ];
    for (filename, template) in files {
        let path = dir.join(filename);
        fs::write(&path, render_template(template, &object, &table))?;
        debug!("Wrote {:?}", path);
    }

    let model_module = module_stem(&config.sync.model_filename);
    let schema_module = module_stem(&config.sync.schema_filename);
    append_line(
        &config.models_path(),
        &format!("from .tables.{table}.{model_module} import {object}"),
    )?;
    append_line(
        &config.schemas_path(),
        &format!("from .tables.{table}.{schema_module} import *"),
    )?;

    info!("Created {:?}", dir);
    Ok(())
}

fn render_template(template: &str, object: &str, table: &str) -> String {
    template
        .replace("{{object}}", object)
        .replace("{{table_name}}", table)
}

/// Python module name for a definition file, `model.py` -> `model`.
fn module_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    debug!("Appended re-export to {:?}", path);
    Ok(())
}
