use crate::cli::{Cli, InitArgs};
use enchante_core::config::{CONFIG_FILENAME, EnchanteConfig, ProjectConfig, SyncConfig};
use enchante_core::error::Result;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

const BASE_TEMPLATE: &str = include_str!("../../templates/base.py.tmpl");

/// Create `enchante.toml` and the project layout, then hand the migrations
/// directory to alembic.
pub fn run(_cli: &Cli, args: InitArgs) -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);
    if config_path.exists() && !args.force {
        warn!("{} already exists, pass --force to overwrite", CONFIG_FILENAME);
        return Ok(());
    }

    let config = EnchanteConfig {
        project: ProjectConfig {
            root_dir: args.root_dir.clone(),
            migrations_dir: args.migrations_dir.clone(),
        },
        sync: SyncConfig::default(),
    };

    fs::create_dir_all(config.tables_path())?;
    write_if_missing(&config.models_path(), "")?;
    write_if_missing(&config.schemas_path(), "")?;
    write_if_missing(&config.project.root_dir.join("base.py"), BASE_TEMPLATE)?;
    config.save(config_path)?;
    info!("Wrote {}", CONFIG_FILENAME);

    if !args.no_alembic {
        init_alembic(&config);
    }

    info!("Project initialized at {:?}", config.project.root_dir);
    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        info!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, contents)?;
    info!("Wrote {:?}", path);
    Ok(())
}

/// Invoke `alembic init` for the configured migrations directory. A missing
/// or failing alembic is reported but never fails the command.
fn init_alembic(config: &EnchanteConfig) {
    let migrations = config.migrations_path();
    if migrations.exists() {
        info!("Migrations directory {:?} already exists", migrations);
        return;
    }

    info!("Running alembic init {:?}", migrations);
    match Command::new("alembic").arg("init").arg(&migrations).status() {
        Ok(status) if status.success() => info!("Initialized alembic"),
        Ok(status) => warn!("alembic init exited with {}", status),
        Err(e) => warn!("Could not invoke alembic ({}), skipping migrations setup", e),
    }
}
