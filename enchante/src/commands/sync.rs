use crate::cli::{Cli, SyncArgs};
use enchante_core::config::EnchanteConfig;
use enchante_core::error::{EnchanteError, Result};
use enchante_core::{Schemasync, SyncOptions};
use std::path::Path;
use tracing::info;

/// Merge every entity's model fields into its schema definition.
pub fn run(cli: &Cli, args: SyncArgs) -> Result<()> {
    let options = sync_options(super::load_config(cli), args.tables_dir.as_deref())?;

    info!("Syncing schemas in {:?}", options.tables_dir);
    let report = Schemasync::new().with_options(options).run()?;
    for line in report.summary().lines() {
        info!("{line}");
    }

    if report.has_failures() {
        return Err(EnchanteError::schema_sync(format!(
            "{} of {} entities failed to sync",
            report.failures.len(),
            report.synced.len() + report.failures.len()
        )));
    }
    Ok(())
}

/// Build run options from configuration and the optional directory override.
/// `--tables-dir` replaces only the directory; configured filenames still
/// apply. Without a config, the override runs against default filenames.
fn sync_options(
    config: Result<EnchanteConfig>,
    tables_dir: Option<&Path>,
) -> Result<SyncOptions> {
    match (config, tables_dir) {
        (Ok(config), dir) => {
            let mut options = SyncOptions::new(
                dir.map(Path::to_path_buf).unwrap_or_else(|| config.tables_path()),
            );
            options.model_filename = config.sync.model_filename;
            options.schema_filename = config.sync.schema_filename;
            Ok(options)
        }
        (Err(_), Some(dir)) => Ok(SyncOptions::new(dir)),
        (Err(e), None) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enchante_core::config::{ProjectConfig, SyncConfig};
    use std::path::PathBuf;

    fn config_with_filenames() -> EnchanteConfig {
        EnchanteConfig {
            project: ProjectConfig {
                root_dir: PathBuf::from("./app"),
                migrations_dir: PathBuf::from("alembic"),
            },
            sync: SyncConfig {
                model_filename: "entity.py".to_string(),
                schema_filename: "dto.py".to_string(),
            },
        }
    }

    #[test]
    fn test_tables_dir_override_keeps_configured_filenames() {
        let options =
            sync_options(Ok(config_with_filenames()), Some(Path::new("./elsewhere"))).unwrap();
        assert_eq!(options.tables_dir, PathBuf::from("./elsewhere"));
        assert_eq!(options.model_filename, "entity.py");
        assert_eq!(options.schema_filename, "dto.py");
    }

    #[test]
    fn test_no_override_uses_configured_tables_path() {
        let options = sync_options(Ok(config_with_filenames()), None).unwrap();
        assert_eq!(options.tables_dir, PathBuf::from("./app/tables"));
    }

    #[test]
    fn test_override_without_config_falls_back_to_defaults() {
        let missing = Err(EnchanteError::config("enchante.toml not found"));
        let options = sync_options(missing, Some(Path::new("./tables"))).unwrap();
        assert_eq!(options.model_filename, "model.py");
        assert_eq!(options.schema_filename, "schema.py");
    }

    #[test]
    fn test_no_override_and_no_config_is_an_error() {
        let missing = Err(EnchanteError::config("enchante.toml not found"));
        assert!(sync_options(missing, None).is_err());
    }
}
