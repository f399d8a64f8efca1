use crate::error::{EnchanteError, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace};

pub const CONFIG_FILENAME: &str = "enchante.toml";

/// Project layout configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Root of the generated data-access layer (a Python package directory)
    pub root_dir: PathBuf,

    /// Name of the alembic migrations directory, relative to `root_dir`
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from("alembic")
}

/// Synchronization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Filename of the persistence-entity definition inside each table directory
    #[serde(default = "default_model_filename")]
    pub model_filename: String,

    /// Filename of the API-facing definition inside each table directory
    #[serde(default = "default_schema_filename")]
    pub schema_filename: String,
}

fn default_model_filename() -> String {
    "model.py".to_string()
}

fn default_schema_filename() -> String {
    "schema.py".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            model_filename: default_model_filename(),
            schema_filename: default_schema_filename(),
        }
    }
}

/// Unified configuration for Enchante operations, loaded from `enchante.toml`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnchanteConfig {
    /// Project layout configuration
    pub project: ProjectConfig,

    /// Synchronization configuration
    #[serde(default)]
    pub sync: SyncConfig,
}

impl EnchanteConfig {
    /// Load configuration by searching for enchante.toml in the current
    /// directory and its ancestors.
    pub fn new() -> Result<EnchanteConfig> {
        info!("Loading Enchante configuration");
        let config_path = Self::find_config_file()?;
        info!("Found configuration file at: {:?}", config_path);
        Self::from_path(&config_path)
    }

    /// Load configuration from an explicit file path.
    pub fn from_path(config_path: &Path) -> Result<EnchanteConfig> {
        let contents = fs::read_to_string(config_path).map_err(|e| {
            error!("Failed to read configuration file: {}", e);
            EnchanteError::from(e)
        })?;

        debug!("Configuration file size: {} bytes", contents.len());

        let config: EnchanteConfig = toml::from_str(&contents).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            EnchanteError::config(e.to_string())
        })?;

        debug!("Successfully parsed TOML configuration");
        Ok(config)
    }

    /// Serialize the configuration and write it to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        debug!("Wrote configuration to {:?}", path);
        Ok(())
    }

    /// Directory holding one sub-directory per entity.
    pub fn tables_path(&self) -> PathBuf {
        self.project.root_dir.join("tables")
    }

    /// The module re-exporting every generated model.
    pub fn models_path(&self) -> PathBuf {
        self.project.root_dir.join("models.py")
    }

    /// The module re-exporting every generated schema.
    pub fn schemas_path(&self) -> PathBuf {
        self.project.root_dir.join("schemas.py")
    }

    /// The alembic migrations directory.
    pub fn migrations_path(&self) -> PathBuf {
        self.project.root_dir.join(&self.project.migrations_dir)
    }

    /// Searches for `enchante.toml` starting from the current directory
    /// and traversing up to the root.
    fn find_config_file() -> Result<PathBuf> {
        let current_dir = env::current_dir()?;
        debug!("Starting config file search from: {:?}", current_dir);

        for path in current_dir.ancestors() {
            let config_path = path.join(CONFIG_FILENAME);
            trace!("Checking for config at: {:?}", config_path);
            if config_path.exists() {
                return Ok(config_path);
            }
        }

        error!("Configuration file 'enchante.toml' not found in any parent directory.");
        Err(EnchanteError::config(
            "enchante.toml not found in current or any parent directory.",
        ))
    }
}
