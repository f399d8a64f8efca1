use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnchanteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in file {file}: {message}")]
    ParseError { file: PathBuf, message: String },

    #[error("Entity mismatch for '{entity}': no declaration named '{declaration}' in {file}")]
    EntityMismatch {
        entity: String,
        declaration: String,
        file: PathBuf,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Schema sync error: {0}")]
    SchemaSync(String),

    #[error("Template error: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, EnchanteError>;

impl EnchanteError {
    pub fn parse_error(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        EnchanteError::ParseError {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn entity_mismatch(
        entity: impl Into<String>,
        declaration: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        EnchanteError::EntityMismatch {
            entity: entity.into(),
            declaration: declaration.into(),
            file: file.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        EnchanteError::Config(message.into())
    }

    pub fn schema_sync(message: impl Into<String>) -> Self {
        EnchanteError::SchemaSync(message.into())
    }

    pub fn template(message: impl Into<String>) -> Self {
        EnchanteError::Template(message.into())
    }
}
