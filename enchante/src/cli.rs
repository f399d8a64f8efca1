//! Command-line interface definitions for Enchante.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Enchante - scaffold SQLAlchemy models with paired Pydantic schemas and
/// keep the two in sync
#[derive(Parser, Debug)]
#[command(name = "enchante")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to enchante.toml configuration file
    #[arg(short, long, global = true, env = "ENCHANTE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the project layout and enchante.toml
    Init(InitArgs),

    /// Scaffold a new entity (model + schema pair)
    Create(CreateArgs),

    /// Synchronize every entity's schema with its model
    Sync(SyncArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Root of the generated data-access layer (a Python package directory)
    pub root_dir: PathBuf,

    /// Name of the alembic migrations directory, relative to ROOT_DIR
    #[arg(long, default_value = "alembic")]
    pub migrations_dir: PathBuf,

    /// Overwrite existing enchante.toml if present
    #[arg(short, long)]
    pub force: bool,

    /// Do not invoke `alembic init`
    #[arg(long)]
    pub no_alembic: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Entity name (class name is derived from it, e.g. `user` -> `User`)
    pub name: String,

    /// Explicit table name (default: pluralized snake_case of NAME)
    #[arg(short, long)]
    pub table_name: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Override the tables directory from configuration
    #[arg(long)]
    pub tables_dir: Option<PathBuf>,
}
