pub mod create;
pub mod init;
pub mod sync;

use crate::cli::Cli;
use enchante_core::config::EnchanteConfig;
use enchante_core::error::Result;

/// Load configuration, honoring an explicit `--config` path when given.
pub fn load_config(cli: &Cli) -> Result<EnchanteConfig> {
    match &cli.config {
        Some(path) => EnchanteConfig::from_path(path),
        None => EnchanteConfig::new(),
    }
}
