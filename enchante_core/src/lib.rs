// Enchante - scaffolding and synchronization for a generated data-access layer

// Common modules
pub mod config;
pub mod error;
pub mod naming;

// SchemaSync - model/schema synchronization
pub mod schemasync;

// Re-export commonly used items for convenience
pub use error::{EnchanteError, Result};
pub use schemasync::{Schemasync, SyncOptions, SyncReport};
