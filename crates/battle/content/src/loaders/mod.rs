//! Content loaders for reading battle data from files.
//!
//! Loaders convert RON/TOML files into `battle-core` types and oracle implementations.

pub mod config;
pub mod templates;

pub use config::ConfigLoader;
pub use templates::ActionTemplateRegistry;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
