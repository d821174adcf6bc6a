//! Data-driven battle content.
//!
//! This crate loads static battle data from RON/TOML files:
//! - Action templates (data-driven via RON)
//! - Battle configuration (data-driven via TOML)
//!
//! Content is consumed through the `battle-core` oracle traits and never appears
//! in battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ActionTemplateRegistry, ConfigLoader, LoadResult};
