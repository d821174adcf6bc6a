//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;
use tracing::warn;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`BattleConfig::default`].
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
    }

    /// Load the config shipped with this crate.
    pub fn load_default() -> LoadResult<BattleConfig> {
        Self::parse(include_str!("../../data/config.toml"))
    }

    /// Parse config data from a TOML string.
    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.action_points_per_round > BattleConfig::MAX_ACTION_POINTS_PER_ROUND {
            warn!(
                requested = config.action_points_per_round,
                max = BattleConfig::MAX_ACTION_POINTS_PER_ROUND,
                "round budget above maximum will be clamped"
            );
        }
        if config.default_movement_per_action == 0 {
            anyhow::bail!("default_movement_per_action must be at least 1");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let config = ConfigLoader::load_default().unwrap();
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("action_points_per_round = 4").unwrap();
        assert_eq!(config.action_points_per_round, 4);
        assert_eq!(
            config.default_movement_per_action,
            BattleConfig::DEFAULT_MOVEMENT_PER_ACTION
        );
    }

    #[test]
    fn oversized_budget_is_kept_but_clamped_on_use() {
        let config = ConfigLoader::parse("action_points_per_round = 20").unwrap();
        assert_eq!(config.round_budget(), BattleConfig::MAX_ACTION_POINTS_PER_ROUND);
    }

    #[test]
    fn immobile_default_is_rejected() {
        let err = ConfigLoader::parse("default_movement_per_action = 0").unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }
}
