/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Action points every squaddie receives at the start of a round.
    pub action_points_per_round: u32,

    /// Movement a squaddie covers per action point unless its template overrides it.
    pub default_movement_per_action: u32,
}

impl BattleConfig {
    // ===== compile-time limits =====
    /// Upper bound accepted for a round budget. Larger values are clamped.
    pub const MAX_ACTION_POINTS_PER_ROUND: u32 = 9;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTION_POINTS_PER_ROUND: u32 = 3;
    pub const DEFAULT_MOVEMENT_PER_ACTION: u32 = 2;

    pub fn new() -> Self {
        Self {
            action_points_per_round: Self::DEFAULT_ACTION_POINTS_PER_ROUND,
            default_movement_per_action: Self::DEFAULT_MOVEMENT_PER_ACTION,
        }
    }

    pub fn with_action_points_per_round(action_points_per_round: u32) -> Self {
        Self {
            action_points_per_round,
            ..Self::new()
        }
    }

    /// Round budget after applying [`Self::MAX_ACTION_POINTS_PER_ROUND`].
    pub fn round_budget(&self) -> u32 {
        self.action_points_per_round
            .min(Self::MAX_ACTION_POINTS_PER_ROUND)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_three_points() {
        let config = BattleConfig::default();
        assert_eq!(config.round_budget(), 3);
        assert_eq!(config.default_movement_per_action, 2);
    }

    #[test]
    fn round_budget_is_clamped() {
        let config = BattleConfig::with_action_points_per_round(40);
        assert_eq!(config.round_budget(), BattleConfig::MAX_ACTION_POINTS_PER_ROUND);
    }
}
