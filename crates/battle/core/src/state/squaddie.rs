//! Per-battle squaddie state and team rosters.

use crate::config::BattleConfig;
use crate::env::{MovementModifiers, MovementPath};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{ActionPointLedger, ActionTemplateId, BattleSquaddieId, HexCoordinate};

/// How far a squaddie moves per action point and which obstacles it ignores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementProfile {
    pub movement_per_action: u32,
    pub modifiers: MovementModifiers,
}

impl MovementProfile {
    pub const fn new(movement_per_action: u32) -> Self {
        Self {
            movement_per_action,
            modifiers: MovementModifiers::empty(),
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: MovementModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl Default for MovementProfile {
    fn default() -> Self {
        Self::new(BattleConfig::DEFAULT_MOVEMENT_PER_ACTION)
    }
}

/// A squaddie's mutable state for the duration of a battle.
///
/// The action point ledger is owned here; callers reach it through the squaddie
/// they are acting on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSquaddie {
    pub id: BattleSquaddieId,
    pub name: String,
    pub ledger: ActionPointLedger,
    pub movement: MovementProfile,
    /// `None` while the squaddie is off the map.
    pub location: Option<HexCoordinate>,
    /// Action templates this squaddie may use.
    pub actions: Vec<ActionTemplateId>,
    /// Destination chosen but not yet confirmed; its cost is refundable in the ledger.
    pub pending_movement: Option<MovementPath>,
}

impl BattleSquaddie {
    pub fn new(id: BattleSquaddieId, name: impl Into<String>, config: &BattleConfig) -> Self {
        Self {
            id,
            name: name.into(),
            ledger: ActionPointLedger::new(config.round_budget()),
            movement: MovementProfile::new(config.default_movement_per_action),
            location: None,
            actions: Vec::new(),
            pending_movement: None,
        }
    }

    #[must_use]
    pub fn at(mut self, location: HexCoordinate) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_movement(mut self, movement: MovementProfile) -> Self {
        self.movement = movement;
        self
    }

    #[must_use]
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = ActionTemplateId>) -> Self {
        self.actions = actions.into_iter().collect();
        self
    }

    pub fn knows_action(&self, template_id: &ActionTemplateId) -> bool {
        self.actions.contains(template_id)
    }
}

/// Which side of the battle a team fights for.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TeamAffiliation {
    #[default]
    Player,
    Ally,
    Enemy,
    None,
}

/// A named group of squaddies that take their turns together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquaddieTeam {
    pub id: String,
    pub name: String,
    pub affiliation: TeamAffiliation,
    pub members: Vec<BattleSquaddieId>,
}

impl SquaddieTeam {
    /// Validates identity fields and drops duplicate members, keeping first occurrence order.
    ///
    /// # Errors
    ///
    /// Returns [`TeamError`] if the id or name is blank.
    pub fn sanitize(mut self) -> Result<Self, TeamError> {
        if self.id.trim().is_empty() {
            return Err(TeamError::MissingId);
        }
        if self.name.trim().is_empty() {
            return Err(TeamError::MissingName { id: self.id });
        }

        let mut seen = std::collections::BTreeSet::new();
        self.members.retain(|member| seen.insert(*member));
        Ok(self)
    }

    pub fn contains(&self, squaddie: BattleSquaddieId) -> bool {
        self.members.contains(&squaddie)
    }
}

/// Construction errors for [`SquaddieTeam`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TeamError {
    #[error("team is missing an id")]
    MissingId,

    #[error("team '{id}' is missing a name")]
    MissingName { id: String },
}

impl BattleError for TeamError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingId => "TEAM_MISSING_ID",
            Self::MissingName { .. } => "TEAM_MISSING_NAME",
        }
    }
}
