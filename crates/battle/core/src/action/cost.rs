//! Action-cost resolver.
//!
//! Decides whether a ledger can pay for a named action. An unaffordable action
//! is an expected outcome, reported as an [`Affordability`] value and never as
//! an error.

use tracing::warn;

use crate::env::{ActionTemplate, ActionTemplateOracle};
use crate::state::{ActionPointLedger, ActionTemplateId};

/// Why an action cannot be paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaffordableReason {
    InsufficientActionPoints,
}

/// Result of an affordability check.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affordability {
    Affordable,
    Unaffordable {
        reason: UnaffordableReason,
        /// Player-facing text, e.g. "Need 2 action points".
        message: String,
    },
}

impl Affordability {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Affordable)
    }

    pub fn reason(&self) -> Option<UnaffordableReason> {
        match self {
            Self::Affordable => None,
            Self::Unaffordable { reason, .. } => Some(*reason),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Affordable => None,
            Self::Unaffordable { message, .. } => Some(message),
        }
    }
}

/// Formats the shortfall message shown to the player.
pub fn insufficient_points_message(cost: u32) -> String {
    if cost == 1 {
        "Need 1 action point".to_string()
    } else {
        format!("Need {cost} action points")
    }
}

/// Checks `cost` against the ledger's remaining points. Marked points are ignored.
pub fn can_afford_cost(ledger: &ActionPointLedger, cost: u32) -> Affordability {
    if ledger.remaining_action_points() >= cost {
        Affordability::Affordable
    } else {
        Affordability::Unaffordable {
            reason: UnaffordableReason::InsufficientActionPoints,
            message: insufficient_points_message(cost),
        }
    }
}

pub fn can_afford_template(ledger: &ActionPointLedger, template: &ActionTemplate) -> Affordability {
    can_afford_cost(ledger, template.action_point_cost)
}

/// Resolves action costs against a template repository.
pub struct ActionCostResolver<'a> {
    templates: &'a dyn ActionTemplateOracle,
}

impl<'a> ActionCostResolver<'a> {
    pub fn new(templates: &'a dyn ActionTemplateOracle) -> Self {
        Self { templates }
    }

    /// Point cost used when spending for `template_id`.
    ///
    /// Unknown templates cost nothing, matching [`Self::can_afford`].
    pub fn cost_of(&self, template_id: &ActionTemplateId) -> u32 {
        self.templates
            .action_point_cost(template_id)
            .unwrap_or_default()
    }

    /// Checks whether `ledger` can pay for the template with id `template_id`.
    ///
    /// A template missing from the repository is treated as affordable. Content
    /// may still be loading when the UI asks, and a stale reference must not
    /// block the player.
    pub fn can_afford(
        &self,
        ledger: &ActionPointLedger,
        template_id: &ActionTemplateId,
    ) -> Affordability {
        match self.templates.action_template(template_id) {
            Some(template) => can_afford_template(ledger, &template),
            None => {
                warn!(template = %template_id, "unknown action template treated as affordable");
                Affordability::Affordable
            }
        }
    }
}
