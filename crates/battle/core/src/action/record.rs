//! Battle action records.
//!
//! A [`BattleAction`] is one atomic act: a named action, a move, or ending the
//! turn, together with its effect. The act and its effect are stored as one
//! tagged payload so a record can never hold a mismatched pair.

use std::collections::BTreeMap;

use crate::error::{BattleError, ErrorSeverity};
use crate::state::{ActionTemplateId, BattleSquaddieId, HexCoordinate};

/// Roll and modifier data produced for the acting squaddie.
///
/// Opaque here. Combat resolution reads it downstream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorContext {
    pub rolls: Vec<u32>,
    pub modifiers: BTreeMap<String, i32>,
}

/// Who performed the act.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleActionActor {
    pub squaddie_id: BattleSquaddieId,
    pub context: Option<ActorContext>,
}

impl BattleActionActor {
    pub fn new(squaddie_id: BattleSquaddieId) -> Self {
        Self {
            squaddie_id,
            context: None,
        }
    }
}

/// How well an action landed on one target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DegreeOfSuccess {
    CriticalSuccess,
    Success,
    Failure,
    CriticalFailure,
    #[default]
    None,
}

/// Outcome of a named action on one squaddie.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SquaddieChange {
    pub target: BattleSquaddieId,
    pub damage: u32,
    pub healing: u32,
    pub degree_of_success: DegreeOfSuccess,
    pub statuses_applied: Vec<String>,
}

impl SquaddieChange {
    pub fn new(target: BattleSquaddieId) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    #[must_use]
    pub fn with_healing(mut self, healing: u32) -> Self {
        self.healing = healing;
        self
    }

    #[must_use]
    pub fn with_degree_of_success(mut self, degree: DegreeOfSuccess) -> Self {
        self.degree_of_success = degree;
        self
    }
}

/// The act a squaddie chose, before its effect is attached.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleActionKind {
    NamedAction { template_id: ActionTemplateId },
    Movement,
    EndTurn,
}

impl BattleActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NamedAction { .. } => "named_action",
            Self::Movement => "movement",
            Self::EndTurn => "end_turn",
        }
    }
}

/// What the act did to the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleActionEffect {
    Movement {
        start: HexCoordinate,
        end: HexCoordinate,
    },
    SquaddieChanges(Vec<SquaddieChange>),
    EndTurn,
}

impl BattleActionEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movement { .. } => "movement",
            Self::SquaddieChanges(_) => "squaddie_changes",
            Self::EndTurn => "end_turn",
        }
    }
}

/// Validated pairing of an act with its effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleActionPayload {
    NamedAction {
        template_id: ActionTemplateId,
        changes: Vec<SquaddieChange>,
    },
    Movement {
        start: HexCoordinate,
        end: HexCoordinate,
    },
    EndTurn,
}

impl BattleActionPayload {
    fn pair(kind: BattleActionKind, effect: BattleActionEffect) -> Result<Self, RecordError> {
        match (kind, effect) {
            (
                BattleActionKind::NamedAction { template_id },
                BattleActionEffect::SquaddieChanges(changes),
            ) => Ok(Self::NamedAction {
                template_id,
                changes,
            }),
            (BattleActionKind::Movement, BattleActionEffect::Movement { start, end }) => {
                Ok(Self::Movement { start, end })
            }
            (BattleActionKind::EndTurn, BattleActionEffect::EndTurn) => Ok(Self::EndTurn),
            (kind, effect) => Err(RecordError::MismatchedEffect {
                action: kind.as_str(),
                effect: effect.as_str(),
            }),
        }
    }
}

/// One atomic act recorded in the battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleAction {
    actor: BattleActionActor,
    payload: BattleActionPayload,
    animation_completed: bool,
}

impl BattleAction {
    pub fn builder(squaddie_id: BattleSquaddieId) -> BattleActionBuilder {
        BattleActionBuilder::new(squaddie_id)
    }

    pub fn named_action(
        actor: BattleActionActor,
        template_id: ActionTemplateId,
        changes: Vec<SquaddieChange>,
    ) -> Self {
        Self::from_payload(
            actor,
            BattleActionPayload::NamedAction {
                template_id,
                changes,
            },
        )
    }

    pub fn movement(actor: BattleActionActor, start: HexCoordinate, end: HexCoordinate) -> Self {
        Self::from_payload(actor, BattleActionPayload::Movement { start, end })
    }

    pub fn end_turn(actor: BattleActionActor) -> Self {
        Self::from_payload(actor, BattleActionPayload::EndTurn)
    }

    fn from_payload(actor: BattleActionActor, payload: BattleActionPayload) -> Self {
        Self {
            actor,
            payload,
            animation_completed: false,
        }
    }

    pub fn actor(&self) -> &BattleActionActor {
        &self.actor
    }

    pub fn squaddie_id(&self) -> BattleSquaddieId {
        self.actor.squaddie_id
    }

    pub fn payload(&self) -> &BattleActionPayload {
        &self.payload
    }

    pub fn kind(&self) -> BattleActionKind {
        match &self.payload {
            BattleActionPayload::NamedAction { template_id, .. } => BattleActionKind::NamedAction {
                template_id: template_id.clone(),
            },
            BattleActionPayload::Movement { .. } => BattleActionKind::Movement,
            BattleActionPayload::EndTurn => BattleActionKind::EndTurn,
        }
    }

    pub fn is_end_turn(&self) -> bool {
        matches!(self.payload, BattleActionPayload::EndTurn)
    }

    pub fn animation_completed(&self) -> bool {
        self.animation_completed
    }

    pub fn set_animation_completed(&mut self, completed: bool) {
        self.animation_completed = completed;
    }
}

/// Flips the animation flag when a record is present. Absent records are ignored.
pub fn set_animation_completed(record: Option<&mut BattleAction>, completed: bool) {
    if let Some(record) = record {
        record.set_animation_completed(completed);
    }
}

/// Builder that validates the act/effect pairing at construction.
#[derive(Clone, Debug)]
pub struct BattleActionBuilder {
    actor: BattleActionActor,
    action: Option<BattleActionKind>,
    effect: Option<BattleActionEffect>,
}

impl BattleActionBuilder {
    pub fn new(squaddie_id: BattleSquaddieId) -> Self {
        Self {
            actor: BattleActionActor::new(squaddie_id),
            action: None,
            effect: None,
        }
    }

    /// Set actor roll/modifier context
    pub fn context(mut self, context: ActorContext) -> Self {
        self.actor.context = Some(context);
        self
    }

    /// Set the act
    pub fn action(mut self, action: BattleActionKind) -> Self {
        self.action = Some(action);
        self
    }

    /// Set the effect
    pub fn effect(mut self, effect: BattleActionEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Build the record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] naming what is missing, or the mismatched pair.
    pub fn build(self) -> Result<BattleAction, RecordError> {
        let payload = match (self.action, self.effect) {
            (None, None) => return Err(RecordError::MissingActionAndEffect),
            (None, Some(_)) => return Err(RecordError::MissingAction),
            (Some(_), None) => return Err(RecordError::MissingEffect),
            (Some(action), Some(effect)) => BattleActionPayload::pair(action, effect)?,
        };
        Ok(BattleAction::from_payload(self.actor, payload))
    }
}

/// Construction errors for [`BattleAction`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("battle action needs an action and an effect, neither was given")]
    MissingActionAndEffect,

    #[error("battle action needs an action")]
    MissingAction,

    #[error("battle action needs an effect")]
    MissingEffect,

    #[error("{action} action cannot carry {effect} effect")]
    MismatchedEffect {
        action: &'static str,
        effect: &'static str,
    },
}

impl BattleError for RecordError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingActionAndEffect => "RECORD_MISSING_ACTION_AND_EFFECT",
            Self::MissingAction => "RECORD_MISSING_ACTION",
            Self::MissingEffect => "RECORD_MISSING_EFFECT",
            Self::MismatchedEffect { .. } => "RECORD_MISMATCHED_EFFECT",
        }
    }
}
