//! Error types for the battle engine.

use crate::action::{MovementError, RecordError};
use crate::env::OracleError;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{ActionTemplateId, BattleSquaddieId, LedgerError};

/// Errors surfaced while driving a battle through [`BattleEngine`](super::BattleEngine).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("squaddie {0} is not part of this battle")]
    SquaddieNotFound(BattleSquaddieId),

    #[error("squaddie {0} is not on the map")]
    SquaddieOffMap(BattleSquaddieId),

    #[error("squaddie {squaddie} cannot use action '{template}'")]
    ActionNotAvailable {
        squaddie: BattleSquaddieId,
        template: ActionTemplateId,
    },

    #[error("squaddie {0} has an unconfirmed movement")]
    MovementPending(BattleSquaddieId),

    #[error("squaddie {0} has no movement to confirm or cancel")]
    NoPendingMovement(BattleSquaddieId),

    #[error("squaddie {requested} cannot act while the turn of {active} is unsealed")]
    TurnInProgress {
        active: BattleSquaddieId,
        requested: BattleSquaddieId,
    },

    #[error("oracle unavailable: {0}")]
    Oracle(#[from] OracleError),

    #[error("ledger rejected the spend: {0}")]
    Ledger(#[from] LedgerError),

    #[error("movement failed: {0}")]
    Movement(#[from] MovementError),

    #[error("invalid battle action: {0}")]
    Record(#[from] RecordError),
}

impl BattleError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SquaddieNotFound(_) | Self::ActionNotAvailable { .. } => {
                ErrorSeverity::Validation
            }
            Self::SquaddieOffMap(_) | Self::MovementPending(_) => ErrorSeverity::Recoverable,
            Self::NoPendingMovement(_) | Self::TurnInProgress { .. } => ErrorSeverity::Internal,
            Self::Oracle(err) => err.severity(),
            Self::Ledger(err) => err.severity(),
            Self::Movement(err) => err.severity(),
            Self::Record(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SquaddieNotFound(_) => "ENGINE_SQUADDIE_NOT_FOUND",
            Self::SquaddieOffMap(_) => "ENGINE_SQUADDIE_OFF_MAP",
            Self::ActionNotAvailable { .. } => "ENGINE_ACTION_NOT_AVAILABLE",
            Self::MovementPending(_) => "ENGINE_MOVEMENT_PENDING",
            Self::NoPendingMovement(_) => "ENGINE_NO_PENDING_MOVEMENT",
            Self::TurnInProgress { .. } => "ENGINE_TURN_IN_PROGRESS",
            Self::Oracle(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
            Self::Movement(err) => err.error_code(),
            Self::Record(err) => err.error_code(),
        }
    }
}
