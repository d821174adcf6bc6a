//! Oracle access errors.

use crate::error::{BattleError, ErrorSeverity};

/// Errors that occur when a required oracle is missing from [`BattleEnv`](super::BattleEnv).
///
/// The engine cannot proceed without its collaborators, so these are fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// ActionTemplateOracle is not available in the environment.
    #[error("ActionTemplateOracle not available")]
    TemplatesNotAvailable,

    /// PathfinderOracle is not available in the environment.
    #[error("PathfinderOracle not available")]
    PathfinderNotAvailable,
}

impl BattleError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TemplatesNotAvailable => "ORACLE_TEMPLATES_NOT_AVAILABLE",
            Self::PathfinderNotAvailable => "ORACLE_PATHFINDER_NOT_AVAILABLE",
        }
    }
}
