//! Common error infrastructure for battle-core.
//!
//! This module provides shared types and traits used across all error types in battle-core.
//! Domain-specific errors (e.g., `LedgerError`, `RecordError`) are defined in their
//! respective modules alongside the operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error type with specific variants
//! - **Stable Codes**: Every variant maps to a SCREAMING_SNAKE error code
//! - **Severity Classification**: Errors are categorized for recovery strategies
//!
//! Affordability failures are NOT errors. They are reported as
//! [`Affordability`](crate::action::Affordability) values so UI can show them directly.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The caller may retry with a different choice, such as another
///   destination or another action
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Orchestration called an operation in the wrong state
/// - **Fatal**: Required collaborators are missing, the battle cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative choice.
    ///
    /// Examples: destination unreachable, not enough points for the chosen path
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: squaddie not found, record built without an effect
    Validation,

    /// Internal error - the orchestrator drove the pipeline out of order.
    ///
    /// Examples: overspending a ledger, refunding when nothing is pending
    Internal,

    /// Fatal error - battle cannot continue.
    ///
    /// Examples: missing required oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a caller defect.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for categorization and testing. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert_eq!(ErrorSeverity::Fatal.as_str(), "fatal");
    }
}
