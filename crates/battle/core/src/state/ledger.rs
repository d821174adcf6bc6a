//! Per-squaddie action point ledger.
//!
//! The ledger holds two orthogonal counters:
//! - `remaining_action_points`: the spendable budget for the current round
//! - `marked_action_points`: a UI preview of what a hovered action would cost
//!
//! Marked points never feed back into the remaining budget. A spend may be tagged
//! refundable (a provisional move) and stays reversible until it is confirmed.

use tracing::{debug, trace};

use crate::error::{BattleError, ErrorSeverity};

/// Action point counters for one squaddie.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionPointLedger {
    round_budget: u32,
    remaining_action_points: u32,
    marked_action_points: u32,
    /// Portion of the points already deducted from `remaining_action_points`
    /// that belongs to an unconfirmed move.
    refundable_action_points: u32,
}

impl ActionPointLedger {
    /// Creates a ledger holding a full round budget.
    pub fn new(round_budget: u32) -> Self {
        Self {
            round_budget,
            remaining_action_points: round_budget,
            marked_action_points: 0,
            refundable_action_points: 0,
        }
    }

    pub fn round_budget(&self) -> u32 {
        self.round_budget
    }

    pub fn remaining_action_points(&self) -> u32 {
        self.remaining_action_points
    }

    pub fn marked_action_points(&self) -> u32 {
        self.marked_action_points
    }

    pub fn refundable_action_points(&self) -> u32 {
        self.refundable_action_points
    }

    pub fn has_points_remaining(&self) -> bool {
        self.remaining_action_points > 0
    }

    /// Points a new movement may use.
    ///
    /// Provisional spends are deducted when they are made, so this is the
    /// round's unspent budget minus the pending move.
    pub fn points_available_for_movement(&self) -> u32 {
        self.remaining_action_points
    }

    /// Permanently spends `points`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overspent`] and leaves the ledger untouched when
    /// `points` exceeds the remaining budget. Callers are expected to check
    /// affordability first.
    pub fn spend(&mut self, points: u32) -> Result<(), LedgerError> {
        self.deduct(points)?;
        debug!(
            points,
            remaining = self.remaining_action_points,
            "spent action points"
        );
        Ok(())
    }

    /// Spends `points` but keeps them refundable until [`Self::confirm_refundable`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::spend`].
    pub fn spend_refundable(&mut self, points: u32) -> Result<(), LedgerError> {
        self.deduct(points)?;
        self.refundable_action_points += points;
        debug!(
            points,
            remaining = self.remaining_action_points,
            refundable = self.refundable_action_points,
            "spent refundable action points"
        );
        Ok(())
    }

    /// Returns every refundable point to the remaining budget.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NothingToRefund`] if no refundable spend is pending.
    pub fn refund(&mut self) -> Result<u32, LedgerError> {
        if self.refundable_action_points == 0 {
            return Err(LedgerError::NothingToRefund);
        }

        let refunded = core::mem::take(&mut self.refundable_action_points);
        self.remaining_action_points += refunded;
        debug!(
            refunded,
            remaining = self.remaining_action_points,
            "refunded action points"
        );
        Ok(refunded)
    }

    /// Makes pending refundable points permanent. Returns how many were finalized.
    pub fn confirm_refundable(&mut self) -> u32 {
        let confirmed = core::mem::take(&mut self.refundable_action_points);
        trace!(confirmed, "confirmed refundable action points");
        confirmed
    }

    /// Sets the preview reservation. Has no effect on the remaining budget.
    pub fn mark(&mut self, points: u32) {
        self.marked_action_points = points;
    }

    /// Clears the preview reservation.
    pub fn clear_marked(&mut self) {
        self.marked_action_points = 0;
    }

    /// Restores the full round budget and clears all reservations.
    pub fn begin_new_round(&mut self) {
        self.remaining_action_points = self.round_budget;
        self.marked_action_points = 0;
        self.refundable_action_points = 0;
    }

    /// Forfeits whatever is left of this round's budget.
    pub fn end_turn(&mut self) {
        self.remaining_action_points = 0;
        self.refundable_action_points = 0;
    }

    fn deduct(&mut self, points: u32) -> Result<(), LedgerError> {
        self.remaining_action_points = self
            .remaining_action_points
            .checked_sub(points)
            .ok_or(LedgerError::Overspent {
                requested: points,
                remaining: self.remaining_action_points,
            })?;
        Ok(())
    }
}

/// Errors raised by ledger mutations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedgerError {
    /// Caller spent more than the ledger holds.
    #[error("cannot spend {requested} action points, only {remaining} remaining")]
    Overspent { requested: u32, remaining: u32 },

    /// Refund requested with no provisional spend pending.
    #[error("no refundable action points are pending")]
    NothingToRefund,
}

impl BattleError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Overspent { .. } => "LEDGER_OVERSPENT",
            Self::NothingToRefund => "LEDGER_NOTHING_TO_REFUND",
        }
    }
}
