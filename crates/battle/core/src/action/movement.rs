//! Movement-cost committer.
//!
//! Turns a pathfinding result into action points. While the player is still
//! choosing a destination the spend is refundable; confirming makes it final.

use tracing::debug;

use crate::env::{MovementPath, PathfinderOracle, SearchLimit};
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{ActionPointLedger, HexCoordinate, LedgerError, MovementProfile};

/// Smallest number of action points whose movement covers `movement_cost`.
///
/// # Errors
///
/// Returns [`MovementError::NoMovement`] when a non-zero cost is asked of a
/// squaddie that cannot move at all.
pub fn action_points_for_movement(
    movement_cost: u32,
    movement_per_action: u32,
) -> Result<u32, MovementError> {
    if movement_cost == 0 {
        return Ok(0);
    }
    if movement_per_action == 0 {
        return Err(MovementError::NoMovement);
    }
    Ok(movement_cost.div_ceil(movement_per_action))
}

/// Search limit covering every point the ledger can still put into movement.
pub fn search_limit(ledger: &ActionPointLedger, profile: &MovementProfile) -> SearchLimit {
    SearchLimit::new(
        ledger
            .points_available_for_movement()
            .saturating_mul(profile.movement_per_action),
        profile.modifiers,
    )
}

/// Returns true if `destination` can be reached with the ledger's movement budget.
pub fn is_reachable(
    ledger: &ActionPointLedger,
    profile: &MovementProfile,
    origin: HexCoordinate,
    destination: HexCoordinate,
    pathfinder: &dyn PathfinderOracle,
) -> bool {
    plan_path(ledger, profile, origin, destination, pathfinder).is_ok()
}

/// Searches for a path to `destination` within the ledger's movement budget.
///
/// # Errors
///
/// Returns [`MovementError::Unreachable`] if the pathfinder does not reach it.
pub fn plan_path(
    ledger: &ActionPointLedger,
    profile: &MovementProfile,
    origin: HexCoordinate,
    destination: HexCoordinate,
    pathfinder: &dyn PathfinderOracle,
) -> Result<MovementPath, MovementError> {
    if origin == destination {
        return Ok(MovementPath::new(origin, destination, 0));
    }

    let limit = search_limit(ledger, profile);
    pathfinder
        .search(origin, &limit)
        .path_to(destination)
        .filter(|path| path.total_cost <= limit.max_movement_cost)
        .ok_or(MovementError::Unreachable { destination })
}

/// Spends the points `path` needs, tagged refundable. Returns the points spent.
///
/// A stationary path costs nothing and leaves the ledger untouched.
///
/// # Errors
///
/// Returns [`MovementError::InsufficientActionPoints`] if the ledger cannot
/// cover the path, or [`MovementError::NoMovement`] for an immobile squaddie.
pub fn commit_provisional_spend(
    ledger: &mut ActionPointLedger,
    profile: &MovementProfile,
    path: &MovementPath,
) -> Result<u32, MovementError> {
    if path.is_stationary() {
        return Ok(0);
    }

    let points = action_points_for_movement(path.total_cost, profile.movement_per_action)?;
    ledger
        .spend_refundable(points)
        .map_err(|err| match err {
            LedgerError::Overspent {
                requested,
                remaining,
            } => MovementError::InsufficientActionPoints {
                required: requested,
                available: remaining,
            },
            LedgerError::NothingToRefund => MovementError::NoProvisionalSpend,
        })?;

    debug!(
        origin = %path.origin,
        destination = %path.destination,
        movement_cost = path.total_cost,
        points,
        "committed provisional movement"
    );
    Ok(points)
}

/// Returns a pending provisional spend to the ledger.
///
/// # Errors
///
/// Returns [`MovementError::NoProvisionalSpend`] if nothing is pending.
pub fn refund(ledger: &mut ActionPointLedger) -> Result<u32, MovementError> {
    ledger
        .refund()
        .map_err(|_| MovementError::NoProvisionalSpend)
}

/// Replaces the pending provisional spend with the cost of `new_path`.
///
/// The ledger is left untouched if the new path is unaffordable.
///
/// # Errors
///
/// Same as [`commit_provisional_spend`].
pub fn recommit(
    ledger: &mut ActionPointLedger,
    profile: &MovementProfile,
    new_path: &MovementPath,
) -> Result<u32, MovementError> {
    let required = action_points_for_movement(new_path.total_cost, profile.movement_per_action)?;
    let available = ledger.remaining_action_points() + ledger.refundable_action_points();
    if required > available {
        return Err(MovementError::InsufficientActionPoints {
            required,
            available,
        });
    }

    if ledger.refundable_action_points() > 0 {
        refund(ledger)?;
    }
    commit_provisional_spend(ledger, profile, new_path)
}

/// Finalizes the pending spend. Returns the points that became permanent.
pub fn confirm(ledger: &mut ActionPointLedger) -> u32 {
    ledger.confirm_refundable()
}

/// Errors raised while planning or paying for movement.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementError {
    #[error("destination {destination} is out of reach")]
    Unreachable { destination: HexCoordinate },

    #[error("movement needs {required} action points, {available} available")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("squaddie cannot move")]
    NoMovement,

    #[error("no provisional movement spend is pending")]
    NoProvisionalSpend,
}

impl BattleError for MovementError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unreachable { .. } | Self::InsufficientActionPoints { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::NoMovement => ErrorSeverity::Validation,
            Self::NoProvisionalSpend => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "MOVEMENT_UNREACHABLE",
            Self::InsufficientActionPoints { .. } => "MOVEMENT_INSUFFICIENT_ACTION_POINTS",
            Self::NoMovement => "MOVEMENT_NO_MOVEMENT",
            Self::NoProvisionalSpend => "MOVEMENT_NO_PROVISIONAL_SPEND",
        }
    }
}
