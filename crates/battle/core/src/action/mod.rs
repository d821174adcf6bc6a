//! Action domain: what an act costs and how it is recorded.
//!
//! # Module Structure
//!
//! - `cost`: affordability of named actions against a ledger
//! - `movement`: converts pathfinding costs into refundable action point spends
//! - `record`: immutable battle action records and their builder

pub mod cost;
pub mod movement;
pub mod record;

pub use cost::{
    ActionCostResolver, Affordability, UnaffordableReason, can_afford_cost, can_afford_template,
    insufficient_points_message,
};
pub use movement::MovementError;
pub use record::{
    ActorContext, BattleAction, BattleActionActor, BattleActionBuilder, BattleActionEffect,
    BattleActionKind, BattleActionPayload, DegreeOfSuccess, RecordError, SquaddieChange,
    set_animation_completed,
};
