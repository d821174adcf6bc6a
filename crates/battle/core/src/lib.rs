//! Action-point economy and battle-action lifecycle for hex-grid tactical battles.
//!
//! `battle-core` decides whether a squaddie can afford an action, keeps each
//! squaddie's per-round point ledger, converts movement into refundable spends,
//! and records what happened in a form that can be animated, sealed into turn
//! history and saved. All state mutation flows through [`engine::BattleEngine`];
//! content and pathfinding are reached through the oracle traits in [`env`].
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod recorder;
pub mod snapshot;
pub mod state;
pub use action::{
    ActionCostResolver, ActorContext, Affordability, BattleAction, BattleActionActor,
    BattleActionBuilder, BattleActionEffect, BattleActionKind, BattleActionPayload,
    DegreeOfSuccess, MovementError, RecordError, SquaddieChange, UnaffordableReason,
    can_afford_cost, can_afford_template, insufficient_points_message, set_animation_completed,
};
pub use config::BattleConfig;
pub use engine::{BattleEngine, EngineError};
pub use env::{
    ActionTemplate, ActionTemplateOracle, BattleEnv, Env, MovementModifiers, MovementPath,
    OpenFieldPathfinder, OracleError, PathfinderOracle, SearchLimit, SearchResult,
    SnapshotTemplateOracle,
};
pub use error::{BattleError, ErrorSeverity};
pub use recorder::{BattleActionQueue, BattleActionRecorder, BattleActionStage, TurnHistory};
pub use snapshot::{BattleSnapshot, SnapshotError};
pub use state::{
    ActionPointLedger, ActionTemplateId, BattleSquaddie, BattleSquaddieId, BattleState,
    HexCoordinate, LedgerError, MovementProfile, SquaddieTeam, TeamAffiliation, TeamError,
};
