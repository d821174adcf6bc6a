//! Battle action recorder.
//!
//! Every record moves strictly forward through three stages:
//!
//! ```text
//! ReadyToAnimate
//!     ── finished animating ──▶ AnimatedThisTurn
//!     ── turn complete ──▶ CommittedToHistory
//! ```
//!
//! A record lives in exactly one stage at a time. Sealed turns are append-only
//! and become the battle's event log for save and replay.

mod queue;

pub use queue::BattleActionQueue;

use tracing::{debug, trace};

use crate::action::BattleAction;
use crate::state::BattleSquaddieId;

/// Stage a record occupies inside the recorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleActionStage {
    ReadyToAnimate,
    AnimatedThisTurn,
    CommittedToHistory,
}

/// One sealed turn: the records that made it up, in order.
///
/// Sealed entries are read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnHistory {
    actions: Vec<BattleAction>,
}

impl TurnHistory {
    /// Wraps records replayed from storage. The recorder seals its own turns.
    pub fn new(actions: Vec<BattleAction>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[BattleAction] {
        &self.actions
    }

    /// Squaddie that acted during this turn.
    pub fn actor(&self) -> Option<BattleSquaddieId> {
        self.actions.first().map(BattleAction::squaddie_id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Tracks records from acceptance through animation into turn history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleActionRecorder {
    ready_to_animate: BattleActionQueue,
    already_animated_this_turn: Vec<BattleAction>,
    previous_turns: Vec<TurnHistory>,
}

impl BattleActionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a recorder from saved turn history with nothing in flight.
    pub fn from_history(previous_turns: Vec<TurnHistory>) -> Self {
        Self {
            previous_turns,
            ..Self::default()
        }
    }

    pub fn add_ready_to_animate_battle_action(&mut self, action: BattleAction) {
        trace!(
            actor = %action.squaddie_id(),
            kind = action.kind().as_str(),
            "queued battle action"
        );
        self.ready_to_animate.enqueue(action);
    }

    pub fn peek_at_animation_queue(&self) -> Option<&BattleAction> {
        self.ready_to_animate.peek()
    }

    /// Front of the animation queue, for flipping its animation flag in place.
    pub fn peek_at_animation_queue_mut(&mut self) -> Option<&mut BattleAction> {
        self.ready_to_animate.peek_mut()
    }

    /// Marks the front of the animation queue as animated and moves it into
    /// this turn's animated list.
    ///
    /// Does nothing when the queue is empty. Returns the moved record.
    pub fn battle_action_finished_animating(&mut self) -> Option<&BattleAction> {
        let mut action = self.ready_to_animate.dequeue()?;
        action.set_animation_completed(true);
        debug!(
            actor = %action.squaddie_id(),
            kind = action.kind().as_str(),
            pending = self.ready_to_animate.len(),
            "battle action finished animating"
        );
        self.already_animated_this_turn.push(action);
        self.already_animated_this_turn.last()
    }

    pub fn most_recent_animated_action_this_turn(&self) -> Option<&BattleAction> {
        self.already_animated_this_turn.last()
    }

    pub fn actions_already_animated_this_turn(&self) -> &[BattleAction] {
        &self.already_animated_this_turn
    }

    /// Seals this turn's animated records into history.
    ///
    /// Returns false and records nothing when no record was animated.
    pub fn turn_complete(&mut self) -> bool {
        if self.already_animated_this_turn.is_empty() {
            trace!("turn complete with no animated actions, nothing sealed");
            return false;
        }

        let actions = std::mem::take(&mut self.already_animated_this_turn);
        debug!(
            actions = actions.len(),
            turn = self.previous_turns.len() + 1,
            "sealed turn into history"
        );
        self.previous_turns.push(TurnHistory { actions });
        true
    }

    pub fn most_recent_completed_turn(&self) -> Option<&TurnHistory> {
        self.previous_turns.last()
    }

    pub fn previous_turns(&self) -> &[TurnHistory] {
        &self.previous_turns
    }

    /// Number of records in each stage, in pipeline order.
    pub fn stage_count(&self, stage: BattleActionStage) -> usize {
        match stage {
            BattleActionStage::ReadyToAnimate => self.ready_to_animate.len(),
            BattleActionStage::AnimatedThisTurn => self.already_animated_this_turn.len(),
            BattleActionStage::CommittedToHistory => {
                self.previous_turns.iter().map(TurnHistory::len).sum()
            }
        }
    }

    /// Squaddie whose turn is open: the owner of the oldest record not yet sealed.
    pub fn acting_squaddie(&self) -> Option<BattleSquaddieId> {
        self.already_animated_this_turn
            .first()
            .or_else(|| self.ready_to_animate.peek())
            .map(BattleAction::squaddie_id)
    }

    /// True when nothing is waiting to animate or waiting to be sealed.
    pub fn is_idle(&self) -> bool {
        self.ready_to_animate.is_empty() && self.already_animated_this_turn.is_empty()
    }
}
