use std::collections::VecDeque;

use crate::action::BattleAction;

/// First-in first-out list of battle actions waiting to be animated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleActionQueue {
    actions: VecDeque<BattleAction>,
}

impl BattleActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, action: BattleAction) {
        self.actions.push_back(action);
    }

    /// Returns the front without removing it.
    pub fn peek(&self) -> Option<&BattleAction> {
        self.actions.front()
    }

    pub fn peek_mut(&mut self) -> Option<&mut BattleAction> {
        self.actions.front_mut()
    }

    pub fn dequeue(&mut self) -> Option<BattleAction> {
        self.actions.pop_front()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleAction> {
        self.actions.iter()
    }
}
