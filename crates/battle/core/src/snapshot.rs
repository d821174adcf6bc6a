//! Save snapshot of a battle.
//!
//! A [`BattleSnapshot`] carries what a save needs: the round, the sealed turn
//! history and every squaddie's ledger. Records still waiting to animate are
//! not part of a save; a battle is saved between turns.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{BattleError, ErrorSeverity};
use crate::recorder::{BattleActionRecorder, TurnHistory};
use crate::state::{ActionPointLedger, BattleSquaddieId, BattleState};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub round: u32,
    pub previous_turns: Vec<TurnHistory>,
    pub ledgers: BTreeMap<BattleSquaddieId, ActionPointLedger>,
}

impl BattleSnapshot {
    pub fn from_state(state: &BattleState) -> Self {
        Self {
            round: state.round,
            previous_turns: state.recorder.previous_turns().to_vec(),
            ledgers: state
                .squaddies
                .values()
                .map(|squaddie| (squaddie.id, squaddie.ledger.clone()))
                .collect(),
        }
    }

    /// Checks that every sealed turn holds at least one record, all from the same squaddie.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistent turn found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (index, turn) in self.previous_turns.iter().enumerate() {
            let Some(actor) = turn.actor() else {
                return Err(SnapshotError::EmptyTurn { index });
            };
            if turn.actions().iter().any(|action| action.squaddie_id() != actor) {
                return Err(SnapshotError::MixedActors { index });
            }
        }
        Ok(())
    }

    /// Restores round, history and ledgers onto `state`.
    ///
    /// Anything in flight in the recorder is dropped, as is unconfirmed movement.
    ///
    /// # Errors
    ///
    /// Fails without touching `state` if the snapshot is inconsistent or names a
    /// squaddie that `state` does not have.
    pub fn restore(&self, state: &mut BattleState) -> Result<(), SnapshotError> {
        self.validate()?;
        if let Some(id) = self
            .ledgers
            .keys()
            .find(|id| !state.squaddies.contains_key(id))
        {
            return Err(SnapshotError::UnknownSquaddie(*id));
        }

        state.round = self.round;
        state.recorder = BattleActionRecorder::from_history(self.previous_turns.clone());
        for (id, ledger) in &self.ledgers {
            if let Some(squaddie) = state.squaddies.get_mut(id) {
                squaddie.ledger = ledger.clone();
                squaddie.pending_movement = None;
            }
        }

        debug!(
            round = self.round,
            turns = self.previous_turns.len(),
            "restored battle snapshot"
        );
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl BattleSnapshot {
    /// Encodes the snapshot with bincode.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Encode`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decodes and validates a snapshot produced by [`Self::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Decode`] for malformed bytes, or a validation
    /// error for an inconsistent history.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// SHA-256 of the encoded snapshot, for replay integrity checks.
    ///
    /// # Errors
    ///
    /// Same as [`Self::to_bytes`].
    pub fn digest(&self) -> Result<[u8; 32], SnapshotError> {
        use sha2::{Digest, Sha256};

        let bytes = self.to_bytes()?;
        Ok(Sha256::digest(&bytes).into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("sealed turn {index} has no records")]
    EmptyTurn { index: usize },

    #[error("sealed turn {index} mixes records of different squaddies")]
    MixedActors { index: usize },

    #[error("snapshot references unknown squaddie {0}")]
    UnknownSquaddie(BattleSquaddieId),

    #[error("failed to encode snapshot: {0}")]
    Encode(String),

    #[error("failed to decode snapshot: {0}")]
    Decode(String),
}

impl BattleError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::EmptyTurn { .. } | Self::MixedActors { .. } | Self::UnknownSquaddie(_) => {
                ErrorSeverity::Validation
            }
            Self::Encode(_) | Self::Decode(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyTurn { .. } => "SNAPSHOT_EMPTY_TURN",
            Self::MixedActors { .. } => "SNAPSHOT_MIXED_ACTORS",
            Self::UnknownSquaddie(_) => "SNAPSHOT_UNKNOWN_SQUADDIE",
            Self::Encode(_) => "SNAPSHOT_ENCODE",
            Self::Decode(_) => "SNAPSHOT_DECODE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{BattleAction, BattleActionActor};
    use crate::config::BattleConfig;
    use crate::state::{BattleSquaddie, HexCoordinate};

    const HERO: BattleSquaddieId = BattleSquaddieId(1);

    fn played_state() -> BattleState {
        let mut state = BattleState::new();
        state.insert_squaddie(BattleSquaddie::new(HERO, "Hero", &BattleConfig::default()));
        state.squaddies.get_mut(&HERO).unwrap().ledger.spend(2).unwrap();

        let actor = BattleActionActor::new(HERO);
        state.recorder.add_ready_to_animate_battle_action(BattleAction::movement(
            actor.clone(),
            HexCoordinate::ORIGIN,
            HexCoordinate::new(1, 0),
        ));
        state
            .recorder
            .add_ready_to_animate_battle_action(BattleAction::end_turn(actor));
        state.recorder.battle_action_finished_animating();
        state.recorder.battle_action_finished_animating();
        state.recorder.turn_complete();
        state
    }

    #[test]
    fn snapshot_captures_history_and_ledgers() {
        let snapshot = BattleSnapshot::from_state(&played_state());

        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.previous_turns.len(), 1);
        assert_eq!(snapshot.ledgers[&HERO].remaining_action_points(), 1);
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn empty_turn_fails_validation() {
        let mut snapshot = BattleSnapshot::from_state(&played_state());
        snapshot.previous_turns.push(TurnHistory::new(Vec::new()));

        let err = snapshot.validate().unwrap_err();
        assert_eq!(err, SnapshotError::EmptyTurn { index: 1 });
        assert_eq!(err.error_code(), "SNAPSHOT_EMPTY_TURN");
    }

    #[test]
    fn mixed_actor_turn_fails_validation() {
        let mut snapshot = BattleSnapshot::from_state(&played_state());
        snapshot.previous_turns.push(TurnHistory::new(vec![
            BattleAction::end_turn(BattleActionActor::new(HERO)),
            BattleAction::end_turn(BattleActionActor::new(BattleSquaddieId(2))),
        ]));

        assert_eq!(
            snapshot.validate(),
            Err(SnapshotError::MixedActors { index: 1 })
        );
    }

    #[test]
    fn restore_replaces_history_and_ledgers() {
        let snapshot = BattleSnapshot::from_state(&played_state());

        let mut state = BattleState::new();
        state.insert_squaddie(BattleSquaddie::new(HERO, "Hero", &BattleConfig::default()));
        snapshot.restore(&mut state).unwrap();

        assert_eq!(state.recorder.previous_turns(), snapshot.previous_turns.as_slice());
        assert_eq!(state.squaddies[&HERO].ledger.remaining_action_points(), 1);
        assert!(state.recorder.is_idle());
    }

    #[test]
    fn restore_rejects_unknown_squaddie() {
        let snapshot = BattleSnapshot::from_state(&played_state());
        let mut state = BattleState::new();

        assert_eq!(
            snapshot.restore(&mut state),
            Err(SnapshotError::UnknownSquaddie(HERO))
        );
        assert!(state.recorder.previous_turns().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn bytes_decode_to_same_snapshot() {
        let snapshot = BattleSnapshot::from_state(&played_state());
        let bytes = snapshot.to_bytes().unwrap();

        assert_eq!(BattleSnapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_is_stable_and_tracks_history() {
        let snapshot = BattleSnapshot::from_state(&played_state());
        let first = hex::encode(snapshot.digest().unwrap());
        let second = hex::encode(snapshot.digest().unwrap());
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        let mut longer = snapshot.clone();
        longer.previous_turns.push(snapshot.previous_turns[0].clone());
        assert_ne!(hex::encode(longer.digest().unwrap()), first);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = BattleSnapshot::from_bytes(&[0xff; 3]).unwrap_err();
        assert_eq!(err.error_code(), "SNAPSHOT_DECODE");
    }
}
