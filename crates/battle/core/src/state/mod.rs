//! Battle state: identities, per-squaddie ledgers and the recorder.
//!
//! [`BattleState`] is the single owner of everything the engine mutates. Ledgers
//! live on their squaddie; there is no global ledger registry.
mod ledger;
mod squaddie;
mod types;

use std::collections::BTreeMap;

pub use ledger::{ActionPointLedger, LedgerError};
pub use squaddie::{BattleSquaddie, MovementProfile, SquaddieTeam, TeamAffiliation, TeamError};
pub use types::{ActionTemplateId, BattleSquaddieId, HexCoordinate};

use crate::recorder::BattleActionRecorder;

/// Complete mutable state of one battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleState {
    /// Current round, starting at 1 once the battle begins.
    pub round: u32,
    pub squaddies: BTreeMap<BattleSquaddieId, BattleSquaddie>,
    pub teams: Vec<SquaddieTeam>,
    pub recorder: BattleActionRecorder,
}

impl BattleState {
    pub fn new() -> Self {
        Self {
            round: 1,
            ..Self::default()
        }
    }

    /// Adds a squaddie, replacing any previous squaddie with the same id.
    pub fn insert_squaddie(&mut self, squaddie: BattleSquaddie) {
        self.squaddies.insert(squaddie.id, squaddie);
    }

    /// Adds a team after sanitizing it.
    ///
    /// # Errors
    ///
    /// Returns [`TeamError`] if the team is missing identity fields.
    pub fn insert_team(&mut self, team: SquaddieTeam) -> Result<(), TeamError> {
        let team = team.sanitize()?;
        self.teams.push(team);
        Ok(())
    }

    pub fn squaddie(&self, id: BattleSquaddieId) -> Option<&BattleSquaddie> {
        self.squaddies.get(&id)
    }

    pub fn squaddie_mut(&mut self, id: BattleSquaddieId) -> Option<&mut BattleSquaddie> {
        self.squaddies.get_mut(&id)
    }

    pub fn team_of(&self, id: BattleSquaddieId) -> Option<&SquaddieTeam> {
        self.teams.iter().find(|team| team.contains(id))
    }
}
