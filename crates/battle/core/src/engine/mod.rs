//! Battle orchestration.
//!
//! The [`BattleEngine`] ties the ledger, cost resolver, movement committer and
//! recorder together for one [`BattleState`]:
//!
//! 1. check affordability (or plan and provisionally pay for a move)
//! 2. spend the points
//! 3. build the battle action and queue it for animation
//!
//! Animation itself belongs to the caller, which drains the recorder between
//! frames and calls [`BattleEngine::complete_turn`] when the acting squaddie is done.
//! Only one squaddie may record actions until its turn is sealed.

mod errors;

pub use errors::EngineError;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::action::movement;
use crate::action::{
    ActionCostResolver, ActorContext, Affordability, BattleAction, BattleActionActor,
    SquaddieChange,
};
use crate::env::BattleEnv;
use crate::recorder::BattleActionRecorder;
use crate::state::{
    ActionTemplateId, BattleSquaddie, BattleSquaddieId, BattleState, HexCoordinate,
};

/// Engine that applies squaddie decisions to a [`BattleState`].
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Recorder access for the animation driver.
    pub fn recorder_mut(&mut self) -> &mut BattleActionRecorder {
        &mut self.state.recorder
    }

    /// Marks the cost of a hovered action on the squaddie's ledger and reports
    /// whether it could be paid. Nothing is spent.
    pub fn preview_action(
        &mut self,
        env: BattleEnv<'_>,
        actor: BattleSquaddieId,
        template_id: &ActionTemplateId,
    ) -> Result<Affordability, EngineError> {
        let resolver = ActionCostResolver::new(env.templates()?);
        let squaddie = squaddie_mut(&mut self.state.squaddies, actor)?;

        squaddie.ledger.mark(resolver.cost_of(template_id));
        Ok(resolver.can_afford(&squaddie.ledger, template_id))
    }

    /// Clears any preview reservation on the squaddie's ledger.
    pub fn clear_preview(&mut self, actor: BattleSquaddieId) -> Result<(), EngineError> {
        squaddie_mut(&mut self.state.squaddies, actor)?
            .ledger
            .clear_marked();
        Ok(())
    }

    /// Uses a named action.
    ///
    /// When the squaddie can pay, the cost is spent and a record is queued for
    /// animation. When it cannot, the ledger and recorder are left untouched and
    /// the shortfall is returned as a value.
    pub fn submit_action(
        &mut self,
        env: BattleEnv<'_>,
        actor: BattleSquaddieId,
        template_id: &ActionTemplateId,
        context: Option<ActorContext>,
        changes: Vec<SquaddieChange>,
    ) -> Result<Affordability, EngineError> {
        let resolver = ActionCostResolver::new(env.templates()?);
        self.ensure_turn_owner(actor)?;
        let squaddie = squaddie_mut(&mut self.state.squaddies, actor)?;

        if !squaddie.knows_action(template_id) {
            return Err(EngineError::ActionNotAvailable {
                squaddie: actor,
                template: template_id.clone(),
            });
        }
        if squaddie.pending_movement.is_some() {
            return Err(EngineError::MovementPending(actor));
        }

        let affordability = resolver.can_afford(&squaddie.ledger, template_id);
        if !affordability.is_ok() {
            debug!(
                %actor,
                template = %template_id,
                reason = ?affordability.reason(),
                "action rejected"
            );
            return Ok(affordability);
        }

        let cost = resolver.cost_of(template_id);
        squaddie.ledger.spend(cost)?;
        squaddie.ledger.clear_marked();

        let record = BattleAction::named_action(
            BattleActionActor {
                squaddie_id: actor,
                context,
            },
            template_id.clone(),
            changes,
        );
        self.state.recorder.add_ready_to_animate_battle_action(record);

        debug!(%actor, template = %template_id, cost, "action submitted");
        Ok(affordability)
    }

    /// Returns true if the squaddie could reach `destination` this round.
    pub fn can_reach(
        &self,
        env: BattleEnv<'_>,
        actor: BattleSquaddieId,
        destination: HexCoordinate,
    ) -> Result<bool, EngineError> {
        let squaddie = self
            .state
            .squaddie(actor)
            .ok_or(EngineError::SquaddieNotFound(actor))?;
        let origin = squaddie.location.ok_or(EngineError::SquaddieOffMap(actor))?;

        let mut ledger = squaddie.ledger.clone();
        if ledger.refundable_action_points() > 0 {
            ledger.refund()?;
        }

        Ok(movement::is_reachable(
            &ledger,
            &squaddie.movement,
            origin,
            destination,
            env.pathfinder()?,
        ))
    }

    /// Chooses (or re-chooses) a destination and pays for it provisionally.
    ///
    /// Returns the points now held for the move. A previous unconfirmed choice
    /// is replaced. If the new destination cannot be reached the previous
    /// choice stays in place.
    pub fn preview_movement(
        &mut self,
        env: BattleEnv<'_>,
        actor: BattleSquaddieId,
        destination: HexCoordinate,
    ) -> Result<u32, EngineError> {
        let pathfinder = env.pathfinder()?;
        self.ensure_turn_owner(actor)?;
        let squaddie = squaddie_mut(&mut self.state.squaddies, actor)?;
        let origin = squaddie.location.ok_or(EngineError::SquaddieOffMap(actor))?;

        // Plan against the budget the squaddie would have without the pending move.
        let mut budget = squaddie.ledger.clone();
        if budget.refundable_action_points() > 0 {
            budget.refund()?;
        }
        let path =
            movement::plan_path(&budget, &squaddie.movement, origin, destination, pathfinder)?;

        let points = movement::recommit(&mut squaddie.ledger, &squaddie.movement, &path)?;
        squaddie.pending_movement = Some(path);

        debug!(%actor, %destination, points, "movement previewed");
        Ok(points)
    }

    /// Drops the unconfirmed destination and refunds its points.
    pub fn cancel_movement(&mut self, actor: BattleSquaddieId) -> Result<u32, EngineError> {
        let squaddie = squaddie_mut(&mut self.state.squaddies, actor)?;
        if squaddie.pending_movement.take().is_none() {
            return Err(EngineError::NoPendingMovement(actor));
        }

        let refunded = if squaddie.ledger.refundable_action_points() > 0 {
            movement::refund(&mut squaddie.ledger)?
        } else {
            0
        };
        debug!(%actor, refunded, "movement cancelled");
        Ok(refunded)
    }

    /// Confirms the unconfirmed destination, moves the squaddie and queues the
    /// movement record. Returns the points spent.
    ///
    /// Confirming the squaddie's own location spends nothing and records nothing.
    pub fn confirm_movement(&mut self, actor: BattleSquaddieId) -> Result<u32, EngineError> {
        self.ensure_turn_owner(actor)?;
        let squaddie = squaddie_mut(&mut self.state.squaddies, actor)?;
        let path = squaddie
            .pending_movement
            .take()
            .ok_or(EngineError::NoPendingMovement(actor))?;

        let points = movement::confirm(&mut squaddie.ledger);
        if path.is_stationary() {
            return Ok(points);
        }

        squaddie.location = Some(path.destination);
        let record = BattleAction::movement(
            BattleActionActor::new(actor),
            path.origin,
            path.destination,
        );
        self.state.recorder.add_ready_to_animate_battle_action(record);

        debug!(
            %actor,
            origin = %path.origin,
            destination = %path.destination,
            points,
            "movement confirmed"
        );
        Ok(points)
    }

    /// Ends the squaddie's turn: unconfirmed movement is discarded, the rest of
    /// the budget is forfeited and an end-turn record is queued.
    pub fn end_squaddie_turn(&mut self, actor: BattleSquaddieId) -> Result<(), EngineError> {
        self.ensure_turn_owner(actor)?;
        let squaddie = squaddie_mut(&mut self.state.squaddies, actor)?;
        if squaddie.pending_movement.take().is_some()
            && squaddie.ledger.refundable_action_points() > 0
        {
            squaddie.ledger.refund()?;
        }
        squaddie.ledger.clear_marked();
        squaddie.ledger.end_turn();

        let record = BattleAction::end_turn(BattleActionActor::new(actor));
        self.state.recorder.add_ready_to_animate_battle_action(record);

        debug!(%actor, "squaddie turn ended");
        Ok(())
    }

    /// Seals the animated records of the current turn into history.
    pub fn complete_turn(&mut self) -> bool {
        self.state.recorder.turn_complete()
    }

    /// Starts the next round: every ledger gets a fresh budget.
    pub fn begin_new_round(&mut self) {
        self.state.round += 1;
        for squaddie in self.state.squaddies.values_mut() {
            squaddie.pending_movement = None;
            squaddie.ledger.begin_new_round();
        }
        info!(round = self.state.round, "new round started");
    }

    /// A sealed turn holds one squaddie's records, so nobody else may record
    /// until the open turn is sealed.
    fn ensure_turn_owner(&self, actor: BattleSquaddieId) -> Result<(), EngineError> {
        match self.state.recorder.acting_squaddie() {
            Some(active) if active != actor => Err(EngineError::TurnInProgress {
                active,
                requested: actor,
            }),
            _ => Ok(()),
        }
    }
}

fn squaddie_mut(
    squaddies: &mut BTreeMap<BattleSquaddieId, BattleSquaddie>,
    id: BattleSquaddieId,
) -> Result<&mut BattleSquaddie, EngineError> {
    squaddies
        .get_mut(&id)
        .ok_or(EngineError::SquaddieNotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::BattleActionPayload;
    use crate::config::BattleConfig;
    use crate::env::{ActionTemplate, Env, OpenFieldPathfinder, SnapshotTemplateOracle};
    use crate::error::BattleError;
    use crate::recorder::BattleActionStage;
    use crate::snapshot::BattleSnapshot;

    const HERO: BattleSquaddieId = BattleSquaddieId(1);
    const FOE: BattleSquaddieId = BattleSquaddieId(2);

    fn templates() -> SnapshotTemplateOracle {
        SnapshotTemplateOracle::new([
            ActionTemplate::new("strike", "Strike", 1),
            ActionTemplate::new("power_strike", "Power Strike", 2),
        ])
    }

    fn battle() -> BattleState {
        let config = BattleConfig::default();
        let mut state = BattleState::new();
        state.insert_squaddie(
            BattleSquaddie::new(HERO, "Hero", &config)
                .at(HexCoordinate::ORIGIN)
                .with_actions(["strike".into(), "power_strike".into(), "legacy".into()]),
        );
        state.insert_squaddie(
            BattleSquaddie::new(FOE, "Foe", &config)
                .at(HexCoordinate::new(3, 0))
                .with_actions(["strike".into()]),
        );
        state
    }

    fn animate_and_seal(engine: &mut BattleEngine<'_>) -> bool {
        while engine
            .recorder_mut()
            .battle_action_finished_animating()
            .is_some()
        {}
        engine.complete_turn()
    }

    #[test]
    fn submit_spends_and_queues_record() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        let changes = vec![SquaddieChange::new(FOE).with_damage(4)];
        let result = engine
            .submit_action(env, HERO, &"power_strike".into(), None, changes)
            .unwrap();

        assert!(result.is_ok());
        assert_eq!(state.squaddies[&HERO].ledger.remaining_action_points(), 1);
        let queued = state.recorder.peek_at_animation_queue().unwrap();
        assert_eq!(queued.squaddie_id(), HERO);
    }

    #[test]
    fn unaffordable_action_changes_nothing() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .submit_action(env, HERO, &"power_strike".into(), None, Vec::new())
            .unwrap();
        let result = engine
            .submit_action(env, HERO, &"power_strike".into(), None, Vec::new())
            .unwrap();

        assert_eq!(result.message(), Some("Need 2 action points"));
        assert_eq!(state.squaddies[&HERO].ledger.remaining_action_points(), 1);
        assert_eq!(
            state.recorder.stage_count(BattleActionStage::ReadyToAnimate),
            1
        );
    }

    #[test]
    fn unknown_template_is_submitted_for_free() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        let result = engine
            .submit_action(env, HERO, &"legacy".into(), None, Vec::new())
            .unwrap();

        assert!(result.is_ok());
        assert_eq!(state.squaddies[&HERO].ledger.remaining_action_points(), 3);
    }

    #[test]
    fn unknown_squaddie_and_missing_oracle_are_errors() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        let err = engine
            .submit_action(env, BattleSquaddieId(9), &"strike".into(), None, Vec::new())
            .unwrap_err();
        assert_eq!(err.error_code(), "ENGINE_SQUADDIE_NOT_FOUND");

        let err = engine
            .submit_action(BattleEnv::empty(), HERO, &"strike".into(), None, Vec::new())
            .unwrap_err();
        assert_eq!(err.error_code(), "ORACLE_TEMPLATES_NOT_AVAILABLE");

        let err = engine
            .submit_action(env, FOE, &"power_strike".into(), None, Vec::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::ActionNotAvailable { .. }));
    }

    #[test]
    fn preview_marks_without_spending() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        let result = engine
            .preview_action(env, HERO, &"power_strike".into())
            .unwrap();

        assert!(result.is_ok());
        let ledger = &state.squaddies[&HERO].ledger;
        assert_eq!(ledger.marked_action_points(), 2);
        assert_eq!(ledger.remaining_action_points(), 3);
    }

    #[test]
    fn movement_can_be_redragged_then_confirmed() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        let far = engine
            .preview_movement(env, HERO, HexCoordinate::new(6, 0))
            .unwrap();
        let near = engine
            .preview_movement(env, HERO, HexCoordinate::new(3, 0))
            .unwrap();
        assert_eq!((far, near), (3, 2));
        assert_eq!(
            engine.state().squaddies[&HERO].ledger.remaining_action_points(),
            1
        );

        assert_eq!(engine.confirm_movement(HERO).unwrap(), 2);

        let hero = &state.squaddies[&HERO];
        assert_eq!(hero.location, Some(HexCoordinate::new(3, 0)));
        assert_eq!(hero.ledger.refundable_action_points(), 0);
        assert_eq!(
            state.recorder.peek_at_animation_queue().unwrap().payload(),
            &BattleActionPayload::Movement {
                start: HexCoordinate::ORIGIN,
                end: HexCoordinate::new(3, 0)
            }
        );
    }

    #[test]
    fn unreachable_redrag_keeps_previous_choice() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .preview_movement(env, HERO, HexCoordinate::new(2, 0))
            .unwrap();
        let err = engine
            .preview_movement(env, HERO, HexCoordinate::new(9, 0))
            .unwrap_err();

        assert_eq!(err.error_code(), "MOVEMENT_UNREACHABLE");
        let hero = &state.squaddies[&HERO];
        assert_eq!(hero.ledger.remaining_action_points(), 2);
        assert_eq!(
            hero.pending_movement.unwrap().destination,
            HexCoordinate::new(2, 0)
        );
    }

    #[test]
    fn cancel_refunds_pending_movement() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .preview_movement(env, HERO, HexCoordinate::new(4, 0))
            .unwrap();
        assert_eq!(engine.cancel_movement(HERO).unwrap(), 2);
        assert!(matches!(
            engine.cancel_movement(HERO),
            Err(EngineError::NoPendingMovement(_))
        ));
        assert_eq!(state.squaddies[&HERO].ledger.remaining_action_points(), 3);
        assert!(state.recorder.is_idle());
    }

    #[test]
    fn staying_put_spends_and_records_nothing() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        let points = engine
            .preview_movement(env, HERO, HexCoordinate::ORIGIN)
            .unwrap();
        assert_eq!(points, 0);
        assert_eq!(engine.confirm_movement(HERO).unwrap(), 0);
        assert!(state.recorder.is_idle());
        assert_eq!(state.squaddies[&HERO].ledger.remaining_action_points(), 3);
    }

    #[test]
    fn full_turn_is_sealed_into_history() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .preview_movement(env, HERO, HexCoordinate::new(2, 0))
            .unwrap();
        engine.confirm_movement(HERO).unwrap();
        let changes = vec![SquaddieChange::new(FOE).with_damage(1)];
        engine
            .submit_action(env, HERO, &"strike".into(), None, changes)
            .unwrap();
        engine.end_squaddie_turn(HERO).unwrap();

        assert!(animate_and_seal(&mut engine));

        let turn = state.recorder.most_recent_completed_turn().unwrap();
        assert_eq!(turn.len(), 3);
        assert_eq!(turn.actor(), Some(HERO));
        assert!(turn.actions()[2].is_end_turn());
        assert!(turn.actions().iter().all(BattleAction::animation_completed));
        assert!(!state.squaddies[&HERO].ledger.has_points_remaining());
    }

    #[test]
    fn other_squaddie_waits_for_open_turn_to_seal() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .submit_action(env, HERO, &"strike".into(), None, Vec::new())
            .unwrap();
        engine.end_squaddie_turn(HERO).unwrap();

        let err = engine
            .submit_action(env, FOE, &"strike".into(), None, Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::TurnInProgress {
                active: HERO,
                requested: FOE
            }
        );
        assert_eq!(err.error_code(), "ENGINE_TURN_IN_PROGRESS");
        assert!(matches!(
            engine.end_squaddie_turn(FOE),
            Err(EngineError::TurnInProgress { .. })
        ));
        assert!(matches!(
            engine.preview_movement(env, FOE, HexCoordinate::new(4, 0)),
            Err(EngineError::TurnInProgress { .. })
        ));
        assert_eq!(
            engine.state().squaddies[&FOE].ledger.remaining_action_points(),
            3
        );

        // Animated but unsealed records still hold the turn.
        engine.recorder_mut().battle_action_finished_animating();
        engine.recorder_mut().battle_action_finished_animating();
        assert!(engine
            .submit_action(env, FOE, &"strike".into(), None, Vec::new())
            .is_err());

        assert!(engine.complete_turn());
        let result = engine
            .submit_action(env, FOE, &"strike".into(), None, Vec::new())
            .unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn two_squaddie_battle_saves_and_restores() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        for actor in [HERO, FOE] {
            engine
                .submit_action(env, actor, &"strike".into(), None, Vec::new())
                .unwrap();
            engine.end_squaddie_turn(actor).unwrap();
            assert!(animate_and_seal(&mut engine));
        }

        let snapshot = BattleSnapshot::from_state(&state);
        assert!(snapshot.validate().is_ok());

        let mut restored = battle();
        snapshot.restore(&mut restored).unwrap();

        let actors: Vec<_> = restored
            .recorder
            .previous_turns()
            .iter()
            .map(|turn| turn.actor())
            .collect();
        assert_eq!(actors, vec![Some(HERO), Some(FOE)]);
        assert!(restored
            .recorder
            .previous_turns()
            .iter()
            .flat_map(|turn| turn.actions())
            .all(BattleAction::animation_completed));
        assert_eq!(restored.recorder, state.recorder);
    }

    #[test]
    fn end_turn_discards_unconfirmed_movement() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .preview_movement(env, HERO, HexCoordinate::new(2, 0))
            .unwrap();
        engine.end_squaddie_turn(HERO).unwrap();

        let hero = &state.squaddies[&HERO];
        assert_eq!(hero.location, Some(HexCoordinate::ORIGIN));
        assert!(hero.pending_movement.is_none());
        assert_eq!(hero.ledger.refundable_action_points(), 0);
    }

    #[test]
    fn new_round_restores_every_budget() {
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);
        for actor in [HERO, FOE] {
            engine.end_squaddie_turn(actor).unwrap();
            animate_and_seal(&mut engine);
        }

        engine.begin_new_round();

        assert_eq!(state.round, 2);
        assert!(
            state
                .squaddies
                .values()
                .all(|s| s.ledger.remaining_action_points() == 3)
        );
    }

    #[test]
    fn reachability_ignores_pending_move() {
        let templates = templates();
        let env = Env::with_all(&templates, &OpenFieldPathfinder).into_battle_env();
        let mut state = battle();
        let mut engine = BattleEngine::new(&mut state);

        engine
            .preview_movement(env, HERO, HexCoordinate::new(6, 0))
            .unwrap();
        assert!(engine.can_reach(env, HERO, HexCoordinate::new(5, 0)).unwrap());
        assert!(!engine.can_reach(env, HERO, HexCoordinate::new(7, 0)).unwrap());
    }
}
