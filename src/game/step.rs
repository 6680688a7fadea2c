//! Step-at-a-time simulation
//!
//! Each call to [`StepSimulator::step`] performs exactly one increment of
//! work: a phase's entry actions, one controller decision, or a phase's exit
//! check. The events produced by that increment are returned so a UI can
//! animate them before asking for the next one.

use crate::core::PlayerId;
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::{actions, combat, triggers, turn, GameEndReason, GameEvent, GameState, Phase};
use serde::{Deserialize, Serialize};

/// Turn cap used when none is configured
pub const DEFAULT_MAX_TURNS: u32 = 30;

/// Upper bound on applied decisions within one phase
const MAX_ACTIONS_PER_PHASE: u32 = 32;

/// Where the simulator is within the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStage {
    Enter,
    Actions,
    Exit,
}

/// Output of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub events: Vec<GameEvent>,
    pub should_continue: bool,
}

/// Drives one game forward in small increments
pub struct StepSimulator {
    pub game: GameState,
    /// Indexed by `PlayerId::index`
    controllers: [Box<dyn PlayerController>; 2],
    stage: StepStage,
    actions_this_phase: u32,
    max_turns: u32,
    started: bool,
    game_over_emitted: bool,
}

impl StepSimulator {
    pub fn new(
        game: GameState,
        player1: Box<dyn PlayerController>,
        player2: Box<dyn PlayerController>,
    ) -> Self {
        StepSimulator {
            game,
            controllers: [player1, player2],
            stage: StepStage::Enter,
            actions_this_phase: 0,
            max_turns: DEFAULT_MAX_TURNS,
            started: false,
            game_over_emitted: false,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn stage(&self) -> StepStage {
        self.stage
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn into_game(self) -> GameState {
        self.game
    }

    /// The game has ended and its `GameOver` event has been handed out
    pub fn is_finished(&self) -> bool {
        self.game.game_over && self.game_over_emitted
    }

    /// Advance by one increment
    ///
    /// The first call deals opening hands before entering the first phase.
    /// Once the game is over every call returns `should_continue == false`.
    pub fn step(&mut self) -> StepResult {
        let mut events = Vec::new();

        if !self.started {
            self.started = true;
            self.game.start_game();
        }

        if !self.game.game_over {
            match self.stage {
                StepStage::Enter => self.enter(&mut events),
                StepStage::Actions => self.act(&mut events),
                StepStage::Exit => self.exit(&mut events),
            }
        }

        if self.game.game_over && !self.game_over_emitted {
            self.game_over_emitted = true;
            events.push(GameEvent::GameOver {
                winner: self.game.winner,
                reason: self.game.end_reason.unwrap_or(GameEndReason::Draw),
                turn: self.game.turn.turn_number,
            });
        }

        StepResult {
            events,
            should_continue: !self.game.game_over,
        }
    }

    /// Step until the game ends, collecting every event
    pub fn run_to_end(&mut self) -> Vec<GameEvent> {
        let mut all = Vec::new();
        loop {
            let result = self.step();
            all.extend(result.events);
            if !result.should_continue {
                return all;
            }
        }
    }

    fn enter(&mut self, events: &mut Vec<GameEvent>) {
        turn::enter_phase(&mut self.game, events);
        self.game.check_state_based_actions(events);
        self.actions_this_phase = 0;
        self.stage = StepStage::Actions;
    }

    fn act(&mut self, events: &mut Vec<GameEvent>) {
        let phase = self.game.phase();

        if phase == Phase::CombatDamage {
            combat::resolve_combat_damage(&mut self.game, events);
            self.game.check_state_based_actions(events);
            // dies triggers may have put permanents onto the battlefield
            triggers::check_etb_triggers(&mut self.game, events);
            self.game.check_state_based_actions(events);
            self.stage = StepStage::Exit;
            return;
        }

        if !phase.is_decision_phase() || self.actions_this_phase >= MAX_ACTIONS_PER_PHASE {
            self.stage = StepStage::Exit;
            return;
        }

        let active = self.game.active_player();
        let decider = if phase == Phase::DeclareBlockers {
            if self.game.combat.get_attackers().is_empty() {
                self.stage = StepStage::Exit;
                return;
            }
            active.opponent()
        } else {
            active
        };

        if !self.apply_one_decision(decider, events) {
            self.stage = StepStage::Exit;
            return;
        }

        // one declaration per combat phase
        if matches!(phase, Phase::DeclareAttackers | Phase::DeclareBlockers) {
            self.stage = StepStage::Exit;
        }
    }

    /// Ask `player` for a decision and apply it; false when nothing happened
    fn apply_one_decision(&mut self, player: PlayerId, events: &mut Vec<GameEvent>) -> bool {
        let controller = &mut self.controllers[player.index()];
        let view = GameStateView::new(&self.game, player);
        let Some(decision) = controller.decide(&view) else {
            return false;
        };
        if decision.is_pass() {
            return false;
        }
        let controller_name = controller.name().to_string();

        if !actions::apply_decision(&mut self.game, player, &decision.action, events) {
            return false;
        }
        self.game.logger.controller_choice(
            &controller_name,
            &format!("{} [priority {}]", decision.reason, decision.priority),
        );
        self.actions_this_phase += 1;

        triggers::check_etb_triggers(&mut self.game, events);
        self.game.check_state_based_actions(events);
        true
    }

    fn exit(&mut self, events: &mut Vec<GameEvent>) {
        self.game.check_state_based_actions(events);
        if self.game.game_over {
            return;
        }

        if self.game.phase() == Phase::Cleanup && self.game.turn.turn_number >= self.max_turns {
            // ties go to player1
            let winner = if self.game.player(PlayerId::Player1).life
                >= self.game.player(PlayerId::Player2).life
            {
                PlayerId::Player1
            } else {
                PlayerId::Player2
            };
            self.game.end_game(Some(winner), GameEndReason::TurnLimit);
            return;
        }

        turn::advance_phase(&mut self.game, events);
        self.stage = StepStage::Enter;
    }
}
