//! Run-to-completion simulation
//!
//! `Simulator` drives a [`StepSimulator`] until the game ends and packages
//! the outcome as a [`GameResult`].

use crate::core::PlayerId;
use crate::game::controller::PlayerController;
use crate::game::step::{StepSimulator, DEFAULT_MAX_TURNS};
use crate::game::{GameEndReason, GameEvent, GameState, VerbosityLevel};
use serde::{Deserialize, Serialize};

/// Knobs for a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// The game ends after this many turns; higher life wins
    pub max_turns: u32,
    /// Reseeds the game generator before play when set
    pub seed: Option<u64>,
    pub verbosity: VerbosityLevel,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            max_turns: DEFAULT_MAX_TURNS,
            seed: None,
            verbosity: VerbosityLevel::Normal,
        }
    }
}

/// Result of running a game to completion
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    /// `None` only for a simultaneous loss
    pub winner: Option<PlayerId>,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
    pub player1_life: i32,
    pub player2_life: i32,
    /// Full chronological log
    pub log: Vec<String>,
    #[serde(skip)]
    pub final_state: GameState,
}

impl GameResult {
    fn from_game(game: GameState) -> Self {
        GameResult {
            winner: game.winner,
            turns_played: game.turn.turn_number,
            end_reason: game.end_reason.unwrap_or(GameEndReason::Draw),
            player1_life: game.player(PlayerId::Player1).life,
            player2_life: game.player(PlayerId::Player2).life,
            log: game.logger.messages(),
            final_state: game,
        }
    }
}

/// Game loop manager
pub struct Simulator {
    stepper: StepSimulator,
}

impl Simulator {
    pub fn new(
        game: GameState,
        player1: Box<dyn PlayerController>,
        player2: Box<dyn PlayerController>,
    ) -> Self {
        Simulator {
            stepper: StepSimulator::new(game, player1, player2),
        }
    }

    /// Set the turn cap (default 30)
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.stepper = self.stepper.with_max_turns(max_turns);
        self
    }

    /// Set verbosity level for echoed output
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.stepper.game.logger.set_verbosity(verbosity);
        self
    }

    /// Reseed the generator used for random target choices
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.stepper.game.seed_rng(seed);
        self
    }

    pub fn with_config(self, config: SimConfig) -> Self {
        let sim = self
            .with_max_turns(config.max_turns)
            .with_verbosity(config.verbosity);
        match config.seed {
            Some(seed) => sim.with_seed(seed),
            None => sim,
        }
    }

    /// Run the game to the end
    pub fn run(self) -> GameResult {
        self.run_with_events().0
    }

    /// Run the game to the end, also returning every event emitted
    pub fn run_with_events(mut self) -> (GameResult, Vec<GameEvent>) {
        let events = self.stepper.run_to_end();
        (GameResult::from_game(self.stepper.into_game()), events)
    }
}
