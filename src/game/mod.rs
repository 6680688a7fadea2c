//! Core game state and turn structure

pub mod ability_parser;
pub mod actions;
pub mod combat;
pub mod controller;
pub mod events;
pub mod executor;
pub mod game_loop;
pub mod heuristic_controller;
pub mod interpreter;
pub mod logger;
pub mod phase;
pub mod state;
pub mod step;
pub mod triggers;
pub mod turn;
pub mod zero_controller;

pub use combat::CombatState;
pub use controller::{AiAction, Decision, GameStateView, PlayerController};
pub use events::{DamageRecipient, GameEvent};
pub use game_loop::{GameResult, SimConfig, Simulator};
pub use heuristic_controller::HeuristicController;
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use phase::{Phase, TurnStructure};
pub use state::{GameEndReason, GameState, StackObject};
pub use step::{StepResult, StepSimulator, StepStage};
pub use zero_controller::ZeroController;
