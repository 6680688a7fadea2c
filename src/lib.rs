//! MTG Sim - deterministic two-deck game simulator
//!
//! Plays two decklists against each other with heuristic AI players,
//! resolving phases, combat and a bounded subset of card abilities. Games
//! can run to completion or be stepped one increment at a time, producing
//! events suitable for animation.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod tournament;
pub mod zones;

pub use error::{Result, SimError};
