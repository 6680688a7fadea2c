//! Deck loading and game setup
//!
//! JSON deck files in, a ready-to-play `GameState` out.

pub mod deck;
pub mod game_init;

pub use deck::{DeckFile, DeckLoader};
pub use game_init::{GameInitializer, PlayerDeck, COMMANDER_LIFE, STANDARD_LIFE};
