//! Tournament mode for running many games in parallel and collecting statistics
//!
//! Games are independent: each one builds its own `GameState` from the shared
//! deck lists with a seed derived from the tournament seed and its index, so
//! a tournament is reproducible regardless of how rayon schedules it.

use crate::core::{CardDefinition, PlayerId};
use crate::game::{
    GameEndReason, GameResult, HeuristicController, PlayerController, Simulator, VerbosityLevel,
    ZeroController,
};
use crate::loader::{DeckFile, GameInitializer, PlayerDeck};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Controller type for tournament games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ControllerType {
    /// Never acts (baseline opponent)
    Zero,
    /// Heuristic AI
    Heuristic,
}

impl ControllerType {
    pub fn create(self, player: PlayerId) -> Box<dyn PlayerController> {
        match self {
            ControllerType::Zero => Box::new(ZeroController::new(player)),
            ControllerType::Heuristic => Box::new(HeuristicController::new(player)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub games: usize,
    pub seed: u64,
    pub max_turns: u32,
    pub format: String,
    pub p1: ControllerType,
    pub p2: ControllerType,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            games: 100,
            seed: 42,
            max_turns: crate::game::step::DEFAULT_MAX_TURNS,
            format: "standard".to_string(),
            p1: ControllerType::Heuristic,
            p2: ControllerType::Heuristic,
        }
    }
}

/// Statistics collected during a tournament
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentStats {
    pub games: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    pub total_turns: u64,
    /// Keyed by end reason, in snake_case
    pub end_reasons: BTreeMap<String, usize>,
}

impl TournamentStats {
    fn record(&mut self, result: &GameResult) {
        self.games += 1;
        self.total_turns += u64::from(result.turns_played);
        match result.winner {
            Some(PlayerId::Player1) => self.p1_wins += 1,
            Some(PlayerId::Player2) => self.p2_wins += 1,
            None => self.draws += 1,
        }
        *self
            .end_reasons
            .entry(reason_key(result.end_reason))
            .or_insert(0) += 1;
    }

    pub fn average_turns(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games as f64
        }
    }
}

fn reason_key(reason: GameEndReason) -> String {
    serde_json::to_value(reason)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{reason:?}"))
}

/// Seed for game `index` of a tournament seeded with `base`
pub fn game_seed(base: u64, index: usize) -> u64 {
    base.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play one tournament game silently
pub fn play_game(
    deck1: (&DeckFile, &[CardDefinition]),
    deck2: (&DeckFile, &[CardDefinition]),
    config: &TournamentConfig,
    index: usize,
) -> GameResult {
    let game = GameInitializer::new(&config.format)
        .with_seed(game_seed(config.seed, index))
        .init_game(
            PlayerDeck::from_file(&deck1.0.name, deck1.0, deck1.1),
            PlayerDeck::from_file(&deck2.0.name, deck2.0, deck2.1),
        );

    Simulator::new(
        game,
        config.p1.create(PlayerId::Player1),
        config.p2.create(PlayerId::Player2),
    )
    .with_max_turns(config.max_turns)
    .with_verbosity(VerbosityLevel::Silent)
    .run()
}

/// Run tournament mode - play every game on the rayon pool and tally results
pub fn run_tournament(deck1: &DeckFile, deck2: &DeckFile, config: &TournamentConfig) -> TournamentStats {
    let cards1 = deck1.expand();
    let cards2 = deck2.expand();
    let stats = Arc::new(Mutex::new(TournamentStats::default()));
    let start = Instant::now();

    (0..config.games).into_par_iter().for_each(|index| {
        let result = play_game((deck1, &cards1), (deck2, &cards2), config, index);
        let mut stats = stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        stats.record(&result);
    });

    let stats = stats.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone();
    let elapsed = start.elapsed().as_secs_f64();
    if elapsed > 0.0 {
        eprintln!(
            "{} games in {elapsed:.2}s ({:.1} games/s)",
            stats.games,
            stats.games as f64 / elapsed
        );
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DeckLoader;

    const DECK: &str = r#"{
        "name": "Goblins",
        "cards": [
            { "count": 20, "name": "Mountain", "type_line": "Basic Land - Mountain" },
            { "count": 20, "name": "Raider", "type_line": "Creature - Goblin",
              "mana_cost": "{R}", "power": "2", "toughness": "1" }
        ]
    }"#;

    #[test]
    fn test_game_seeds_differ() {
        assert_ne!(game_seed(42, 0), game_seed(42, 1));
        assert_eq!(game_seed(42, 3), game_seed(42, 3));
    }

    #[test]
    fn test_tournament_counts_every_game() {
        let deck = DeckLoader::parse(DECK).unwrap();
        let config = TournamentConfig {
            games: 8,
            max_turns: 10,
            ..TournamentConfig::default()
        };

        let stats = run_tournament(&deck, &deck, &config);

        assert_eq!(stats.games, 8);
        assert_eq!(stats.p1_wins + stats.p2_wins + stats.draws, 8);
        assert_eq!(stats.end_reasons.values().sum::<usize>(), 8);
        assert!(stats.average_turns() <= 10.0);
    }

    #[test]
    fn test_same_index_same_result() {
        let deck = DeckLoader::parse(DECK).unwrap();
        let cards = deck.expand();
        let config = TournamentConfig::default();

        let a = play_game((&deck, &cards), (&deck, &cards), &config, 5);
        let b = play_game((&deck, &cards), (&deck, &cards), &config, 5);
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.log, b.log);
    }
}
