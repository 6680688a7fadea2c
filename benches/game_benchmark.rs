//! Performance benchmarks for the game engine
//!
//! Two iteration modes:
//!
//! 1. **Fresh** - build a new game from the deck list each iteration
//! 2. **Snapshot** - clone a pre-built initial state each iteration
//!
//! Both play heuristic vs heuristic with the goblin_rush test deck.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mtg_sim::{
    core::{CardDefinition, PlayerId},
    game::{GameResult, GameState, HeuristicController, Simulator, VerbosityLevel},
    loader::{DeckFile, DeckLoader, GameInitializer, PlayerDeck},
    Result,
};
use std::path::Path;
use std::time::{Duration, Instant};

/// Setup data loaded once and reused across iterations
struct BenchmarkSetup {
    deck: DeckFile,
    cards: Vec<CardDefinition>,
}

impl BenchmarkSetup {
    fn load() -> Result<Self> {
        let deck = DeckLoader::load_from_file(Path::new("test_decks/goblin_rush.json"))?;
        let cards = deck.expand();
        Ok(BenchmarkSetup { deck, cards })
    }

    fn init_game(&self, seed: u64) -> GameState {
        GameInitializer::new("standard").with_seed(seed).init_game(
            PlayerDeck::from_file("Player 1", &self.deck, &self.cards),
            PlayerDeck::from_file("Player 2", &self.deck, &self.cards),
        )
    }
}

fn play(game: GameState) -> GameResult {
    Simulator::new(
        game,
        Box::new(HeuristicController::new(PlayerId::Player1)),
        Box::new(HeuristicController::new(PlayerId::Player2)),
    )
    .with_verbosity(VerbosityLevel::Silent)
    .run()
}

/// Benchmark: Fresh mode - allocate new game each iteration
fn bench_game_fresh(c: &mut Criterion) {
    let setup = match BenchmarkSetup::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load resources: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    {
        let start = Instant::now();
        let result = play(setup.init_game(seed));
        let elapsed = start.elapsed();
        println!("\nWarmup game (seed {}):", seed);
        println!("  Turns: {}", result.turns_played);
        println!("  Log entries: {}", result.log.len());
        println!("  Duration: {:?}", elapsed);
        println!("  Games/sec: {:.2}", 1.0 / elapsed.as_secs_f64());
    }

    group.bench_with_input(BenchmarkId::new("fresh", seed), &seed, |b, &seed| {
        b.iter(|| play(setup.init_game(black_box(seed))));
    });

    group.finish();
}

/// Benchmark: Snapshot mode - clone the initial state each iteration
fn bench_game_snapshot(c: &mut Criterion) {
    let setup = match BenchmarkSetup::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load resources: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    let initial_game = setup.init_game(seed);

    group.bench_function(BenchmarkId::new("snapshot", seed), |b| {
        b.iter(|| play(black_box(initial_game.clone())));
    });

    group.finish();
}

criterion_group!(benches, bench_game_fresh, bench_game_snapshot);
criterion_main!(benches);
