//! mtg-sim - Main Binary
//!
//! Plays two JSON decklists against each other with the heuristic AI.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mtg_sim::{
    core::{CardDefinition, PlayerId},
    game::{GameState, OutputMode, Simulator, StepSimulator, VerbosityLevel},
    loader::{DeckFile, DeckLoader, GameInitializer, PlayerDeck},
    tournament::{run_tournament, ControllerType, TournamentConfig},
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mtg-sim")]
#[command(about = "Deterministic two-deck card game simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand that builds a game
#[derive(Args, Debug, Clone)]
struct GameArgs {
    /// Deck file (.json) for player 1
    #[arg(value_name = "PLAYER1_DECK")]
    deck1: PathBuf,

    /// Deck file (.json) for player 2
    #[arg(value_name = "PLAYER2_DECK")]
    deck2: PathBuf,

    /// Game format; "commander" gives 40 life and a command zone
    #[arg(long, default_value = "standard")]
    format: String,

    /// Set random seed for deterministic games (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Turn cap; the player with more life wins when it is reached
    #[arg(long, default_value_t = 30)]
    max_turns: u32,

    /// Player 1 controller type
    #[arg(long, value_enum, default_value = "heuristic")]
    p1: ControllerType,

    /// Player 2 controller type
    #[arg(long, value_enum, default_value = "heuristic")]
    p2: ControllerType,

    /// Player 1 name (defaults to the deck name)
    #[arg(long)]
    p1_name: Option<String>,

    /// Player 2 name (defaults to the deck name)
    #[arg(long)]
    p2_name: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game to completion and print the log
    Run {
        #[command(flatten)]
        game: GameArgs,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v', default_value = "normal")]
        verbosity: VerbosityLevel,

        /// Print the result as JSON instead of the log
        #[arg(long)]
        json: bool,
    },

    /// Play one game step by step, printing each event as a JSON line
    Step {
        #[command(flatten)]
        game: GameArgs,

        /// Delay between steps in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
    },

    /// Run many games in parallel and report win statistics
    Tourney {
        #[command(flatten)]
        game: GameArgs,

        /// Number of games to play
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            game,
            verbosity,
            json,
        } => run_game(game, verbosity, json).await,
        Commands::Step { game, interval_ms } => run_steps(game, interval_ms).await,
        Commands::Tourney { game, games } => run_tourney(game, games).await,
    }
}

async fn load_decks(args: &GameArgs) -> anyhow::Result<(DeckFile, DeckFile)> {
    DeckLoader::load_pair(args.deck1.clone(), args.deck2.clone())
        .await
        .with_context(|| {
            format!(
                "loading decks {} and {}",
                args.deck1.display(),
                args.deck2.display()
            )
        })
}

fn resolve_seed(args: &GameArgs) -> u64 {
    let seed = args.seed.unwrap_or_else(rand::random);
    eprintln!("Using seed: {seed}");
    seed
}

fn build_game(args: &GameArgs, deck1: &DeckFile, deck2: &DeckFile, seed: u64) -> GameState {
    let cards1: Vec<CardDefinition> = deck1.expand();
    let cards2: Vec<CardDefinition> = deck2.expand();
    let name1 = args.p1_name.as_deref().unwrap_or(&deck1.name);
    let name2 = args.p2_name.as_deref().unwrap_or(&deck2.name);

    GameInitializer::new(&args.format)
        .with_seed(seed)
        .init_game(
            PlayerDeck::from_file(name1, deck1, &cards1),
            PlayerDeck::from_file(name2, deck2, &cards2),
        )
}

async fn run_game(args: GameArgs, verbosity: VerbosityLevel, json: bool) -> anyhow::Result<()> {
    let (deck1, deck2) = load_decks(&args).await?;
    let seed = resolve_seed(&args);
    let mut game = build_game(&args, &deck1, &deck2, seed);
    if !json {
        game.logger.set_output_mode(OutputMode::Both);
    }

    let result = Simulator::new(
        game,
        args.p1.create(PlayerId::Player1),
        args.p2.create(PlayerId::Player2),
    )
    .with_max_turns(args.max_turns)
    .with_verbosity(verbosity)
    .run();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "\nFinal life: {} / {} after {} turn(s) ({})",
            result.player1_life, result.player2_life, result.turns_played, result.end_reason
        );
    }
    Ok(())
}

async fn run_steps(args: GameArgs, interval_ms: u64) -> anyhow::Result<()> {
    let (deck1, deck2) = load_decks(&args).await?;
    let seed = resolve_seed(&args);
    let game = build_game(&args, &deck1, &deck2, seed);

    let mut sim = StepSimulator::new(
        game,
        args.p1.create(PlayerId::Player1),
        args.p2.create(PlayerId::Player2),
    )
    .with_max_turns(args.max_turns);

    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    loop {
        if interval_ms > 0 {
            ticker.tick().await;
        }
        let result = sim.step();
        for event in &result.events {
            println!("{}", serde_json::to_string(event)?);
        }
        if !result.should_continue {
            break;
        }
    }
    Ok(())
}

async fn run_tourney(args: GameArgs, games: usize) -> anyhow::Result<()> {
    let (deck1, deck2) = load_decks(&args).await?;
    let config = TournamentConfig {
        games,
        seed: resolve_seed(&args),
        max_turns: args.max_turns,
        format: args.format.clone(),
        p1: args.p1,
        p2: args.p2,
    };

    let stats = tokio::task::spawn_blocking(move || run_tournament(&deck1, &deck2, &config)).await?;

    println!("=== Tournament Complete ===");
    println!("Games: {}", stats.games);
    if stats.games > 0 {
        let pct = |n: usize| 100.0 * n as f64 / stats.games as f64;
        println!("P1 wins: {} ({:.1}%)", stats.p1_wins, pct(stats.p1_wins));
        println!("P2 wins: {} ({:.1}%)", stats.p2_wins, pct(stats.p2_wins));
        println!("Draws: {} ({:.1}%)", stats.draws, pct(stats.draws));
        println!("Average turns: {:.1}", stats.average_turns());
        for (reason, count) in &stats.end_reasons {
            println!("  {reason}: {count}");
        }
    }
    Ok(())
}
