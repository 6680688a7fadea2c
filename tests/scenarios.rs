//! Whole-engine scenarios through the public API

use mtg_sim::core::{CardDefinition, CardId, PlayerId};
use mtg_sim::game::{
    combat, triggers, GameEndReason, GameEvent, GameState, HeuristicController, Phase,
    Simulator, StepSimulator, ZeroController,
};
use mtg_sim::loader::{DeckLoader, GameInitializer, PlayerDeck};
use mtg_sim::zones::Zone;
use rustc_hash::FxHashSet;

fn add(game: &mut GameState, def: CardDefinition, owner: PlayerId, zone: Zone) -> CardId {
    let id = game.next_card_id();
    game.add_card(def.instantiate(id, owner), zone)
}

fn creature(name: &str, power: &str, toughness: &str) -> CardDefinition {
    CardDefinition::new(name, "Creature - Test").with_stats(power, toughness)
}

fn load(name: &str) -> Vec<CardDefinition> {
    let path = format!("{}/test_decks/{name}", env!("CARGO_MANIFEST_DIR"));
    DeckLoader::load_from_file(std::path::Path::new(&path))
        .unwrap()
        .expand()
}

/// Every card id sits in exactly one zone, across both players and the stack
fn assert_zone_partition(game: &GameState) {
    let locations = game.card_locations();
    let ids: FxHashSet<CardId> = locations.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids.len(), locations.len(), "a card sits in two zones");
    assert_eq!(ids.len(), game.cards.len(), "zones and card store disagree");
    for (id, zone) in locations {
        assert_eq!(game.card(id).unwrap().zone, zone);
    }
}

#[test]
fn test_library_size_after_opening_hands() {
    let cards = load("goblin_rush.json");
    let mut game = GameInitializer::new("standard")
        .with_seed(1)
        .init_game(PlayerDeck::new("A", &cards), PlayerDeck::new("B", &cards));
    game.start_game();

    for player in PlayerId::both() {
        assert_eq!(game.player(player).zones.library.len(), cards.len() - 7);
        assert_eq!(game.hand(player).len(), 7);
    }
}

#[test]
fn test_commander_library_size_after_opening_hands() {
    let cards = load("angel_commander.json");
    let mut game = GameInitializer::new("commander").with_seed(1).init_game(
        PlayerDeck::new("A", &cards).with_commander(Some("seraph-of-dawnlight")),
        PlayerDeck::new("B", &cards),
    );
    game.start_game();

    for player in PlayerId::both() {
        assert_eq!(game.player(player).zones.library.len(), cards.len() - 7 - 1);
        assert_eq!(game.player(player).life, 40);
    }
}

#[test]
fn test_ids_unique_and_zones_partitioned_throughout_a_game() {
    let cards = load("elf_ramp.json");
    let game = GameInitializer::new("standard")
        .with_seed(9)
        .init_game(PlayerDeck::new("A", &cards), PlayerDeck::new("B", &cards));
    let mut sim = StepSimulator::new(
        game,
        Box::new(HeuristicController::new(PlayerId::Player1)),
        Box::new(HeuristicController::new(PlayerId::Player2)),
    );

    loop {
        let result = sim.step();
        assert_zone_partition(&sim.game);
        if !result.should_continue {
            break;
        }
    }
}

#[test]
fn test_combat_damage_is_idempotent() {
    let mut game = GameState::new_two_player("A", "B", 20, "standard");
    let attacker = add(&mut game, creature("Brute", "3", "3"), PlayerId::Player1, Zone::Battlefield);
    game.card_mut(attacker).unwrap().summoning_sick = false;
    game.turn.phase = Phase::DeclareAttackers;
    game.combat.begin();
    combat::declare_attackers(&mut game, PlayerId::Player1, &[attacker], &mut Vec::new());

    let mut events = Vec::new();
    combat::resolve_combat_damage(&mut game, &mut events);
    combat::resolve_combat_damage(&mut game, &mut events);

    assert_eq!(game.player(PlayerId::Player2).life, 17);
    let hits = events
        .iter()
        .filter(|e| matches!(e, GameEvent::CombatDamage { .. }))
        .count();
    assert_eq!(hits, 1);
}

#[test]
fn test_double_block_kills_attacker() {
    let mut game = GameState::new_two_player("A", "B", 20, "standard");
    let attacker = add(&mut game, creature("Brute", "3", "3"), PlayerId::Player1, Zone::Battlefield);
    let b1 = add(&mut game, creature("Guard", "2", "4"), PlayerId::Player2, Zone::Battlefield);
    let b2 = add(&mut game, creature("Guard", "1", "4"), PlayerId::Player2, Zone::Battlefield);
    game.card_mut(attacker).unwrap().summoning_sick = false;
    game.turn.phase = Phase::DeclareAttackers;
    game.combat.begin();
    combat::declare_attackers(&mut game, PlayerId::Player1, &[attacker], &mut Vec::new());
    combat::declare_blockers(
        &mut game,
        PlayerId::Player2,
        &[(b1, attacker), (b2, attacker)],
        &mut Vec::new(),
    );

    let outcome = {
        let a = game.card(attacker).unwrap();
        let blockers = [game.card(b1).unwrap(), game.card(b2).unwrap()];
        combat::calculate_combat_outcome(a, &blockers)
    };
    assert!(outcome.attacker_dies);
    assert!(outcome.blockers_die.is_empty());
    assert_eq!(outcome.damage_to_player, 0);

    let mut events = Vec::new();
    combat::resolve_combat_damage(&mut game, &mut events);
    game.check_state_based_actions(&mut events);

    assert_eq!(game.card(attacker).unwrap().zone, Zone::Graveyard);
    // each blocker takes the full 3
    assert_eq!(game.card(b1).unwrap().damage, 3);
    assert_eq!(game.card(b2).unwrap().damage, 3);
    assert_eq!(game.player(PlayerId::Player2).life, 20);
}

#[test]
fn test_soldier_token_scenario() {
    let mut game = GameState::new_two_player("A", "B", 20, "standard");
    let recruiter = add(
        &mut game,
        creature("Recruiter", "1", "1")
            .with_text("When this enters the battlefield, create a 1/1 Soldier token."),
        PlayerId::Player1,
        Zone::Hand,
    );
    game.move_card(recruiter, Zone::Battlefield).unwrap();

    let mut events = Vec::new();
    triggers::check_etb_triggers(&mut game, &mut events);
    // later phases check again
    triggers::check_etb_triggers(&mut game, &mut events);

    let battlefield = game.battlefield(PlayerId::Player1);
    assert_eq!(battlefield.len(), 2);
    let token = game.card(battlefield[1]).unwrap();
    assert!(token.is_token);
    assert_eq!(token.name.as_str(), "Soldier Token");
    assert_eq!(game.logger.count_containing("creates a Soldier Token"), 1);
    assert_zone_partition(&game);
}

#[test]
fn test_unblocked_attacker_kills_player_at_three() {
    let mut game = GameState::new_two_player("A", "B", 20, "standard");
    game.player_mut(PlayerId::Player2).life = 3;
    let attacker = add(&mut game, creature("Giant", "5", "5"), PlayerId::Player1, Zone::Battlefield);
    game.card_mut(attacker).unwrap().summoning_sick = false;
    game.turn.phase = Phase::DeclareAttackers;
    game.combat.begin();
    combat::declare_attackers(&mut game, PlayerId::Player1, &[attacker], &mut Vec::new());

    let mut events = Vec::new();
    combat::resolve_combat_damage(&mut game, &mut events);
    assert_eq!(game.player(PlayerId::Player2).life, -2);
    assert!(!game.game_over);

    game.check_state_based_actions(&mut events);
    assert!(game.game_over);
    assert_eq!(game.winner, Some(PlayerId::Player1));
    assert_eq!(game.end_reason, Some(GameEndReason::PlayerDeath));
}

#[test]
fn test_draw_from_empty_library_loses() {
    let mut game = GameState::new_two_player("A", "B", 20, "standard");

    assert_eq!(game.draw_card(PlayerId::Player2), None);
    assert!(game.game_over);
    assert_eq!(game.winner, Some(PlayerId::Player1));
    assert_eq!(game.end_reason, Some(GameEndReason::Decking));
    assert!(game.hand(PlayerId::Player2).is_empty());
}

#[test]
fn test_turn_cap_of_one() {
    let cards = load("elf_ramp.json");
    let game = GameInitializer::new("standard")
        .with_seed(3)
        .init_game(PlayerDeck::new("A", &cards), PlayerDeck::new("B", &cards));

    let result = Simulator::new(
        game,
        Box::new(ZeroController::new(PlayerId::Player1)),
        Box::new(ZeroController::new(PlayerId::Player2)),
    )
    .with_max_turns(1)
    .run();

    assert_eq!(result.end_reason, GameEndReason::TurnLimit);
    assert_eq!(result.turns_played, 1);
    assert_eq!(result.player1_life, result.player2_life);
    assert_eq!(result.winner, Some(PlayerId::Player1));
}

#[test]
fn test_commander_damage_wins() {
    let mut game = GameState::new_two_player("A", "B", 40, "commander");
    let general = add(
        &mut game,
        creature("General", "7", "7").legendary(),
        PlayerId::Player1,
        Zone::Battlefield,
    );
    game.card_mut(general).unwrap().summoning_sick = false;

    for _ in 0..3 {
        game.turn.phase = Phase::DeclareAttackers;
        game.combat.begin();
        game.card_mut(general).unwrap().untap();
        combat::declare_attackers(&mut game, PlayerId::Player1, &[general], &mut Vec::new());
        combat::resolve_combat_damage(&mut game, &mut Vec::new());
        game.combat.clear();
        game.check_state_based_actions(&mut Vec::new());
    }

    assert_eq!(game.player(PlayerId::Player2).life, 19);
    assert_eq!(game.player(PlayerId::Player2).commander_damage_from(PlayerId::Player1), 21);
    assert!(game.game_over);
    assert_eq!(game.end_reason, Some(GameEndReason::CommanderDamage));
}
