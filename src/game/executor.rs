//! Applies structured effects to the game state
//!
//! One log entry per application. Branches that find no legal target or
//! resource return without logging, so "nothing happened" stays visible in
//! the log as an absence.

use crate::core::{tokens, Card, CardId, CounterTarget, DamageTarget, Effect, PlayerId};
use crate::game::{GameEvent, GameState};
use crate::zones::Zone;
use rand::seq::SliceRandom;

/// The card an effect comes from and who controls it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectSource {
    pub card: CardId,
    pub name: String,
    pub controller: PlayerId,
}

impl EffectSource {
    pub fn from_card(card: &Card) -> Self {
        EffectSource {
            card: card.id,
            name: card.name.to_string(),
            controller: card.controller,
        }
    }
}

/// Apply one effect on behalf of `source`
pub fn execute_effect(
    game: &mut GameState,
    effect: &Effect,
    source: &EffectSource,
    events: &mut Vec<GameEvent>,
) {
    if game.game_over {
        return;
    }

    match effect {
        Effect::CreateToken { count, token } => create_tokens(game, *count, token, source, events),
        Effect::DestroyTarget { target_type } => {
            remove_random_target(game, target_type, Zone::Graveyard, source, events)
        }
        Effect::ExileTarget { target_type } => {
            remove_random_target(game, target_type, Zone::Exile, source, events)
        }
        Effect::DrawCards { count } => draw_cards(game, *count, source, events),
        Effect::DealDamage { amount, target } => deal_damage(game, *amount, *target, source),
        Effect::GainLife { amount } => {
            let player = game.player_mut(source.controller);
            player.gain_life(*amount);
            let name = player.name.clone();
            game.logger
                .normal(&format!("{}: {name} gains {amount} life", source.name));
        }
        Effect::AddCounters { count, kind, on } => {
            if *on != CounterTarget::Source {
                return;
            }
            let Ok(card) = game.card_mut(source.card) else {
                return;
            };
            if card.zone != Zone::Battlefield {
                return;
            }
            card.add_counters(kind, *count);
            game.logger.normal(&format!(
                "{} gets {count} {kind} counter(s)",
                source.name
            ));
            events.push(GameEvent::CountersAdded {
                card: source.card,
                kind: kind.clone(),
                count: *count,
            });
        }
        Effect::Ramp { count } => ramp(game, *count, source),
    }
}

fn create_tokens(
    game: &mut GameState,
    count: u32,
    kind: &str,
    source: &EffectSource,
    events: &mut Vec<GameEvent>,
) {
    let Some(definition) = tokens::token_definition(kind) else {
        game.logger
            .warn(&format!("Unknown token template: {kind} (from {})", source.name));
        return;
    };
    if count == 0 {
        return;
    }

    for _ in 0..count {
        let id = game.next_card_id();
        let mut token = definition.instantiate(id, source.controller);
        token.is_token = true;
        token.entered_this_turn = true;
        game.add_card(token, Zone::Battlefield);
        events.push(GameEvent::TokenCreated {
            player: source.controller,
            card: id,
            name: definition.name.clone(),
        });
    }

    if count == 1 {
        game.logger
            .normal(&format!("{} creates a {}", source.name, definition.name));
    } else {
        game.logger.normal(&format!(
            "{} creates {count} {}s",
            source.name, definition.name
        ));
    }
}

fn matches_target_type(card: &Card, target_type: &str) -> bool {
    target_type == "permanent" || card.has_type(target_type)
}

fn remove_random_target(
    game: &mut GameState,
    target_type: &str,
    to: Zone,
    source: &EffectSource,
    events: &mut Vec<GameEvent>,
) {
    let opponent = source.controller.opponent();
    let candidates: Vec<CardId> = game
        .battlefield(opponent)
        .iter()
        .copied()
        .filter(|&id| {
            game.card(id)
                .is_ok_and(|c| matches_target_type(c, target_type))
        })
        .collect();

    let Some(&target) = candidates.choose(&mut game.rng) else {
        return;
    };
    let target_name = game.card_name(target);
    let verb = if to == Zone::Exile { "exiles" } else { "destroys" };
    game.logger
        .normal(&format!("{} {verb} {target_name}", source.name));

    if let Err(err) = game.remove_permanent(target, to, events) {
        game.logger
            .warn(&format!("Could not move {target_name}: {err}"));
    }
}

fn draw_cards(game: &mut GameState, count: u32, source: &EffectSource, events: &mut Vec<GameEvent>) {
    let mut drawn = 0;
    for _ in 0..count {
        match game.draw_card(source.controller) {
            Some(card) => {
                drawn += 1;
                events.push(GameEvent::CardDrawn {
                    player: source.controller,
                    card,
                });
            }
            None => break,
        }
    }

    if drawn > 0 {
        let name = game.player(source.controller).name.clone();
        game.logger
            .normal(&format!("{}: {name} draws {drawn} card(s)", source.name));
    }
}

fn deal_damage(game: &mut GameState, amount: i32, target: DamageTarget, source: &EffectSource) {
    let opponent = source.controller.opponent();
    match target {
        DamageTarget::Any | DamageTarget::Player => {
            let player = game.player_mut(opponent);
            player.lose_life(amount);
            let name = player.name.clone();
            game.logger
                .normal(&format!("{} deals {amount} damage to {name}", source.name));
        }
        DamageTarget::Creature => {
            let creatures: Vec<CardId> = game
                .battlefield(opponent)
                .iter()
                .copied()
                .filter(|&id| game.card(id).is_ok_and(|c| c.is_creature()))
                .collect();
            let Some(&target) = creatures.choose(&mut game.rng) else {
                return;
            };
            if let Ok(card) = game.card_mut(target) {
                card.damage += amount;
            }
            let target_name = game.card_name(target);
            game.logger.normal(&format!(
                "{} deals {amount} damage to {target_name}",
                source.name
            ));
        }
    }
}

fn ramp(game: &mut GameState, count: u32, source: &EffectSource) {
    let lands: Vec<CardId> = game
        .player(source.controller)
        .zones
        .library
        .iter()
        .copied()
        .filter(|&id| game.card(id).is_ok_and(|c| c.is_basic_land()))
        .take(count as usize)
        .collect();
    if lands.is_empty() {
        return;
    }

    let mut names = Vec::with_capacity(lands.len());
    for land in lands {
        if game.move_card(land, Zone::Battlefield).is_err() {
            continue;
        }
        if let Ok(card) = game.card_mut(land) {
            card.tap();
        }
        names.push(game.card_name(land));
    }

    let player = game.player(source.controller).name.clone();
    game.logger.normal(&format!(
        "{}: {player} puts {} onto the battlefield tapped",
        source.name,
        names.join(", ")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, CounterType};

    fn setup() -> (GameState, EffectSource) {
        let mut game = GameState::new_two_player("Alice", "Bob", 20, "standard");
        game.seed_rng(7);
        let id = game.next_card_id();
        let card = CardDefinition::new("Source", "Creature - Cleric")
            .with_stats("1", "1")
            .instantiate(id, PlayerId::Player1);
        game.add_card(card, Zone::Battlefield);
        let source = EffectSource {
            card: id,
            name: "Source".to_string(),
            controller: PlayerId::Player1,
        };
        (game, source)
    }

    fn add(game: &mut GameState, def: CardDefinition, owner: PlayerId, zone: Zone) -> CardId {
        let id = game.next_card_id();
        game.add_card(def.instantiate(id, owner), zone)
    }

    #[test]
    fn test_create_token() {
        let (mut game, source) = setup();
        let mut events = Vec::new();
        let effect = Effect::CreateToken {
            count: 1,
            token: "Soldier".to_string(),
        };

        execute_effect(&mut game, &effect, &source, &mut events);

        assert_eq!(game.battlefield(PlayerId::Player1).len(), 2);
        let token_id = game.battlefield(PlayerId::Player1)[1];
        let token = game.card(token_id).unwrap();
        assert!(token.is_token);
        assert_eq!(token.power(), 1);
        assert_eq!(game.logger.count_containing("creates a Soldier Token"), 1);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_unknown_token_warns() {
        let (mut game, source) = setup();
        let effect = Effect::CreateToken {
            count: 2,
            token: "Hydra".to_string(),
        };

        execute_effect(&mut game, &effect, &source, &mut Vec::new());

        assert_eq!(game.battlefield(PlayerId::Player1).len(), 1);
        let logs = game.logger.logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].category.as_deref(), Some("warning"));
    }

    #[test]
    fn test_destroy_without_target_skips_logging() {
        let (mut game, source) = setup();
        let effect = Effect::DestroyTarget {
            target_type: "creature".to_string(),
        };

        execute_effect(&mut game, &effect, &source, &mut Vec::new());

        assert!(game.logger.is_empty());
    }

    #[test]
    fn test_destroy_only_matching_type() {
        let (mut game, source) = setup();
        let land = add(
            &mut game,
            CardDefinition::new("Island", "Basic Land - Island"),
            PlayerId::Player2,
            Zone::Battlefield,
        );
        let bear = add(
            &mut game,
            CardDefinition::new("Bear", "Creature - Bear").with_stats("2", "2"),
            PlayerId::Player2,
            Zone::Battlefield,
        );
        let mut events = Vec::new();

        execute_effect(
            &mut game,
            &Effect::DestroyTarget {
                target_type: "creature".to_string(),
            },
            &source,
            &mut events,
        );

        assert_eq!(game.card(bear).unwrap().zone, Zone::Graveyard);
        assert_eq!(game.card(land).unwrap().zone, Zone::Battlefield);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::CreatureDied { card, .. } if *card == bear)));
    }

    #[test]
    fn test_exile_any_permanent() {
        let (mut game, source) = setup();
        let land = add(
            &mut game,
            CardDefinition::new("Island", "Basic Land - Island"),
            PlayerId::Player2,
            Zone::Battlefield,
        );

        execute_effect(
            &mut game,
            &Effect::ExileTarget {
                target_type: "permanent".to_string(),
            },
            &source,
            &mut Vec::new(),
        );

        assert_eq!(game.card(land).unwrap().zone, Zone::Exile);
        assert_eq!(game.logger.count_containing("exiles Island"), 1);
    }

    #[test]
    fn test_damage_and_life() {
        let (mut game, source) = setup();

        execute_effect(
            &mut game,
            &Effect::DealDamage {
                amount: 3,
                target: DamageTarget::Any,
            },
            &source,
            &mut Vec::new(),
        );
        execute_effect(&mut game, &Effect::GainLife { amount: 4 }, &source, &mut Vec::new());

        assert_eq!(game.player(PlayerId::Player2).life, 17);
        assert_eq!(game.player(PlayerId::Player1).life, 24);
    }

    #[test]
    fn test_damage_to_creature_marks_damage() {
        let (mut game, source) = setup();
        let bear = add(
            &mut game,
            CardDefinition::new("Bear", "Creature - Bear").with_stats("2", "2"),
            PlayerId::Player2,
            Zone::Battlefield,
        );

        execute_effect(
            &mut game,
            &Effect::DealDamage {
                amount: 2,
                target: DamageTarget::Creature,
            },
            &source,
            &mut Vec::new(),
        );

        assert_eq!(game.card(bear).unwrap().damage, 2);
        assert_eq!(game.player(PlayerId::Player2).life, 20);
    }

    #[test]
    fn test_counters_on_self() {
        let (mut game, source) = setup();
        let mut events = Vec::new();

        execute_effect(
            &mut game,
            &Effect::AddCounters {
                count: 2,
                kind: CounterType::plus_one_plus_one(),
                on: CounterTarget::Source,
            },
            &source,
            &mut events,
        );

        let card = game.card(source.card).unwrap();
        assert_eq!(card.power(), 3);
        assert_eq!(card.toughness(), 3);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_counters_on_other_are_ignored() {
        let (mut game, source) = setup();
        let ally = add(
            &mut game,
            CardDefinition::new("Squire", "Creature - Human").with_stats("2", "2"),
            PlayerId::Player1,
            Zone::Battlefield,
        );
        let mut events = Vec::new();

        execute_effect(
            &mut game,
            &Effect::AddCounters {
                count: 1,
                kind: CounterType::plus_one_plus_one(),
                on: CounterTarget::Other,
            },
            &source,
            &mut events,
        );

        assert_eq!(game.card(source.card).unwrap().power(), 1);
        assert_eq!(game.card(ally).unwrap().power(), 2);
        assert!(events.is_empty());
        assert!(game.logger.is_empty());
    }

    #[test]
    fn test_draw_until_empty_loses() {
        let (mut game, source) = setup();
        add(
            &mut game,
            CardDefinition::new("Island", "Basic Land - Island"),
            PlayerId::Player1,
            Zone::Library,
        );
        let mut events = Vec::new();

        execute_effect(&mut game, &Effect::DrawCards { count: 2 }, &source, &mut events);

        assert_eq!(game.hand(PlayerId::Player1).len(), 1);
        assert!(game.game_over);
        assert_eq!(game.winner, Some(PlayerId::Player2));
    }

    #[test]
    fn test_ramp_preserves_library_order() {
        let (mut game, source) = setup();
        let spell = add(
            &mut game,
            CardDefinition::new("Bolt", "Instant"),
            PlayerId::Player1,
            Zone::Library,
        );
        let forest = add(
            &mut game,
            CardDefinition::new("Forest", "Basic Land - Forest"),
            PlayerId::Player1,
            Zone::Library,
        );
        let bear = add(
            &mut game,
            CardDefinition::new("Bear", "Creature - Bear"),
            PlayerId::Player1,
            Zone::Library,
        );

        execute_effect(&mut game, &Effect::Ramp { count: 2 }, &source, &mut Vec::new());

        let forest_card = game.card(forest).unwrap();
        assert_eq!(forest_card.zone, Zone::Battlefield);
        assert!(forest_card.tapped);
        assert_eq!(game.player(PlayerId::Player1).zones.library.cards, vec![spell, bear]);
    }
}
