//! Decides when parsed abilities fire
//!
//! Abilities are parsed from oracle text at the moment a trigger is checked
//! and handed to the executor. The enters-the-battlefield guard lives in
//! `GameState::etb_fired`, so each instance fires at most once per game.

use crate::core::{Card, CardId, PlayerId, TriggerKind};
use crate::game::ability_parser::parse_abilities;
use crate::game::executor::{execute_effect, EffectSource};
use crate::game::{GameEvent, GameState};

/// Fire every ability of `card` with the given trigger
///
/// `card` may be a snapshot of an instance that no longer exists (a token
/// that just died).
fn fire(game: &mut GameState, card: &Card, trigger: TriggerKind, events: &mut Vec<GameEvent>) {
    let source = EffectSource::from_card(card);
    for ability in parse_abilities(&card.oracle_text) {
        if ability.trigger != trigger || game.game_over {
            continue;
        }
        game.logger
            .verbose(&format!("{}'s {trigger} ability triggers", card.name));
        events.push(GameEvent::AbilityTriggered {
            card: card.id,
            name: card.name.to_string(),
            trigger,
            effect: ability.effect.clone(),
        });
        execute_effect(game, &ability.effect, &source, events);
    }
}

/// Fire pending enters-the-battlefield triggers
///
/// Considers every battlefield instance flagged as entered this turn whose
/// id has not fired before.
pub fn check_etb_triggers(game: &mut GameState, events: &mut Vec<GameEvent>) {
    let pending: Vec<CardId> = PlayerId::both()
        .iter()
        .flat_map(|&p| game.battlefield(p).iter().copied())
        .filter(|id| !game.etb_fired.contains(id))
        .filter(|&id| game.card(id).is_ok_and(|c| c.entered_this_turn))
        .collect();

    for card_id in pending {
        if game.game_over {
            break;
        }
        let Ok(card) = game.card(card_id).cloned() else {
            continue;
        };
        fire(game, &card, TriggerKind::EntersBattlefield, events);
        game.etb_fired.insert(card_id);
    }
}

/// Fire the dies trigger of a creature that just went to the graveyard
pub fn fire_dies_trigger(game: &mut GameState, card: &Card, events: &mut Vec<GameEvent>) {
    fire(game, card, TriggerKind::Dies, events);
}

/// Fire the attack trigger of a declared attacker
pub fn fire_attack_trigger(game: &mut GameState, attacker: CardId, events: &mut Vec<GameEvent>) {
    if let Ok(card) = game.card(attacker).cloned() {
        fire(game, &card, TriggerKind::Attacks, events);
    }
}

/// Fire the cast trigger of a spell being committed
pub fn fire_cast_trigger(game: &mut GameState, spell: CardId, events: &mut Vec<GameEvent>) {
    if let Ok(card) = game.card(spell).cloned() {
        fire(game, &card, TriggerKind::Cast, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardDefinition;
    use crate::zones::Zone;

    const SOLDIER_MAKER: &str =
        "When this creature enters the battlefield, create a 1/1 white Soldier creature token.";

    fn game_with(text: &str, zone: Zone) -> (GameState, CardId) {
        let mut game = GameState::new_two_player("Alice", "Bob", 20, "standard");
        let id = game.next_card_id();
        let card = CardDefinition::new("Recruiter", "Creature - Human")
            .with_stats("1", "1")
            .with_text(text)
            .instantiate(id, PlayerId::Player1);
        game.add_card(card, Zone::Hand);
        if zone == Zone::Battlefield {
            game.move_card(id, Zone::Battlefield).unwrap();
        }
        (game, id)
    }

    #[test]
    fn test_etb_creates_one_token() {
        let (mut game, _) = game_with(SOLDIER_MAKER, Zone::Battlefield);
        let mut events = Vec::new();

        check_etb_triggers(&mut game, &mut events);

        assert_eq!(game.battlefield(PlayerId::Player1).len(), 2);
        assert_eq!(game.logger.count_containing("creates a Soldier Token"), 1);
        assert!(matches!(events[0], GameEvent::AbilityTriggered { .. }));
    }

    #[test]
    fn test_etb_fires_at_most_once() {
        let (mut game, id) = game_with(SOLDIER_MAKER, Zone::Battlefield);

        check_etb_triggers(&mut game, &mut Vec::new());
        check_etb_triggers(&mut game, &mut Vec::new());

        // leaving and re-entering does not re-arm the same instance
        game.move_card(id, Zone::Hand).unwrap();
        game.move_card(id, Zone::Battlefield).unwrap();
        check_etb_triggers(&mut game, &mut Vec::new());

        assert_eq!(game.logger.count_containing("creates a Soldier Token"), 1);
        assert!(game.etb_fired.contains(&id));
    }

    #[test]
    fn test_fresh_game_has_clean_etb_set() {
        let (mut first, _) = game_with(SOLDIER_MAKER, Zone::Battlefield);
        check_etb_triggers(&mut first, &mut Vec::new());

        let (mut second, _) = game_with(SOLDIER_MAKER, Zone::Battlefield);
        check_etb_triggers(&mut second, &mut Vec::new());

        assert_eq!(second.logger.count_containing("creates a Soldier Token"), 1);
    }

    #[test]
    fn test_etb_counter_on_other_creature_leaves_source_alone() {
        let (mut game, id) = game_with(
            "When this creature enters the battlefield, put a +1/+1 counter on target creature you control.",
            Zone::Battlefield,
        );
        let ally = game.next_card_id();
        let squire = CardDefinition::new("Squire", "Creature - Human")
            .with_stats("2", "2")
            .instantiate(ally, PlayerId::Player1);
        game.add_card(squire, Zone::Battlefield);

        check_etb_triggers(&mut game, &mut Vec::new());

        assert_eq!(game.card(id).unwrap().power(), 1);
        assert_eq!(game.card(id).unwrap().toughness(), 1);
        assert_eq!(game.card(ally).unwrap().power(), 2);
    }

    #[test]
    fn test_etb_counter_on_itself() {
        let (mut game, id) = game_with(
            "When this creature enters the battlefield, put a +1/+1 counter on it.",
            Zone::Battlefield,
        );

        check_etb_triggers(&mut game, &mut Vec::new());

        assert_eq!(game.card(id).unwrap().power(), 2);
    }

    #[test]
    fn test_dies_trigger_fires_from_snapshot() {
        let (mut game, id) = game_with("When this creature dies, you gain 3 life.", Zone::Battlefield);
        let mut events = Vec::new();

        game.remove_permanent(id, Zone::Graveyard, &mut events).unwrap();

        assert_eq!(game.player(PlayerId::Player1).life, 23);
    }

    #[test]
    fn test_attack_trigger() {
        let (mut game, id) = game_with(
            "Whenever this creature attacks, it deals 1 damage to any target.",
            Zone::Battlefield,
        );

        fire_attack_trigger(&mut game, id, &mut Vec::new());

        assert_eq!(game.player(PlayerId::Player2).life, 19);
    }

    #[test]
    fn test_cast_trigger() {
        let (mut game, id) = game_with("When you cast this spell, draw a card.", Zone::Hand);
        let lib_id = game.next_card_id();
        let land = CardDefinition::new("Forest", "Basic Land - Forest").instantiate(lib_id, PlayerId::Player1);
        game.add_card(land, Zone::Library);

        fire_cast_trigger(&mut game, id, &mut Vec::new());

        assert_eq!(game.hand(PlayerId::Player1).len(), 2);
    }
}
