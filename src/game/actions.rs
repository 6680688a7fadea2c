//! Applying player decisions to the game state
//!
//! Every function here validates first and returns false for an illegal
//! request, leaving the state and the log untouched.

use crate::core::{CardId, PlayerId};
use crate::game::ability_parser::parse_spell_effect;
use crate::game::executor::{execute_effect, EffectSource};
use crate::game::{combat, interpreter, triggers, AiAction, GameEvent, GameState, Phase};
use crate::zones::Zone;

/// Play a land from hand
pub fn play_land(
    game: &mut GameState,
    player: PlayerId,
    card_id: CardId,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Ok(card) = game.card(card_id) else {
        return false;
    };
    let legal = card.is_land()
        && card.zone == Zone::Hand
        && card.owner == player
        && interpreter::can_play_land_now(game, player);
    if !legal {
        return false;
    }
    let enters_tapped = card.enters_tapped();
    let name = card.name.to_string();

    if game.move_card(card_id, Zone::Battlefield).is_err() {
        return false;
    }
    if enters_tapped {
        if let Ok(card) = game.card_mut(card_id) {
            card.tap();
        }
    }
    game.player_mut(player).play_land();

    let player_name = game.player(player).name.clone();
    game.logger.normal(&format!("{player_name} plays {name}"));
    events.push(GameEvent::LandPlayed {
        player,
        card: card_id,
        name,
    });
    true
}

/// Cast a spell from hand, or a commander from the command zone
///
/// The spell is paid for, its cast trigger fires, and it resolves at once:
/// permanents enter the battlefield, instants and sorceries apply their own
/// text and go to the graveyard.
pub fn cast_spell(
    game: &mut GameState,
    player: PlayerId,
    card_id: CardId,
    events: &mut Vec<GameEvent>,
) -> bool {
    let Ok(card) = game.card(card_id) else {
        return false;
    };
    let from = card.zone;
    let from_ok = from == Zone::Hand || (from == Zone::Command && card.is_commander);
    if !from_ok || card.owner != player || !interpreter::can_cast_now(game, card, player) {
        return false;
    }
    let cost = interpreter::effective_cost(game, card);
    let name = card.name.to_string();
    let is_permanent = card.is_permanent();
    let oracle_text = card.oracle_text.clone();
    let source = EffectSource::from_card(card);

    if !interpreter::pay_with_sources(game, player, &cost, events) {
        return false;
    }

    if from == Zone::Command {
        game.player_mut(player).commander_casts += 1;
    }
    let player_name = game.player(player).name.clone();
    let origin = if from == Zone::Command {
        " from the command zone"
    } else {
        ""
    };
    game.logger
        .normal(&format!("{player_name} casts {name}{origin}"));
    events.push(GameEvent::SpellCast {
        player,
        card: card_id,
        name: name.clone(),
        from,
    });

    triggers::fire_cast_trigger(game, card_id, events);
    if game.move_card(card_id, Zone::Stack).is_err() {
        return false;
    }

    if is_permanent {
        if let Err(err) = game.move_card(card_id, Zone::Battlefield) {
            game.logger
                .warn(&format!("{name} failed to resolve: {err}"));
        }
    } else {
        if let Some(effect) = parse_spell_effect(&oracle_text) {
            execute_effect(game, &effect, &source, events);
        }
        if let Err(err) = game.move_card(card_id, Zone::Graveyard) {
            game.logger
                .warn(&format!("{name} failed to resolve: {err}"));
        }
    }
    true
}

/// Apply a controller's decision for `player`
///
/// Returns whether anything happened. Combat declarations are only accepted
/// in their own phase, from the right side of the table.
pub fn apply_decision(
    game: &mut GameState,
    player: PlayerId,
    action: &AiAction,
    events: &mut Vec<GameEvent>,
) -> bool {
    match action {
        AiAction::PlayLand { card } => play_land(game, player, *card, events),
        AiAction::CastSpell { card, .. } => cast_spell(game, player, *card, events),
        AiAction::DeclareAttackers { attackers } => {
            if game.phase() != Phase::DeclareAttackers || game.active_player() != player {
                return false;
            }
            !combat::declare_attackers(game, player, attackers, events).is_empty()
        }
        AiAction::DeclareBlockers { blocks } => {
            if game.phase() != Phase::DeclareBlockers || game.active_player() == player {
                return false;
            }
            !combat::declare_blockers(game, player, blocks, events).is_empty()
        }
        AiAction::Pass => false,
    }
}
