//! Phase entry actions and turn rollover

use crate::core::{CardId, PlayerId};
use crate::game::{triggers, GameEvent, GameState, Phase};
use smallvec::SmallVec;

/// Run the automatic actions of the phase the game is currently in
pub fn enter_phase(game: &mut GameState, events: &mut Vec<GameEvent>) {
    let phase = game.phase();
    let active = game.active_player();
    game.turn.priority_player = active;

    events.push(GameEvent::PhaseAdvanced {
        turn: game.turn.turn_number,
        phase,
        active_player: active,
    });
    game.logger.verbose(&format!(
        "--- Turn {} {phase} ({}) ---",
        game.turn.turn_number,
        game.player(active).name
    ));

    match phase {
        Phase::Untap => untap_step(game, active),
        Phase::Draw => draw_step(game, active, events),
        Phase::PrecombatMain => {
            game.player_mut(active).reset_land_plays();
            triggers::check_etb_triggers(game, events);
        }
        Phase::CombatBegin => game.combat.begin(),
        Phase::CombatEnd => game.combat.clear(),
        Phase::Cleanup => cleanup_step(game),
        _ => {}
    }
}

/// Leave the current phase; at cleanup the turn passes to the other player
///
/// Returns true when a new turn started.
pub fn advance_phase(game: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if game.phase() == Phase::Cleanup {
        let player = game.active_player();
        events.push(GameEvent::TurnEnded {
            turn: game.turn.turn_number,
            player,
        });
        game.logger.verbose(&format!(
            "{} ends turn {}",
            game.player(player).name,
            game.turn.turn_number
        ));
    }
    game.turn.advance()
}

fn untap_step(game: &mut GameState, active: PlayerId) {
    let permanents: SmallVec<[CardId; 16]> =
        game.battlefield(active).iter().copied().collect();
    for card_id in permanents {
        if let Ok(card) = game.card_mut(card_id) {
            card.untap();
            card.summoning_sick = false;
        }
    }
}

fn draw_step(game: &mut GameState, active: PlayerId, events: &mut Vec<GameEvent>) {
    // The starting player skips the first draw
    if game.turn.turn_number == 1 {
        return;
    }
    if let Some(card) = game.draw_card(active) {
        events.push(GameEvent::CardDrawn {
            player: active,
            card,
        });
    }
}

fn cleanup_step(game: &mut GameState) {
    for player in PlayerId::both() {
        game.player_mut(player).empty_mana_pool();
        let permanents: SmallVec<[CardId; 16]> =
            game.battlefield(player).iter().copied().collect();
        for card_id in permanents {
            if let Ok(card) = game.card_mut(card_id) {
                card.damage = 0;
                card.entered_this_turn = false;
            }
        }
    }
}
