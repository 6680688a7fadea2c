//! Card interpreter: casting windows, costs and mana
//!
//! Query functions over the game state. The only mutations are tapping
//! sources for mana (`tap_for_mana`, `pay_with_sources`).

use crate::core::{Card, CardId, Color, ManaCost, ManaPool, PlayerId};
use crate::game::{GameEvent, GameState};
use crate::zones::Zone;

/// Generic mana added per previous cast from the command zone
pub const COMMANDER_TAX: u32 = 2;

/// Can `player` cast `card` right now?
///
/// Instants always can. Everything else is sorcery speed: the caster must be
/// the active player, in a main phase, with an empty stack. Lands are played,
/// never cast.
pub fn can_cast_now(game: &GameState, card: &Card, player: PlayerId) -> bool {
    if card.is_land() {
        return false;
    }
    if card.is_instant() {
        return true;
    }
    game.phase().is_main() && game.stack.is_empty() && game.active_player() == player
}

/// Can `player` play a land right now?
pub fn can_play_land_now(game: &GameState, player: PlayerId) -> bool {
    game.phase().is_main()
        && game.stack.is_empty()
        && game.active_player() == player
        && game.player(player).can_play_land()
}

/// Decompose a printed cost string into colored and generic parts
pub fn mana_cost(cost: &str) -> ManaCost {
    ManaCost::from_string(cost)
}

/// Whether the pool covers the cost (colors exactly, generic from the rest)
pub fn can_afford(pool: &ManaPool, cost: &ManaCost) -> bool {
    pool.can_pay(cost)
}

/// The cost to cast `card` now, including commander tax from the command zone
pub fn effective_cost(game: &GameState, card: &Card) -> ManaCost {
    if card.is_commander && card.zone == Zone::Command {
        let casts = game.player(card.owner).commander_casts;
        card.mana_cost
            .with_additional_generic(COMMANDER_TAX * casts)
    } else {
        card.mana_cost
    }
}

/// Color of mana this card produces when tapped, if it is a mana source
///
/// Basic land types give their fixed color. "Any color" gives the first
/// color of the card's identity, or colorless. Otherwise the first
/// `add {X}` symbol in the text is used; lands with no readable text give
/// colorless.
pub fn produce_mana(card: &Card) -> Option<Color> {
    if let Some(color) = card.basic_land_color() {
        return Some(color);
    }

    let text = card.oracle_text.to_lowercase();
    if text.contains("any color") {
        return Some(
            card.color_identity
                .iter()
                .copied()
                .find(|c| *c != Color::Colorless)
                .unwrap_or(Color::Colorless),
        );
    }

    if let Some(pos) = text.find("add {") {
        let symbol = text[pos + "add {".len()..].chars().next();
        if let Some(color) = symbol.and_then(Color::from_symbol) {
            return Some(color);
        }
        if symbol.is_some_and(|c| c.is_ascii_digit()) {
            return Some(Color::Colorless);
        }
    }

    card.is_land().then_some(Color::Colorless)
}

/// Can this permanent be tapped for mana right now?
pub fn is_untapped_mana_source(card: &Card) -> bool {
    if card.tapped || card.zone != Zone::Battlefield {
        return false;
    }
    let kind_ok = card.is_land()
        || (card.is_creature() && !card.summoning_sick)
        || (card.is_artifact() && !card.is_creature());
    kind_ok && produce_mana(card).is_some()
}

/// Untapped mana sources controlled by `player`, in battlefield order
pub fn mana_sources(game: &GameState, player: PlayerId) -> Vec<(CardId, Color)> {
    game.battlefield(player)
        .iter()
        .filter_map(|&id| {
            let card = game.card(id).ok()?;
            if !is_untapped_mana_source(card) {
                return None;
            }
            produce_mana(card).map(|color| (id, color))
        })
        .collect()
}

/// Pool plus everything the player could still tap for
pub fn available_mana(game: &GameState, player: PlayerId) -> ManaPool {
    let mut pool = game.player(player).mana_pool;
    for (_, color) in mana_sources(game, player) {
        pool.add_color(color);
    }
    pool
}

/// Tap one source and add its mana to the controller's pool
pub fn tap_for_mana(game: &mut GameState, source: CardId) -> Option<Color> {
    let card = game.card(source).ok()?;
    if !is_untapped_mana_source(card) {
        return None;
    }
    let color = produce_mana(card)?;
    let controller = card.controller;

    if let Ok(card) = game.card_mut(source) {
        card.tap();
    }
    game.player_mut(controller).mana_pool.add_color(color);
    Some(color)
}

/// Pay `cost` for `player`, tapping sources as needed
///
/// Returns false without touching anything when the cost is unaffordable.
/// Sources of a needed color are tapped first, then any others for the
/// generic part, stopping as soon as the pool covers the cost.
pub fn pay_with_sources(
    game: &mut GameState,
    player: PlayerId,
    cost: &ManaCost,
    events: &mut Vec<GameEvent>,
) -> bool {
    if !can_afford(&available_mana(game, player), cost) {
        return false;
    }

    let sources = mana_sources(game, player);
    let mut tapped = Vec::new();

    for color in [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ] {
        for &(id, produced) in sources.iter().filter(|(_, c)| *c == color) {
            let pool = game.player(player).mana_pool;
            if pool.amount_of(color) >= cost.amount_of(color) {
                break;
            }
            if tap_for_mana(game, id) == Some(produced) {
                tapped.push(id);
            }
        }
    }

    // Colorless sources first for generic, so colored mana stays available
    let mut rest: Vec<(CardId, Color)> = sources
        .iter()
        .copied()
        .filter(|(id, _)| !tapped.contains(id))
        .collect();
    rest.sort_by_key(|(_, color)| *color != Color::Colorless);
    for (id, _) in rest {
        if can_afford(&game.player(player).mana_pool, cost) {
            break;
        }
        if tap_for_mana(game, id).is_some() {
            tapped.push(id);
        }
    }

    if game.player_mut(player).mana_pool.pay_cost(cost).is_err() {
        return false;
    }

    if !tapped.is_empty() {
        let names: Vec<String> = tapped.iter().map(|&id| game.card_name(id)).collect();
        let player_name = game.player(player).name.clone();
        game.logger
            .verbose(&format!("{player_name} taps {}", names.join(", ")));
        events.push(GameEvent::LandsTapped {
            player,
            lands: tapped,
        });
    }
    true
}
