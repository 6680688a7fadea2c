//! Game initialization from decks
//!
//! Creates games from deck lists: fresh card instances, shuffled libraries,
//! format-dependent life totals and command zones.

use crate::core::{Card, CardDefinition, CardId, PlayerId};
use crate::game::GameState;
use crate::loader::DeckFile;
use crate::zones::Zone;

/// Starting life for the commander format
pub const COMMANDER_LIFE: i32 = 40;
/// Starting life for every other format
pub const STANDARD_LIFE: i32 = 20;

/// One side of the table
#[derive(Debug, Clone, Copy)]
pub struct PlayerDeck<'a> {
    pub name: &'a str,
    pub cards: &'a [CardDefinition],
    /// Catalog id or name of the commander; `None` picks the first
    /// legendary creature in the list
    pub commander: Option<&'a str>,
}

impl<'a> PlayerDeck<'a> {
    pub fn new(name: &'a str, cards: &'a [CardDefinition]) -> Self {
        PlayerDeck {
            name,
            cards,
            commander: None,
        }
    }

    pub fn with_commander(mut self, commander: Option<&'a str>) -> Self {
        self.commander = commander;
        self
    }

    /// Borrow a loaded deck file; `cards` must hold its expanded list
    pub fn from_file(name: &'a str, deck: &'a DeckFile, cards: &'a [CardDefinition]) -> Self {
        PlayerDeck::new(name, cards).with_commander(deck.commander.as_deref())
    }
}

/// Game builder for initializing games from decks
pub struct GameInitializer {
    format: String,
    seed: u64,
}

impl GameInitializer {
    pub fn new(format: &str) -> Self {
        GameInitializer {
            format: format.to_string(),
            seed: 0,
        }
    }

    /// Seed for the shuffles and every later random choice
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn is_commander(&self) -> bool {
        self.format.eq_ignore_ascii_case("commander")
    }

    /// Build the initial two-player state
    ///
    /// Each list entry becomes its own card instance (expand `count` first,
    /// see [`DeckFile::expand`]). The game starts at turn 0 in the untap
    /// phase with player1 active; opening hands are dealt by
    /// `GameState::start_game`.
    pub fn init_game(&self, player1: PlayerDeck, player2: PlayerDeck) -> GameState {
        let life = if self.is_commander() {
            COMMANDER_LIFE
        } else {
            STANDARD_LIFE
        };
        let mut game = GameState::new_two_player(player1.name, player2.name, life, &self.format);
        game.seed_rng(self.seed);

        for (player, deck) in [(PlayerId::Player1, player1), (PlayerId::Player2, player2)] {
            self.load_deck_into_game(&mut game, player, &deck);
        }
        game
    }

    fn load_deck_into_game(&self, game: &mut GameState, player: PlayerId, deck: &PlayerDeck) {
        let mut instances: Vec<CardId> = Vec::with_capacity(deck.cards.len());
        for def in deck.cards {
            let card_id = game.next_card_id();
            game.add_card(def.instantiate(card_id, player), Zone::Library);
            instances.push(card_id);
        }

        if self.is_commander() {
            if let Some(commander) = find_commander(game, &instances, deck.commander) {
                let zones = &mut game.player_mut(player).zones;
                zones.library.remove(commander);
                zones.command.add(commander);
                if let Ok(card) = game.card_mut(commander) {
                    card.zone = Zone::Command;
                    card.is_commander = true;
                }
            }
        }

        let zones = &mut game.players[player.index()].zones;
        zones.library.shuffle(&mut game.rng);
    }
}

/// The named card (by catalog id or name), else the first legendary creature
fn find_commander(game: &GameState, instances: &[CardId], wanted: Option<&str>) -> Option<CardId> {
    let cards: Vec<&Card> = instances
        .iter()
        .filter_map(|&id| game.card(id).ok())
        .collect();

    wanted
        .and_then(|wanted| {
            cards.iter().find(|card| {
                card.catalog_id.eq_ignore_ascii_case(wanted)
                    || card.name.as_str().eq_ignore_ascii_case(wanted)
            })
        })
        .or_else(|| {
            cards
                .iter()
                .find(|card| card.is_legendary() && card.is_creature())
        })
        .map(|card| card.id)
}
