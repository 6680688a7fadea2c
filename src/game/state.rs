//! Main game state structure

use crate::core::{Card, CardId, EntityStore, Player, PlayerId, PlayerName};
use crate::game::{triggers, CombatState, GameEvent, GameLogger, Phase, TurnStructure};
use crate::zones::Zone;
use crate::{Result, SimError};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPENING_HAND_SIZE: usize = 7;

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEndReason {
    /// A player's life total reached 0 or less
    PlayerDeath,
    /// A player tried to draw from an empty library
    Decking,
    /// A player took 21 or more combat damage from one commander
    CommanderDamage,
    /// The turn cap was reached; higher life wins
    TurnLimit,
    /// Both players lost simultaneously
    Draw,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameEndReason::PlayerDeath => "life total reached 0",
            GameEndReason::Decking => "drew from an empty library",
            GameEndReason::CommanderDamage => "21 commander damage",
            GameEndReason::TurnLimit => "turn limit reached",
            GameEndReason::Draw => "simultaneous loss",
        };
        write!(f, "{text}")
    }
}

/// A spell committed to resolve
///
/// Spells resolve immediately, so the stack holds at most one object at a
/// time and only while a cast is in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackObject {
    pub card: CardId,
    pub controller: PlayerId,
    pub from: Zone,
}

/// Complete game state
///
/// The root aggregate: every card instance, both players and their zones,
/// the turn position, combat, the log, and the seeded generator that every
/// random choice in the game draws from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// All card instances in the game, keyed by instance id
    pub cards: EntityStore<Card>,

    /// Indexed by `PlayerId::index`
    pub players: [Player; 2],

    pub turn: TurnStructure,

    pub stack: Vec<StackObject>,

    pub combat: CombatState,

    pub game_over: bool,
    pub winner: Option<PlayerId>,
    pub end_reason: Option<GameEndReason>,

    /// Append-only chronological narration
    pub logger: GameLogger,

    /// Instances whose enters-the-battlefield trigger has already fired
    pub etb_fired: FxHashSet<CardId>,

    /// Source of every shuffle and random target choice
    pub rng: ChaCha12Rng,

    pub format: String,

    next_card_id: u32,
}

impl GameState {
    /// Create an empty two-player game
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        starting_life: i32,
        format: &str,
    ) -> Self {
        GameState {
            cards: EntityStore::new(),
            players: [
                Player::new(PlayerId::Player1, player1_name, starting_life),
                Player::new(PlayerId::Player2, player2_name, starting_life),
            ],
            turn: TurnStructure::new(PlayerId::Player1),
            stack: Vec::new(),
            combat: CombatState::new(),
            game_over: false,
            winner: None,
            end_reason: None,
            logger: GameLogger::new(),
            etb_fired: FxHashSet::default(),
            rng: ChaCha12Rng::seed_from_u64(0),
            format: format.to_string(),
            next_card_id: 0,
        }
    }

    /// Reseed the generator; same seed and decks reproduce the same game
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Fresh instance id, never reused within this game
    pub fn next_card_id(&mut self) -> CardId {
        let id = CardId::new(self.next_card_id);
        self.next_card_id += 1;
        id
    }

    pub fn is_commander_format(&self) -> bool {
        self.format.eq_ignore_ascii_case("commander")
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Display name of a card, or its id if it no longer exists
    pub fn card_name(&self, id: CardId) -> String {
        self.cards
            .get(id)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|_| format!("card #{id}"))
    }

    pub fn battlefield(&self, player: PlayerId) -> &[CardId] {
        &self.player(player).zones.battlefield.cards
    }

    pub fn hand(&self, player: PlayerId) -> &[CardId] {
        &self.player(player).zones.hand.cards
    }

    /// Register a new card instance directly in a zone
    ///
    /// Library additions go on top. Used by the factory, token creation and
    /// tests; ordinary movement goes through `move_card`.
    pub fn add_card(&mut self, mut card: Card, zone: Zone) -> CardId {
        let id = card.id;
        let holder = if zone == Zone::Battlefield {
            card.controller
        } else {
            card.owner
        };
        card.zone = zone;
        if zone == Zone::Stack {
            self.stack.push(StackObject {
                card: id,
                controller: card.controller,
                from: Zone::Hand,
            });
        } else if let Some(target) = self.players[holder.index()].zones.get_zone_mut(zone) {
            target.add(id);
        }
        self.cards.insert(id, card);
        id
    }

    /// Move a card between zones, returning the zone it actually landed in
    ///
    /// Tokens leaving the battlefield cease to exist. Commanders that would
    /// go to the graveyard or exile return to the command zone instead.
    pub fn move_card(&mut self, card_id: CardId, to: Zone) -> Result<Zone> {
        let (from, owner, controller, is_token, is_commander) = {
            let card = self.cards.get(card_id)?;
            (
                card.zone,
                card.owner,
                card.controller,
                card.is_token,
                card.is_commander,
            )
        };

        if from == Zone::Stack {
            self.stack.retain(|obj| obj.card != card_id);
        } else {
            let holder = if from == Zone::Battlefield {
                controller
            } else {
                owner
            };
            let removed = self.players[holder.index()]
                .zones
                .get_zone_mut(from)
                .is_some_and(|zone| zone.remove(card_id));
            if !removed {
                return Err(SimError::InvalidAction(format!(
                    "Card {card_id} not found in {from}"
                )));
            }
        }

        if is_token && from == Zone::Battlefield && to != Zone::Battlefield {
            self.cards.remove(card_id);
            return Ok(to);
        }

        let to = if is_commander && matches!(to, Zone::Graveyard | Zone::Exile) {
            Zone::Command
        } else {
            to
        };

        let card = self.cards.get_mut(card_id)?;
        if from == Zone::Battlefield && to != Zone::Battlefield {
            card.tapped = false;
            card.damage = 0;
            card.power_modifier = 0;
            card.toughness_modifier = 0;
            card.counters.clear();
            card.entered_this_turn = false;
        }
        if to == Zone::Battlefield && from != Zone::Battlefield {
            card.tapped = false;
            card.damage = 0;
            card.summoning_sick = true;
            card.entered_this_turn = true;
        }
        card.zone = to;

        if to == Zone::Stack {
            self.stack.push(StackObject {
                card: card_id,
                controller,
                from,
            });
        } else {
            let holder = if to == Zone::Battlefield {
                controller
            } else {
                owner
            };
            if let Some(zone) = self.players[holder.index()].zones.get_zone_mut(to) {
                zone.add(card_id);
            }
        }

        if is_commander && to == Zone::Command && from == Zone::Battlefield {
            let name = self.card_name(card_id);
            self.logger
                .normal(&format!("{name} returns to the command zone"));
        }

        Ok(to)
    }

    /// Draw the top card of a library
    ///
    /// Drawing from an empty library loses the game for the drawing player.
    pub fn draw_card(&mut self, player: PlayerId) -> Option<CardId> {
        let Some(card_id) = self.players[player.index()].zones.library.draw_top() else {
            let name = self.player(player).name.clone();
            self.logger
                .normal(&format!("{name} cannot draw from an empty library"));
            self.end_game(Some(player.opponent()), GameEndReason::Decking);
            return None;
        };

        self.players[player.index()].zones.hand.add(card_id);
        if let Ok(card) = self.cards.get_mut(card_id) {
            card.zone = Zone::Hand;
        }
        let name = self.player(player).name.clone();
        self.logger
            .verbose(&format!("{name} draws {}", self.card_name(card_id)));
        Some(card_id)
    }

    /// Deal opening hands and move to turn 1
    ///
    /// A library shorter than the opening hand is not a loss; the player just
    /// starts with fewer cards.
    pub fn start_game(&mut self) {
        for player in PlayerId::both() {
            for _ in 0..OPENING_HAND_SIZE {
                let zones = &mut self.players[player.index()].zones;
                let Some(card_id) = zones.library.draw_top() else {
                    break;
                };
                zones.hand.add(card_id);
                if let Ok(card) = self.cards.get_mut(card_id) {
                    card.zone = Zone::Hand;
                }
            }
        }

        self.turn.turn_number = 1;
        self.turn.phase = Phase::Untap;
        self.turn.priority_player = self.turn.active_player;
        self.logger.minimal(&format!(
            "Game started: {} vs {} ({})",
            self.players[0].name, self.players[1].name, self.format
        ));
    }

    /// Record the end of the game; later calls are ignored
    pub fn end_game(&mut self, winner: Option<PlayerId>, reason: GameEndReason) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.winner = winner;
        self.end_reason = Some(reason);

        match winner {
            Some(id) => {
                let name = self.player(id).name.clone();
                self.logger.minimal(&format!(
                    "{name} wins on turn {} ({reason})",
                    self.turn.turn_number
                ));
            }
            None => self.logger.minimal(&format!(
                "Game ends in a draw on turn {} ({reason})",
                self.turn.turn_number
            )),
        }
    }

    /// Remove a permanent from the battlefield to the graveyard or exile
    ///
    /// A creature reaching the graveyard dies: a `CreatureDied` event is
    /// emitted and its dies trigger fires. The trigger reads a snapshot taken
    /// before the move, so tokens (which vanish) still trigger.
    pub fn remove_permanent(
        &mut self,
        card_id: CardId,
        to: Zone,
        events: &mut Vec<GameEvent>,
    ) -> Result<()> {
        let snapshot = self.cards.get(card_id)?.clone();
        self.move_card(card_id, to)?;

        if to == Zone::Graveyard && snapshot.is_creature() {
            self.logger.normal(&format!("{} dies", snapshot.name));
            events.push(GameEvent::CreatureDied {
                card: card_id,
                name: snapshot.name.to_string(),
                owner: snapshot.owner,
            });
            triggers::fire_dies_trigger(self, &snapshot, events);
        }
        Ok(())
    }

    /// State-based actions: lethal damage, then life and commander damage
    pub fn check_state_based_actions(&mut self, events: &mut Vec<GameEvent>) {
        if self.game_over {
            return;
        }

        let doomed: Vec<CardId> = PlayerId::both()
            .iter()
            .flat_map(|&p| self.battlefield(p).iter().copied())
            .filter(|&id| self.cards.get(id).is_ok_and(|c| c.has_lethal_damage()))
            .collect();
        for card_id in doomed {
            if let Err(err) = self.remove_permanent(card_id, Zone::Graveyard, events) {
                self.logger
                    .warn(&format!("State-based action failed for {card_id}: {err}"));
            }
        }

        let p1_lost = self.players[0].has_lost();
        let p2_lost = self.players[1].has_lost();
        match (p1_lost, p2_lost) {
            (true, true) => self.end_game(None, GameEndReason::Draw),
            (true, false) => {
                let reason = self.loss_reason(PlayerId::Player1);
                self.end_game(Some(PlayerId::Player2), reason);
            }
            (false, true) => {
                let reason = self.loss_reason(PlayerId::Player2);
                self.end_game(Some(PlayerId::Player1), reason);
            }
            (false, false) => {}
        }
    }

    fn loss_reason(&self, loser: PlayerId) -> GameEndReason {
        if self.player(loser).life <= 0 {
            GameEndReason::PlayerDeath
        } else {
            GameEndReason::CommanderDamage
        }
    }

    /// Every (card, zone) placement across both players and the stack
    pub fn card_locations(&self) -> Vec<(CardId, Zone)> {
        let mut locations: Vec<(CardId, Zone)> = self
            .players
            .iter()
            .flat_map(|p| {
                p.zones
                    .all()
                    .into_iter()
                    .flat_map(|zone| zone.cards.iter().map(move |&id| (id, zone.zone_type)))
            })
            .collect();
        locations.extend(self.stack.iter().map(|obj| (obj.card, Zone::Stack)));
        locations
    }
}
