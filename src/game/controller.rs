//! Player controller trait and game state view
//!
//! This module defines the interface between the game engine and player
//! controllers. The engine asks the controller for one decision per
//! opportunity; the controller inspects a read-only view of the game.

use crate::core::{Card, CardId, ManaCost, ManaPool, PlayerId};
use crate::game::{interpreter, CombatState, GameState, Phase};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};

/// Fixed decision priorities, reported for logging only
pub mod priority {
    pub const PLAY_LAND: u32 = 100;
    pub const PLAY_TAPPED_LAND: u32 = 95;
    pub const RAMP_SPELL: u32 = 90;
    pub const CREATURE: u32 = 85;
    pub const ALPHA_STRIKE: u32 = 80;
    pub const OTHER_SPELL: u32 = 70;
    pub const COMBAT: u32 = 50;
    pub const PASS: u32 = 0;
}

/// One action a controller can request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AiAction {
    PlayLand { card: CardId },
    CastSpell { card: CardId, from: Zone },
    DeclareAttackers { attackers: Vec<CardId> },
    /// (blocker, attacker) pairs
    DeclareBlockers { blocks: Vec<(CardId, CardId)> },
    Pass,
}

/// A controller's answer, with its priority and a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: AiAction,
    pub priority: u32,
    pub reason: String,
}

impl Decision {
    pub fn new(action: AiAction, priority: u32, reason: impl Into<String>) -> Self {
        Decision {
            action,
            priority,
            reason: reason.into(),
        }
    }

    pub fn pass() -> Self {
        Decision::new(AiAction::Pass, priority::PASS, "pass")
    }

    pub fn is_pass(&self) -> bool {
        self.action == AiAction::Pass
    }
}

/// Read-only view of game state for controllers
pub struct GameStateView<'a> {
    game: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    /// The player this view is for
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn opponent(&self) -> PlayerId {
        self.player_id.opponent()
    }

    pub fn phase(&self) -> Phase {
        self.game.phase()
    }

    pub fn turn_number(&self) -> u32 {
        self.game.turn.turn_number
    }

    pub fn is_active_player(&self) -> bool {
        self.game.active_player() == self.player_id
    }

    pub fn life(&self, player: PlayerId) -> i32 {
        self.game.player(player).life
    }

    pub fn hand(&self) -> &[CardId] {
        self.game.hand(self.player_id)
    }

    pub fn command_zone(&self) -> &[CardId] {
        &self.game.player(self.player_id).zones.command.cards
    }

    pub fn battlefield(&self, player: PlayerId) -> &[CardId] {
        self.game.battlefield(player)
    }

    pub fn card(&self, card_id: CardId) -> Option<&'a Card> {
        self.game.cards.get(card_id).ok()
    }

    /// Cards in hand and (for commanders) the command zone
    pub fn castable_zones(&self) -> impl Iterator<Item = &'a Card> + '_ {
        self.hand()
            .iter()
            .chain(self.command_zone().iter())
            .filter_map(|&id| self.card(id))
    }

    pub fn available_mana(&self) -> ManaPool {
        interpreter::available_mana(self.game, self.player_id)
    }

    pub fn can_play_land(&self) -> bool {
        interpreter::can_play_land_now(self.game, self.player_id)
    }

    pub fn can_cast(&self, card: &Card) -> bool {
        interpreter::can_cast_now(self.game, card, self.player_id)
    }

    pub fn effective_cost(&self, card: &Card) -> ManaCost {
        interpreter::effective_cost(self.game, card)
    }

    /// In the casting window and payable from available mana
    pub fn can_cast_and_afford(&self, card: &Card) -> bool {
        self.can_cast(card)
            && interpreter::can_afford(&self.available_mana(), &self.effective_cost(card))
    }

    pub fn combat(&self) -> &CombatState {
        &self.game.combat
    }
}

/// Player controller trait
///
/// Implement this trait to create AI players. Returning `None` (or a pass
/// decision) ends the controller's actions for the current phase.
pub trait PlayerController {
    /// Get the player ID this controller is responsible for
    fn player_id(&self) -> PlayerId;

    /// Short name used in the log
    fn name(&self) -> &str;

    /// Choose one action for the current phase
    fn decide(&mut self, view: &GameStateView) -> Option<Decision>;
}
