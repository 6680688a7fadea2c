//! Player representation

use crate::core::{GameEntity, ManaPool, PlayerId, PlayerName};
use crate::zones::PlayerZones;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Commander damage from a single opponent at which a player loses
pub const COMMANDER_DAMAGE_LIMIT: i32 = 21;

/// Represents a player in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,

    /// Library, hand, battlefield, graveyard, exile and command zone
    pub zones: PlayerZones,

    pub mana_pool: ManaPool,

    pub land_plays_remaining: u32,
    pub played_land_this_turn: bool,

    /// Commander combat damage received, keyed by the attacking player
    pub commander_damage: FxHashMap<PlayerId, i32>,

    /// Times this player's commander has been cast from the command zone
    pub commander_casts: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, starting_life: i32) -> Self {
        Player {
            id,
            name: name.into(),
            life: starting_life,
            zones: PlayerZones::new(id),
            mana_pool: ManaPool::new(),
            land_plays_remaining: 0,
            played_land_this_turn: false,
            commander_damage: FxHashMap::default(),
            commander_casts: 0,
        }
    }

    pub fn gain_life(&mut self, amount: i32) {
        self.life += amount;
    }

    pub fn lose_life(&mut self, amount: i32) {
        self.life -= amount;
    }

    pub fn can_play_land(&self) -> bool {
        self.land_plays_remaining > 0
    }

    pub fn play_land(&mut self) {
        self.land_plays_remaining = self.land_plays_remaining.saturating_sub(1);
        self.played_land_this_turn = true;
    }

    pub fn reset_land_plays(&mut self) {
        self.land_plays_remaining = 1;
        self.played_land_this_turn = false;
    }

    pub fn empty_mana_pool(&mut self) {
        self.mana_pool.clear();
    }

    pub fn add_commander_damage(&mut self, from: PlayerId, amount: i32) {
        *self.commander_damage.entry(from).or_insert(0) += amount;
    }

    pub fn commander_damage_from(&self, from: PlayerId) -> i32 {
        self.commander_damage.get(&from).copied().unwrap_or(0)
    }

    /// Lost to life total or to one opponent's commander
    pub fn has_lost(&self) -> bool {
        self.life <= 0
            || self
                .commander_damage
                .values()
                .any(|&dmg| dmg >= COMMANDER_DAMAGE_LIMIT)
    }
}

impl GameEntity for Player {
    type Id = PlayerId;

    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
