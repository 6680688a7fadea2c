//! Core game types and entities

pub mod card;
pub mod effects;
pub mod entity;
pub mod mana;
pub mod player;
pub mod tokens;
pub mod types;

pub use card::{Card, CardDefinition, StatValue};
pub use effects::{Ability, CounterTarget, DamageTarget, Effect, TriggerKind};
pub use entity::{CardId, EntityStore, GameEntity, PlayerId};
pub use mana::{Color, ManaCost, ManaPool};
pub use player::{Player, COMMANDER_DAMAGE_LIMIT};
pub use types::{CardName, CounterType, PlayerName};
