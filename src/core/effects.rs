//! Structured effects and triggered abilities
//!
//! `Effect` is the closed vocabulary the executor understands. Text parsing
//! produces these values; nothing downstream ever looks at oracle text again.

use crate::core::CounterType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a triggered ability fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    EntersBattlefield,
    Dies,
    Attacks,
    Cast,
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriggerKind::EntersBattlefield => "enters-the-battlefield",
            TriggerKind::Dies => "dies",
            TriggerKind::Attacks => "attacks",
            TriggerKind::Cast => "cast",
        };
        write!(f, "{name}")
    }
}

/// Who receives damage from a `DealDamage` effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageTarget {
    /// "any target": resolved against the opponent
    Any,
    Player,
    /// A random opposing creature
    Creature,
}

/// Which permanent a counter effect names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterTarget {
    /// "on it", "on this creature", or the card's own name
    Source,
    /// "on target creature", "on each other creature you control"...
    Other,
}

/// Basic card effects that can be executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// Example: "create two 1/1 white Soldier creature tokens"
    CreateToken { count: u32, token: String },

    /// Example: "destroy target creature"
    DestroyTarget { target_type: String },

    /// Example: "exile target nonland permanent"
    ExileTarget { target_type: String },

    /// Example: "draw two cards"
    DrawCards { count: u32 },

    /// Example: "deals 3 damage to any target"
    DealDamage { amount: i32, target: DamageTarget },

    /// Example: "you gain 4 life"
    GainLife { amount: i32 },

    /// Only `CounterTarget::Source` is applied
    AddCounters {
        count: u32,
        kind: CounterType,
        on: CounterTarget,
    },

    /// Example: "search your library for a basic land card"
    Ramp { count: u32 },
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::CreateToken { count, token } => write!(f, "create {count} {token} token(s)"),
            Effect::DestroyTarget { target_type } => write!(f, "destroy target {target_type}"),
            Effect::ExileTarget { target_type } => write!(f, "exile target {target_type}"),
            Effect::DrawCards { count } => write!(f, "draw {count} card(s)"),
            Effect::DealDamage { amount, target } => {
                write!(f, "deal {amount} damage to {target:?}")
            }
            Effect::GainLife { amount } => write!(f, "gain {amount} life"),
            Effect::AddCounters { count, kind, on } => match on {
                CounterTarget::Source => write!(f, "put {count} {kind} counter(s) on itself"),
                CounterTarget::Other => write!(f, "put {count} {kind} counter(s) on another"),
            },
            Effect::Ramp { count } => write!(f, "search for {count} basic land(s)"),
        }
    }
}

/// A parsed triggered ability: one trigger, one effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub trigger: TriggerKind,
    pub effect: Effect,
}

impl Ability {
    pub fn new(trigger: TriggerKind, effect: Effect) -> Self {
        Ability { trigger, effect }
    }
}
