//! Fine-grained simulation events
//!
//! Events are the animation stream: produced by the step simulator one
//! increment at a time and handed to the caller. They are separate from the
//! narrative log and are never stored in the game state.

use crate::core::{CardId, CounterType, Effect, PlayerId, TriggerKind};
use crate::game::{GameEndReason, Phase};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};

/// Who received combat damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageRecipient {
    Player(PlayerId),
    Card(CardId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseAdvanced {
        turn: u32,
        phase: Phase,
        active_player: PlayerId,
    },
    CardDrawn {
        player: PlayerId,
        card: CardId,
    },
    LandPlayed {
        player: PlayerId,
        card: CardId,
        name: String,
    },
    SpellCast {
        player: PlayerId,
        card: CardId,
        name: String,
        from: Zone,
    },
    LandsTapped {
        player: PlayerId,
        lands: Vec<CardId>,
    },
    AttackersDeclared {
        player: PlayerId,
        attackers: Vec<CardId>,
    },
    BlockersDeclared {
        player: PlayerId,
        /// (blocker, attacker) pairs
        blocks: Vec<(CardId, CardId)>,
    },
    CombatDamage {
        source: CardId,
        target: DamageRecipient,
        amount: i32,
        died: bool,
    },
    CreatureDied {
        card: CardId,
        name: String,
        owner: PlayerId,
    },
    TokenCreated {
        player: PlayerId,
        card: CardId,
        name: String,
    },
    CountersAdded {
        card: CardId,
        kind: CounterType,
        count: u32,
    },
    AbilityTriggered {
        card: CardId,
        name: String,
        trigger: TriggerKind,
        effect: Effect,
    },
    TurnEnded {
        turn: u32,
        player: PlayerId,
    },
    GameOver {
        winner: Option<PlayerId>,
        reason: GameEndReason,
        turn: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::CombatDamage {
            source: CardId::new(4),
            target: DamageRecipient::Player(PlayerId::Player2),
            amount: 5,
            died: false,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "combat_damage");
        assert_eq!(json["target"]["player"], "player2");
        assert_eq!(json["amount"], 5);
    }
}
