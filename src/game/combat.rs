//! Combat system
//!
//! Handles declaring attackers, declaring blockers, and combat damage.

use crate::core::{Card, CardId, PlayerId};
use crate::game::{triggers, DamageRecipient, GameEvent, GameState};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Combat state for the current combat
///
/// Reset at the beginning and end of every combat. Uses BTreeMap for
/// deterministic iteration order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CombatState {
    pub active: bool,

    /// Attacker -> blockers assigned to it, in declaration order
    pub attackers: BTreeMap<CardId, SmallVec<[CardId; 4]>>,

    /// Blocker -> the attacker it blocks
    pub blockers: BTreeMap<CardId, CardId>,

    /// Guards against applying combat damage twice in one combat
    pub damage_resolved: bool,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.clear();
        self.active = true;
    }

    pub fn clear(&mut self) {
        self.attackers.clear();
        self.blockers.clear();
        self.active = false;
        self.damage_resolved = false;
    }

    pub fn is_attacking(&self, card_id: CardId) -> bool {
        self.attackers.contains_key(&card_id)
    }

    pub fn is_blocking(&self, card_id: CardId) -> bool {
        self.blockers.contains_key(&card_id)
    }

    pub fn is_blocked(&self, attacker: CardId) -> bool {
        self.attackers
            .get(&attacker)
            .is_some_and(|blockers| !blockers.is_empty())
    }

    pub fn get_blockers(&self, attacker: CardId) -> &[CardId] {
        self.attackers
            .get(&attacker)
            .map(|b| b.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_attackers(&self) -> Vec<CardId> {
        self.attackers.keys().copied().collect()
    }
}

/// Predicted result of one attacker against its blockers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CombatOutcome {
    pub attacker_dies: bool,
    /// Blockers that die, in the order given
    pub blockers_die: Vec<CardId>,
    pub damage_to_player: i32,
}

/// Pure lethality check for one attacker and its blockers
pub fn calculate_combat_outcome(attacker: &Card, blockers: &[&Card]) -> CombatOutcome {
    if blockers.is_empty() {
        return CombatOutcome {
            attacker_dies: false,
            blockers_die: Vec::new(),
            damage_to_player: attacker.power().max(0),
        };
    }

    let total_blocker_power: i32 = blockers.iter().map(|b| b.power().max(0)).sum();
    CombatOutcome {
        attacker_dies: total_blocker_power >= attacker.toughness(),
        blockers_die: blockers
            .iter()
            .filter(|b| attacker.power() >= b.toughness())
            .map(|b| b.id)
            .collect(),
        damage_to_player: 0,
    }
}

/// Can this card legally be declared as an attacker?
pub fn can_attack(card: &Card) -> bool {
    card.is_creature() && !card.tapped && !card.summoning_sick && !card.has_text("can't attack")
}

/// Can this card legally be declared as a blocker?
pub fn can_block(card: &Card) -> bool {
    card.is_creature() && !card.tapped && !card.has_text("can't block")
}

/// Declare attackers for the active player
///
/// Illegal requests are dropped without a log entry. Legal attackers are
/// tapped and registered with no blockers, and their attack triggers fire.
/// Returns the attackers actually declared.
pub fn declare_attackers(
    game: &mut GameState,
    player: PlayerId,
    requested: &[CardId],
    events: &mut Vec<GameEvent>,
) -> Vec<CardId> {
    let mut declared = Vec::new();

    for &attacker in requested {
        let legal = game.battlefield(player).contains(&attacker)
            && !game.combat.is_attacking(attacker)
            && game.card(attacker).is_ok_and(can_attack);
        if !legal {
            continue;
        }

        if let Ok(card) = game.card_mut(attacker) {
            card.tap();
        }
        game.combat.attackers.insert(attacker, SmallVec::new());
        game.logger
            .normal(&format!("{} attacks", game.card_name(attacker)));
        declared.push(attacker);
    }

    if !declared.is_empty() {
        events.push(GameEvent::AttackersDeclared {
            player,
            attackers: declared.clone(),
        });
        for &attacker in &declared {
            triggers::fire_attack_trigger(game, attacker, events);
        }
    }

    declared
}

/// Declare (blocker, attacker) pairs for the defending player
///
/// Several blockers may share one attacker. Returns the pairs accepted.
pub fn declare_blockers(
    game: &mut GameState,
    player: PlayerId,
    requested: &[(CardId, CardId)],
    events: &mut Vec<GameEvent>,
) -> Vec<(CardId, CardId)> {
    let mut declared = Vec::new();

    for &(blocker, attacker) in requested {
        let legal = game.battlefield(player).contains(&blocker)
            && game.combat.is_attacking(attacker)
            && !game.combat.is_blocking(blocker)
            && game.card(blocker).is_ok_and(can_block);
        if !legal {
            continue;
        }

        if let Ok(card) = game.card_mut(blocker) {
            card.tap();
        }
        game.combat.blockers.insert(blocker, attacker);
        if let Some(list) = game.combat.attackers.get_mut(&attacker) {
            list.push(blocker);
        }
        game.logger.normal(&format!(
            "{} blocks {}",
            game.card_name(blocker),
            game.card_name(attacker)
        ));
        declared.push((blocker, attacker));
    }

    if !declared.is_empty() {
        events.push(GameEvent::BlockersDeclared {
            player,
            blocks: declared.clone(),
        });
    }

    declared
}

/// Apply combat damage for every registered attacker
///
/// Runs at most once per combat. Unblocked attackers hit the defending
/// player (and count as commander damage when the attacker is a commander or
/// legendary). A blocked attacker deals its full power to each blocker and
/// takes the sum of its blockers' power.
pub fn resolve_combat_damage(game: &mut GameState, events: &mut Vec<GameEvent>) {
    if game.combat.damage_resolved {
        return;
    }
    game.combat.damage_resolved = true;

    let attacking_player = game.active_player();
    let defender = attacking_player.opponent();
    let assignments: Vec<(CardId, Vec<CardId>)> = game
        .combat
        .attackers
        .iter()
        .map(|(id, blockers)| (*id, blockers.to_vec()))
        .collect();

    for (attacker_id, blocker_ids) in assignments {
        let Ok(attacker) = game.card(attacker_id).cloned() else {
            continue;
        };
        let power = attacker.power().max(0);

        // Blockers that have left the battlefield deal and take nothing
        let blockers: Vec<Card> = blocker_ids
            .iter()
            .filter(|&&id| game.battlefield(defender).contains(&id))
            .filter_map(|&id| game.card(id).ok().cloned())
            .collect();

        if blocker_ids.is_empty() {
            if power == 0 {
                continue;
            }
            let defender_name = game.player(defender).name.clone();
            game.player_mut(defender).lose_life(power);
            if attacker.is_commander || attacker.is_legendary() {
                game.player_mut(defender)
                    .add_commander_damage(attacking_player, power);
            }
            game.logger.normal(&format!(
                "{} deals {power} damage to {defender_name}",
                attacker.name
            ));
            events.push(GameEvent::CombatDamage {
                source: attacker_id,
                target: DamageRecipient::Player(defender),
                amount: power,
                died: false,
            });
            continue;
        }

        for blocker in &blockers {
            let died = match game.card_mut(blocker.id) {
                Ok(card) => {
                    card.damage += power;
                    card.has_lethal_damage()
                }
                Err(_) => continue,
            };
            game.logger.normal(&format!(
                "{} deals {power} damage to {}",
                attacker.name, blocker.name
            ));
            events.push(GameEvent::CombatDamage {
                source: attacker_id,
                target: DamageRecipient::Card(blocker.id),
                amount: power,
                died,
            });
        }

        let total_blocker_power: i32 = blockers.iter().map(|b| b.power().max(0)).sum();
        let attacker_died = match game.card_mut(attacker_id) {
            Ok(card) => {
                card.damage += total_blocker_power;
                card.has_lethal_damage()
            }
            Err(_) => false,
        };
        for blocker in &blockers {
            let amount = blocker.power().max(0);
            if amount == 0 {
                continue;
            }
            game.logger.normal(&format!(
                "{} deals {amount} damage to {}",
                blocker.name, attacker.name
            ));
            events.push(GameEvent::CombatDamage {
                source: blocker.id,
                target: DamageRecipient::Card(attacker_id),
                amount,
                died: attacker_died,
            });
        }
    }
}
