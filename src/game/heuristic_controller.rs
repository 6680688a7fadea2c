//! Heuristic AI controller
//!
//! A stateless decision procedure. Each call looks at the current phase and
//! walks a fixed list of rules; the first rule that applies wins. Priorities
//! attached to decisions are reported in the log and never compared.
//!
//! Main phase order: land, ramp spell, best creature, any other spell.
//! Combat uses simple power/toughness math against the visible board.

use crate::core::{Card, CardId, PlayerId};
use crate::game::combat::{can_attack, can_block};
use crate::game::controller::{priority, AiAction, Decision, GameStateView, PlayerController};
use crate::game::{interpreter, Phase};
use crate::zones::Zone;

/// Heuristic AI controller that makes decisions using board evaluation
pub struct HeuristicController {
    player_id: PlayerId,
}

impl HeuristicController {
    pub fn new(player_id: PlayerId) -> Self {
        HeuristicController { player_id }
    }

    /// Score used to pick the creature to cast
    ///
    /// Power plus toughness, +2 for a card with real rules text, +1 if
    /// legendary.
    pub fn creature_impact(card: &Card) -> i32 {
        let mut impact = card.power() + card.toughness();
        if card.oracle_text.len() > 20 {
            impact += 2;
        }
        if card.is_legendary() {
            impact += 1;
        }
        impact
    }

    /// Does this spell make more mana available later?
    pub fn is_ramp(card: &Card) -> bool {
        let text = card.oracle_text.to_lowercase();
        let fetches_land = text.contains("search") && text.contains("land");
        let makes_mana = text.contains("add {") || text.contains("add one mana");
        let mana_rock = card.is_artifact() && interpreter::produce_mana(card).is_some();
        fetches_land || makes_mana || mana_rock
    }

    fn main_phase(&self, view: &GameStateView) -> Decision {
        if let Some(decision) = self.choose_land(view) {
            return decision;
        }

        let castable: Vec<&Card> = view
            .castable_zones()
            .filter(|card| !card.is_land() && view.can_cast_and_afford(card))
            .collect();

        if let Some(card) = castable.iter().find(|card| Self::is_ramp(card)) {
            return cast(card, priority::RAMP_SPELL, format!("ramp with {}", card.name));
        }

        let best_creature = castable
            .iter()
            .filter(|card| card.is_creature())
            .max_by(|a, b| {
                Self::creature_impact(a)
                    .cmp(&Self::creature_impact(b))
                    // lower mana value wins a tie
                    .then(b.mana_value.cmp(&a.mana_value))
            });
        if let Some(card) = best_creature {
            return cast(
                card,
                priority::CREATURE,
                format!("cast {} (impact {})", card.name, Self::creature_impact(card)),
            );
        }

        if let Some(card) = castable.iter().find(|card| !card.is_creature()) {
            return cast(card, priority::OTHER_SPELL, format!("cast {}", card.name));
        }

        Decision::pass()
    }

    fn choose_land(&self, view: &GameStateView) -> Option<Decision> {
        if !view.can_play_land() {
            return None;
        }
        let lands: Vec<&Card> = view
            .hand()
            .iter()
            .filter_map(|&id| view.card(id))
            .filter(|card| card.is_land())
            .collect();

        if let Some(land) = lands.iter().find(|land| !land.enters_tapped()) {
            return Some(Decision::new(
                AiAction::PlayLand { card: land.id },
                priority::PLAY_LAND,
                format!("play {}", land.name),
            ));
        }
        lands.first().map(|land| {
            Decision::new(
                AiAction::PlayLand { card: land.id },
                priority::PLAY_TAPPED_LAND,
                format!("play {} (enters tapped)", land.name),
            )
        })
    }

    fn declare_attackers(&self, view: &GameStateView) -> Decision {
        let attackers: Vec<&Card> = view
            .battlefield(self.player_id)
            .iter()
            .filter_map(|&id| view.card(id))
            .filter(|card| can_attack(card))
            .collect();
        if attackers.is_empty() {
            return Decision::pass();
        }
        let blockers: Vec<&Card> = view
            .battlefield(view.opponent())
            .iter()
            .filter_map(|&id| view.card(id))
            .filter(|card| can_block(card))
            .collect();

        let all: Vec<CardId> = attackers.iter().map(|card| card.id).collect();
        let total_power: i32 = attackers.iter().map(|card| card.power().max(0)).sum();

        if total_power >= view.life(view.opponent()) && blockers.len() * 2 < attackers.len() {
            return Decision::new(
                AiAction::DeclareAttackers { attackers: all },
                priority::ALPHA_STRIKE,
                format!("alpha strike for {total_power}"),
            );
        }

        if blockers.is_empty() {
            return Decision::new(
                AiAction::DeclareAttackers { attackers: all },
                priority::COMBAT,
                "attack into an empty board",
            );
        }

        let profitable: Vec<CardId> = attackers
            .iter()
            .filter(|attacker| {
                let outclasses = blockers.iter().all(|b| attacker.power() > b.toughness());
                let survives = blockers.iter().all(|b| attacker.toughness() > b.power());
                outclasses || survives
            })
            .map(|card| card.id)
            .collect();
        if profitable.is_empty() {
            return Decision::pass();
        }
        let count = profitable.len();
        Decision::new(
            AiAction::DeclareAttackers {
                attackers: profitable,
            },
            priority::COMBAT,
            format!("attack with {count} favorable creature(s)"),
        )
    }

    fn declare_blockers(&self, view: &GameStateView) -> Decision {
        let mut incoming: Vec<&Card> = view
            .combat()
            .get_attackers()
            .into_iter()
            .filter_map(|id| view.card(id))
            .collect();
        incoming.sort_by_key(|card| std::cmp::Reverse(card.power()));

        let mut available = view
            .battlefield(self.player_id)
            .iter()
            .filter_map(|&id| view.card(id))
            .filter(|card| can_block(card));

        let blocks: Vec<(CardId, CardId)> = incoming
            .iter()
            .map_while(|attacker| available.next().map(|blocker| (blocker.id, attacker.id)))
            .collect();
        if blocks.is_empty() {
            return Decision::pass();
        }
        let count = blocks.len();
        Decision::new(
            AiAction::DeclareBlockers { blocks },
            priority::COMBAT,
            format!("block {count} attacker(s)"),
        )
    }
}

fn cast(card: &Card, priority: u32, reason: String) -> Decision {
    let from = if card.zone == Zone::Command {
        Zone::Command
    } else {
        Zone::Hand
    };
    Decision::new(AiAction::CastSpell { card: card.id, from }, priority, reason)
}

impl PlayerController for HeuristicController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn name(&self) -> &str {
        "HEURISTIC"
    }

    fn decide(&mut self, view: &GameStateView) -> Option<Decision> {
        let decision = match view.phase() {
            Phase::PrecombatMain | Phase::PostcombatMain if view.is_active_player() => {
                self.main_phase(view)
            }
            Phase::DeclareAttackers if view.is_active_player() => self.declare_attackers(view),
            Phase::DeclareBlockers if !view.is_active_player() => self.declare_blockers(view),
            _ => Decision::pass(),
        };
        Some(decision)
    }
}
