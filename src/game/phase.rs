//! Turn phases

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The twelve phases of a turn, in cyclic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Untap,
    Upkeep,
    Draw,
    PrecombatMain,
    CombatBegin,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    CombatEnd,
    PostcombatMain,
    End,
    Cleanup,
}

impl Phase {
    /// Next phase in turn order; cleanup wraps around to untap
    pub fn next(&self) -> Phase {
        match self {
            Phase::Untap => Phase::Upkeep,
            Phase::Upkeep => Phase::Draw,
            Phase::Draw => Phase::PrecombatMain,
            Phase::PrecombatMain => Phase::CombatBegin,
            Phase::CombatBegin => Phase::DeclareAttackers,
            Phase::DeclareAttackers => Phase::DeclareBlockers,
            Phase::DeclareBlockers => Phase::CombatDamage,
            Phase::CombatDamage => Phase::CombatEnd,
            Phase::CombatEnd => Phase::PostcombatMain,
            Phase::PostcombatMain => Phase::End,
            Phase::End => Phase::Cleanup,
            Phase::Cleanup => Phase::Untap,
        }
    }

    /// Can sorcery-speed spells and lands be played in this phase?
    pub fn is_main(&self) -> bool {
        matches!(self, Phase::PrecombatMain | Phase::PostcombatMain)
    }

    /// Phases in which the AI is asked for decisions
    pub fn is_decision_phase(&self) -> bool {
        matches!(
            self,
            Phase::PrecombatMain
                | Phase::PostcombatMain
                | Phase::DeclareAttackers
                | Phase::DeclareBlockers
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Untap => "Untap",
            Phase::Upkeep => "Upkeep",
            Phase::Draw => "Draw",
            Phase::PrecombatMain => "Precombat Main",
            Phase::CombatBegin => "Beginning of Combat",
            Phase::DeclareAttackers => "Declare Attackers",
            Phase::DeclareBlockers => "Declare Blockers",
            Phase::CombatDamage => "Combat Damage",
            Phase::CombatEnd => "End of Combat",
            Phase::PostcombatMain => "Postcombat Main",
            Phase::End => "End",
            Phase::Cleanup => "Cleanup",
        };
        write!(f, "{name}")
    }
}

/// Represents the current turn structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Current turn number (0 before the game starts)
    pub turn_number: u32,

    pub phase: Phase,

    /// Active player (whose turn it is)
    pub active_player: PlayerId,

    /// Tracked but not enforced
    pub priority_player: PlayerId,
}

impl TurnStructure {
    pub fn new(starting_player: PlayerId) -> Self {
        TurnStructure {
            turn_number: 0,
            phase: Phase::Untap,
            active_player: starting_player,
            priority_player: starting_player,
        }
    }

    /// Move to the next phase. Returns true when a new turn started.
    pub fn advance(&mut self) -> bool {
        let next = self.phase.next();
        self.phase = next;
        if next == Phase::Untap {
            self.turn_number += 1;
            self.active_player = self.active_player.opponent();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_progression() {
        let mut phase = Phase::Untap;
        let mut seen = vec![phase];
        for _ in 0..11 {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(seen.len(), 12);
        assert_eq!(phase, Phase::Cleanup);
        assert_eq!(phase.next(), Phase::Untap);
    }

    #[test]
    fn test_turn_rollover() {
        let mut turn = TurnStructure::new(PlayerId::Player1);
        turn.turn_number = 1;

        let mut new_turns = 0;
        for _ in 0..12 {
            if turn.advance() {
                new_turns += 1;
            }
        }

        assert_eq!(new_turns, 1);
        assert_eq!(turn.turn_number, 2);
        assert_eq!(turn.phase, Phase::Untap);
        assert_eq!(turn.active_player, PlayerId::Player2);
    }

    #[test]
    fn test_main_phases() {
        assert!(Phase::PrecombatMain.is_main());
        assert!(Phase::PostcombatMain.is_main());
        assert!(!Phase::Upkeep.is_main());
        assert!(Phase::DeclareBlockers.is_decision_phase());
        assert!(!Phase::CombatDamage.is_decision_phase());
    }
}
