//! Game zones (Library, Hand, Battlefield, Graveyard, Exile, Command)

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Different zones where cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Exile,
    /// Transient: a spell sits here only while it is being committed
    Stack,
    Command,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::Library => "library",
            Zone::Hand => "hand",
            Zone::Battlefield => "battlefield",
            Zone::Graveyard => "graveyard",
            Zone::Exile => "exile",
            Zone::Stack => "stack",
            Zone::Command => "command zone",
        };
        write!(f, "{name}")
    }
}

/// An ordered collection of card ids belonging to one player
///
/// The last element of a library is its top card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,
    pub owner: PlayerId,
    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: PlayerId) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    /// Remove a card, keeping the order of everything else
    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // remove() rather than swap_remove(): iteration order feeds the AI and
            // must stay stable for seeded replays.
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top (for Library)
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    pub fn add_to_bottom(&mut self, card_id: CardId) {
        self.cards.insert(0, card_id);
    }

    /// Fisher-Yates shuffle driven by the game's seeded generator
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.cards.iter()
    }
}

/// Collection of all zones for a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub library: CardZone,
    pub hand: CardZone,
    pub battlefield: CardZone,
    pub graveyard: CardZone,
    pub exile: CardZone,
    pub command: CardZone,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            library: CardZone::new(Zone::Library, player_id),
            hand: CardZone::new(Zone::Hand, player_id),
            battlefield: CardZone::new(Zone::Battlefield, player_id),
            graveyard: CardZone::new(Zone::Graveyard, player_id),
            exile: CardZone::new(Zone::Exile, player_id),
            command: CardZone::new(Zone::Command, player_id),
        }
    }

    /// The stack is shared, so it has no per-player collection
    pub fn get_zone(&self, zone: Zone) -> Option<&CardZone> {
        match zone {
            Zone::Library => Some(&self.library),
            Zone::Hand => Some(&self.hand),
            Zone::Battlefield => Some(&self.battlefield),
            Zone::Graveyard => Some(&self.graveyard),
            Zone::Exile => Some(&self.exile),
            Zone::Command => Some(&self.command),
            Zone::Stack => None,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> Option<&mut CardZone> {
        match zone {
            Zone::Library => Some(&mut self.library),
            Zone::Hand => Some(&mut self.hand),
            Zone::Battlefield => Some(&mut self.battlefield),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Exile => Some(&mut self.exile),
            Zone::Command => Some(&mut self.command),
            Zone::Stack => None,
        }
    }

    /// Every zone, in a fixed order
    pub fn all(&self) -> [&CardZone; 6] {
        [
            &self.library,
            &self.hand,
            &self.battlefield,
            &self.graveyard,
            &self.exile,
            &self.command,
        ]
    }

    /// Which zone (if any) currently holds the card
    pub fn find(&self, card_id: CardId) -> Option<Zone> {
        self.all()
            .into_iter()
            .find(|zone| zone.contains(card_id))
            .map(|zone| zone.zone_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_zone() {
        let mut zone = CardZone::new(Zone::Hand, PlayerId::Player1);

        assert_eq!(zone.len(), 0);
        assert!(zone.is_empty());

        let card1 = CardId::new(10);
        let card2 = CardId::new(11);

        zone.add(card1);
        zone.add(card2);

        assert_eq!(zone.len(), 2);
        assert!(zone.contains(card1));
        assert!(zone.remove(card1));
        assert!(!zone.remove(card1));
        assert_eq!(zone.len(), 1);
    }

    #[test]
    fn test_library_operations() {
        let mut library = CardZone::new(Zone::Library, PlayerId::Player1);

        let card1 = CardId::new(10);
        let card2 = CardId::new(11);
        let card3 = CardId::new(12);

        library.add(card1); // Bottom
        library.add(card2);
        library.add(card3); // Top

        assert_eq!(library.peek_top(), Some(card3));
        assert_eq!(library.draw_top(), Some(card3));
        library.add_to_bottom(card3);
        assert_eq!(library.cards, vec![card3, card1, card2]);
        assert_eq!(library.draw_top(), Some(card2));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut library = CardZone::new(Zone::Library, PlayerId::Player2);
        for i in 0..5 {
            library.add(CardId::new(i));
        }
        library.remove(CardId::new(2));
        let ids: Vec<u32> = library.iter().map(|c| c.as_u32()).collect();
        assert_eq!(ids, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_player_zones_find() {
        let mut zones = PlayerZones::new(PlayerId::Player1);
        zones.command.add(CardId::new(7));
        zones.battlefield.add(CardId::new(8));

        assert_eq!(zones.find(CardId::new(7)), Some(Zone::Command));
        assert_eq!(zones.find(CardId::new(8)), Some(Zone::Battlefield));
        assert_eq!(zones.find(CardId::new(9)), None);
        assert!(zones.get_zone(Zone::Stack).is_none());
    }
}
