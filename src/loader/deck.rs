//! Deck file loader (JSON format)
//!
//! A deck file carries the full catalog entry for each card, so no separate
//! card database is needed:
//!
//! ```json
//! { "name": "Elves", "commander": "Lathril",
//!   "cards": [ { "count": 10, "name": "Forest", "type_line": "Basic Land - Forest" } ] }
//! ```

use crate::core::CardDefinition;
use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A complete deck list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckFile {
    pub name: String,
    /// Catalog id or name of the commander, for commander games
    #[serde(default)]
    pub commander: Option<String>,
    pub cards: Vec<CardDefinition>,
}

impl DeckFile {
    /// Total cards in the deck, counting copies
    pub fn total_cards(&self) -> usize {
        self.cards.iter().map(|c| c.count as usize).sum()
    }

    /// One definition per physical card, in deck-list order
    pub fn expand(&self) -> Vec<CardDefinition> {
        self.cards
            .iter()
            .flat_map(|def| std::iter::repeat(def).take(def.count as usize))
            .cloned()
            .collect()
    }
}

/// Deck loader for .json deck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck from a file
    pub fn load_from_file(path: &Path) -> Result<DeckFile> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load a deck without blocking the runtime
    pub async fn load_from_file_async(path: &Path) -> Result<DeckFile> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Load both players' decks concurrently
    pub async fn load_pair(path1: PathBuf, path2: PathBuf) -> Result<(DeckFile, DeckFile)> {
        let first = tokio::spawn(async move { Self::load_from_file_async(&path1).await });
        let second = tokio::spawn(async move { Self::load_from_file_async(&path2).await });
        Ok((first.await??, second.await??))
    }

    /// Parse a deck from its JSON text
    pub fn parse(content: &str) -> Result<DeckFile> {
        let deck: DeckFile = serde_json::from_str(content)
            .map_err(|e| SimError::InvalidDeckFormat(e.to_string()))?;

        if deck.total_cards() == 0 {
            return Err(SimError::InvalidDeckFormat(format!(
                "deck '{}' has no cards",
                deck.name
            )));
        }
        if let Some(card) = deck.cards.iter().find(|c| c.type_line.trim().is_empty()) {
            return Err(SimError::InvalidCardFormat(format!(
                "'{}' has no type line",
                card.name
            )));
        }
        Ok(deck)
    }
}
