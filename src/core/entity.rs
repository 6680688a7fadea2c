//! Game entity system with simple integer IDs

use crate::Result;
use crate::SimError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique ID for one card instance in a game
///
/// Distinct from a card's catalog identity: two copies of the same card get
/// different ids. IDs are handed out by the game's counter and never reused
/// within a game, so tokens created later never collide with deck cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerId {
    Player1,
    Player2,
}

impl PlayerId {
    /// Index into `GameState::players`
    pub fn index(&self) -> usize {
        match self {
            PlayerId::Player1 => 0,
            PlayerId::Player2 => 1,
        }
    }

    pub fn opponent(&self) -> PlayerId {
        match self {
            PlayerId::Player1 => PlayerId::Player2,
            PlayerId::Player2 => PlayerId::Player1,
        }
    }

    pub fn both() -> [PlayerId; 2] {
        [PlayerId::Player1, PlayerId::Player2]
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Player1 => write!(f, "player1"),
            PlayerId::Player2 => write!(f, "player2"),
        }
    }
}

/// Base trait for all game entities
pub trait GameEntity {
    type Id;

    fn id(&self) -> Self::Id;
    fn name(&self) -> &str;
}

/// Central storage for card instances
///
/// Provides fast lookup by CardId. Zones only hold ids; the store owns the
/// cards. Tokens are removed from the store when they leave the battlefield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    entities: FxHashMap<CardId, T>,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            entities: FxHashMap::default(),
        }
    }

    /// Insert an entity with a specific ID
    pub fn insert(&mut self, id: CardId, entity: T) {
        self.entities.insert(id, entity);
    }

    /// Get an entity by ID
    pub fn get(&self, id: CardId) -> Result<&T> {
        self.entities.get(&id).ok_or(SimError::EntityNotFound(id.as_u32()))
    }

    /// Get a mutable reference to an entity
    pub fn get_mut(&mut self, id: CardId) -> Result<&mut T> {
        self.entities
            .get_mut(&id)
            .ok_or(SimError::EntityNotFound(id.as_u32()))
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Remove an entity (only tokens leave the game this way)
    pub fn remove(&mut self, id: CardId) -> Option<T> {
        self.entities.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &T)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
