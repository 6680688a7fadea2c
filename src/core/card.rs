//! Card definitions and in-game card instances

use crate::core::{CardId, CardName, Color, CounterType, GameEntity, ManaCost, PlayerId};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Resolved numeric value of a printed power or toughness
///
/// Printed stats are strings so that "*" and "1+*" survive loading. Anything
/// that is not a plain integer becomes `Variable`, keeping its leading fixed
/// part (0 when there is none) instead of silently collapsing to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatValue {
    Fixed(i32),
    Variable { base: i32, raw: String },
}

impl StatValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i32>() {
            return StatValue::Fixed(value);
        }

        let sign_len = usize::from(trimmed.starts_with('-') || trimmed.starts_with('+'));
        let digits: String = trimmed[sign_len..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let mut base = digits.parse::<i32>().unwrap_or(0);
        if trimmed.starts_with('-') {
            base = -base;
        }

        StatValue::Variable {
            base,
            raw: trimmed.to_string(),
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            StatValue::Fixed(v) => *v,
            StatValue::Variable { base, .. } => *base,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, StatValue::Variable { .. })
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Fixed(v) => write!(f, "{v}"),
            StatValue::Variable { raw, .. } => write!(f, "{raw}"),
        }
    }
}

fn default_count() -> u32 {
    1
}

/// Catalog entry for a card, as supplied by a decklist
///
/// This is the input contract with deck-building tools: printed
/// characteristics only, no game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Number of copies in the deck
    #[serde(default = "default_count")]
    pub count: u32,

    pub name: String,

    /// Catalog identity; falls back to the card name
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub type_line: String,

    #[serde(default)]
    pub oracle_text: String,

    #[serde(default)]
    pub mana_cost: String,

    #[serde(default)]
    pub power: Option<String>,

    #[serde(default)]
    pub toughness: Option<String>,

    #[serde(default)]
    pub color_identity: Vec<Color>,

    #[serde(default)]
    pub legendary: bool,
}

impl CardDefinition {
    pub fn new(name: impl Into<String>, type_line: impl Into<String>) -> Self {
        CardDefinition {
            count: 1,
            name: name.into(),
            id: None,
            type_line: type_line.into(),
            oracle_text: String::new(),
            mana_cost: String::new(),
            power: None,
            toughness: None,
            color_identity: Vec::new(),
            legendary: false,
        }
    }

    pub fn with_cost(mut self, cost: &str) -> Self {
        self.mana_cost = cost.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.oracle_text = text.to_string();
        self
    }

    pub fn with_stats(mut self, power: &str, toughness: &str) -> Self {
        self.power = Some(power.to_string());
        self.toughness = Some(toughness.to_string());
        self
    }

    pub fn with_colors(mut self, colors: &[Color]) -> Self {
        self.color_identity = colors.to_vec();
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn legendary(mut self) -> Self {
        self.legendary = true;
        self
    }

    pub fn catalog_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Create a fresh in-game instance owned by `owner`, starting in the library
    pub fn instantiate(&self, id: CardId, owner: PlayerId) -> Card {
        let mana_cost = ManaCost::from_string(&self.mana_cost);
        Card {
            id,
            catalog_id: self.catalog_id().to_string(),
            name: CardName::new(self.name.clone()),
            type_line: self.type_line.clone(),
            oracle_text: self.oracle_text.clone(),
            mana_value: mana_cost.cmc(),
            mana_cost,
            power: self.power.as_deref().map(StatValue::parse),
            toughness: self.toughness.as_deref().map(StatValue::parse),
            color_identity: self.color_identity.iter().copied().collect(),
            legendary: self.legendary,
            zone: Zone::Library,
            owner,
            controller: owner,
            tapped: false,
            phased_out: false,
            damage: 0,
            counters: SmallVec::new(),
            power_modifier: 0,
            toughness_modifier: 0,
            summoning_sick: true,
            entered_this_turn: false,
            is_commander: false,
            is_token: false,
        }
    }
}

/// A specific physical copy of a card during a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID for this card instance
    pub id: CardId,

    /// Identity in the card catalog (shared by all copies)
    pub catalog_id: String,

    pub name: CardName,
    pub type_line: String,
    pub oracle_text: String,
    pub mana_cost: ManaCost,
    pub mana_value: u32,

    /// Printed power, None for non-creatures
    pub power: Option<StatValue>,

    /// Printed toughness, None for non-creatures
    pub toughness: Option<StatValue>,

    pub color_identity: SmallVec<[Color; 2]>,
    pub legendary: bool,

    pub zone: Zone,
    pub owner: PlayerId,
    pub controller: PlayerId,
    pub tapped: bool,
    pub phased_out: bool,

    /// Damage marked this turn
    pub damage: i32,

    /// Counter kind -> count
    pub counters: SmallVec<[(CounterType, u32); 2]>,

    pub power_modifier: i32,
    pub toughness_modifier: i32,
    pub summoning_sick: bool,
    pub entered_this_turn: bool,
    pub is_commander: bool,
    pub is_token: bool,
}

impl Card {
    fn type_line_lower(&self) -> String {
        self.type_line.to_lowercase()
    }

    /// Case-insensitive type line check ("Creature", "Land", "Artifact"...)
    pub fn has_type(&self, type_name: &str) -> bool {
        self.type_line_lower().contains(&type_name.to_lowercase())
    }

    /// Case-insensitive oracle text check
    pub fn has_text(&self, needle: &str) -> bool {
        self.oracle_text
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    pub fn is_creature(&self) -> bool {
        self.has_type("creature")
    }

    pub fn is_land(&self) -> bool {
        self.has_type("land")
    }

    pub fn is_instant(&self) -> bool {
        self.has_type("instant")
    }

    pub fn is_sorcery(&self) -> bool {
        self.has_type("sorcery")
    }

    pub fn is_artifact(&self) -> bool {
        self.has_type("artifact")
    }

    /// Instants and sorceries go to the graveyard after resolving
    pub fn is_permanent(&self) -> bool {
        !self.is_instant() && !self.is_sorcery()
    }

    pub fn is_legendary(&self) -> bool {
        self.legendary || self.has_type("legendary")
    }

    pub fn is_basic_land(&self) -> bool {
        self.is_land() && (self.has_type("basic") || self.basic_land_color().is_some())
    }

    /// Fixed color of a basic land type named in the type line or name
    pub fn basic_land_color(&self) -> Option<Color> {
        const BASICS: [(&str, Color); 5] = [
            ("plains", Color::White),
            ("island", Color::Blue),
            ("swamp", Color::Black),
            ("mountain", Color::Red),
            ("forest", Color::Green),
        ];
        let type_line = self.type_line_lower();
        let name = self.name.as_str().to_lowercase();
        BASICS
            .iter()
            .find(|(basic, _)| type_line.contains(basic) || name == *basic)
            .map(|(_, color)| *color)
    }

    pub fn enters_tapped(&self) -> bool {
        self.has_text("enters the battlefield tapped") || self.has_text("enters tapped")
    }

    /// Current power: printed value plus modifiers
    pub fn power(&self) -> i32 {
        self.power.as_ref().map_or(0, StatValue::value) + self.power_modifier
    }

    /// Current toughness: printed value plus modifiers
    pub fn toughness(&self) -> i32 {
        self.toughness.as_ref().map_or(0, StatValue::value) + self.toughness_modifier
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }

    /// Add counters; +1/+1 counters also raise both modifiers
    pub fn add_counters(&mut self, kind: &CounterType, amount: u32) {
        if let Some((_, count)) = self.counters.iter_mut().find(|(k, _)| k == kind) {
            *count += amount;
        } else {
            self.counters.push((kind.clone(), amount));
        }

        if kind.is_plus_one_plus_one() {
            self.power_modifier += amount as i32;
            self.toughness_modifier += amount as i32;
        }
    }

    pub fn get_counter(&self, kind: &CounterType) -> u32 {
        self.counters
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Lethal damage check used by state-based actions
    pub fn has_lethal_damage(&self) -> bool {
        self.is_creature() && self.damage > 0 && self.damage >= self.toughness()
    }
}

impl GameEntity for Card {
    type Id = CardId;

    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
