//! Token templates
//!
//! Tokens are looked up by creature/artifact type name. The lookup is
//! case-insensitive; the returned definition carries the canonical name
//! ("Soldier Token").

use crate::core::{CardDefinition, Color};

struct TokenTemplate {
    kind: &'static str,
    type_line: &'static str,
    stats: Option<(&'static str, &'static str)>,
    color: Option<Color>,
    text: &'static str,
}

const TEMPLATES: &[TokenTemplate] = &[
    TokenTemplate {
        kind: "Soldier",
        type_line: "Token Creature - Soldier",
        stats: Some(("1", "1")),
        color: Some(Color::White),
        text: "",
    },
    TokenTemplate {
        kind: "Spirit",
        type_line: "Token Creature - Spirit",
        stats: Some(("1", "1")),
        color: Some(Color::White),
        text: "Flying",
    },
    TokenTemplate {
        kind: "Human",
        type_line: "Token Creature - Human",
        stats: Some(("1", "1")),
        color: Some(Color::White),
        text: "",
    },
    TokenTemplate {
        kind: "Angel",
        type_line: "Token Creature - Angel",
        stats: Some(("4", "4")),
        color: Some(Color::White),
        text: "Flying",
    },
    TokenTemplate {
        kind: "Zombie",
        type_line: "Token Creature - Zombie",
        stats: Some(("2", "2")),
        color: Some(Color::Black),
        text: "",
    },
    TokenTemplate {
        kind: "Goblin",
        type_line: "Token Creature - Goblin",
        stats: Some(("1", "1")),
        color: Some(Color::Red),
        text: "",
    },
    TokenTemplate {
        kind: "Saproling",
        type_line: "Token Creature - Saproling",
        stats: Some(("1", "1")),
        color: Some(Color::Green),
        text: "",
    },
    TokenTemplate {
        kind: "Wolf",
        type_line: "Token Creature - Wolf",
        stats: Some(("2", "2")),
        color: Some(Color::Green),
        text: "",
    },
    TokenTemplate {
        kind: "Beast",
        type_line: "Token Creature - Beast",
        stats: Some(("3", "3")),
        color: Some(Color::Green),
        text: "",
    },
    TokenTemplate {
        kind: "Elemental",
        type_line: "Token Creature - Elemental",
        stats: Some(("1", "1")),
        color: Some(Color::Red),
        text: "",
    },
    TokenTemplate {
        kind: "Thopter",
        type_line: "Token Artifact Creature - Thopter",
        stats: Some(("1", "1")),
        color: None,
        text: "Flying",
    },
    TokenTemplate {
        kind: "Treasure",
        type_line: "Token Artifact - Treasure",
        stats: None,
        color: None,
        text: "{T}, Sacrifice this artifact: Add one mana of any color.",
    },
    TokenTemplate {
        kind: "Food",
        type_line: "Token Artifact - Food",
        stats: None,
        color: None,
        text: "{2}, {T}, Sacrifice this artifact: You gain 3 life.",
    },
    TokenTemplate {
        kind: "Clue",
        type_line: "Token Artifact - Clue",
        stats: None,
        color: None,
        text: "{2}, Sacrifice this artifact: Draw a card.",
    },
];

/// Build the card definition for a named token kind
pub fn token_definition(kind: &str) -> Option<CardDefinition> {
    let template = TEMPLATES
        .iter()
        .find(|t| t.kind.eq_ignore_ascii_case(kind.trim()))?;

    let mut def = CardDefinition::new(format!("{} Token", template.kind), template.type_line)
        .with_text(template.text)
        .with_id(&format!("token:{}", template.kind.to_lowercase()));
    if let Some((power, toughness)) = template.stats {
        def = def.with_stats(power, toughness);
    }
    if let Some(color) = template.color {
        def = def.with_colors(&[color]);
    }
    Some(def)
}
