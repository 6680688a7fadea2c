//! Oracle text to structured abilities
//!
//! A bounded classifier, not a rules parser. Trigger detection is substring
//! matching over ASCII-normalised lowercase text; effect extraction tries a
//! fixed list of `nom` patterns in order and takes the first that matches.
//! Text that matches a trigger keyword but no effect pattern yields no
//! ability.

use crate::core::{Ability, CounterTarget, CounterType, DamageTarget, Effect, TriggerKind};
use deunicode::deunicode;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until},
    character::complete::{alpha1, digit1, space1},
    combinator::{map_opt, map_res, opt},
    sequence::{preceded, tuple},
    IResult,
};

/// Card types a targeted removal effect can name
const TARGET_TYPES: [&str; 6] = [
    "creature",
    "artifact",
    "enchantment",
    "planeswalker",
    "land",
    "permanent",
];

const COLOR_WORDS: [&str; 6] = ["white", "blue", "black", "red", "green", "colorless"];

/// Replaceable text-to-effect strategy
///
/// Implementations must be pure: same text, same answer.
pub trait EffectParser {
    /// Extract at most one effect from already-normalised text
    fn parse_effect(&self, text: &str) -> Option<Effect>;
}

/// Default strategy: ordered substring patterns
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternParser;

/// ASCII-fold and lowercase oracle text
pub fn normalize(text: &str) -> String {
    deunicode(text).to_lowercase()
}

fn count_word(word: &str) -> Option<u32> {
    match word {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        _ => None,
    }
}

/// "a", "two", "3"...
fn count(input: &str) -> IResult<&str, u32> {
    alt((
        map_res(digit1, |d: &str| d.parse::<u32>()),
        map_opt(alpha1, count_word),
    ))(input)
}

fn is_clause_end(c: char) -> bool {
    matches!(c, '.' | ',' | ';' | '\n' | '(')
}

fn token_clause(input: &str) -> IResult<&str, (u32, &str)> {
    tuple((
        preceded(tag("create "), count),
        preceded(space1, take_until("token")),
    ))(input)
}

fn destroy_clause(input: &str) -> IResult<&str, &str> {
    preceded(tag("destroy target "), take_till(is_clause_end))(input)
}

fn exile_clause(input: &str) -> IResult<&str, &str> {
    preceded(tag("exile target "), take_till(is_clause_end))(input)
}

fn draw_clause(input: &str) -> IResult<&str, u32> {
    let (rest, (n, _)) = tuple((preceded(tag("draw "), count), tag(" card")))(input)?;
    Ok((rest, n))
}

fn damage_clause(input: &str) -> IResult<&str, (u32, &str)> {
    tuple((
        preceded(tag("deals "), count),
        preceded(tag(" damage to "), take_till(is_clause_end)),
    ))(input)
}

fn life_clause(input: &str) -> IResult<&str, u32> {
    let (rest, (n, _)) = tuple((preceded(tag("gain "), count), tag(" life")))(input)?;
    Ok((rest, n))
}

fn counter_clause(input: &str) -> IResult<&str, (u32, &str, &str)> {
    let (rest, (n, kind, _, _, recipient)) = tuple((
        preceded(tag("put "), count),
        preceded(space1, take_till(|c: char| c.is_whitespace())),
        tag(" counter"),
        opt(tag("s")),
        opt(preceded(tag(" on "), take_till(is_clause_end))),
    ))(input)?;
    Ok((rest, (n, kind, recipient.unwrap_or(""))))
}

fn ramp_clause(input: &str) -> IResult<&str, (u32, &str)> {
    tuple((
        preceded(
            tuple((tag("search your library for "), opt(tag("up to ")))),
            count,
        ),
        take_till(is_clause_end),
    ))(input)
}

/// Try `parser` at every occurrence of `keyword`, keeping the first success
fn scan<'a, O, F>(text: &'a str, keyword: &str, mut parser: F) -> Option<O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    text.match_indices(keyword)
        .find_map(|(i, _)| parser(&text[i..]).ok().map(|(_, out)| out))
}

/// First word of a target phrase that names a card type
fn target_type(phrase: &str) -> Option<String> {
    phrase
        .split(|c: char| !c.is_ascii_alphabetic())
        .find(|word| TARGET_TYPES.contains(word))
        .map(str::to_string)
}

/// The token's kind: last descriptive word before "token"
fn token_kind(descriptor: &str) -> Option<String> {
    let word = descriptor
        .split_whitespace()
        .filter(|w| !w.contains('/'))
        .filter(|w| !COLOR_WORDS.contains(w))
        .filter(|w| !matches!(*w, "creature" | "artifact" | "legendary" | "tapped" | "and"))
        .last()?;

    let mut chars = word.chars();
    let first = chars.next()?;
    Some(first.to_ascii_uppercase().to_string() + chars.as_str())
}

/// "it", "this creature" and a card's own name all mean the source
fn counter_target(phrase: &str) -> CounterTarget {
    let names_other = phrase
        .split_whitespace()
        .any(|w| matches!(w, "target" | "each" | "another" | "other" | "all"));
    if names_other {
        CounterTarget::Other
    } else {
        CounterTarget::Source
    }
}

fn damage_target(phrase: &str) -> Option<DamageTarget> {
    let phrase = phrase.trim();
    if phrase.starts_with("any target") {
        Some(DamageTarget::Any)
    } else if phrase.contains("creature") {
        Some(DamageTarget::Creature)
    } else if phrase.contains("player") || phrase.contains("opponent") {
        Some(DamageTarget::Player)
    } else {
        None
    }
}

impl EffectParser for PatternParser {
    fn parse_effect(&self, text: &str) -> Option<Effect> {
        if let Some(effect) = scan(text, "create ", token_clause).and_then(|(n, desc)| {
            token_kind(desc).map(|token| Effect::CreateToken { count: n, token })
        }) {
            return Some(effect);
        }

        if let Some(target_type) = scan(text, "destroy target ", destroy_clause).and_then(target_type)
        {
            return Some(Effect::DestroyTarget { target_type });
        }

        if let Some(target_type) = scan(text, "exile target ", exile_clause).and_then(target_type) {
            return Some(Effect::ExileTarget { target_type });
        }

        if let Some(n) = scan(text, "draw ", draw_clause) {
            return Some(Effect::DrawCards { count: n });
        }

        if let Some(effect) = scan(text, "deals ", damage_clause).and_then(|(n, phrase)| {
            damage_target(phrase).map(|target| Effect::DealDamage {
                amount: n as i32,
                target,
            })
        }) {
            return Some(effect);
        }

        if let Some(n) = scan(text, "gain ", life_clause) {
            return Some(Effect::GainLife { amount: n as i32 });
        }

        if let Some((n, kind, recipient)) = scan(text, "put ", counter_clause) {
            return Some(Effect::AddCounters {
                count: n,
                kind: CounterType::new(kind),
                on: counter_target(recipient),
            });
        }

        scan(text, "search your library for ", ramp_clause)
            .filter(|(_, rest)| rest.contains("land"))
            .map(|(n, _)| Effect::Ramp { count: n })
    }
}

fn mentions_when(text: &str) -> bool {
    text.contains("when")
}

fn matches_trigger(text: &str, kind: TriggerKind) -> bool {
    match kind {
        TriggerKind::EntersBattlefield => {
            text.contains("enters the battlefield") || text.contains("enters,")
        }
        TriggerKind::Dies => {
            mentions_when(text) && (text.contains("dies") || text.contains("is put into"))
        }
        TriggerKind::Attacks => mentions_when(text) && text.contains("attacks"),
        TriggerKind::Cast => text.contains("when you cast") || text.contains("whenever you cast"),
    }
}

/// Trigger kinds present in normalised text, in a fixed order
pub fn detect_triggers(text: &str) -> Vec<TriggerKind> {
    [
        TriggerKind::EntersBattlefield,
        TriggerKind::Dies,
        TriggerKind::Attacks,
        TriggerKind::Cast,
    ]
    .into_iter()
    .filter(|&kind| matches_trigger(text, kind))
    .collect()
}

/// Parse triggered abilities with the default pattern strategy
pub fn parse_abilities(oracle_text: &str) -> Vec<Ability> {
    parse_abilities_with(&PatternParser, oracle_text)
}

/// Parse triggered abilities with any strategy
///
/// The effect for a trigger is read from the sentence that carries the
/// trigger keyword, then from that sentence to the end of the text, falling
/// back to the whole text when no sentence carries the keyword.
pub fn parse_abilities_with(parser: &dyn EffectParser, oracle_text: &str) -> Vec<Ability> {
    let text = normalize(oracle_text);
    let sentences: Vec<&str> = text
        .split(['.', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    detect_triggers(&text)
        .into_iter()
        .filter_map(|trigger| {
            let effect = match sentences.iter().find(|s| matches_trigger(s, trigger)) {
                Some(sentence) => parser.parse_effect(sentence).or_else(|| {
                    let start = text.find(*sentence)?;
                    parser.parse_effect(&text[start..])
                }),
                None => parser.parse_effect(&text),
            };
            effect.map(|effect| Ability::new(trigger, effect))
        })
        .collect()
}

/// Effect of an instant or sorcery resolving its own text
pub fn parse_spell_effect(oracle_text: &str) -> Option<Effect> {
    PatternParser.parse_effect(&normalize(oracle_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(text: &str) -> Option<Effect> {
        PatternParser.parse_effect(&normalize(text))
    }

    #[test]
    fn test_etb_token_ability() {
        let abilities = parse_abilities(
            "When this creature enters the battlefield, create a 1/1 white Soldier creature token.",
        );
        assert_eq!(
            abilities,
            vec![Ability::new(
                TriggerKind::EntersBattlefield,
                Effect::CreateToken {
                    count: 1,
                    token: "Soldier".to_string()
                }
            )]
        );
    }

    #[test]
    fn test_count_words() {
        assert_eq!(
            effect("Create two 1/1 green Saproling creature tokens."),
            Some(Effect::CreateToken {
                count: 2,
                token: "Saproling".to_string()
            })
        );
        assert_eq!(effect("Draw three cards."), Some(Effect::DrawCards { count: 3 }));
        assert_eq!(effect("You gain 4 life."), Some(Effect::GainLife { amount: 4 }));
        assert_eq!(effect("Draw X cards."), None);
    }

    #[test]
    fn test_trigger_without_effect_yields_nothing() {
        assert!(parse_abilities("When this creature dies, you may do something clever.").is_empty());
        assert!(parse_abilities("Guildgate enters the battlefield tapped.").is_empty());
    }

    #[test]
    fn test_effect_in_following_sentence() {
        let abilities = parse_abilities(
            "When this creature enters the battlefield, you may pay {1}. If you do, draw a card.",
        );
        assert_eq!(
            abilities,
            vec![Ability::new(
                TriggerKind::EntersBattlefield,
                Effect::DrawCards { count: 1 }
            )]
        );
    }

    #[test]
    fn test_effect_before_trigger_sentence_ignored() {
        let abilities =
            parse_abilities("Draw a card. When this creature dies, you may do something clever.");
        assert!(abilities.is_empty());
    }

    #[test]
    fn test_dies_and_attack_triggers() {
        let abilities = parse_abilities("When this creature dies, draw a card.");
        assert_eq!(abilities[0].trigger, TriggerKind::Dies);
        assert_eq!(abilities[0].effect, Effect::DrawCards { count: 1 });

        let abilities =
            parse_abilities("Whenever this creature attacks, it deals 1 damage to any target.");
        assert_eq!(abilities.len(), 1);
        assert_eq!(abilities[0].trigger, TriggerKind::Attacks);
        assert_eq!(
            abilities[0].effect,
            Effect::DealDamage {
                amount: 1,
                target: DamageTarget::Any
            }
        );
    }

    #[test]
    fn test_removal_targets() {
        assert_eq!(
            effect("Destroy target creature."),
            Some(Effect::DestroyTarget {
                target_type: "creature".to_string()
            })
        );
        assert_eq!(
            effect("Exile target nonland permanent."),
            Some(Effect::ExileTarget {
                target_type: "permanent".to_string()
            })
        );
    }

    #[test]
    fn test_damage_targets() {
        assert_eq!(
            effect("Shock deals 2 damage to target creature."),
            Some(Effect::DealDamage {
                amount: 2,
                target: DamageTarget::Creature
            })
        );
        assert_eq!(
            effect("It deals 3 damage to each opponent."),
            Some(Effect::DealDamage {
                amount: 3,
                target: DamageTarget::Player
            })
        );
    }

    #[test]
    fn test_counters_and_ramp() {
        assert_eq!(
            effect("Put a +1/+1 counter on this creature."),
            Some(Effect::AddCounters {
                count: 1,
                kind: CounterType::plus_one_plus_one(),
                on: CounterTarget::Source
            })
        );
        assert_eq!(
            effect("Put two +1/+1 counters on it."),
            Some(Effect::AddCounters {
                count: 2,
                kind: CounterType::plus_one_plus_one(),
                on: CounterTarget::Source
            })
        );
        assert_eq!(
            effect("Put a +1/+1 counter on target creature you control."),
            Some(Effect::AddCounters {
                count: 1,
                kind: CounterType::plus_one_plus_one(),
                on: CounterTarget::Other
            })
        );
        assert_eq!(
            effect("Search your library for up to two basic land cards, put them onto the battlefield tapped."),
            Some(Effect::Ramp { count: 2 })
        );
        assert_eq!(effect("Search your library for a creature card."), None);
    }

    #[test]
    fn test_first_pattern_wins() {
        // token creation is tried before draw
        assert_eq!(
            effect("Draw a card, then create a Treasure token."),
            Some(Effect::CreateToken {
                count: 1,
                token: "Treasure".to_string()
            })
        );
    }

    #[test]
    fn test_unicode_and_case_normalised() {
        let abilities = parse_abilities("WHEN Æther Adept ENTERS, DRAW A CARD.");
        assert_eq!(abilities.len(), 1);
        assert_eq!(abilities[0].trigger, TriggerKind::EntersBattlefield);
    }

    #[test]
    fn test_custom_strategy() {
        struct AlwaysDraw;
        impl EffectParser for AlwaysDraw {
            fn parse_effect(&self, _text: &str) -> Option<Effect> {
                Some(Effect::DrawCards { count: 1 })
            }
        }

        let abilities = parse_abilities_with(&AlwaysDraw, "When you cast this spell, flip a coin.");
        assert_eq!(abilities.len(), 1);
        assert_eq!(abilities[0].trigger, TriggerKind::Cast);
    }

    #[test]
    fn test_spell_effect() {
        assert_eq!(
            parse_spell_effect("Destroy target artifact."),
            Some(Effect::DestroyTarget {
                target_type: "artifact".to_string()
            })
        );
        assert_eq!(parse_spell_effect("Flying"), None);
    }
}
