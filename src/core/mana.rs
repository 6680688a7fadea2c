//! Mana system for casting spells

use nom::{
    branch::alt,
    character::complete::{anychar, digit1, one_of},
    combinator::{map, map_res},
    multi::many0,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mana colors, plus colorless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "C")]
    Colorless,
}

impl Color {
    pub fn from_symbol(symbol: char) -> Option<Color> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'C' => Some(Color::Colorless),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "W"),
            Color::Blue => write!(f, "U"),
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
            Color::Green => write!(f, "G"),
            Color::Colorless => write!(f, "C"),
        }
    }
}

/// One symbol of a brace-stripped cost string
enum CostSymbol {
    Generic(u32),
    Colored(Color),
    Other,
}

fn cost_symbol(input: &str) -> IResult<&str, CostSymbol> {
    alt((
        map(map_res(digit1, |d: &str| d.parse::<u32>()), CostSymbol::Generic),
        map(one_of("WUBRGC"), |c| {
            Color::from_symbol(c).map_or(CostSymbol::Other, CostSymbol::Colored)
        }),
        map(anychar, |_| CostSymbol::Other),
    ))(input)
}

/// Represents a mana cost (e.g., "{2}{R}{R}" = 2 generic + 2 red)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaCost {
    pub generic: u8,
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a cost string such as "{2}{G}{G}" or "1UB"
    ///
    /// Braces are stripped, each color letter is counted, and every run of
    /// digits is summed into the generic component. Anything else (X, hybrid
    /// slashes, phyrexian markers) is ignored.
    pub fn from_string(s: &str) -> Self {
        let stripped: String = s
            .chars()
            .filter(|c| *c != '{' && *c != '}')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let mut cost = ManaCost::new();
        let symbols = match many0(cost_symbol)(stripped.as_str()) {
            Ok((_, symbols)) => symbols,
            Err(_) => return cost,
        };

        let mut generic: u32 = 0;
        for symbol in symbols {
            match symbol {
                CostSymbol::Generic(n) => generic = generic.saturating_add(n),
                CostSymbol::Colored(color) => cost.add_symbol(color),
                CostSymbol::Other => {}
            }
        }
        cost.generic = generic.min(u8::MAX as u32) as u8;
        cost
    }

    fn add_symbol(&mut self, color: Color) {
        let slot = match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Colorless => &mut self.colorless,
        };
        *slot = slot.saturating_add(1);
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u32 {
        self.generic as u32
            + self.white as u32
            + self.blue as u32
            + self.black as u32
            + self.red as u32
            + self.green as u32
            + self.colorless as u32
    }

    /// Same cost with extra generic mana (commander tax)
    pub fn with_additional_generic(&self, extra: u32) -> Self {
        let mut cost = *self;
        cost.generic = (cost.generic as u32 + extra).min(u8::MAX as u32) as u8;
        cost
    }

    /// Colored requirement for a single color
    pub fn amount_of(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Colorless => self.colorless,
        }
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 || self.cmc() == 0 {
            write!(f, "{{{}}}", self.generic)?;
        }
        for (count, symbol) in [
            (self.white, 'W'),
            (self.blue, 'U'),
            (self.black, 'B'),
            (self.red, 'R'),
            (self.green, 'G'),
            (self.colorless, 'C'),
        ] {
            for _ in 0..count {
                write!(f, "{{{symbol}}}")?;
            }
        }
        Ok(())
    }
}

/// Mana pool for a player, keyed by the five colors plus colorless
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaPool {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Colorless => &mut self.colorless,
        }
    }

    pub fn add_color(&mut self, color: Color) {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_add(1);
    }

    pub fn amount_of(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Colorless => self.colorless,
        }
    }

    pub fn total(&self) -> u32 {
        self.white as u32
            + self.blue as u32
            + self.black as u32
            + self.red as u32
            + self.green as u32
            + self.colorless as u32
    }

    pub fn clear(&mut self) {
        *self = ManaPool::new();
    }

    /// Greedy feasibility check
    ///
    /// Every colored requirement must be met by that color exactly; the
    /// generic part must fit in whatever is left once the colored amounts
    /// are set aside. This is not a minimal-payment solver.
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        const COLORS: [Color; 6] = [
            Color::White,
            Color::Blue,
            Color::Black,
            Color::Red,
            Color::Green,
            Color::Colorless,
        ];
        if COLORS
            .iter()
            .any(|&color| self.amount_of(color) < cost.amount_of(color))
        {
            return false;
        }

        let colored: u32 = COLORS.iter().map(|&c| cost.amount_of(c) as u32).sum();
        self.total() - colored >= cost.generic as u32
    }

    /// Pay a mana cost from this pool
    ///
    /// Colored requirements come out first, then generic is paid with
    /// colorless mana before WUBRG.
    pub fn pay_cost(&mut self, cost: &ManaCost) -> Result<(), String> {
        if !self.can_pay(cost) {
            return Err(format!(
                "Insufficient mana to pay cost {}. Pool has: {}W {}U {}B {}R {}G {}C",
                cost, self.white, self.blue, self.black, self.red, self.green, self.colorless
            ));
        }

        self.white -= cost.white;
        self.blue -= cost.blue;
        self.black -= cost.black;
        self.red -= cost.red;
        self.green -= cost.green;
        self.colorless -= cost.colorless;

        let mut generic_remaining = cost.generic;
        for color in [
            Color::Colorless,
            Color::White,
            Color::Blue,
            Color::Black,
            Color::Red,
            Color::Green,
        ] {
            if generic_remaining == 0 {
                break;
            }
            let slot = self.slot_mut(color);
            let paid = (*slot).min(generic_remaining);
            *slot -= paid;
            generic_remaining -= paid;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_cost_parsing() {
        let cost = ManaCost::from_string("{2}{R}{R}");
        assert_eq!(cost.generic, 2);
        assert_eq!(cost.red, 2);
        assert_eq!(cost.cmc(), 4);

        let cost = ManaCost::from_string("1UB");
        assert_eq!(cost.generic, 1);
        assert_eq!(cost.blue, 1);
        assert_eq!(cost.black, 1);
    }

    #[test]
    fn test_mana_cost_double_digit_generic() {
        let cost = ManaCost::from_string("{10}{G}");
        assert_eq!(cost.generic, 10);
        assert_eq!(cost.green, 1);
        assert_eq!(cost.cmc(), 11);
    }

    #[test]
    fn test_mana_cost_ignores_x_and_empty() {
        let cost = ManaCost::from_string("{X}{G}");
        assert_eq!(cost.generic, 0);
        assert_eq!(cost.green, 1);

        assert_eq!(ManaCost::from_string(""), ManaCost::new());
    }

    #[test]
    fn test_can_pay_colored_and_generic() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::Green);
        pool.add_color(Color::Green);
        pool.add_color(Color::Red);

        assert!(pool.can_pay(&ManaCost::from_string("{1}{G}{G}")));
        assert!(!pool.can_pay(&ManaCost::from_string("{G}{G}{G}")));
        assert!(!pool.can_pay(&ManaCost::from_string("{2}{G}{G}")));
        assert!(!pool.can_pay(&ManaCost::from_string("{U}")));
    }

    #[test]
    fn test_pay_cost_prefers_colorless_for_generic() {
        let mut pool = ManaPool::new();
        pool.add_color(Color::Colorless);
        pool.add_color(Color::Green);
        pool.add_color(Color::Green);

        pool.pay_cost(&ManaCost::from_string("{1}{G}")).unwrap();
        assert_eq!(pool.colorless, 0);
        assert_eq!(pool.green, 1);

        assert!(pool.pay_cost(&ManaCost::from_string("{2}")).is_err());
    }

    #[test]
    fn test_commander_tax() {
        let cost = ManaCost::from_string("{3}{R}").with_additional_generic(4);
        assert_eq!(cost.generic, 7);
        assert_eq!(cost.cmc(), 8);
    }
}
