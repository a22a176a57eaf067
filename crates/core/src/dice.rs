//! Dice notation parsing and rolling for the `!roll` command.
//!
//! Accepts `NdM`, `dM`, `NdM+K` and `NdM-K` (case-insensitive, spaces
//! around the sign allowed).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::CoreError;

/// Maximum number of dice in one expression.
pub const MAX_DICE: u32 = 100;

/// Maximum number of sides on one die.
pub const MAX_SIDES: u32 = 1000;

/// Largest accepted flat modifier magnitude.
pub const MAX_MODIFIER: i32 = 10_000;

static DICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d*)\s*d\s*(\d+)\s*(?:([+-])\s*(\d+))?\s*$").expect("valid regex")
});

/// A parsed dice expression such as `3d6+2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    /// A single d20 with a flat modifier, used for ability and skill checks.
    pub fn d20(modifier: i32) -> Self {
        Self {
            count: 1,
            sides: 20,
            modifier,
        }
    }

    /// Roll every die and sum the result with the modifier.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> RollResult {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.random_range(1..=self.sides))
            .collect();
        let total = rolls.iter().map(|&r| i64::from(r)).sum::<i64>() + i64::from(self.modifier);
        RollResult {
            expr: *self,
            rolls,
            total,
        }
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

impl FromStr for DiceExpr {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = DICE_RE.captures(s).ok_or_else(|| {
            CoreError::validation(format!("'{s}' is not dice notation (try 2d6+3)"))
        })?;

        let count = match caps.get(1).map(|m| m.as_str()) {
            None | Some("") => 1,
            Some(n) => n
                .parse::<u32>()
                .map_err(|_| CoreError::validation("Too many dice"))?,
        };
        let sides = caps[2]
            .parse::<u32>()
            .map_err(|_| CoreError::validation("Too many sides"))?;
        let modifier = match (caps.get(3), caps.get(4)) {
            (Some(sign), Some(value)) => {
                let magnitude = value
                    .as_str()
                    .parse::<i32>()
                    .ok()
                    .filter(|m| *m <= MAX_MODIFIER)
                    .ok_or_else(|| {
                        CoreError::validation(format!("Modifier must be at most {MAX_MODIFIER}"))
                    })?;
                if sign.as_str() == "-" {
                    -magnitude
                } else {
                    magnitude
                }
            }
            _ => 0,
        };

        if !(1..=MAX_DICE).contains(&count) {
            return Err(CoreError::validation(format!(
                "Dice count must be between 1 and {MAX_DICE}"
            )));
        }
        if !(2..=MAX_SIDES).contains(&sides) {
            return Err(CoreError::validation(format!(
                "Dice must have between 2 and {MAX_SIDES} sides"
            )));
        }

        Ok(DiceExpr {
            count,
            sides,
            modifier,
        })
    }
}

/// The outcome of rolling a [`DiceExpr`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    pub expr: DiceExpr,
    pub rolls: Vec<u32>,
    pub total: i64,
}

impl RollResult {
    /// One-line summary, e.g. `2d6+3: [4, 5] +3 = **12**`.
    pub fn describe(&self) -> String {
        let rolls = self
            .rolls
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let modifier = match self.expr.modifier {
            0 => String::new(),
            m if m > 0 => format!(" +{m}"),
            m => format!(" {m}"),
        };
        format!("{}: [{rolls}]{modifier} = **{}**", self.expr, self.total)
    }
}
