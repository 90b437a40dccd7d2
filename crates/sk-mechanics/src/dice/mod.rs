//! Dice types, pools, and rolling.
//!
//! Attack rolls use pools of d20 keeping the highest or lowest die; help and
//! roll-bonus dice are summed.

pub mod pool;
pub mod roll;

pub use pool::DicePool;
pub use roll::{DieResult, Keep, RollResult};

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> i32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
        }
    }

    /// Roll the die once.
    pub fn roll(self, rng: &mut StdRng) -> i32 {
        rng.random_range(1..=self.sides())
    }

    /// Parse a die from a string like "d20" or "D6".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "d4" => Some(Self::D4),
            "d6" => Some(Self::D6),
            "d8" => Some(Self::D8),
            "d10" => Some(Self::D10),
            "d12" => Some(Self::D12),
            "d20" => Some(Self::D20),
            _ => None,
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}
