//! Dice pool construction and rolling.

use rand::rngs::StdRng;

use super::Die;
use super::roll::{DieResult, RollResult};

/// A collection of dice to be rolled together.
#[derive(Debug, Clone, Default)]
pub struct DicePool {
    /// The dice in this pool.
    pub dice: Vec<Die>,
}

impl DicePool {
    /// Create an empty dice pool.
    pub fn new() -> Self {
        Self { dice: Vec::new() }
    }

    /// Add `count` dice of the given type. Non-positive counts add nothing.
    pub fn add(mut self, die: Die, count: i32) -> Self {
        for _ in 0..count.max(0) {
            self.dice.push(die);
        }
        self
    }

    /// The roll-bonus pool granted by d4/d6/d8 counts.
    pub fn bonus(d4: i32, d6: i32, d8: i32) -> Self {
        Self::new().add(Die::D4, d4).add(Die::D6, d6).add(Die::D8, d8)
    }

    /// Returns how many dice are in the pool.
    pub fn count(&self) -> usize {
        self.dice.len()
    }

    /// Returns true if the pool has no dice.
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    /// Roll all dice in the pool using the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> RollResult {
        let dice = self
            .dice
            .iter()
            .map(|die| DieResult {
                die: *die,
                value: die.roll(rng),
            })
            .collect();
        RollResult { dice }
    }
}
