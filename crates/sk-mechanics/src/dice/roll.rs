//! Dice roll results and aggregation.

use serde::{Deserialize, Serialize};

use super::Die;

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The type of die that was rolled.
    pub die: Die,
    /// The value rolled (1 to die.sides()).
    pub value: i32,
}

/// Which die of a pool counts for a keep-one roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keep {
    /// Keep the highest die (advantage).
    Highest,
    /// Keep the lowest die (disadvantage, or a single roll).
    Lowest,
}

/// The result of rolling an entire dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Individual die results.
    pub dice: Vec<DieResult>,
}

impl RollResult {
    /// Build a result from raw values of one die type.
    pub fn of(die: Die, values: &[i32]) -> Self {
        Self {
            dice: values.iter().map(|&value| DieResult { die, value }).collect(),
        }
    }

    /// Sum of all die values.
    pub fn total(&self) -> i32 {
        self.dice.iter().map(|d| d.value).sum()
    }

    /// The highest single die value, or 0 if empty.
    pub fn highest(&self) -> i32 {
        self.dice.iter().map(|d| d.value).max().unwrap_or(0)
    }

    /// The lowest single die value, or 0 if empty.
    pub fn lowest(&self) -> i32 {
        self.dice.iter().map(|d| d.value).min().unwrap_or(0)
    }

    /// The kept die value.
    pub fn keep(&self, keep: Keep) -> i32 {
        match keep {
            Keep::Highest => self.highest(),
            Keep::Lowest => self.lowest(),
        }
    }

    /// Raw values in roll order.
    pub fn values(&self) -> Vec<i32> {
        self.dice.iter().map(|d| d.value).collect()
    }

    /// Number of dice in the result.
    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}] = {}", values.join(", "), self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total() {
        let r = RollResult::of(Die::D20, &[15, 8]);
        assert_eq!(r.total(), 23);
    }

    #[test]
    fn keep_highest_and_lowest() {
        let r = RollResult::of(Die::D20, &[3, 17, 9]);
        assert_eq!(r.keep(Keep::Highest), 17);
        assert_eq!(r.keep(Keep::Lowest), 3);
    }

    #[test]
    fn empty_result() {
        let r = RollResult::default();
        assert_eq!(r.total(), 0);
        assert_eq!(r.highest(), 0);
        assert_eq!(r.lowest(), 0);
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn display() {
        let r = RollResult::of(Die::D6, &[3, 5]);
        assert_eq!(r.to_string(), "[3, 5] = 8");
        assert_eq!(r.values(), vec![3, 5]);
    }
}
