//! Resource tracks (health, stamina, mana, grit, action points).
//!
//! A track is a clamped numeric value with a min and max. Maxima follow the
//! actor's effective attributes, so tracks can be re-bounded mid-combat.

use serde::{Deserialize, Serialize};

/// A named numeric resource that is clamped between min and max.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Display name of the track.
    pub name: String,
    /// Current value.
    pub current: i32,
    /// Maximum value.
    pub max: i32,
    /// Minimum value (0, or the death threshold for health).
    pub min: i32,
}

impl Track {
    /// Create a new track starting at its maximum value.
    pub fn new(name: impl Into<String>, max: i32) -> Self {
        Self::with_floor(name, max, 0)
    }

    /// Create a full track with a custom minimum.
    pub fn with_floor(name: impl Into<String>, max: i32, min: i32) -> Self {
        let min = min.min(0);
        Self {
            name: name.into(),
            current: max.max(min),
            max,
            min,
        }
    }

    /// Adjust the track by a delta, clamping to bounds. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.current = self
            .current
            .saturating_add(delta)
            .clamp(self.min, self.max.max(self.min));
        self.current
    }

    /// Whether `amount` can be paid without going below zero.
    pub fn can_afford(&self, amount: i32) -> bool {
        amount <= 0 || self.current >= amount
    }

    /// Refill to the maximum.
    pub fn restore(&mut self) {
        self.current = self.max.max(self.min);
    }

    /// Change the bounds, keeping the current value inside them.
    pub fn rebound(&mut self, max: i32, min: i32) {
        self.max = max;
        self.min = min.min(0);
        self.current = self.current.clamp(self.min, self.max.max(self.min));
    }

    /// Returns true if the track is at its minimum value.
    pub fn is_empty(&self) -> bool {
        self.current <= self.min
    }

    /// Returns true if the track is at its maximum value.
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Returns the fraction of the track that is filled (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.max <= 0 {
            return 0.0;
        }
        f64::from(self.current.max(0)) / f64::from(self.max)
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}/{}", self.name, self.current, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_max() {
        let t = Track::new("HP", 10);
        assert_eq!(t.current, 10);
        assert!(t.is_full());
        assert!(!t.is_empty());
    }

    #[test]
    fn adjust_clamps_to_floor() {
        let mut t = Track::new("AP", 4);
        assert_eq!(t.adjust(-6), 0);
        assert!(t.is_empty());
        assert_eq!(t.adjust(10), 4);
    }

    #[test]
    fn health_may_fall_to_negative_floor() {
        let mut hp = Track::with_floor("HP", 10, -5);
        assert_eq!(hp.adjust(-12), -2);
        assert_eq!(hp.adjust(-12), -5);
    }

    #[test]
    fn positive_floor_is_ignored() {
        let t = Track::with_floor("HP", 10, 3);
        assert_eq!(t.min, 0);
    }

    #[test]
    fn can_afford() {
        let t = Track::new("MP", 1);
        assert!(t.can_afford(0));
        assert!(t.can_afford(1));
        assert!(!t.can_afford(2));
    }

    #[test]
    fn rebound_clamps_current() {
        let mut t = Track::new("HP", 12);
        t.rebound(8, 0);
        assert_eq!(t.current, 8);
        t.rebound(20, 0);
        assert_eq!(t.current, 8);
    }

    #[test]
    fn fraction() {
        let mut t = Track::new("HP", 10);
        t.adjust(-5);
        assert!((t.fraction() - 0.5).abs() < f64::EPSILON);
        assert!((Track::new("X", 0).fraction()).abs() < f64::EPSILON);
    }

    #[test]
    fn display() {
        let t = Track::new("HP", 10);
        assert_eq!(t.to_string(), "HP: 10/10");
    }
}
