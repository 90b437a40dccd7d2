//! Timed effect bundles attached to entities.
//!
//! A [`Trait`] carries attribute bonuses and damage modifiers for a number
//! of rounds (or permanently). Entities hold them in a [`TraitSet`], which
//! merges same-named traits and expires them as rounds pass.

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::condition::Condition;
use crate::error::CoreResult;
use crate::modifier::{DamageModifier, ModifierSet};

/// A named bundle of attributes and damage modifiers with a duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    /// Name; traits with the same name stack by duration, not by effect.
    pub name: String,
    /// Remaining rounds, `None` while permanent.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Attribute contribution.
    #[serde(default)]
    pub attributes: Attributes,
    /// Damage modifier contribution.
    #[serde(default)]
    pub modifiers: ModifierSet,
}

impl Trait {
    /// A permanent trait with no effect yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: None,
            attributes: Attributes::default(),
            modifiers: ModifierSet::new(),
        }
    }

    /// A timed trait raising a condition flag.
    pub fn condition(condition: Condition, rounds: u32) -> Self {
        let mut attributes = Attributes::default();
        condition.apply(&mut attributes);
        Self::new(condition.name())
            .with_duration(rounds)
            .with_attributes(attributes)
    }

    /// Limit the trait to a number of rounds.
    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    /// Replace the attribute contribution.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add a damage modifier, validating it.
    pub fn with_modifier(mut self, modifier: DamageModifier) -> CoreResult<Self> {
        self.modifiers.add(modifier)?;
        Ok(self)
    }

    /// Validate the modifiers (used after deserialization).
    pub fn validate(&self) -> CoreResult<()> {
        self.modifiers.validate()
    }

    /// Whether the trait never expires.
    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }
}

/// The active traits of one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitSet {
    traits: Vec<Trait>,
}

impl TraitSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trait; a trait with the same name keeps the longer duration.
    ///
    /// Returns `true` when the trait was newly inserted, `false` when it
    /// merged into an existing one.
    pub fn add(&mut self, new_trait: Trait) -> bool {
        match self.traits.iter_mut().find(|t| t.name == new_trait.name) {
            Some(existing) => {
                existing.duration = match (existing.duration, new_trait.duration) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                };
                false
            }
            None => {
                self.traits.push(new_trait);
                true
            }
        }
    }

    /// Remove a trait by name. Returns whether one was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.traits.len();
        self.traits.retain(|t| t.name != name);
        self.traits.len() != before
    }

    /// Count down every timed trait and its timed modifiers; drop expired traits.
    ///
    /// Returns the names of the traits that expired.
    pub fn tick(&mut self) -> Vec<String> {
        let mut expired = Vec::new();
        self.traits.retain_mut(|t| {
            t.modifiers.tick();
            match t.duration.as_mut() {
                Some(rounds) => {
                    *rounds = rounds.saturating_sub(1);
                    if *rounds == 0 {
                        expired.push(t.name.clone());
                        false
                    } else {
                        true
                    }
                }
                None => true,
            }
        });
        expired
    }

    /// Look up a trait by name.
    pub fn get(&self, name: &str) -> Option<&Trait> {
        self.traits.iter().find(|t| t.name == name)
    }

    /// Whether a trait with this name is active.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Every active trait.
    pub fn iter(&self) -> impl Iterator<Item = &Trait> {
        self.traits.iter()
    }

    /// Number of active traits.
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    /// Whether no trait is active.
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

impl FromIterator<Trait> for TraitSet {
    fn from_iter<T: IntoIterator<Item = Trait>>(iter: T) -> Self {
        let mut set = Self::new();
        for t in iter {
            set.add(t);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamageType;

    #[test]
    fn same_name_keeps_longest_duration() {
        let mut set = TraitSet::new();
        set.add(Trait::new("Bless").with_duration(3));
        set.add(Trait::new("Bless").with_duration(5));
        set.add(Trait::new("Bless").with_duration(2));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Bless").unwrap().duration, Some(5));
    }

    #[test]
    fn add_reports_insertion_not_merge() {
        let mut set = TraitSet::new();
        assert!(set.add(Trait::new("Bless").with_duration(2)));
        assert!(!set.add(Trait::new("Bless").with_duration(4)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn permanent_wins_over_timed() {
        let mut set = TraitSet::new();
        set.add(Trait::new("Rage").with_duration(3));
        set.add(Trait::new("Rage"));
        assert!(set.get("Rage").unwrap().is_permanent());
    }

    #[test]
    fn tick_expires_and_reports() {
        let mut set: TraitSet = [
            Trait::new("Short").with_duration(1),
            Trait::new("Long").with_duration(2),
            Trait::new("Forever"),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.tick(), vec!["Short".to_string()]);
        assert_eq!(set.tick(), vec!["Long".to_string()]);
        assert!(set.tick().is_empty());
        assert!(set.contains("Forever"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn tick_counts_down_trait_modifiers() {
        let mut set = TraitSet::new();
        set.add(
            Trait::new("Ward")
                .with_modifier(DamageModifier::resistance(DamageType::Fire, 2.0).with_duration(1))
                .unwrap(),
        );
        set.tick();
        assert!(set.get("Ward").unwrap().modifiers.is_empty());
    }

    #[test]
    fn condition_trait_raises_flag() {
        let t = Trait::condition(Condition::Slowed, 2);
        assert_eq!(t.name, "Slowed");
        assert_eq!(t.duration, Some(2));
        assert!(t.attributes.is_slowed);
    }

    #[test]
    fn remove_by_name() {
        let mut set = TraitSet::new();
        set.add(Trait::new("Hex"));
        assert!(set.remove("Hex"));
        assert!(!set.remove("Hex"));
    }
}
