//! Resistances and vulnerabilities against damage types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::damage::DamageType;
use crate::error::{CoreError, CoreResult};

/// Whether a modifier lowers or raises incoming damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    /// Lowers incoming damage.
    Resistance,
    /// Raises incoming damage.
    Vulnerability,
}

/// A resistance or vulnerability tied to one damage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageModifier {
    /// Resistance or vulnerability.
    pub kind: ModifierKind,
    /// The declared damage type; class-wide types cover their whole class.
    pub damage_type: DamageType,
    /// Flat amount, or factor when `multiplicative` is set.
    pub value: f64,
    /// Whether `value` multiplies instead of adding.
    #[serde(default)]
    pub multiplicative: bool,
    /// Remaining rounds, `None` while permanent.
    #[serde(default)]
    pub duration: Option<u32>,
}

impl DamageModifier {
    /// A flat resistance.
    pub fn resistance(damage_type: DamageType, value: f64) -> Self {
        Self {
            kind: ModifierKind::Resistance,
            damage_type,
            value,
            multiplicative: false,
            duration: None,
        }
    }

    /// A flat vulnerability.
    pub fn vulnerability(damage_type: DamageType, value: f64) -> Self {
        Self {
            kind: ModifierKind::Vulnerability,
            damage_type,
            value,
            multiplicative: false,
            duration: None,
        }
    }

    /// A multiplicative resistance; the factor must lie in `[0, 1]`.
    pub fn resistance_factor(damage_type: DamageType, factor: f64) -> CoreResult<Self> {
        Self {
            multiplicative: true,
            ..Self::resistance(damage_type, factor)
        }
        .validated()
    }

    /// A multiplicative vulnerability; the factor must be at least 1.
    pub fn vulnerability_factor(damage_type: DamageType, factor: f64) -> CoreResult<Self> {
        Self {
            multiplicative: true,
            ..Self::vulnerability(damage_type, factor)
        }
        .validated()
    }

    /// Limit the modifier to a number of rounds.
    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    /// Check the value range of a multiplicative modifier.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.value.is_finite() {
            return Err(CoreError::InvalidModifier(format!(
                "{self}: value must be finite"
            )));
        }
        if !self.multiplicative {
            return Ok(());
        }
        match self.kind {
            ModifierKind::Resistance if !(0.0..=1.0).contains(&self.value) => Err(
                CoreError::InvalidModifier(format!("{self}: factor must be between 0 and 1")),
            ),
            ModifierKind::Vulnerability if self.value < 1.0 => Err(CoreError::InvalidModifier(
                format!("{self}: factor must be at least 1"),
            )),
            _ => Ok(()),
        }
    }

    /// Validate and return self.
    pub fn validated(self) -> CoreResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Whether this modifier applies to incoming damage of `incoming` type.
    pub fn applies_to(&self, incoming: DamageType) -> bool {
        self.damage_type.matches(incoming)
    }
}

impl fmt::Display for DamageModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ModifierKind::Resistance => "resistance",
            ModifierKind::Vulnerability => "vulnerability",
        };
        let mode = if self.multiplicative { "x" } else { "+" };
        write!(f, "{} {kind} {mode}{}", self.damage_type, self.value)
    }
}

/// An ordered collection of damage modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSet {
    modifiers: Vec<DamageModifier>,
}

impl ModifierSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from modifiers, validating each one.
    pub fn from_modifiers(modifiers: impl IntoIterator<Item = DamageModifier>) -> CoreResult<Self> {
        let mut set = Self::new();
        for modifier in modifiers {
            set.add(modifier)?;
        }
        Ok(set)
    }

    /// Add a modifier after validating it.
    pub fn add(&mut self, modifier: DamageModifier) -> CoreResult<()> {
        modifier.validate()?;
        self.modifiers.push(modifier);
        Ok(())
    }

    /// Remove the first modifier equal to `modifier`. Returns whether one was removed.
    pub fn remove(&mut self, modifier: &DamageModifier) -> bool {
        match self.modifiers.iter().position(|m| m == modifier) {
            Some(index) => {
                self.modifiers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Validate every modifier (used after deserialization).
    pub fn validate(&self) -> CoreResult<()> {
        self.modifiers.iter().try_for_each(DamageModifier::validate)
    }

    /// Count down timed modifiers and drop the ones that ran out.
    ///
    /// Returns the number of expired modifiers.
    pub fn tick(&mut self) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain_mut(|m| match m.duration.as_mut() {
            Some(rounds) => {
                *rounds = rounds.saturating_sub(1);
                *rounds > 0
            }
            None => true,
        });
        before - self.modifiers.len()
    }

    /// Every modifier, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DamageModifier> {
        self.modifiers.iter()
    }

    /// The modifiers of one kind.
    pub fn of_kind(&self, kind: ModifierKind) -> impl Iterator<Item = &DamageModifier> {
        self.modifiers.iter().filter(move |m| m.kind == kind)
    }

    /// Number of modifiers.
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl Extend<DamageModifier> for ModifierSet {
    fn extend<T: IntoIterator<Item = DamageModifier>>(&mut self, iter: T) {
        self.modifiers.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ModifierSet {
    type Item = &'a DamageModifier;
    type IntoIter = std::slice::Iter<'a, DamageModifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.modifiers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_ranges_are_enforced() {
        assert!(DamageModifier::resistance_factor(DamageType::Fire, 0.5).is_ok());
        assert!(DamageModifier::resistance_factor(DamageType::Fire, 0.0).is_ok());
        assert!(DamageModifier::resistance_factor(DamageType::Fire, 1.5).is_err());
        assert!(DamageModifier::resistance_factor(DamageType::Fire, -0.1).is_err());
        assert!(DamageModifier::vulnerability_factor(DamageType::Cold, 2.0).is_ok());
        assert!(DamageModifier::vulnerability_factor(DamageType::Cold, 0.5).is_err());
    }

    #[test]
    fn additive_values_are_unrestricted() {
        assert!(DamageModifier::resistance(DamageType::Fire, 7.0).validate().is_ok());
        assert!(
            DamageModifier::vulnerability(DamageType::Fire, -2.0)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn set_rejects_invalid_modifier() {
        let mut set = ModifierSet::new();
        let bad = DamageModifier {
            multiplicative: true,
            ..DamageModifier::resistance(DamageType::Sonic, 3.0)
        };
        assert!(matches!(set.add(bad), Err(CoreError::InvalidModifier(_))));
        assert!(set.is_empty());
    }

    #[test]
    fn tick_expires_timed_modifiers() {
        let mut set = ModifierSet::from_modifiers([
            DamageModifier::resistance(DamageType::Fire, 2.0).with_duration(2),
            DamageModifier::resistance(DamageType::Cold, 1.0),
        ])
        .unwrap();
        assert_eq!(set.tick(), 0);
        assert_eq!(set.len(), 2);
        assert_eq!(set.tick(), 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().damage_type, DamageType::Cold);
    }

    #[test]
    fn remove_and_filter_by_kind() {
        let fire = DamageModifier::resistance(DamageType::Fire, 2.0);
        let mut set = ModifierSet::from_modifiers([
            fire.clone(),
            DamageModifier::vulnerability(DamageType::Radiant, 1.0),
        ])
        .unwrap();
        assert_eq!(set.of_kind(ModifierKind::Vulnerability).count(), 1);
        assert!(set.remove(&fire));
        assert!(!set.remove(&fire));
        assert_eq!(set.of_kind(ModifierKind::Resistance).count(), 0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let m: DamageModifier = serde_json::from_str(
            r#"{"kind": "resistance", "damage_type": "physical",
                "value": 0.5, "multiplicative": true}"#,
        )
        .unwrap();
        assert!(m.applies_to(DamageType::Piercing));
        assert_eq!(m.duration, None);
        assert!(m.validate().is_ok());
    }
}
