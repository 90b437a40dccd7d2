//! Damage taxonomy: types, their class, and damage events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two top-level damage classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageClass {
    /// Reduced by physical damage reduction.
    Physical,
    /// Reduced by mystical damage reduction.
    Mystical,
}

/// A damage type.
///
/// `Physical` and `Mystical` are class-wide types: a modifier declared with
/// one of them applies to every specific type of that class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    /// Every physical type.
    Physical,
    /// Blunt force.
    Bludgeoning,
    /// Cold.
    Cold,
    /// Acid and corrosion.
    Corrosion,
    /// Fire.
    Fire,
    /// Lightning.
    Lightning,
    /// Puncturing.
    Piercing,
    /// Poison.
    Poison,
    /// Cutting.
    Slashing,
    /// Every mystical type.
    Mystical,
    /// Mind.
    Psychic,
    /// Holy light.
    Radiant,
    /// Sound.
    Sonic,
    /// Shadow.
    Umbral,
}

impl DamageType {
    /// The class this type belongs to.
    pub fn class(self) -> DamageClass {
        match self {
            Self::Physical
            | Self::Bludgeoning
            | Self::Cold
            | Self::Corrosion
            | Self::Fire
            | Self::Lightning
            | Self::Piercing
            | Self::Poison
            | Self::Slashing => DamageClass::Physical,
            Self::Mystical | Self::Psychic | Self::Radiant | Self::Sonic | Self::Umbral => {
                DamageClass::Mystical
            }
        }
    }

    /// Whether this is one of the class-wide types.
    pub fn is_class_wide(self) -> bool {
        matches!(self, Self::Physical | Self::Mystical)
    }

    /// Whether a modifier declared for `self` applies to incoming `incoming` damage.
    pub fn matches(self, incoming: DamageType) -> bool {
        self == incoming || (self.is_class_wide() && self.class() == incoming.class())
    }

    /// Parse a lowercase type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "physical" => Some(Self::Physical),
            "bludgeoning" => Some(Self::Bludgeoning),
            "cold" => Some(Self::Cold),
            "corrosion" => Some(Self::Corrosion),
            "fire" => Some(Self::Fire),
            "lightning" => Some(Self::Lightning),
            "piercing" => Some(Self::Piercing),
            "poison" => Some(Self::Poison),
            "slashing" => Some(Self::Slashing),
            "mystical" => Some(Self::Mystical),
            "psychic" => Some(Self::Psychic),
            "radiant" => Some(Self::Radiant),
            "sonic" => Some(Self::Sonic),
            "umbral" => Some(Self::Umbral),
            _ => None,
        }
    }

    /// The lowercase type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Bludgeoning => "bludgeoning",
            Self::Cold => "cold",
            Self::Corrosion => "corrosion",
            Self::Fire => "fire",
            Self::Lightning => "lightning",
            Self::Piercing => "piercing",
            Self::Poison => "poison",
            Self::Slashing => "slashing",
            Self::Mystical => "mystical",
            Self::Psychic => "psychic",
            Self::Radiant => "radiant",
            Self::Sonic => "sonic",
            Self::Umbral => "umbral",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable damage event: a type and a magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    /// The damage type.
    #[serde(rename = "type")]
    pub kind: DamageType,
    /// The raw magnitude before any modifier.
    pub value: i32,
}

impl Damage {
    /// Create a damage event.
    pub fn new(kind: DamageType, value: i32) -> Self {
        Self { kind, value }
    }

    /// The same type with a different magnitude.
    pub fn with_value(self, value: i32) -> Self {
        Self { value, ..self }
    }
}

impl fmt::Display for Damage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.kind)
    }
}
