//! The attribute bundle shared by actors, items, and traits.
//!
//! Attributes are additive: two bundles combine field by field, integers
//! summing and flags behaving as "present in any source". Because both
//! operations are associative and commutative, the order in which sources
//! are aggregated never changes the result.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A single attribute value, as supplied through key/value overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A numeric attribute (defense, pool maximum, bonus...).
    Integer(i32),
    /// A flag attribute (mastery, condition...).
    Boolean(bool),
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

macro_rules! attribute_schema {
    (
        integers { $( $(#[doc = $idoc:expr])* $int:ident ),* $(,)? }
        flags { $( $(#[doc = $fdoc:expr])* $flag:ident ),* $(,)? }
    ) => {
        /// A fixed bundle of numeric and boolean attributes.
        ///
        /// Missing fields deserialize to zero/false, unknown fields are rejected.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct Attributes {
            $( $(#[doc = $idoc])* pub $int: i32, )*
            $( $(#[doc = $fdoc])* pub $flag: bool, )*
        }

        impl Attributes {
            /// Names of every integer field, in declaration order.
            pub const INTEGER_KEYS: &'static [&'static str] = &[$(stringify!($int)),*];

            /// Names of every flag field, in declaration order.
            pub const FLAG_KEYS: &'static [&'static str] = &[$(stringify!($flag)),*];

            /// Combine two bundles: integers add (saturating), flags OR.
            pub fn combine(&self, other: &Self) -> Self {
                Self {
                    $( $int: self.$int.saturating_add(other.$int), )*
                    $( $flag: self.$flag || other.$flag, )*
                }
            }

            /// Read a field by name.
            pub fn get(&self, key: &str) -> Option<AttributeValue> {
                match key {
                    $( stringify!($int) => Some(AttributeValue::Integer(self.$int)), )*
                    $( stringify!($flag) => Some(AttributeValue::Boolean(self.$flag)), )*
                    _ => None,
                }
            }

            /// Write a field by name.
            ///
            /// Fails on unknown keys and on integer/flag mismatches.
            pub fn set(&mut self, key: &str, value: AttributeValue) -> CoreResult<()> {
                match (key, value) {
                    $( (stringify!($int), AttributeValue::Integer(v)) => self.$int = v, )*
                    $( (stringify!($flag), AttributeValue::Boolean(v)) => self.$flag = v, )*
                    $( (stringify!($int), AttributeValue::Boolean(_)) )|* => {
                        return Err(CoreError::AttributeType {
                            key: key.to_string(),
                            expected: "an integer",
                        });
                    }
                    $( (stringify!($flag), AttributeValue::Integer(_)) )|* => {
                        return Err(CoreError::AttributeType {
                            key: key.to_string(),
                            expected: "a boolean",
                        });
                    }
                    _ => return Err(CoreError::UnknownAttribute(key.to_string())),
                }
                Ok(())
            }
        }
    };
}

attribute_schema! {
    integers {
        /// Target number for physical attacks.
        physical_defense,
        /// Target number for mystical attacks.
        mystical_defense,
        /// Flat reduction applied to physical damage.
        physical_damage_reduction,
        /// Flat reduction applied to mystical damage.
        mystical_damage_reduction,
        /// Maximum health points.
        health_points,
        /// Maximum stamina points.
        stamina_points,
        /// Maximum grit points.
        grit_points,
        /// Maximum mana points.
        mana_points,
        /// Action points restored every round.
        action_points,
        /// Might ability score.
        might,
        /// Agility ability score.
        agility,
        /// Intelligence ability score.
        intelligence,
        /// Charisma ability score.
        charisma,
        /// Flat bonus added to the prime modifier.
        prime_modifier_bonus,
        /// Might saving throw bonus.
        might_save,
        /// Agility saving throw bonus.
        agility_save,
        /// Intelligence saving throw bonus.
        intelligence_save,
        /// Charisma saving throw bonus.
        charisma_save,
        /// Might check bonus.
        might_check,
        /// Agility check bonus.
        agility_check,
        /// Intelligence check bonus.
        intelligence_check,
        /// Charisma check bonus.
        charisma_check,
        /// Might advantage (positive) or disadvantage (negative).
        might_adv,
        /// Agility advantage (positive) or disadvantage (negative).
        agility_adv,
        /// Intelligence advantage (positive) or disadvantage (negative).
        intelligence_adv,
        /// Charisma advantage (positive) or disadvantage (negative).
        charisma_adv,
        /// Bonus added to initiative rolls.
        initiative,
        /// Movement speed in spaces.
        move_speed,
        /// Proficiency-like bonus added to attack totals.
        combat_mastery,
        /// Difficulty of saving throws against this actor's spells.
        spell_dc,
        /// Bonus damage on a critical hit.
        critical_hit_damage,
        /// Raw die value that counts as a critical hit.
        critical_hit_threshold,
        /// Bonus damage when an attack beats defense by 5 or more.
        heavy_hit_damage,
        /// Bonus damage per extra 5-point margin beyond a heavy hit.
        brutal_hit_damage,
        /// Flat damage added to every hit (rage and similar effects).
        hit_damage,
        /// Attacks per turn before multiple-attack disadvantage applies.
        attacks_before_penalty,
        /// Health at or below which the actor is dead for good.
        death_threshold,
        /// Number of d4 rolled and added to attack totals.
        d4_roll_bonus,
        /// Number of d6 rolled and added to attack totals.
        d6_roll_bonus,
        /// Number of d8 rolled and added to attack totals.
        d8_roll_bonus,
        /// Damage taken at the start of every round, bypassing modifiers.
        true_damage_on_new_round,
    }
    flags {
        /// Trained with light armor.
        mastery_light_armor,
        /// Trained with heavy armor.
        mastery_heavy_armor,
        /// The source is magical.
        is_magic,
        /// Bleeding condition.
        is_bleeding,
        /// Blinded condition.
        is_blinded,
        /// Burning condition.
        is_burning,
        /// Charmed condition.
        is_charmed,
        /// Dazed condition.
        is_dazed,
        /// Deafened condition.
        is_deafened,
        /// Doomed condition.
        is_doomed,
        /// Exposed condition.
        is_exposed,
        /// Frightened condition.
        is_frightened,
        /// Grappled condition.
        is_grappled,
        /// Hindered condition.
        is_hindered,
        /// Impaired condition.
        is_impaired,
        /// Incapacitated condition.
        is_incapacitated,
        /// Intimidated condition.
        is_intimidated,
        /// Invisible condition.
        is_invisible,
        /// Paralyzed condition.
        is_paralyzed,
        /// Petrified condition.
        is_petrified,
        /// Poisoned condition.
        is_poisoned,
        /// Prone condition.
        is_prone,
        /// Restrained condition.
        is_restrained,
        /// Slowed condition.
        is_slowed,
        /// Stunned condition.
        is_stunned,
        /// Unconscious condition.
        is_unconscious,
    }
}

impl Attributes {
    /// The baseline every actor starts from before its own overrides.
    pub fn actor_defaults() -> Self {
        Self {
            physical_defense: 8,
            mystical_defense: 8,
            health_points: 10,
            action_points: 4,
            heavy_hit_damage: 1,
            brutal_hit_damage: 1,
            critical_hit_damage: 2,
            move_speed: 5,
            critical_hit_threshold: 20,
            attacks_before_penalty: 1,
            mastery_light_armor: true,
            ..Self::default()
        }
    }

    /// Fold a sequence of bundles, starting from the all-zero identity.
    pub fn aggregate<'a>(sources: impl IntoIterator<Item = &'a Attributes>) -> Self {
        sources
            .into_iter()
            .fold(Self::default(), |acc, source| acc.combine(source))
    }

    /// Apply a sequence of key/value overrides, failing on the first bad key.
    pub fn with_overrides<K, V>(
        mut self,
        overrides: impl IntoIterator<Item = (K, V)>,
    ) -> CoreResult<Self>
    where
        K: AsRef<str>,
        V: Into<AttributeValue>,
    {
        for (key, value) in overrides {
            self.set(key.as_ref(), value.into())?;
        }
        Ok(self)
    }

    /// Read an integer field by name, `None` for flags and unknown keys.
    pub fn integer(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            AttributeValue::Integer(v) => Some(v),
            AttributeValue::Boolean(_) => None,
        }
    }

    /// The highest core ability score plus the prime modifier bonus.
    pub fn prime_modifier(&self) -> i32 {
        self.might
            .max(self.agility)
            .max(self.intelligence)
            .max(self.charisma)
            + self.prime_modifier_bonus
    }
}

impl Add for Attributes {
    type Output = Attributes;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(&rhs)
    }
}

impl AddAssign<&Attributes> for Attributes {
    fn add_assign(&mut self, rhs: &Attributes) {
        *self = self.combine(rhs);
    }
}

impl<'a> Sum<&'a Attributes> for Attributes {
    fn sum<I: Iterator<Item = &'a Attributes>>(iter: I) -> Self {
        Self::aggregate(iter)
    }
}
