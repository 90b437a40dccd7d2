//! Core types for Skirmish: attributes, damage, modifiers, traits, and items.
//!
//! Everything here is plain data plus the aggregation rules that turn base
//! attributes, traits, and equipment into an entity's effective stats. No
//! randomness and no combat flow live in this crate.

/// The attribute bundle and its combination rules.
pub mod attributes;
/// Named conditions and their attribute flags.
pub mod condition;
/// Damage types, classes, and damage events.
pub mod damage;
/// Entities and their derived effective stats.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Equipment and weapon styles.
pub mod item;
/// Resistances and vulnerabilities.
pub mod modifier;
/// Timed effect bundles.
pub mod traits;

/// Re-export attribute types.
pub use attributes::{AttributeValue, Attributes};
/// Re-export condition type.
pub use condition::Condition;
/// Re-export damage types.
pub use damage::{Damage, DamageClass, DamageType};
/// Re-export entity types.
pub use entity::{EffectiveStats, Entity};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export item types.
pub use item::{Item, ItemKind, StyleBonus, WeaponProfile, WeaponStyle};
/// Re-export modifier types.
pub use modifier::{DamageModifier, ModifierKind, ModifierSet};
/// Re-export trait types.
pub use traits::{Trait, TraitSet};
