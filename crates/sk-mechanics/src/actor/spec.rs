//! Serializable actor and item construction data.
//!
//! Specs are the static-data side of the engine: a JSON document describes
//! actors as attribute key/value overrides plus items and traits, and
//! [`ActorSpec::build`] turns it into a ready [`Actor`]. Unknown keys are
//! rejected, both at the JSON level and for attribute names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sk_core::{
    AttributeValue, Attributes, Damage, DamageModifier, Item, ItemKind, Trait, WeaponProfile,
    WeaponStyle,
};

use crate::actor::Actor;
use crate::error::MechResult;
use crate::strategy::{CombatStrategy, TargetingStrategy};

/// Item category in a spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// Body armor.
    Armor,
    /// A shield.
    Shield,
    /// A weapon; requires `damages`.
    Weapon,
    /// Any other equipment.
    Trinket,
}

/// Construction data for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    /// Item name.
    pub name: String,
    /// Item category.
    pub kind: ItemCategory,
    /// Attribute bonuses granted to the wearer.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Damage modifiers granted to the wearer.
    #[serde(default)]
    pub modifiers: Vec<DamageModifier>,
    /// Traits attached to the item.
    #[serde(default)]
    pub traits: Vec<Trait>,
    /// Weapon damage components.
    #[serde(default)]
    pub damages: Vec<Damage>,
    /// Weapon reach.
    #[serde(default)]
    pub range: Option<u32>,
    /// Weapon styles.
    #[serde(default)]
    pub styles: Vec<WeaponStyle>,
}

impl ItemSpec {
    /// Build the item, validating attributes, modifiers, and weapon damage.
    pub fn build(&self) -> MechResult<Item> {
        let attributes = Attributes::default()
            .with_overrides(self.attributes.iter().map(|(k, v)| (k, *v)))?;
        let kind = match self.kind {
            ItemCategory::Armor => ItemKind::Armor,
            ItemCategory::Shield => ItemKind::Shield,
            ItemCategory::Trinket => ItemKind::Trinket,
            ItemCategory::Weapon => {
                let mut profile = WeaponProfile::new(self.damages.clone());
                if let Some(range) = self.range {
                    profile = profile.with_range(range);
                }
                profile.styles = self.styles.clone();
                ItemKind::Weapon(profile)
            }
        };
        let mut item = Item::new(&self.name, kind, attributes)?;
        for modifier in &self.modifiers {
            item = item.with_modifier(modifier.clone())?;
        }
        for t in &self.traits {
            t.validate()?;
            item = item.with_trait(t.clone());
        }
        Ok(item)
    }
}

/// Construction data for one actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorSpec {
    /// Actor name.
    pub name: String,
    /// Overrides applied on top of the actor defaults.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    /// Equipped items.
    #[serde(default)]
    pub items: Vec<ItemSpec>,
    /// Starting traits.
    #[serde(default)]
    pub traits: Vec<Trait>,
    /// Own damage modifiers.
    #[serde(default)]
    pub modifiers: Vec<DamageModifier>,
    /// Action-selection strategy.
    #[serde(default)]
    pub strategy: CombatStrategy,
    /// Target-selection strategy.
    #[serde(default)]
    pub targeting: TargetingStrategy,
}

impl ActorSpec {
    /// Parse a spec from JSON.
    pub fn from_json(json: &str) -> MechResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a list of specs from a JSON array.
    pub fn list_from_json(json: &str) -> MechResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the actor with full pools.
    pub fn build(&self) -> MechResult<Actor> {
        let mut actor = Actor::new(&self.name)
            .with_attributes(self.attributes.iter().map(|(k, v)| (k, *v)))?
            .with_strategy(self.strategy)
            .with_targeting(self.targeting);
        for item in &self.items {
            actor = actor.with_item(item.build()?);
        }
        for t in &self.traits {
            t.validate()?;
            actor = actor.with_trait(t.clone());
        }
        for modifier in &self.modifiers {
            actor = actor.with_modifier(modifier.clone())?;
        }
        Ok(actor)
    }
}
