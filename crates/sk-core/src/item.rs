//! Equipment: armor, shields, weapons, and trinkets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;
use crate::damage::Damage;
use crate::entity::{EffectiveStats, Entity};
use crate::error::{CoreError, CoreResult};
use crate::modifier::DamageModifier;
use crate::traits::Trait;

/// A fighting style carried by a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponStyle {
    /// +1 damage against a bleeding defender.
    Axe,
    /// +1 damage against a slowed defender.
    Bow,
    /// No bonus.
    Chained,
    /// No bonus.
    Crossbow,
    /// +1 damage against a grappled defender.
    Fist,
    /// +1 damage against a dazed or petrified defender.
    Hammer,
    /// +1 damage against an impaired defender.
    Pick,
    /// No bonus.
    Spear,
    /// +1 damage against a hindered or petrified defender.
    Staff,
    /// +1 damage against an exposed defender.
    Sword,
    /// No bonus.
    Whip,
}

/// Bonus granted by weapon styles against one defender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleBonus {
    /// Added to the first damage component.
    pub damage: i32,
    /// Added to the attack total.
    pub hit: i32,
}

impl std::ops::Add for StyleBonus {
    type Output = StyleBonus;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            damage: self.damage + rhs.damage,
            hit: self.hit + rhs.hit,
        }
    }
}

impl WeaponStyle {
    /// The bonus this style grants against a defender with `defender` attributes.
    pub fn bonus(self, defender: &Attributes) -> StyleBonus {
        let triggered = match self {
            Self::Axe => defender.is_bleeding,
            Self::Bow => defender.is_slowed,
            Self::Fist => defender.is_grappled,
            Self::Hammer => defender.is_dazed || defender.is_petrified,
            Self::Pick => defender.is_impaired,
            Self::Staff => defender.is_hindered || defender.is_petrified,
            Self::Sword => defender.is_exposed,
            Self::Chained | Self::Crossbow | Self::Spear | Self::Whip => false,
        };
        StyleBonus {
            damage: i32::from(triggered),
            hit: 0,
        }
    }
}

impl fmt::Display for WeaponStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Damage, reach, and styles of a weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Damage components; the first one receives hit bonuses.
    pub damages: Vec<Damage>,
    /// Reach in spaces.
    #[serde(default = "default_range")]
    pub range: u32,
    /// Fighting styles.
    #[serde(default)]
    pub styles: Vec<WeaponStyle>,
}

fn default_range() -> u32 {
    1
}

impl WeaponProfile {
    /// A melee weapon with the given damage components.
    pub fn new(damages: Vec<Damage>) -> Self {
        Self {
            damages,
            range: default_range(),
            styles: Vec::new(),
        }
    }

    /// Set the reach.
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    /// Add a fighting style.
    pub fn with_style(mut self, style: WeaponStyle) -> Self {
        self.styles.push(style);
        self
    }

    /// Sum of every style bonus against a defender.
    pub fn style_bonus(&self, defender: &Attributes) -> StyleBonus {
        self.styles
            .iter()
            .map(|s| s.bonus(defender))
            .fold(StyleBonus::default(), |acc, b| acc + b)
    }
}

/// The category of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ItemKind {
    /// Body armor.
    Armor,
    /// A shield.
    Shield,
    /// A weapon.
    Weapon(WeaponProfile),
    /// Any other equipment.
    Trinket,
}

impl ItemKind {
    /// Lowercase category name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Armor => "armor",
            Self::Shield => "shield",
            Self::Weapon(_) => "weapon",
            Self::Trinket => "trinket",
        }
    }
}

/// An equippable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    entity: Entity,
    kind: ItemKind,
}

impl Item {
    /// Build an item; weapons must declare at least one damage component.
    pub fn new(
        name: impl Into<String>,
        kind: ItemKind,
        attributes: Attributes,
    ) -> CoreResult<Self> {
        let name = name.into();
        if matches!(&kind, ItemKind::Weapon(profile) if profile.damages.is_empty()) {
            return Err(CoreError::MissingWeaponDamage(name));
        }
        Ok(Self {
            entity: Entity::new(name, attributes),
            kind,
        })
    }

    /// An armor piece.
    pub fn armor(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            entity: Entity::new(name, attributes),
            kind: ItemKind::Armor,
        }
    }

    /// A shield.
    pub fn shield(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            entity: Entity::new(name, attributes),
            kind: ItemKind::Shield,
        }
    }

    /// A trinket.
    pub fn trinket(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            entity: Entity::new(name, attributes),
            kind: ItemKind::Trinket,
        }
    }

    /// A weapon with no attribute bonus.
    pub fn weapon(name: impl Into<String>, profile: WeaponProfile) -> CoreResult<Self> {
        Self::new(name, ItemKind::Weapon(profile), Attributes::default())
    }

    /// Item name.
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    /// Item category.
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// The weapon profile, if this is a weapon.
    pub fn weapon_profile(&self) -> Option<&WeaponProfile> {
        match &self.kind {
            ItemKind::Weapon(profile) => Some(profile),
            _ => None,
        }
    }

    /// The underlying entity.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// What this item adds to its wearer.
    pub fn contribution(&self) -> EffectiveStats {
        self.entity.effective().clone()
    }

    /// Attach a trait to the item.
    pub fn with_trait(mut self, new_trait: Trait) -> Self {
        self.entity.add_trait(new_trait);
        self
    }

    /// Attach a damage modifier to the item.
    pub fn with_modifier(mut self, modifier: DamageModifier) -> CoreResult<Self> {
        self.entity.add_modifier(modifier)?;
        Ok(self)
    }

    /// Advance one round on the item's traits.
    pub fn tick(&mut self) -> Vec<String> {
        self.entity.tick()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.kind.label())?;
        if let Some(profile) = self.weapon_profile() {
            let damages: Vec<String> = profile.damages.iter().map(Damage::to_string).collect();
            write!(f, ": {}", damages.join(" + "))?;
        }
        Ok(())
    }
}
