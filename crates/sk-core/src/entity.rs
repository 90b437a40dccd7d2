use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeValue, Attributes};
use crate::damage::DamageType;
use crate::error::CoreResult;
use crate::modifier::{DamageModifier, ModifierKind, ModifierSet};
use crate::traits::{Trait, TraitSet};

/// The derived view of an entity: aggregated attributes and modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectiveStats {
    /// Base attributes combined with every trait and equipment contribution.
    pub attributes: Attributes,
    /// Every active resistance.
    pub resistances: Vec<DamageModifier>,
    /// Every active vulnerability.
    pub vulnerabilities: Vec<DamageModifier>,
}

impl EffectiveStats {
    /// Resistances that apply to incoming damage of type `kind`.
    pub fn resistances_for(&self, kind: DamageType) -> impl Iterator<Item = &DamageModifier> {
        self.resistances.iter().filter(move |m| m.applies_to(kind))
    }

    /// Vulnerabilities that apply to incoming damage of type `kind`.
    pub fn vulnerabilities_for(
        &self,
        kind: DamageType,
    ) -> impl Iterator<Item = &DamageModifier> {
        self.vulnerabilities.iter().filter(move |m| m.applies_to(kind))
    }

    fn absorb_modifiers<'a>(&mut self, modifiers: impl IntoIterator<Item = &'a DamageModifier>) {
        for m in modifiers {
            match m.kind {
                ModifierKind::Resistance => self.resistances.push(m.clone()),
                ModifierKind::Vulnerability => self.vulnerabilities.push(m.clone()),
            }
        }
    }
}

/// A named holder of base attributes, modifiers, and traits.
///
/// The effective view is recomputed by every mutator, so reading it is
/// always a plain field access.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    name: String,
    base: Attributes,
    modifiers: ModifierSet,
    traits: TraitSet,
    equipment: Vec<EffectiveStats>,
    effective: EffectiveStats,
}

impl Entity {
    /// Create an entity from base attributes.
    pub fn new(name: impl Into<String>, base: Attributes) -> Self {
        let mut entity = Self {
            name: name.into(),
            base,
            modifiers: ModifierSet::new(),
            traits: TraitSet::new(),
            equipment: Vec::new(),
            effective: EffectiveStats::default(),
        };
        entity.refresh();
        entity
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base attributes, before traits and equipment.
    pub fn base(&self) -> &Attributes {
        &self.base
    }

    /// The entity's own damage modifiers.
    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    /// The active traits.
    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }

    /// The derived view.
    pub fn effective(&self) -> &EffectiveStats {
        &self.effective
    }

    /// Shorthand for the effective attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.effective.attributes
    }

    /// Override one base attribute by key.
    pub fn set_base(&mut self, key: &str, value: AttributeValue) -> CoreResult<()> {
        self.base.set(key, value)?;
        self.refresh();
        Ok(())
    }

    /// Edit base attributes in place.
    pub fn update_base(&mut self, edit: impl FnOnce(&mut Attributes)) {
        edit(&mut self.base);
        self.refresh();
    }

    /// Add one of the entity's own modifiers.
    pub fn add_modifier(&mut self, modifier: DamageModifier) -> CoreResult<()> {
        self.modifiers.add(modifier)?;
        self.refresh();
        Ok(())
    }

    /// Remove one of the entity's own modifiers.
    pub fn remove_modifier(&mut self, modifier: &DamageModifier) -> bool {
        let removed = self.modifiers.remove(modifier);
        if removed {
            self.refresh();
        }
        removed
    }

    /// Add a trait, merging by name. Returns whether it was newly inserted.
    pub fn add_trait(&mut self, new_trait: Trait) -> bool {
        let inserted = self.traits.add(new_trait);
        self.refresh();
        inserted
    }

    /// Remove a trait by name.
    pub fn remove_trait(&mut self, name: &str) -> bool {
        let removed = self.traits.remove(name);
        if removed {
            self.refresh();
        }
        removed
    }

    /// Replace the equipment contributions folded into the effective view.
    pub fn set_equipment(&mut self, equipment: Vec<EffectiveStats>) {
        self.equipment = equipment;
        self.refresh();
    }

    /// Advance one round: count down traits and timed modifiers.
    ///
    /// Returns the names of expired traits.
    pub fn tick(&mut self) -> Vec<String> {
        let expired = self.traits.tick();
        self.modifiers.tick();
        self.refresh();
        expired
    }

    fn refresh(&mut self) {
        let attributes: Attributes = std::iter::once(&self.base)
            .chain(self.traits.iter().map(|t| &t.attributes))
            .chain(self.equipment.iter().map(|e| &e.attributes))
            .sum();

        let mut effective = EffectiveStats {
            attributes,
            ..EffectiveStats::default()
        };
        effective.absorb_modifiers(&self.modifiers);
        for t in self.traits.iter() {
            effective.absorb_modifiers(&t.modifiers);
        }
        for e in &self.equipment {
            effective.resistances.extend(e.resistances.iter().cloned());
            effective.vulnerabilities.extend(e.vulnerabilities.iter().cloned());
        }
        self.effective = effective;
    }
}
