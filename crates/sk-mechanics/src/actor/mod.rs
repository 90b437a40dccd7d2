//! Combatants: an entity with resource pools, equipment, and combat state.

pub mod spec;
pub mod track;

pub use spec::{ActorSpec, ItemSpec};
pub use track::Track;

use std::fmt;

use sk_core::{
    AttributeValue, Attributes, DamageModifier, EffectiveStats, Entity, Item, Trait,
    WeaponProfile,
};
use tracing::debug;

use crate::action::{ActionCost, SkipReason};
use crate::error::MechResult;
use crate::roster::{ActorId, Team};
use crate::strategy::{CombatStrategy, TargetingStrategy};

/// Traits a concentrating caster keeps alive, as `(target, trait name)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Concentration {
    /// Name of the spell being concentrated on.
    pub spell: String,
    /// Traits imposed by the spell.
    pub links: Vec<(ActorId, String)>,
}

/// Per-turn and per-round transient state of an actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatState {
    /// Attacks made this turn.
    pub attack_count: i32,
    /// Advantage accumulated for the next attack.
    pub advantage_count: i32,
    /// Bonus added to the next attack roll, then consumed.
    pub one_time_hit_bonus: i32,
    /// Help actions given this round.
    pub help_count: i32,
    /// Single-use dodge against the next attack.
    pub dodging: bool,
    /// Dodge against every attack until the next round.
    pub full_dodging: bool,
    /// The actor being attacked.
    pub current_target: Option<ActorId>,
    /// Actors whose current target is this actor.
    pub targeted_by: Vec<ActorId>,
    /// Active concentration, if any.
    pub concentration: Option<Concentration>,
}

impl CombatState {
    /// Zero the per-round counters and clear dodge flags.
    pub fn reset_round(&mut self) {
        self.attack_count = 0;
        self.advantage_count = 0;
        self.help_count = 0;
        self.dodging = false;
        self.full_dodging = false;
    }
}

/// What a round reset did to an actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundReset {
    /// Traits that expired, on the actor or its items.
    pub expired: Vec<String>,
    /// True damage taken at round start.
    pub true_damage: i32,
}

/// A combatant.
#[derive(Debug, Clone)]
pub struct Actor {
    entity: Entity,
    items: Vec<Item>,
    team: Team,
    /// Health; may fall below zero down to the death threshold.
    pub health: Track,
    /// Stamina points.
    pub stamina: Track,
    /// Mana points.
    pub mana: Track,
    /// Grit points.
    pub grit: Track,
    /// Action points, restored every round.
    pub action_points: Track,
    /// Transient combat state.
    pub state: CombatState,
    /// How the actor picks actions.
    pub strategy: CombatStrategy,
    /// How the actor picks targets.
    pub targeting: TargetingStrategy,
}

impl Actor {
    /// Create an actor with the default actor attributes and full pools.
    pub fn new(name: impl Into<String>) -> Self {
        let entity = Entity::new(name, Attributes::actor_defaults());
        let mut actor = Self {
            entity,
            items: Vec::new(),
            team: Team::A,
            health: Track::new("HP", 0),
            stamina: Track::new("SP", 0),
            mana: Track::new("MP", 0),
            grit: Track::new("GP", 0),
            action_points: Track::new("AP", 0),
            state: CombatState::default(),
            strategy: CombatStrategy::default(),
            targeting: TargetingStrategy::default(),
        };
        actor.sync();
        actor.refill();
        actor
    }

    /// Override base attributes by key; pools are refilled to the new maxima.
    pub fn with_attributes<K, V>(
        mut self,
        overrides: impl IntoIterator<Item = (K, V)>,
    ) -> MechResult<Self>
    where
        K: AsRef<str>,
        V: Into<AttributeValue>,
    {
        for (key, value) in overrides {
            self.entity.set_base(key.as_ref(), value.into())?;
        }
        self.sync();
        self.refill();
        Ok(self)
    }

    /// Equip an item; pools are refilled to the new maxima.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self.sync();
        self.refill();
        self
    }

    /// Add a trait; pools are refilled to the new maxima.
    pub fn with_trait(mut self, new_trait: Trait) -> Self {
        self.entity.add_trait(new_trait);
        self.sync();
        self.refill();
        self
    }

    /// Add an own damage modifier.
    pub fn with_modifier(mut self, modifier: DamageModifier) -> MechResult<Self> {
        self.entity.add_modifier(modifier)?;
        self.sync();
        Ok(self)
    }

    /// Set the action-selection strategy.
    pub fn with_strategy(mut self, strategy: CombatStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the target-selection strategy.
    pub fn with_targeting(mut self, targeting: TargetingStrategy) -> Self {
        self.targeting = targeting;
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    /// The actor's side.
    pub fn team(&self) -> Team {
        self.team
    }

    pub(crate) fn set_team(&mut self, team: Team) {
        self.team = team;
    }

    /// The underlying entity.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Effective attributes: base, traits, and equipment.
    pub fn attributes(&self) -> &Attributes {
        self.entity.attributes()
    }

    /// Effective attributes and modifiers.
    pub fn effective(&self) -> &EffectiveStats {
        self.entity.effective()
    }

    /// Equipped items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The first equipped weapon, used for attacks.
    pub fn weapon(&self) -> Option<&WeaponProfile> {
        self.items.iter().find_map(Item::weapon_profile)
    }

    /// Highest core ability plus the prime modifier bonus.
    pub fn prime_modifier(&self) -> i32 {
        self.attributes().prime_modifier()
    }

    /// Health above zero.
    pub fn is_alive(&self) -> bool {
        self.health.current > 0
    }

    /// Below zero health but above the death threshold.
    pub fn is_at_death_door(&self) -> bool {
        self.health.current < 0 && self.health.current > self.attributes().death_threshold
    }

    /// Add a trait mid-combat. Returns whether it was newly inserted.
    pub fn add_trait(&mut self, new_trait: Trait) -> bool {
        let inserted = self.entity.add_trait(new_trait);
        self.sync();
        inserted
    }

    /// Remove a trait by name.
    pub fn remove_trait(&mut self, name: &str) -> bool {
        let removed = self.entity.remove_trait(name);
        if removed {
            self.sync();
        }
        removed
    }

    /// Equip an item mid-combat.
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
        self.sync();
    }

    /// Unequip the first item with this name.
    pub fn remove_item(&mut self, name: &str) -> Option<Item> {
        let index = self.items.iter().position(|i| i.name() == name)?;
        let item = self.items.remove(index);
        self.sync();
        Some(item)
    }

    /// Add an own damage modifier mid-combat.
    pub fn add_modifier(&mut self, modifier: DamageModifier) -> MechResult<()> {
        self.entity.add_modifier(modifier)?;
        self.sync();
        Ok(())
    }

    /// Remove an own damage modifier.
    pub fn remove_modifier(&mut self, modifier: &DamageModifier) -> bool {
        let removed = self.entity.remove_modifier(modifier);
        if removed {
            self.sync();
        }
        removed
    }

    /// Check every pool against `cost`, then pay it.
    ///
    /// Nothing is deducted when any pool is short.
    pub fn try_pay(&mut self, cost: &ActionCost) -> Result<(), SkipReason> {
        if !self.action_points.can_afford(cost.action_points) {
            return Err(SkipReason::ActionPoints);
        }
        if !self.mana.can_afford(cost.mana_points) {
            return Err(SkipReason::ManaPoints);
        }
        if !self.stamina.can_afford(cost.stamina_points) {
            return Err(SkipReason::StaminaPoints);
        }
        self.action_points.adjust(-cost.action_points);
        self.mana.adjust(-cost.mana_points);
        self.stamina.adjust(-cost.stamina_points);
        Ok(())
    }

    /// Start a new round: tick traits and timed modifiers, restore action
    /// points, reset counters and dodges, and apply round-start true damage.
    pub fn new_round(&mut self) -> RoundReset {
        let mut expired = self.entity.tick();
        for item in &mut self.items {
            expired.extend(item.tick());
        }
        self.sync();

        self.action_points.restore();
        self.state.reset_round();

        let true_damage = self.attributes().true_damage_on_new_round.max(0);
        if true_damage > 0 && self.is_alive() {
            self.health.adjust(-true_damage);
        }
        debug!(
            actor = self.name(),
            ap = self.action_points.current,
            expired = ?expired,
            true_damage,
            "round reset"
        );
        RoundReset {
            expired,
            true_damage,
        }
    }

    /// Restore every pool to its maximum and clear combat state.
    pub fn full_rest(&mut self) {
        self.refill();
        self.state = CombatState::default();
    }

    fn refill(&mut self) {
        self.health.restore();
        self.stamina.restore();
        self.mana.restore();
        self.grit.restore();
        self.action_points.restore();
    }

    fn sync(&mut self) {
        let equipment = self.items.iter().map(Item::contribution).collect();
        self.entity.set_equipment(equipment);
        let a = self.entity.attributes().clone();
        self.health.rebound(a.health_points, a.death_threshold);
        self.stamina.rebound(a.stamina_points, 0);
        self.mana.rebound(a.mana_points, 0);
        self.grit.rebound(a.grit_points, 0);
        self.action_points.rebound(a.action_points, 0);
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{Condition, Damage, DamageType};

    fn sword() -> Item {
        Item::weapon(
            "Sword",
            WeaponProfile::new(vec![Damage::new(DamageType::Slashing, 3)]),
        )
        .unwrap()
    }

    #[test]
    fn new_actor_has_default_pools() {
        let a = Actor::new("Ayla");
        assert_eq!(a.health.current, 10);
        assert_eq!(a.action_points.current, 4);
        assert_eq!(a.attributes().physical_defense, 8);
        assert!(a.is_alive());
        assert!(a.weapon().is_none());
    }

    #[test]
    fn overrides_refill_pools() {
        let a = Actor::new("Bram")
            .with_attributes([("health_points", 14), ("mana_points", 3)])
            .unwrap();
        assert_eq!(a.health.current, 14);
        assert_eq!(a.mana.current, 3);
    }

    #[test]
    fn unknown_override_fails() {
        assert!(Actor::new("X").with_attributes([("luck", 1)]).is_err());
    }

    #[test]
    fn items_feed_attributes() {
        let armor = Item::armor(
            "Chain",
            Attributes {
                physical_defense: 3,
                physical_damage_reduction: 1,
                ..Attributes::default()
            },
        );
        let a = Actor::new("Knight").with_item(armor).with_item(sword());
        assert_eq!(a.attributes().physical_defense, 11);
        assert_eq!(a.attributes().physical_damage_reduction, 1);
        assert_eq!(a.weapon().unwrap().damages.len(), 1);
    }

    #[test]
    fn try_pay_is_all_or_nothing() {
        let mut a = Actor::new("Caster");
        let spell = ActionCost::new(1, 1, 0);
        assert_eq!(a.try_pay(&spell), Err(SkipReason::ManaPoints));
        assert_eq!(a.action_points.current, 4);
        assert_eq!(a.try_pay(&ActionCost::action_points(3)), Ok(()));
        assert_eq!(a.try_pay(&ActionCost::action_points(2)), Err(SkipReason::ActionPoints));
        assert_eq!(a.action_points.current, 1);
    }

    #[test]
    fn new_round_resets_turn_state() {
        let mut a = Actor::new("Ayla");
        a.action_points.adjust(-3);
        a.state.attack_count = 2;
        a.state.advantage_count = 1;
        a.state.help_count = 2;
        a.state.dodging = true;
        a.state.full_dodging = true;
        a.state.one_time_hit_bonus = 4;
        a.new_round();
        assert_eq!(a.action_points.current, 4);
        assert_eq!(a.state.attack_count, 0);
        assert_eq!(a.state.advantage_count, 0);
        assert_eq!(a.state.help_count, 0);
        assert!(!a.state.dodging && !a.state.full_dodging);
        // A pending help bonus survives until the next attack.
        assert_eq!(a.state.one_time_hit_bonus, 4);
    }

    #[test]
    fn new_round_is_idempotent_without_timed_effects() {
        let mut a = Actor::new("Ayla");
        a.action_points.adjust(-2);
        a.new_round();
        let hp = a.health.current;
        let state = a.state.clone();
        a.new_round();
        assert_eq!(a.health.current, hp);
        assert_eq!(a.state, state);
        assert_eq!(a.action_points.current, 4);
    }

    #[test]
    fn new_round_expires_traits_and_applies_true_damage() {
        let burning = Trait::condition(Condition::Burning, 1).with_attributes(Attributes {
            is_burning: true,
            true_damage_on_new_round: 2,
            ..Attributes::default()
        });
        let mut a = Actor::new("Torch").with_trait(burning);
        let reset = a.new_round();
        assert_eq!(reset.expired, vec!["Burning".to_string()]);
        // Expired before the damage step.
        assert_eq!(reset.true_damage, 0);
        assert!(!a.attributes().is_burning);

        let mut b = Actor::new("Torch").with_trait(
            Trait::new("Curse").with_attributes(Attributes {
                true_damage_on_new_round: 2,
                ..Attributes::default()
            }),
        );
        assert_eq!(b.new_round().true_damage, 2);
        assert_eq!(b.health.current, 8);
    }

    #[test]
    fn death_door_uses_threshold() {
        let mut a = Actor::new("Hero")
            .with_attributes([("death_threshold", -4)])
            .unwrap();
        a.health.adjust(-12);
        assert_eq!(a.health.current, -2);
        assert!(!a.is_alive());
        assert!(a.is_at_death_door());
        a.health.adjust(-10);
        assert_eq!(a.health.current, -4);
        assert!(!a.is_at_death_door());
    }

    #[test]
    fn full_rest_restores_everything() {
        let mut a = Actor::new("Ayla");
        a.health.adjust(-6);
        a.state.attack_count = 3;
        a.full_rest();
        assert!(a.health.is_full());
        assert_eq!(a.state, CombatState::default());
    }
}
