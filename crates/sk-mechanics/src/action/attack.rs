//! Attack resolution and advantage.
//!
//! The roll-count and hit-resolution rules are pure functions so they can be
//! checked against fixed dice; [`attack`] wires them to the roster.

use serde::{Deserialize, Serialize};
use sk_core::{Attributes, Damage};
use tracing::info;

use super::{ActionContext, ActionCost, ActionOutcome, SkipReason};
use crate::dice::{DicePool, Die, Keep};
use crate::log::CombatEventKind;
use crate::roster::ActorId;

/// How many d20 to roll for an attack and which one to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollPlan {
    /// Number of d20 rolled.
    pub dice: usize,
    /// Which die counts.
    pub keep: Keep,
    /// Whether the attacker's advantage is spent by this roll.
    pub spends_advantage: bool,
}

/// Plan an attack roll from stacked advantage and disadvantage counts.
///
/// Rolls `max(1, disadvantage + 1 - advantage)` dice. When advantage
/// outweighs disadvantage the highest die is kept and the advantage is
/// spent; otherwise the lowest die is kept.
pub fn roll_plan(advantage: i32, disadvantage: i32) -> RollPlan {
    let dice = (disadvantage + 1 - advantage).max(1) as usize;
    if advantage > disadvantage {
        RollPlan {
            dice,
            keep: Keep::Highest,
            spends_advantage: true,
        }
    } else {
        RollPlan {
            dice,
            keep: Keep::Lowest,
            spends_advantage: false,
        }
    }
}

/// Quality of a resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitKind {
    /// The attack missed.
    Miss,
    /// A plain hit.
    Hit,
    /// Beat defense by 5 or more.
    Heavy,
    /// Beat defense by 10 or more.
    Brutal,
    /// The raw die matched the critical threshold.
    Critical,
}

/// Outcome of comparing an attack total against a defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResolution {
    /// Quality of the hit.
    pub kind: HitKind,
    /// Bonus added to the first damage component.
    pub bonus_damage: i32,
    /// Whether damage reduction is bypassed.
    pub ignore_reduction: bool,
}

impl HitResolution {
    /// Whether the attack connected.
    pub fn is_hit(&self) -> bool {
        self.kind != HitKind::Miss
    }
}

/// Resolve an attack: `raw` is the kept d20, `total` the full attack total.
///
/// A raw die equal to the attacker's critical threshold always hits. A
/// margin of 5 adds heavy-hit damage, each further full 5 adds brutal-hit
/// damage. Heavy and critical hits bypass damage reduction. Flat hit damage
/// applies to every hit.
pub fn resolve_hit(raw: i32, total: i32, defense: i32, attacker: &Attributes) -> HitResolution {
    let critical = raw == attacker.critical_hit_threshold;
    if total < defense && !critical {
        return HitResolution {
            kind: HitKind::Miss,
            bonus_damage: 0,
            ignore_reduction: false,
        };
    }

    let margin = total - defense;
    let mut bonus_damage = 0;
    let mut kind = HitKind::Hit;
    let heavy = margin >= 5;
    if heavy {
        let brutal_steps = margin / 5 - 1;
        bonus_damage += attacker.heavy_hit_damage + brutal_steps * attacker.brutal_hit_damage;
        kind = if brutal_steps > 0 {
            HitKind::Brutal
        } else {
            HitKind::Heavy
        };
    }
    if critical {
        bonus_damage += attacker.critical_hit_damage;
        kind = HitKind::Critical;
    }
    bonus_damage += attacker.hit_damage;

    HitResolution {
        kind,
        bonus_damage,
        ignore_reduction: heavy || critical,
    }
}

pub(super) fn gain_advantage(
    source: ActorId,
    cost: &ActionCost,
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if let Err(reason) = ctx.pay(source, cost, "gain advantage") {
        return ActionOutcome::Skipped(reason);
    }
    let actor = &mut ctx.roster[source];
    actor.state.advantage_count += 1;
    let count = actor.state.advantage_count;
    let description = format!("{} gains advantage ({count})", actor.name());
    info!(actor = actor.name(), count, "advantage gained");
    ctx.log.push(
        CombatEventKind::AdvantageGained {
            actor: source,
            count,
        },
        description,
    );
    ActionOutcome::Done
}

pub(super) fn attack(
    source: ActorId,
    targets: &[ActorId],
    cost: &ActionCost,
    ctx: &mut ActionContext<'_>,
) -> ActionOutcome {
    if targets.is_empty() {
        ctx.skip(source, "attack", SkipReason::NoTarget);
        return ActionOutcome::Skipped(SkipReason::NoTarget);
    }
    let Some(weapon) = ctx.roster[source].weapon().cloned() else {
        ctx.skip(source, "attack", SkipReason::NoWeapon);
        return ActionOutcome::Skipped(SkipReason::NoWeapon);
    };
    if let Err(reason) = ctx.pay(source, cost, "attack") {
        return ActionOutcome::Skipped(reason);
    }
    ctx.roster[source].state.attack_count += 1;

    for &target in targets {
        if !ctx.roster.is_alive(target) {
            continue;
        }

        let attacker = &ctx.roster[source];
        let attacker_attrs = attacker.attributes().clone();
        let attack_count = attacker.state.attack_count;
        let advantage = attacker.state.advantage_count;

        let defender = &mut ctx.roster[target];
        let mut disadvantage = (attack_count - attacker_attrs.attacks_before_penalty).max(0);
        if defender.state.dodging || defender.state.full_dodging {
            disadvantage += 1;
            defender.state.dodging = false;
        }
        let defense = defender.attributes().physical_defense;
        let style = weapon.style_bonus(defender.attributes());

        let plan = roll_plan(advantage, disadvantage);
        let roll = DicePool::new().add(Die::D20, plan.dice as i32).roll(ctx.rng);
        let raw = roll.keep(plan.keep);
        let bonus_roll = DicePool::bonus(
            attacker_attrs.d4_roll_bonus,
            attacker_attrs.d6_roll_bonus,
            attacker_attrs.d8_roll_bonus,
        )
        .roll(ctx.rng)
        .total();

        let attacker = &mut ctx.roster[source];
        if plan.spends_advantage {
            attacker.state.advantage_count = 0;
        }
        let help_bonus = std::mem::take(&mut attacker.state.one_time_hit_bonus);
        let total = raw
            + attacker_attrs.prime_modifier()
            + attacker_attrs.combat_mastery
            + help_bonus
            + bonus_roll
            + style.hit;

        let resolution = resolve_hit(raw, total, defense, &attacker_attrs);
        let attacker_name = attacker.name().to_string();
        let defender_name = ctx.roster[target].name().to_string();
        info!(
            attacker = %attacker_name,
            defender = %defender_name,
            rolls = ?roll.values(),
            raw,
            prime = attacker_attrs.prime_modifier(),
            mastery = attacker_attrs.combat_mastery,
            help = help_bonus,
            bonus_roll,
            total,
            defense,
            outcome = ?resolution.kind,
            "attack resolved"
        );
        ctx.log.push(
            CombatEventKind::AttackResolved {
                attacker: source,
                defender: target,
                roll: raw,
                total,
                defense,
                outcome: resolution.kind,
            },
            format!(
                "{attacker_name} attacks {defender_name}: {total} vs {defense} ({:?})",
                resolution.kind
            ),
        );

        if resolution.is_hit() {
            let damages: Vec<Damage> = weapon
                .damages
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    if i == 0 {
                        d.with_value(d.value + resolution.bonus_damage + style.damage)
                    } else {
                        *d
                    }
                })
                .collect();
            ctx.apply_damage(target, &damages, resolution.ignore_reduction);
        }
    }
    ActionOutcome::Done
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{armed, duel};
    use super::super::{Action, ActionContext};
    use super::*;
    use crate::log::CombatLog;
    use crate::roster::Roster;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn attacker() -> Attributes {
        Attributes::actor_defaults()
    }

    #[test]
    fn single_roll_without_modifiers() {
        let plan = roll_plan(0, 0);
        assert_eq!(plan.dice, 1);
        assert_eq!(plan.keep, Keep::Lowest);
        assert!(!plan.spends_advantage);
    }

    #[test]
    fn disadvantage_adds_dice_and_keeps_lowest() {
        let plan = roll_plan(0, 2);
        assert_eq!(plan.dice, 3);
        assert_eq!(plan.keep, Keep::Lowest);
        // Advantage offsets disadvantage before the comparison.
        let plan = roll_plan(1, 2);
        assert_eq!(plan.dice, 2);
        assert_eq!(plan.keep, Keep::Lowest);
    }

    #[test]
    fn excess_advantage_keeps_highest_and_is_spent() {
        let plan = roll_plan(2, 1);
        assert_eq!(plan.dice, 1);
        assert_eq!(plan.keep, Keep::Highest);
        assert!(plan.spends_advantage);
    }

    #[test]
    fn miss_below_defense() {
        let r = resolve_hit(5, 9, 10, &attacker());
        assert_eq!(r.kind, HitKind::Miss);
        assert!(!r.is_hit());
        assert_eq!(r.bonus_damage, 0);
    }

    #[test]
    fn plain_hit_at_defense() {
        let r = resolve_hit(8, 10, 10, &attacker());
        assert_eq!(r.kind, HitKind::Hit);
        assert_eq!(r.bonus_damage, 0);
        assert!(!r.ignore_reduction);
    }

    #[test]
    fn heavy_hit_tiering() {
        // Margin 5: heavy only.
        let r = resolve_hit(12, 15, 10, &attacker());
        assert_eq!(r.kind, HitKind::Heavy);
        assert_eq!(r.bonus_damage, 1);
        assert!(r.ignore_reduction);
        // Margin 9: still heavy only.
        assert_eq!(resolve_hit(12, 19, 10, &attacker()).bonus_damage, 1);
        // Margin 10: heavy plus one brutal.
        let r = resolve_hit(15, 20, 10, &attacker());
        assert_eq!(r.kind, HitKind::Brutal);
        assert_eq!(r.bonus_damage, 2);
        // Margin 15: heavy plus two brutal.
        assert_eq!(resolve_hit(15, 25, 10, &attacker()).bonus_damage, 3);
    }

    #[test]
    fn critical_always_hits() {
        let r = resolve_hit(20, 21, 40, &attacker());
        assert_eq!(r.kind, HitKind::Critical);
        assert_eq!(r.bonus_damage, 2);
        assert!(r.ignore_reduction);
    }

    #[test]
    fn critical_requires_exact_threshold() {
        let attrs = Attributes {
            critical_hit_threshold: 19,
            ..attacker()
        };
        assert_eq!(resolve_hit(19, 19, 30, &attrs).kind, HitKind::Critical);
        assert_eq!(resolve_hit(20, 20, 30, &attrs).kind, HitKind::Miss);
    }

    #[test]
    fn flat_hit_damage_applies_to_every_hit() {
        let attrs = Attributes {
            hit_damage: 2,
            ..attacker()
        };
        assert_eq!(resolve_hit(10, 10, 10, &attrs).bonus_damage, 2);
        assert_eq!(resolve_hit(20, 25, 10, &attrs).bonus_damage, 1 + 2 + 2 + 2);
    }

    #[test]
    fn eight_thirteen_and_critical_scenario() {
        // Defense 8: a total of 8 hits plainly, 13 is heavy, a natural 20 is critical.
        let a = attacker();
        assert_eq!(resolve_hit(8, 8, 8, &a).kind, HitKind::Hit);
        let heavy = resolve_hit(13, 13, 8, &a);
        assert_eq!(heavy.kind, HitKind::Heavy);
        assert_eq!(heavy.bonus_damage, 1);
        let crit = resolve_hit(20, 20, 8, &a);
        assert_eq!(crit.kind, HitKind::Critical);
        // Margin 12: heavy 1 + brutal 1 + critical 2.
        assert_eq!(crit.bonus_damage, 4);
    }

    #[test]
    fn attack_increments_counter_and_consumes_help() {
        let (mut roster, mut rng, mut log, a, b) = duel();
        roster[a].state.one_time_hit_bonus = 3;
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        assert_eq!(Action::attack().execute(a, &[b], &mut ctx), ActionOutcome::Done);
        assert_eq!(roster[a].state.attack_count, 1);
        assert_eq!(roster[a].state.one_time_hit_bonus, 0);
        assert_eq!(roster[a].action_points.current, 3);
        assert!(
            log.events()
                .iter()
                .any(|e| matches!(e.kind, CombatEventKind::AttackResolved { .. }))
        );
    }

    #[test]
    fn dodge_is_consumed_full_dodge_is_not() {
        let (mut roster, mut rng, mut log, a, b) = duel();
        roster[b].state.dodging = true;
        roster[b].state.full_dodging = true;
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::attack().execute(a, &[b], &mut ctx);
        assert!(!roster[b].state.dodging);
        assert!(roster[b].state.full_dodging);
    }

    #[test]
    fn unarmed_attack_is_skipped() {
        let (mut roster, mut rng, mut log, a, _) = duel();
        let unarmed = roster.add(crate::actor::Actor::new("Monk"), crate::roster::Team::B);
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        assert_eq!(
            Action::attack().execute(unarmed, &[a], &mut ctx),
            ActionOutcome::Skipped(SkipReason::NoWeapon)
        );
        assert_eq!(roster[unarmed].action_points.current, 4);
    }

    #[test]
    fn attack_without_target_is_skipped() {
        let (mut roster, mut rng, mut log, a, _) = duel();
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        assert_eq!(
            Action::attack().execute(a, &[], &mut ctx),
            ActionOutcome::Skipped(SkipReason::NoTarget)
        );
    }

    #[test]
    fn gain_advantage_stacks() {
        let (mut roster, mut rng, mut log, a, _) = duel();
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::gain_advantage().execute(a, &[], &mut ctx);
        Action::gain_advantage().execute(a, &[], &mut ctx);
        assert_eq!(roster[a].state.advantage_count, 2);
        assert_eq!(roster[a].action_points.current, 2);
    }

    #[test]
    fn lethal_hits_bring_the_defender_down() {
        let (mut roster, mut rng, mut log, a, b) = duel();
        roster[a].add_trait(sk_core::Trait::new("Giant").with_attributes(Attributes {
            combat_mastery: 30,
            hit_damage: 20,
            ..Attributes::default()
        }));
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::attack().execute(a, &[b], &mut ctx);
        assert!(!roster.is_alive(b));
    }

    fn fire_sword_duelist() -> crate::actor::Actor {
        crate::actor::Actor::new("Duelist").with_item(
            sk_core::Item::weapon(
                "Fire Sword",
                sk_core::WeaponProfile::new(vec![
                    Damage::new(sk_core::DamageType::Slashing, 3),
                    Damage::new(sk_core::DamageType::Fire, 1),
                ]),
            )
            .unwrap(),
        )
    }

    fn attack_once(
        attacker: crate::actor::Actor,
        defender: crate::actor::Actor,
        seed: u64,
    ) -> (Roster, CombatLog) {
        let mut roster = Roster::from_teams(vec![attacker], vec![defender]);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut log = CombatLog::new(0);
        let mut ctx = ActionContext::new(&mut roster, &mut rng, &mut log);
        Action::attack().execute(ActorId(0), &[ActorId(1)], &mut ctx);
        (roster, log)
    }

    fn resolved(log: &CombatLog) -> (i32, i32, HitKind) {
        log.events()
            .iter()
            .find_map(|e| match e.kind {
                CombatEventKind::AttackResolved {
                    roll,
                    total,
                    outcome,
                    ..
                } => Some((roll, total, outcome)),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn heavy_bonus_hits_first_component_past_reduction() {
        // Mastery 30 makes every roll heavy; threshold 0 rules out criticals.
        let attacker = fire_sword_duelist()
            .with_attributes([
                ("combat_mastery", 30),
                ("brutal_hit_damage", 0),
                ("critical_hit_threshold", 0),
            ])
            .unwrap();
        let defender = crate::actor::Actor::new("Ogre")
            .with_attributes([
                ("health_points", 20),
                ("physical_damage_reduction", 2),
                ("mystical_damage_reduction", 5),
            ])
            .unwrap();
        for seed in 0..10 {
            let (roster, log) = attack_once(attacker.clone(), defender.clone(), seed);
            let report = log
                .events()
                .iter()
                .find_map(|e| match &e.kind {
                    CombatEventKind::DamageTaken { report, .. } => Some(report.clone()),
                    _ => None,
                })
                .unwrap();
            assert!(report.ignored_reduction);
            // 3 + 1 heavy on the slashing component; fire keeps its base 1.
            let dealt: Vec<f64> = report.components.iter().map(|c| c.dealt).collect();
            assert_eq!(dealt, vec![4.0, 1.0]);
            assert_eq!(roster[ActorId(1)].health.current, 15);
        }
    }

    #[test]
    fn every_hit_tier_reaches_the_defender() {
        // Defense 8, reduction 1, 3 slashing: damage per tier is fixed.
        let defender = crate::actor::Actor::new("Ogre")
            .with_attributes([("health_points", 50), ("physical_damage_reduction", 1)])
            .unwrap();
        let mut seen = std::collections::HashSet::new();
        for seed in 0..300 {
            let (roster, log) = attack_once(armed("Ayla"), defender.clone(), seed);
            let (roll, total, kind) = resolved(&log);
            assert_eq!(total, roll);
            let expected = match kind {
                HitKind::Miss => 0,
                HitKind::Hit => 2,
                HitKind::Heavy => 4,
                HitKind::Brutal => 5,
                HitKind::Critical => 7,
            };
            assert_eq!(roster[ActorId(1)].health.current, 50 - expected, "roll {roll}");
            seen.insert(kind);
        }
        assert_eq!(seen.len(), 5);
    }
}
