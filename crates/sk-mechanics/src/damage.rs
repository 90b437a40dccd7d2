//! The damage pipeline: resistances, vulnerabilities, damage reduction.
//!
//! For one damage component:
//!
//! 1. subtract additive resistances, multiply by multiplicative ones
//! 2. add additive vulnerabilities, multiply by multiplicative ones
//! 3. subtract the damage reduction of the component's class, unless ignored
//! 4. clamp to zero
//!
//! Components keep their fractions; [`take_damage`] rounds the summed total
//! down to whole health points and is the only place where damage mutates
//! health.

use serde::{Deserialize, Serialize};
use sk_core::{Damage, DamageClass, DamageModifier, EffectiveStats};
use tracing::info;

use crate::actor::Actor;

/// One component after the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDamage {
    /// The incoming component.
    pub damage: Damage,
    /// Damage left after modifiers and reduction, fractions kept.
    pub dealt: f64,
}

/// The outcome of one damage application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Per-component breakdown.
    pub components: Vec<ResolvedDamage>,
    /// Health points removed: the component sum rounded down.
    pub total: i32,
    /// Whether damage reduction was bypassed.
    pub ignored_reduction: bool,
    /// Health after the damage.
    pub health_after: i32,
}

/// Additive sum and multiplicative product of matching modifiers.
fn fold_modifiers<'a>(modifiers: impl Iterator<Item = &'a DamageModifier>) -> (f64, f64) {
    modifiers.fold((0.0, 1.0), |(add, mul), m| {
        if m.multiplicative {
            (add, mul * m.value)
        } else {
            (add + m.value, mul)
        }
    })
}

/// Damage dealt by one component to a holder of `stats`, never negative.
pub fn resolve(stats: &EffectiveStats, damage: Damage, ignore_reduction: bool) -> f64 {
    let mut value = f64::from(damage.value);

    let (res_add, res_mul) = fold_modifiers(stats.resistances_for(damage.kind));
    value = (value - res_add) * res_mul;

    let (vul_add, vul_mul) = fold_modifiers(stats.vulnerabilities_for(damage.kind));
    value = (value + vul_add) * vul_mul;

    if !ignore_reduction {
        let reduction = match damage.kind.class() {
            DamageClass::Physical => stats.attributes.physical_damage_reduction,
            DamageClass::Mystical => stats.attributes.mystical_damage_reduction,
        };
        value -= f64::from(reduction);
    }

    value.max(0.0)
}

/// Resolve every component against the actor and subtract the total from health.
pub fn take_damage(
    actor: &mut Actor,
    damages: &[Damage],
    ignore_reduction: bool,
) -> DamageReport {
    let components: Vec<ResolvedDamage> = damages
        .iter()
        .map(|&damage| ResolvedDamage {
            damage,
            dealt: resolve(actor.effective(), damage, ignore_reduction),
        })
        .collect();
    let sum: f64 = components.iter().map(|c| c.dealt).sum();
    let total = sum.floor() as i32;
    actor.health.adjust(-total);

    let breakdown: Vec<String> = components
        .iter()
        .map(|c| format!("{}->{}", c.damage, c.dealt))
        .collect();
    info!(
        actor = actor.name(),
        total,
        ignored_reduction = ignore_reduction,
        health = actor.health.current,
        breakdown = %breakdown.join(", "),
        "damage taken"
    );

    DamageReport {
        components,
        total,
        ignored_reduction: ignore_reduction,
        health_after: actor.health.current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sk_core::{Attributes, DamageType};

    fn stats(
        resistances: Vec<DamageModifier>,
        vulnerabilities: Vec<DamageModifier>,
        pdr: i32,
        mdr: i32,
    ) -> EffectiveStats {
        EffectiveStats {
            attributes: Attributes {
                physical_damage_reduction: pdr,
                mystical_damage_reduction: mdr,
                ..Attributes::default()
            },
            resistances,
            vulnerabilities,
        }
    }

    #[test]
    fn plain_damage_minus_reduction() {
        let s = stats(vec![], vec![], 1, 0);
        assert_eq!(resolve(&s, Damage::new(DamageType::Slashing, 5), false), 4.0);
        assert_eq!(resolve(&s, Damage::new(DamageType::Slashing, 5), true), 5.0);
    }

    #[test]
    fn reduction_follows_damage_class() {
        let s = stats(vec![], vec![], 2, 5);
        assert_eq!(resolve(&s, Damage::new(DamageType::Fire, 6), false), 4.0);
        assert_eq!(resolve(&s, Damage::new(DamageType::Psychic, 6), false), 1.0);
    }

    #[test]
    fn resistance_then_vulnerability_order() {
        let s = stats(
            vec![
                DamageModifier::resistance(DamageType::Fire, 2.0),
                DamageModifier::resistance_factor(DamageType::Physical, 0.5).unwrap(),
            ],
            vec![
                DamageModifier::vulnerability(DamageType::Fire, 1.0),
                DamageModifier::vulnerability_factor(DamageType::Fire, 2.0).unwrap(),
            ],
            0,
            0,
        );
        // ((10 - 2) * 0.5 + 1) * 2 = 10
        assert_eq!(resolve(&s, Damage::new(DamageType::Fire, 10), false), 10.0);
        // Only the class-wide resistance applies to cold: 10 * 0.5 = 5
        assert_eq!(resolve(&s, Damage::new(DamageType::Cold, 10), false), 5.0);
    }

    #[test]
    fn fractions_are_kept_per_component() {
        let s = stats(
            vec![DamageModifier::resistance_factor(DamageType::Slashing, 0.5).unwrap()],
            vec![],
            0,
            0,
        );
        assert_eq!(resolve(&s, Damage::new(DamageType::Slashing, 5), false), 2.5);
    }

    #[test]
    fn summed_fractions_round_down_once() {
        let mut actor = Actor::new("Target")
            .with_modifier(DamageModifier::resistance_factor(DamageType::Physical, 0.5).unwrap())
            .unwrap();
        let report = take_damage(
            &mut actor,
            &[
                Damage::new(DamageType::Slashing, 3),
                Damage::new(DamageType::Piercing, 1),
            ],
            false,
        );
        // 1.5 + 0.5 is two whole points.
        assert_eq!(report.total, 2);
        assert_eq!(actor.health.current, 8);

        let report = take_damage(&mut actor, &[Damage::new(DamageType::Slashing, 3)], false);
        assert_eq!(report.total, 1);
        assert_eq!(actor.health.current, 7);
    }

    #[test]
    fn take_damage_sums_components() {
        let mut actor = Actor::new("Target")
            .with_attributes([("physical_damage_reduction", 1)])
            .unwrap();
        let report = take_damage(
            &mut actor,
            &[
                Damage::new(DamageType::Slashing, 4),
                Damage::new(DamageType::Fire, 1),
            ],
            false,
        );
        assert_eq!(report.components[0].dealt, 3.0);
        assert_eq!(report.components[1].dealt, 0.0);
        assert_eq!(report.total, 3);
        assert_eq!(actor.health.current, 7);
        assert_eq!(report.health_after, 7);
    }

    fn arb_modifier() -> impl Strategy<Value = DamageModifier> {
        (0..4u8, -20.0f64..20.0, 0.0f64..=1.0, 1.0f64..4.0).prop_map(
            |(shape, flat, low, high)| match shape {
                0 => DamageModifier::resistance(DamageType::Physical, flat),
                1 => DamageModifier::vulnerability(DamageType::Slashing, flat),
                2 => DamageModifier {
                    multiplicative: true,
                    ..DamageModifier::resistance(DamageType::Slashing, low)
                },
                _ => DamageModifier {
                    multiplicative: true,
                    ..DamageModifier::vulnerability(DamageType::Physical, high)
                },
            },
        )
    }

    proptest! {
        #[test]
        fn resolved_damage_is_never_negative(
            magnitude in -50i32..200,
            modifiers in proptest::collection::vec(arb_modifier(), 0..6),
            pdr in -5i32..30,
            ignore in any::<bool>(),
        ) {
            let (res, vul): (Vec<_>, Vec<_>) = modifiers
                .into_iter()
                .partition(|m| m.kind == sk_core::ModifierKind::Resistance);
            let s = stats(res, vul, pdr, 0);
            prop_assert!(resolve(&s, Damage::new(DamageType::Slashing, magnitude), ignore) >= 0.0);
        }
    }
}
