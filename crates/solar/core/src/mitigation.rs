//! Incoming-damage filter for capability holders.
//!
//! Rules, first match wins:
//! 1. untyped damage or an empty gauge passes through untouched
//! 2. heat, fire and explosive damage is nullified for free
//! 3. damage below the threshold is nullified for free
//! 4. anything else drains a capped fraction of the raw amount from the gauge
//!    and only the part above the threshold gets through
//!
//! Separately, a blow that would have been lethal empties the gauge and forces
//! exhaustion ([`MitigationPolicy::lethal_damage_prevented`]).

use crate::config::KitConfig;
use crate::gauge::{GaugeTransition, SolarGauge};
use crate::state::IncomingDamage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MitigationRule {
    PassThrough,
    InnateImmunity,
    MinorDamage,
    Absorbed,
}

/// Result of filtering one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mitigation {
    /// Damage the host should still apply.
    pub amount: f32,
    /// Charge spent absorbing the hit.
    pub drained: f32,
    pub rule: MitigationRule,
    pub transition: Option<GaugeTransition>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MitigationPolicy {
    threshold: f32,
    absorb_fraction: f32,
    absorb_cap: f32,
}

impl MitigationPolicy {
    pub fn new(config: &KitConfig) -> Self {
        Self {
            threshold: config.mitigation_threshold,
            absorb_fraction: config.absorb_fraction,
            absorb_cap: config.absorb_cap,
        }
    }

    pub fn apply(&self, incoming: IncomingDamage, gauge: &mut SolarGauge) -> Mitigation {
        let raw = incoming.amount;
        let Some(kind) = incoming.kind.filter(|_| !gauge.is_empty()) else {
            return Mitigation {
                amount: raw,
                drained: 0.0,
                rule: MitigationRule::PassThrough,
                transition: None,
            };
        };

        if kind.is_heat_or_explosive() {
            return Self::nullified(MitigationRule::InnateImmunity);
        }
        if raw < self.threshold {
            return Self::nullified(MitigationRule::MinorDamage);
        }

        let before = gauge.charge();
        let transition = gauge.drain((raw * self.absorb_fraction).min(self.absorb_cap));
        Mitigation {
            amount: (raw - self.threshold).max(0.0),
            drained: before - gauge.charge(),
            rule: MitigationRule::Absorbed,
            transition,
        }
    }

    /// The host intercepted a killing blow. The holder survives but pays with
    /// the whole gauge.
    pub fn lethal_damage_prevented(&self, gauge: &mut SolarGauge) -> Option<GaugeTransition> {
        gauge.drain_all_and_exhaust()
    }

    fn nullified(rule: MitigationRule) -> Mitigation {
        Mitigation {
            amount: 0.0,
            drained: 0.0,
            rule,
            transition: None,
        }
    }
}

impl Default for MitigationPolicy {
    fn default() -> Self {
        Self::new(&KitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DamageKind;

    fn setup(charge: f32) -> (MitigationPolicy, SolarGauge) {
        let config = KitConfig::new();
        (
            MitigationPolicy::new(&config),
            SolarGauge::restore(&config, charge, 0, false),
        )
    }

    #[test]
    fn heat_is_nullified_for_free() {
        let (policy, mut gauge) = setup(100.0);
        let result = policy.apply(IncomingDamage::new(DamageKind::Flame, 500.0), &mut gauge);
        assert_eq!(result.amount, 0.0);
        assert_eq!(result.rule, MitigationRule::InnateImmunity);
        assert_eq!(gauge.charge(), 100.0);

        let result = policy.apply(IncomingDamage::new(DamageKind::Bomb, 300.0), &mut gauge);
        assert_eq!(result.amount, 0.0);
    }

    #[test]
    fn minor_physical_damage_is_ignored() {
        let (policy, mut gauge) = setup(100.0);
        let result = policy.apply(IncomingDamage::new(DamageKind::Cut, 60.0), &mut gauge);
        assert_eq!(result.amount, 0.0);
        assert_eq!(result.rule, MitigationRule::MinorDamage);
        assert_eq!(gauge.charge(), 100.0);
    }

    #[test]
    fn heavy_hit_is_absorbed_and_overflows() {
        let (policy, mut gauge) = setup(50.0);
        let result = policy.apply(IncomingDamage::new(DamageKind::Blunt, 200.0), &mut gauge);
        assert_eq!(result.rule, MitigationRule::Absorbed);
        assert_eq!(result.drained, 10.0);
        assert_eq!(result.amount, 120.0);
        assert_eq!(gauge.charge(), 40.0);
    }

    #[test]
    fn absorb_drain_is_capped() {
        let (policy, mut gauge) = setup(100.0);
        let result = policy.apply(IncomingDamage::new(DamageKind::Bullet, 1_000.0), &mut gauge);
        assert_eq!(result.drained, 10.0);
        assert_eq!(result.amount, 920.0);

        let result = policy.apply(IncomingDamage::new(DamageKind::Bullet, 80.0), &mut gauge);
        assert_eq!(result.drained, 4.0);
        assert_eq!(result.amount, 0.0);
    }

    #[test]
    fn empty_gauge_or_untyped_passes_through() {
        let (policy, mut gauge) = setup(0.0);
        let result = policy.apply(IncomingDamage::new(DamageKind::Flame, 500.0), &mut gauge);
        assert_eq!(result.amount, 500.0);
        assert_eq!(result.rule, MitigationRule::PassThrough);

        let (policy, mut gauge) = setup(100.0);
        let result = policy.apply(IncomingDamage::untyped(500.0), &mut gauge);
        assert_eq!(result.amount, 500.0);
        assert_eq!(gauge.charge(), 100.0);
    }

    #[test]
    fn absorbing_last_charge_exhausts() {
        let (policy, mut gauge) = setup(3.0);
        let result = policy.apply(IncomingDamage::new(DamageKind::Stab, 200.0), &mut gauge);
        assert_eq!(result.drained, 3.0);
        assert_eq!(result.transition, Some(GaugeTransition::Exhausted));
    }

    #[test]
    fn lethal_prevention_costs_everything() {
        let (policy, mut gauge) = setup(73.0);
        assert_eq!(
            policy.lethal_damage_prevented(&mut gauge),
            Some(GaugeTransition::Exhausted)
        );
        assert_eq!(gauge.charge(), 0.0);
        assert!(gauge.is_exhausted());
    }
}
