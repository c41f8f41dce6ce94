//! Solar charge gauge.
//!
//! A bounded, regenerating resource with an exhaustion state. The gauge only
//! does bookkeeping: it reports [`GaugeTransition`]s and leaves the owner
//! debuff and beam shutdown to [`SolarKit`](crate::SolarKit), which applies
//! each transition exactly once.

use crate::config::KitConfig;

/// Exhaustion edge produced by a gauge mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GaugeTransition {
    /// Charge hit zero; cooldown started.
    Exhausted,
    /// Cooldown elapsed and charge is positive again.
    Recovered,
}

/// Sunlight reaching the owner this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunExposure {
    /// Celestial sun glow in `[0, 1]`.
    pub sun_glow: f32,
    pub roofed: bool,
}

impl SunExposure {
    pub fn open_sky(sun_glow: f32) -> Self {
        Self {
            sun_glow,
            roofed: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolarGauge {
    charge: f32,
    cooldown_ticks: u32,
    exhausted: bool,
    max_charge: f32,
    cooldown_duration: u32,
}

impl SolarGauge {
    /// A full gauge.
    pub fn new(config: &KitConfig) -> Self {
        Self {
            charge: config.max_charge,
            cooldown_ticks: 0,
            exhausted: false,
            max_charge: config.max_charge,
            cooldown_duration: config.exhaustion_cooldown_ticks,
        }
    }

    /// Rebuilds a gauge from persisted fields, clamping charge into range.
    pub fn restore(config: &KitConfig, charge: f32, cooldown_ticks: u32, exhausted: bool) -> Self {
        let charge = if charge.is_nan() {
            0.0
        } else {
            charge.clamp(0.0, config.max_charge)
        };
        Self {
            charge,
            cooldown_ticks,
            exhausted,
            ..Self::new(config)
        }
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn max_charge(&self) -> f32 {
        self.max_charge
    }

    pub fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ticks
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_empty(&self) -> bool {
        self.charge <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.charge >= self.max_charge
    }

    /// Whether `cost` can be paid. Never mutates; callers drain separately.
    pub fn try_authorize(&self, cost: f32) -> bool {
        self.charge >= cost
    }

    /// Removes charge, floored at zero. Reaching zero enters exhaustion.
    pub fn drain(&mut self, amount: f32) -> Option<GaugeTransition> {
        if !(amount > 0.0) {
            return None;
        }
        self.charge = (self.charge - amount).max(0.0);
        if self.charge <= 0.0 {
            self.charge = 0.0;
            return self.enter_exhaustion();
        }
        None
    }

    /// Adds charge unless regeneration is suppressed by cooldown.
    pub fn gain(&mut self, amount: f32) -> Option<GaugeTransition> {
        if !(amount > 0.0) || self.cooldown_ticks > 0 {
            return None;
        }
        let before = self.charge;
        self.charge = (self.charge + amount).min(self.max_charge);
        if self.charge > before {
            return self.exit_exhaustion_if_ready();
        }
        None
    }

    /// Per-tick cooldown countdown followed by ambient regeneration.
    ///
    /// `exposure` is `None` when the owner is not spawned on a map.
    pub fn tick_regen(
        &mut self,
        config: &KitConfig,
        exposure: Option<SunExposure>,
    ) -> Option<GaugeTransition> {
        self.tick_cooldown();
        self.regen(config, exposure)
    }

    pub fn tick_cooldown(&mut self) {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
    }

    /// Sunlight regeneration without the cooldown countdown.
    pub fn regen(
        &mut self,
        config: &KitConfig,
        exposure: Option<SunExposure>,
    ) -> Option<GaugeTransition> {
        if self.is_full() {
            self.charge = self.max_charge;
            return self.exit_exhaustion_if_ready();
        }
        let exposure = exposure?;
        if exposure.roofed || self.cooldown_ticks > 0 || !(exposure.sun_glow > 0.0) {
            return None;
        }
        self.gain(exposure.sun_glow * config.regen_per_sun)
    }

    /// Enters exhaustion if charge is empty but the state was never entered.
    pub fn settle(&mut self) -> Option<GaugeTransition> {
        if self.is_empty() {
            return self.enter_exhaustion();
        }
        None
    }

    /// Empties the gauge and forces exhaustion. Returns `Exhausted` only if the
    /// gauge was not already exhausted.
    pub fn drain_all_and_exhaust(&mut self) -> Option<GaugeTransition> {
        self.charge = 0.0;
        self.enter_exhaustion()
    }

    /// Adds charge directly, ignoring cooldown. Used while dormant.
    pub fn infuse(&mut self, amount: f32) {
        if amount > 0.0 {
            self.charge = (self.charge + amount).min(self.max_charge);
        }
    }

    /// Full charge, no cooldown, not exhausted. Returns `Recovered` if the
    /// gauge was exhausted.
    pub fn reset_full(&mut self) -> Option<GaugeTransition> {
        self.charge = self.max_charge;
        self.cooldown_ticks = 0;
        if self.exhausted {
            self.exhausted = false;
            return Some(GaugeTransition::Recovered);
        }
        None
    }

    fn enter_exhaustion(&mut self) -> Option<GaugeTransition> {
        if self.exhausted {
            return None;
        }
        self.exhausted = true;
        self.cooldown_ticks = self.cooldown_duration;
        Some(GaugeTransition::Exhausted)
    }

    fn exit_exhaustion_if_ready(&mut self) -> Option<GaugeTransition> {
        if self.exhausted && self.cooldown_ticks == 0 && self.charge > 0.0 {
            self.exhausted = false;
            return Some(GaugeTransition::Recovered);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn short_cooldown() -> KitConfig {
        KitConfig {
            exhaustion_cooldown_ticks: 3,
            ..KitConfig::new()
        }
    }

    #[test]
    fn drain_to_zero_exhausts_once() {
        let config = KitConfig::new();
        let mut gauge = SolarGauge::new(&config);
        assert_eq!(gauge.drain(100.0), Some(GaugeTransition::Exhausted));
        assert_eq!(gauge.charge(), 0.0);
        assert_eq!(gauge.cooldown_ticks(), 30_000);
        assert_eq!(gauge.drain(5.0), None);
        assert_eq!(gauge.drain_all_and_exhaust(), None);
    }

    #[test]
    fn non_positive_drain_is_noop() {
        let config = KitConfig::new();
        let mut gauge = SolarGauge::new(&config);
        assert_eq!(gauge.drain(0.0), None);
        assert_eq!(gauge.drain(-3.0), None);
        assert_eq!(gauge.drain(f32::NAN), None);
        assert_eq!(gauge.charge(), 100.0);
    }

    #[test]
    fn gain_is_blocked_during_cooldown() {
        let config = short_cooldown();
        let mut gauge = SolarGauge::new(&config);
        gauge.drain(100.0);
        assert_eq!(gauge.gain(10.0), None);
        assert_eq!(gauge.charge(), 0.0);

        for _ in 0..3 {
            gauge.tick_cooldown();
        }
        assert_eq!(gauge.gain(10.0), Some(GaugeTransition::Recovered));
        assert_eq!(gauge.charge(), 10.0);
        assert!(!gauge.is_exhausted());
    }

    #[test]
    fn regen_resumes_exactly_when_cooldown_reaches_zero() {
        let config = short_cooldown();
        let mut gauge = SolarGauge::new(&config);
        gauge.drain(100.0);
        let sun = Some(SunExposure::open_sky(1.0));

        assert_eq!(gauge.tick_regen(&config, sun), None);
        assert_eq!(gauge.tick_regen(&config, sun), None);
        assert_eq!(gauge.charge(), 0.0);
        assert_eq!(
            gauge.tick_regen(&config, sun),
            Some(GaugeTransition::Recovered)
        );
        assert!((gauge.charge() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn roof_and_darkness_block_regen() {
        let config = KitConfig::new();
        let mut gauge = SolarGauge::restore(&config, 50.0, 0, false);
        let roofed = SunExposure {
            sun_glow: 1.0,
            roofed: true,
        };
        gauge.tick_regen(&config, Some(roofed));
        gauge.tick_regen(&config, Some(SunExposure::open_sky(0.0)));
        gauge.tick_regen(&config, None);
        assert_eq!(gauge.charge(), 50.0);

        gauge.tick_regen(&config, Some(SunExposure::open_sky(0.5)));
        assert!((gauge.charge() - 50.025).abs() < 1e-4);
    }

    #[test]
    fn regen_caps_at_max() {
        let config = KitConfig::new();
        let mut gauge = SolarGauge::restore(&config, 99.99, 0, false);
        gauge.tick_regen(&config, Some(SunExposure::open_sky(1.0)));
        assert_eq!(gauge.charge(), 100.0);
        assert!(gauge.is_full());
    }

    #[test]
    fn authorize_does_not_mutate() {
        let config = KitConfig::new();
        let gauge = SolarGauge::restore(&config, 0.5, 0, false);
        assert!(gauge.try_authorize(0.5));
        assert!(!gauge.try_authorize(0.6));
        assert_eq!(gauge.charge(), 0.5);
    }

    #[test]
    fn restore_clamps_charge() {
        let config = KitConfig::new();
        assert_eq!(SolarGauge::restore(&config, 250.0, 0, false).charge(), 100.0);
        assert_eq!(SolarGauge::restore(&config, -4.0, 0, false).charge(), 0.0);
        assert_eq!(SolarGauge::restore(&config, f32::NAN, 0, false).charge(), 0.0);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Drain(f32),
        Gain(f32),
        Tick(f32, bool),
        Exhaust,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0.0f32..150.0).prop_map(Op::Drain),
            (0.0f32..150.0).prop_map(Op::Gain),
            (0.0f32..1.0, any::<bool>()).prop_map(|(sun, roofed)| Op::Tick(sun, roofed)),
            Just(Op::Exhaust),
        ]
    }

    proptest! {
        #[test]
        fn drain_never_goes_negative(start in 0.0f32..=100.0, amount in 0.0f32..1_000.0) {
            let config = KitConfig::new();
            let mut gauge = SolarGauge::restore(&config, start, 0, false);
            gauge.drain(amount);
            prop_assert!(gauge.charge() >= 0.0);
            if gauge.charge() == 0.0 {
                prop_assert!(gauge.is_exhausted());
            }
        }

        #[test]
        fn transitions_alternate(ops in prop::collection::vec(op(), 1..200)) {
            let config = short_cooldown();
            let mut gauge = SolarGauge::new(&config);
            let mut marked = false;

            for op in ops {
                let transition = match op {
                    Op::Drain(amount) => gauge.drain(amount),
                    Op::Gain(amount) => gauge.gain(amount),
                    Op::Tick(sun, roofed) => gauge.tick_regen(
                        &config,
                        Some(SunExposure { sun_glow: sun, roofed }),
                    ),
                    Op::Exhaust => gauge.drain_all_and_exhaust(),
                };
                match transition {
                    Some(GaugeTransition::Exhausted) => {
                        prop_assert!(!marked, "exhausted twice without recovery");
                        marked = true;
                    }
                    Some(GaugeTransition::Recovered) => {
                        prop_assert!(marked, "recovered without being exhausted");
                        marked = false;
                    }
                    None => {}
                }
                prop_assert_eq!(marked, gauge.is_exhausted());
                prop_assert!(gauge.charge() >= 0.0 && gauge.charge() <= gauge.max_charge());
            }
        }
    }
}
