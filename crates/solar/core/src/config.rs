/// Balance constants and tunable parameters for a solar ability kit.
///
/// Values that are balance choices (thresholds, drain rates, durations) are
/// runtime-tunable so hosts can load them from data. Values that size bounded
/// collections are associated consts and cannot change at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KitConfig {
    /// Upper bound of the solar gauge.
    pub max_charge: f32,
    /// Ticks regeneration stays suppressed after the gauge hits zero.
    pub exhaustion_cooldown_ticks: u32,
    /// Charge gained per tick per unit of sunlight intensity.
    pub regen_per_sun: f32,
    /// Simulation ticks per real-time second; converts per-second rates.
    pub ticks_per_second: u32,

    /// Raw damage below this value is ignored entirely; at or above it the
    /// overflow passes through.
    pub mitigation_threshold: f32,
    /// Fraction of raw damage drained from the gauge when absorbing a big hit.
    pub absorb_fraction: f32,
    /// Maximum charge drained for a single absorbed hit.
    pub absorb_cap: f32,

    pub nova_min_radius: f32,
    pub nova_max_radius: f32,

    /// Charge drained per tick while flying.
    pub flight_drain_per_tick: f32,
    /// Multiplier applied to the host's per-cell move cost while flying.
    pub flight_move_cost_factor: f32,

    /// Interval of the host's infrequent corpse tick; dormant regeneration is
    /// scaled by it.
    pub dormant_tick_interval: u32,

    /// Stun applied to characters caught in the beam, per tick of exposure.
    pub beam_stun_ticks: u32,
}

impl KitConfig {
    // ===== compile-time constants used as type parameters =====
    /// Safety bound on the number of steps a beam trace may take.
    pub const MAX_BEAM_STEPS: usize = 256;
    /// Capacity of a traced beam path (origin plus every step).
    pub const MAX_BEAM_CELLS: usize = Self::MAX_BEAM_STEPS + 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_CHARGE: f32 = 100.0;
    pub const DEFAULT_EXHAUSTION_COOLDOWN_TICKS: u32 = 30_000;
    pub const DEFAULT_REGEN_PER_SUN: f32 = 0.05;
    pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;
    pub const DEFAULT_MITIGATION_THRESHOLD: f32 = 80.0;
    pub const DEFAULT_ABSORB_FRACTION: f32 = 0.05;
    pub const DEFAULT_ABSORB_CAP: f32 = 10.0;
    pub const DEFAULT_NOVA_MIN_RADIUS: f32 = 10.0;
    pub const DEFAULT_NOVA_MAX_RADIUS: f32 = 79.0;
    pub const DEFAULT_FLIGHT_DRAIN_PER_TICK: f32 = 0.05;
    pub const DEFAULT_FLIGHT_MOVE_COST_FACTOR: f32 = 0.75;
    pub const DEFAULT_DORMANT_TICK_INTERVAL: u32 = 250;
    pub const DEFAULT_BEAM_STUN_TICKS: u32 = 15;

    pub const fn new() -> Self {
        Self {
            max_charge: Self::DEFAULT_MAX_CHARGE,
            exhaustion_cooldown_ticks: Self::DEFAULT_EXHAUSTION_COOLDOWN_TICKS,
            regen_per_sun: Self::DEFAULT_REGEN_PER_SUN,
            ticks_per_second: Self::DEFAULT_TICKS_PER_SECOND,
            mitigation_threshold: Self::DEFAULT_MITIGATION_THRESHOLD,
            absorb_fraction: Self::DEFAULT_ABSORB_FRACTION,
            absorb_cap: Self::DEFAULT_ABSORB_CAP,
            nova_min_radius: Self::DEFAULT_NOVA_MIN_RADIUS,
            nova_max_radius: Self::DEFAULT_NOVA_MAX_RADIUS,
            flight_drain_per_tick: Self::DEFAULT_FLIGHT_DRAIN_PER_TICK,
            flight_move_cost_factor: Self::DEFAULT_FLIGHT_MOVE_COST_FACTOR,
            dormant_tick_interval: Self::DEFAULT_DORMANT_TICK_INTERVAL,
            beam_stun_ticks: Self::DEFAULT_BEAM_STUN_TICKS,
        }
    }

    /// Converts a per-second rate into the amount applied on a single tick.
    pub fn per_tick(&self, per_second: f32) -> f32 {
        per_second / self.ticks_per_second.max(1) as f32
    }

    /// Clamps a requested nova radius into the configured bounds.
    pub fn clamp_nova_radius(&self, radius: f32) -> f32 {
        if radius.is_nan() {
            return self.nova_min_radius;
        }
        radius.clamp(self.nova_min_radius, self.nova_max_radius)
    }
}

impl Default for KitConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_tick_divides_by_tick_rate() {
        let config = KitConfig::new();
        assert!((config.per_tick(60.0) - 1.0).abs() < f32::EPSILON);
        assert!((config.per_tick(1.5) - 0.025).abs() < 1e-6);
    }

    #[test]
    fn nova_radius_is_clamped() {
        let config = KitConfig::new();
        assert_eq!(config.clamp_nova_radius(3.0), 10.0);
        assert_eq!(config.clamp_nova_radius(50.0), 50.0);
        assert_eq!(config.clamp_nova_radius(500.0), 79.0);
        assert_eq!(config.clamp_nova_radius(f32::NAN), 10.0);
    }
}
