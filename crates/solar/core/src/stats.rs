//! Stat multipliers granted by the gauge.

use strum::{Display, EnumIter};

use crate::gauge::SolarGauge;

/// Host stats the kit modifies. Anything else maps to `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    MeleeDps,
    CarryingCapacity,
    MiningSpeed,
    MoveSpeed,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatMultipliers {
    /// Applied to every stat while exhausted or empty.
    pub depleted: f32,
    pub melee_dps: f32,
    pub carrying_capacity: f32,
    pub mining_speed: f32,
    pub move_speed: f32,
    /// Extra move speed factor while flying, on top of `move_speed`.
    pub flying_move_bonus: f32,
}

impl StatMultipliers {
    pub const fn new() -> Self {
        Self {
            depleted: 0.5,
            melee_dps: 4.0,
            carrying_capacity: 3.0,
            mining_speed: 3.0,
            move_speed: 1.5,
            flying_move_bonus: 1.5,
        }
    }

    pub fn multiplier(&self, stat: StatKind, gauge: &SolarGauge, flying: bool) -> f32 {
        if gauge.is_empty() || gauge.is_exhausted() {
            return self.depleted;
        }
        match stat {
            StatKind::MeleeDps => self.melee_dps,
            StatKind::CarryingCapacity => self.carrying_capacity,
            StatKind::MiningSpeed => self.mining_speed,
            StatKind::MoveSpeed if flying => self.move_speed * self.flying_move_bonus,
            StatKind::MoveSpeed => self.move_speed,
            StatKind::Other => 1.0,
        }
    }
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KitConfig;
    use strum::IntoEnumIterator;

    #[test]
    fn charged_owner_gets_boosts() {
        let config = KitConfig::new();
        let gauge = SolarGauge::new(&config);
        let stats = StatMultipliers::new();
        assert_eq!(stats.multiplier(StatKind::MeleeDps, &gauge, false), 4.0);
        assert_eq!(stats.multiplier(StatKind::MoveSpeed, &gauge, false), 1.5);
        assert_eq!(stats.multiplier(StatKind::MoveSpeed, &gauge, true), 2.25);
        assert_eq!(stats.multiplier(StatKind::Other, &gauge, true), 1.0);
    }

    #[test]
    fn depleted_owner_is_halved_everywhere() {
        let config = KitConfig::new();
        let mut gauge = SolarGauge::new(&config);
        gauge.drain_all_and_exhaust();
        let stats = StatMultipliers::new();
        for stat in StatKind::iter() {
            assert_eq!(stats.multiplier(stat, &gauge, true), 0.5, "{stat}");
        }
    }
}
