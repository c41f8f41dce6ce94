//! Flight toggle and its per-tick upkeep.

use crate::config::KitConfig;
use crate::gauge::{GaugeTransition, SolarGauge};
use crate::kit::AbilityError;

/// Transient flight state. Never persisted: a restored kit is grounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flight {
    flying: bool,
}

/// Outcome of one tick of flight upkeep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlightTick {
    pub transition: Option<GaugeTransition>,
    /// Flight ended because the gauge ran dry.
    pub landed: bool,
}

impl Flight {
    pub fn is_flying(&self) -> bool {
        self.flying
    }

    pub fn enable(&mut self, gauge: &SolarGauge) -> Result<(), AbilityError> {
        if gauge.is_empty() {
            return Err(AbilityError::FlightUnpowered);
        }
        self.flying = true;
        Ok(())
    }

    pub fn disable(&mut self) -> bool {
        std::mem::replace(&mut self.flying, false)
    }

    /// Returns the new flying state.
    pub fn toggle(&mut self, gauge: &SolarGauge) -> Result<bool, AbilityError> {
        if self.flying {
            self.disable();
        } else {
            self.enable(gauge)?;
        }
        Ok(self.flying)
    }

    pub fn on_tick(&mut self, gauge: &mut SolarGauge, config: &KitConfig) -> FlightTick {
        if !self.flying {
            return FlightTick::default();
        }
        let transition = gauge.drain(config.flight_drain_per_tick);
        let landed = gauge.is_empty() && self.disable();
        FlightTick { transition, landed }
    }

    /// Per-cell path cost while flying. Never below one.
    pub fn move_cost(&self, base: f32, config: &KitConfig) -> f32 {
        if self.flying {
            (base * config.flight_move_cost_factor).max(1.0)
        } else {
            base
        }
    }
}
