//! Sun-bathing while the owner lies dead.
//!
//! Driven by the host's infrequent corpse tick, not the regular tick. The
//! gauge fills directly (cooldown does not apply) and a full gauge asks the
//! host to bring the owner back. Nothing happens under a roof or at night.

use crate::env::{Env, OracleError};
use crate::state::Position;

use super::{KitEvent, SolarKit};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DormantTick {
    pub infused: f32,
    pub resurrected: bool,
}

impl SolarKit {
    /// One corpse tick with the body resting at `resting_at`.
    pub fn dormant_tick(
        &mut self,
        resting_at: Position,
        env: &mut Env<'_>,
    ) -> Result<DormantTick, OracleError> {
        let mut outcome = DormantTick::default();
        if env.world.is_roofed(resting_at) {
            return Ok(outcome);
        }

        let sun = env.world.sun_glow();
        if sun <= 0.0 {
            return Ok(outcome);
        }

        let before = self.gauge.charge();
        self.gauge
            .infuse(sun * self.config.regen_per_sun * self.config.dormant_tick_interval as f32);
        outcome.infused = self.gauge.charge() - before;

        if self.gauge.is_full() && env.world.try_resurrect(self.owner)? {
            let transition = self.gauge.reset_full();
            self.apply_transition(transition, env);
            outcome.resurrected = true;
            self.events.push(KitEvent::Resurrected);
        }
        Ok(outcome)
    }
}
