//! Continuous beam channel.
//!
//! `Idle` until [`BeamChannel::start`] succeeds, then `Active` and driven by
//! [`BeamChannel::on_tick`] once per simulation step. Stopping is synchronous
//! and idempotent. Targeting (picking a cell) belongs to the host's input
//! layer and is not a state here.

use crate::catalog::{AbilityCatalog, BeamDescriptor, BeamTier};
use crate::config::KitConfig;
use crate::env::{
    Cue, Env, Message, MessageKey, OracleError, RollContext, SustainerHandle, SustainerKind,
    Visual,
};
use crate::gauge::{GaugeTransition, SolarGauge};
use crate::geometry::trace_line;
use crate::kit::AbilityError;
use crate::state::{DamageInfo, DamageKind, EntityId, Position, Tick};

/// Minimum scale of the scorch visual left where the beam starts a fire.
const BURN_VISUAL_MIN_SCALE: f32 = 0.8;

/// State of a channel in progress. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveBeam {
    pub tier: BeamTier,
    pub descriptor: BeamDescriptor,
    pub target: Position,
    /// Owner position at the last processed tick.
    pub origin: Position,
    pub started_at: Tick,
    sustainer: Option<SustainerHandle>,
}

/// Why a channel ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Caller asked for it (toggle, menu close, revoke).
    Requested,
    /// A new beam replaced this one.
    Replaced,
    /// Not enough charge for the next tick.
    OutOfCharge,
    /// The drain for this tick emptied the gauge.
    Exhausted,
    /// Owner died, went down, or left the map.
    OwnerLost,
    /// A host collaborator failed mid-tick.
    Fault,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BeamStatus {
    Idle,
    Continued,
    Stopped(StopReason),
    /// Tick processing failed; the channel was stopped silently.
    Faulted(OracleError),
}

/// Outcome of one beam tick.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamTick {
    pub status: BeamStatus,
    /// Gauge edge caused by this tick's drain.
    pub transition: Option<GaugeTransition>,
}

impl BeamTick {
    fn new(status: BeamStatus, transition: Option<GaugeTransition>) -> Self {
        Self { status, transition }
    }
}

enum Step {
    Continue,
    Stop { reason: StopReason, silent: bool },
}

/// At most one active beam per owner.
#[derive(Clone, Debug, Default)]
pub struct BeamChannel {
    active: Option<ActiveBeam>,
}

impl BeamChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveBeam> {
        self.active.as_ref()
    }

    /// Starts a channel, silently replacing any active one.
    ///
    /// Out-of-bounds targets aim at the owner's own cell, which keeps the
    /// channel alive without tracing anything until it is re-aimed.
    pub fn start(
        &mut self,
        owner: EntityId,
        tier: BeamTier,
        target: Position,
        gauge: &SolarGauge,
        catalog: &AbilityCatalog,
        env: &mut Env<'_>,
    ) -> Result<Option<StopReason>, AbilityError> {
        let view = env
            .world
            .entity(owner)
            .ok_or(AbilityError::OwnerUnavailable(owner))?;
        if !view.is_capable() {
            return Err(AbilityError::OwnerIncapable(owner));
        }
        let descriptor = *catalog.beam(tier)?;
        if !gauge.try_authorize(descriptor.charge_cost_per_second) {
            return Err(AbilityError::NotEnoughCharge {
                required: descriptor.charge_cost_per_second,
                available: gauge.charge(),
            });
        }

        let replaced = self
            .stop(owner, true, env)
            .then_some(StopReason::Replaced);

        let origin = view.position;
        let target = if env.world.contains(target) {
            target
        } else {
            origin
        };
        let sustainer = env
            .presenter
            .start_sustainer(SustainerKind::BeamLoop, origin);
        self.active = Some(ActiveBeam {
            tier,
            descriptor,
            target,
            origin,
            started_at: env.now,
            sustainer,
        });
        env.presenter
            .message(Message::new(owner, MessageKey::BeamActive));
        Ok(replaced)
    }

    /// Re-aims the active channel. Ignored when idle, when the owner is gone,
    /// or when the cell is out of bounds.
    pub fn set_target(&mut self, owner: EntityId, cell: Position, env: &Env<'_>) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if env.world.entity(owner).is_none() || !env.world.contains(cell) {
            return false;
        }
        active.target = cell;
        true
    }

    /// Ends the channel. Returns whether a channel was active.
    ///
    /// Non-silent stops play the stop cue and tell the player.
    pub fn stop(&mut self, owner: EntityId, silent: bool, env: &mut Env<'_>) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        if let Some(handle) = active.sustainer {
            env.presenter.end_sustainer(handle);
        }
        if !silent {
            env.presenter.play_cue(Cue::BeamStop, Some(active.origin));
            env.presenter
                .message(Message::new(owner, MessageKey::BeamEnded));
        }
        true
    }

    /// Drops channel state without touching the presenter. Used when state is
    /// restored from a save, where no sustainer exists yet.
    pub fn discard(&mut self) {
        self.active = None;
    }

    /// One simulation tick of the channel.
    ///
    /// Never fails: collaborator errors stop the channel silently and come back
    /// as [`BeamStatus::Faulted`].
    pub fn on_tick(
        &mut self,
        owner: EntityId,
        gauge: &mut SolarGauge,
        config: &KitConfig,
        env: &mut Env<'_>,
    ) -> BeamTick {
        let Some(active) = self.active.as_mut() else {
            return BeamTick::new(BeamStatus::Idle, None);
        };

        let mut transition = None;
        match advance(active, owner, gauge, config, env, &mut transition) {
            Ok(Step::Continue) => BeamTick::new(BeamStatus::Continued, transition),
            Ok(Step::Stop { reason, silent }) => {
                self.stop(owner, silent, env);
                BeamTick::new(BeamStatus::Stopped(reason), transition)
            }
            Err(error) => {
                self.stop(owner, true, env);
                BeamTick::new(BeamStatus::Faulted(error), transition)
            }
        }
    }
}

fn advance(
    active: &mut ActiveBeam,
    owner: EntityId,
    gauge: &mut SolarGauge,
    config: &KitConfig,
    env: &mut Env<'_>,
    transition: &mut Option<GaugeTransition>,
) -> Result<Step, OracleError> {
    let Some(view) = env.world.entity(owner).filter(|view| view.is_capable()) else {
        return Ok(Step::Stop {
            reason: StopReason::OwnerLost,
            silent: true,
        });
    };

    let descriptor = active.descriptor;
    let cost = config.per_tick(descriptor.charge_cost_per_second);
    if gauge.charge() < cost {
        return Ok(Step::Stop {
            reason: StopReason::OutOfCharge,
            silent: false,
        });
    }
    *transition = gauge.drain(cost);
    if *transition == Some(GaugeTransition::Exhausted) {
        return Ok(Step::Stop {
            reason: StopReason::Exhausted,
            silent: true,
        });
    }

    let origin = view.position;
    active.origin = origin;
    let target = if env.world.contains(active.target) {
        active.target
    } else {
        origin
    };
    if target == origin {
        return Ok(Step::Continue);
    }

    env.world.face_toward(owner, target);
    if let Some(handle) = active.sustainer {
        env.presenter.maintain_sustainer(handle);
    }

    let damage = DamageInfo::new(
        DamageKind::Flame,
        config.per_tick(descriptor.damage_per_second),
        descriptor.armor_penetration,
    )
    .with_instigator(owner);
    let ignite_chance = config.per_tick(descriptor.ignite_chance_per_second);
    let now = env.now.0 as i64;

    for (index, cell) in trace_line(origin, target).into_iter().enumerate().skip(1) {
        if !env.world.contains(cell) {
            continue;
        }
        if (now + cell.x as i64 + cell.y as i64).rem_euclid(2) == 0 {
            env.presenter
                .spawn_visual(Visual::BeamGlow, cell, descriptor.visual_scale);
        }
        for occupant in env.world.occupants(cell) {
            if occupant.id == owner {
                continue;
            }
            env.world.apply_damage(occupant.id, damage)?;
            if occupant.is_character() {
                env.world
                    .stun(occupant.id, config.beam_stun_ticks, Some(owner))?;
            }
        }
        if ignite_chance > 0.0
            && env.roll(owner, RollContext::BeamIgnite, index as u32, ignite_chance)
            && env
                .world
                .try_ignite(cell, descriptor.effect_size, Some(owner))?
        {
            env.presenter.spawn_visual(
                Visual::BeamBurn,
                cell,
                descriptor.effect_size.max(BURN_VISUAL_MIN_SCALE),
            );
        }
    }
    Ok(Step::Continue)
}
