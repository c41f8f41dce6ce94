//! Per-owner ability kit.
//!
//! [`SolarKit`] ties one owner's gauge, beam channel, flight and menu state to
//! the shared [`AbilityCatalog`]. Every entry point takes an [`Env`] for the
//! duration of the call and never holds on to host state.
//!
//! Two rules hold across all operations:
//! - gauge transitions reach the host exactly once (exhaustion marker on and
//!   off), and entering exhaustion silently stops any active beam
//! - a rejected request tells the player why, records a
//!   [`KitEvent::Rejected`], and leaves every piece of kit state untouched
//! - a one-shot that faults after its effects started keeps its cost and
//!   records a [`KitEvent::CastFaulted`] instead
mod dormancy;
mod error;
mod events;
mod save;

pub use dormancy::DormantTick;
pub use error::AbilityError;
pub use events::KitEvent;
pub use save::KitSave;

use std::sync::Arc;

use bitflags::bitflags;

use crate::area::{
    self, AreaStun, CastError, CastOutcome, ConeFreeze, Nova, OneShotAbility, Reveal,
};
use crate::beam::{BeamChannel, BeamStatus, StopReason};
use crate::catalog::{AbilityCatalog, BeamTier};
use crate::config::KitConfig;
use crate::env::{Cue, Env, Message};
use crate::flight::Flight;
use crate::gauge::{GaugeTransition, SolarGauge, SunExposure};
use crate::mitigation::{Mitigation, MitigationPolicy, MitigationRule};
use crate::state::{EntityId, IncomingDamage, Position};
use crate::stats::{StatKind, StatMultipliers};

bitflags! {
    /// Which ability menus the owner has open.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MenuFlags: u8 {
        const POWERS = 0b01;
        /// Secondary menu, only shown while `POWERS` is open.
        const MISC = 0b10;
    }
}

#[derive(Clone, Debug)]
pub struct SolarKit {
    owner: EntityId,
    gauge: SolarGauge,
    beam: BeamChannel,
    flight: Flight,
    menus: MenuFlags,
    catalog: Arc<AbilityCatalog>,
    config: KitConfig,
    mitigation: MitigationPolicy,
    stats: StatMultipliers,
    events: Vec<KitEvent>,
}

impl SolarKit {
    /// A fresh kit with a full gauge and closed menus.
    pub fn new(owner: EntityId, catalog: Arc<AbilityCatalog>, config: KitConfig) -> Self {
        Self {
            owner,
            gauge: SolarGauge::new(&config),
            beam: BeamChannel::new(),
            flight: Flight::default(),
            menus: MenuFlags::empty(),
            catalog,
            mitigation: MitigationPolicy::new(&config),
            stats: StatMultipliers::new(),
            config,
            events: Vec::new(),
        }
    }

    /// Rebuilds a kit from a save. The beam is idle and the owner grounded.
    pub fn restore(
        owner: EntityId,
        save: &KitSave,
        catalog: Arc<AbilityCatalog>,
        config: KitConfig,
    ) -> Self {
        let mut kit = Self::new(owner, catalog, config);
        kit.gauge = SolarGauge::restore(&config, save.charge, save.cooldown_ticks, save.exhausted);
        kit.menus = save.menus();
        kit
    }

    pub fn save(&self) -> KitSave {
        KitSave {
            charge: self.gauge.charge(),
            cooldown_ticks: self.gauge.cooldown_ticks(),
            exhausted: self.gauge.is_exhausted(),
            powers_menu: self.menus.contains(MenuFlags::POWERS),
            misc_menu: self.menus.contains(MenuFlags::MISC),
        }
    }

    pub fn with_stat_multipliers(mut self, stats: StatMultipliers) -> Self {
        self.stats = stats;
        self
    }

    // ===== accessors =====

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn gauge(&self) -> &SolarGauge {
        &self.gauge
    }

    pub fn beam(&self) -> &BeamChannel {
        &self.beam
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_flying()
    }

    pub fn menus(&self) -> MenuFlags {
        self.menus
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<KitEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== simulation =====

    /// One regular simulation tick.
    ///
    /// A dead or unplaced owner only loses its beam. Otherwise: cooldown
    /// countdown, flight upkeep, exhaustion check, beam, then sunlight.
    pub fn tick(&mut self, env: &mut Env<'_>) {
        let Some(view) = env.world.entity(self.owner).filter(|view| !view.dead) else {
            if self.beam.stop(self.owner, true, env) {
                self.events.push(KitEvent::BeamStopped(StopReason::OwnerLost));
            }
            return;
        };

        self.gauge.tick_cooldown();

        let flight = self.flight.on_tick(&mut self.gauge, &self.config);
        self.apply_transition(flight.transition, env);
        if flight.landed {
            self.events.push(KitEvent::FlightChanged { flying: false });
        }

        let settled = self.gauge.settle();
        self.apply_transition(settled, env);

        let beam = self
            .beam
            .on_tick(self.owner, &mut self.gauge, &self.config, env);
        self.apply_transition(beam.transition, env);
        match beam.status {
            BeamStatus::Stopped(reason) => self.events.push(KitEvent::BeamStopped(reason)),
            BeamStatus::Faulted(error) => self.events.push(KitEvent::BeamFaulted(error)),
            BeamStatus::Idle | BeamStatus::Continued => {}
        }

        let exposure = SunExposure {
            sun_glow: env.world.sun_glow(),
            roofed: env.world.is_roofed(view.position),
        };
        let regen = self.gauge.regen(&self.config, Some(exposure));
        self.apply_transition(regen, env);
    }

    // ===== beam =====

    pub fn start_beam(
        &mut self,
        tier: BeamTier,
        target: Position,
        env: &mut Env<'_>,
    ) -> Result<(), AbilityError> {
        match self
            .beam
            .start(self.owner, tier, target, &self.gauge, &self.catalog, env)
        {
            Ok(replaced) => {
                let target = self.beam.active().map_or(target, |active| active.target);
                self.events.push(KitEvent::BeamStarted {
                    tier,
                    target,
                    replaced: replaced.is_some(),
                });
                Ok(())
            }
            Err(error) => self.reject(error, env),
        }
    }

    /// Selecting the tier that is already channeling stops it. Returns whether
    /// a beam is active afterwards.
    pub fn toggle_beam(
        &mut self,
        tier: BeamTier,
        target: Position,
        env: &mut Env<'_>,
    ) -> Result<bool, AbilityError> {
        if self.beam.active().is_some_and(|active| active.tier == tier) {
            self.stop_beam(env);
            return Ok(false);
        }
        self.start_beam(tier, target, env).map(|()| true)
    }

    pub fn set_beam_target(&mut self, cell: Position, env: &Env<'_>) -> bool {
        self.beam.set_target(self.owner, cell, env)
    }

    /// Player-requested stop. Returns whether a beam was active.
    pub fn stop_beam(&mut self, env: &mut Env<'_>) -> bool {
        let stopped = self.beam.stop(self.owner, false, env);
        if stopped {
            self.events.push(KitEvent::BeamStopped(StopReason::Requested));
        }
        stopped
    }

    // ===== one-shots =====

    pub fn cast_cone_freeze(
        &mut self,
        aim: Position,
        env: &mut Env<'_>,
    ) -> Result<CastOutcome, AbilityError> {
        let ability = self
            .catalog
            .cone_freeze()
            .map(|descriptor| ConeFreeze::new(*descriptor, aim));
        self.cast(ability.map_err(AbilityError::from), env)
    }

    pub fn cast_area_stun(
        &mut self,
        target: EntityId,
        env: &mut Env<'_>,
    ) -> Result<CastOutcome, AbilityError> {
        let ability = self
            .catalog
            .area_stun()
            .map(|descriptor| AreaStun::new(*descriptor, target));
        self.cast(ability.map_err(AbilityError::from), env)
    }

    pub fn cast_reveal(&mut self, env: &mut Env<'_>) -> Result<CastOutcome, AbilityError> {
        let ability = self.catalog.reveal().map(|descriptor| Reveal::new(*descriptor));
        self.cast(ability.map_err(AbilityError::from), env)
    }

    /// Spends the whole gauge. `radius` is clamped into the configured bounds.
    pub fn cast_nova(
        &mut self,
        radius: f32,
        env: &mut Env<'_>,
    ) -> Result<CastOutcome, AbilityError> {
        let ability = self
            .catalog
            .nova()
            .map(|descriptor| Nova::new(*descriptor, radius, &self.config));
        self.cast(ability.map_err(AbilityError::from), env)
    }

    fn cast<A: OneShotAbility>(
        &mut self,
        ability: Result<A, AbilityError>,
        env: &mut Env<'_>,
    ) -> Result<CastOutcome, AbilityError> {
        let owner = self.owner;
        let resolved = ability
            .map_err(CastError::Rejected)
            .and_then(|ability| area::resolve(&ability, owner, &mut self.gauge, env));
        match resolved {
            Ok(outcome) => {
                self.apply_transition(outcome.transition, env);
                self.events.push(KitEvent::Cast(outcome));
                Ok(outcome)
            }
            Err(CastError::Rejected(error)) => self.reject(error, env),
            Err(CastError::Faulted { outcome, error }) => {
                self.apply_transition(outcome.transition, env);
                self.events.push(KitEvent::CastFaulted {
                    outcome,
                    error: error.clone(),
                });
                Err(AbilityError::Oracle(error))
            }
        }
    }

    // ===== flight =====

    /// Returns the new flying state.
    pub fn toggle_flight(&mut self, env: &mut Env<'_>) -> Result<bool, AbilityError> {
        match self.flight.toggle(&self.gauge) {
            Ok(flying) => {
                self.events.push(KitEvent::FlightChanged { flying });
                Ok(flying)
            }
            Err(error) => self.reject(error, env),
        }
    }

    /// Per-cell path cost for the owner.
    pub fn move_cost(&self, base: f32) -> f32 {
        self.flight.move_cost(base, &self.config)
    }

    // ===== menus =====

    /// Opens or closes menus. Closing the powers menu also closes the misc
    /// menu and silently ends any beam; the misc menu cannot open on its own.
    pub fn set_menu(&mut self, menu: MenuFlags, open: bool, env: &mut Env<'_>) {
        let before = self.menus;
        if open {
            self.menus.insert(menu);
            if !self.menus.contains(MenuFlags::POWERS) {
                self.menus.remove(MenuFlags::MISC);
            }
        } else {
            self.menus.remove(menu);
            if menu.contains(MenuFlags::POWERS) {
                self.menus.remove(MenuFlags::MISC);
                if self.beam.stop(self.owner, true, env) {
                    self.events.push(KitEvent::BeamStopped(StopReason::Requested));
                }
            }
        }
        if self.menus != before {
            self.events.push(KitEvent::MenusChanged(self.menus));
        }
    }

    // ===== damage =====

    /// Filters damage about to hit the owner.
    pub fn mitigate(&mut self, incoming: IncomingDamage, env: &mut Env<'_>) -> Mitigation {
        let mitigation = self.mitigation.apply(incoming, &mut self.gauge);
        self.apply_transition(mitigation.transition, env);
        if mitigation.rule != MitigationRule::PassThrough {
            self.events.push(KitEvent::DamageMitigated(mitigation));
        }
        mitigation
    }

    /// The host kept the owner alive through a killing blow.
    pub fn notify_lethal_prevented(&mut self, env: &mut Env<'_>) {
        let transition = self.mitigation.lethal_damage_prevented(&mut self.gauge);
        self.apply_transition(transition, env);
        self.events.push(KitEvent::LethalPrevented);
    }

    pub fn stat_multiplier(&self, stat: StatKind) -> f32 {
        self.stats
            .multiplier(stat, &self.gauge, self.flight.is_flying())
    }

    // ===== lifecycle =====

    /// Tears the kit down when the capability is removed.
    pub fn dismantle(mut self, env: &mut Env<'_>) -> Vec<KitEvent> {
        if self.beam.stop(self.owner, true, env) {
            self.events.push(KitEvent::BeamStopped(StopReason::Requested));
        }
        if self.gauge.is_exhausted() {
            env.world.set_exhaustion_marker(self.owner, false);
        }
        self.events
    }

    fn apply_transition(&mut self, transition: Option<GaugeTransition>, env: &mut Env<'_>) {
        match transition {
            Some(GaugeTransition::Exhausted) => {
                env.world.set_exhaustion_marker(self.owner, true);
                self.events.push(KitEvent::Exhausted);
                if self.beam.stop(self.owner, true, env) {
                    self.events.push(KitEvent::BeamStopped(StopReason::Exhausted));
                }
            }
            Some(GaugeTransition::Recovered) => {
                env.world.set_exhaustion_marker(self.owner, false);
                self.events.push(KitEvent::Recovered);
            }
            None => {}
        }
    }

    fn reject<T>(&mut self, error: AbilityError, env: &mut Env<'_>) -> Result<T, AbilityError> {
        if let Some(key) = error.message_key() {
            env.presenter.play_cue(Cue::AbilityRejected, None);
            env.presenter.message(Message::new(self.owner, key));
        }
        self.events.push(KitEvent::Rejected(error.clone()));
        Err(error)
    }
}
