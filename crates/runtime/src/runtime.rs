//! Tick-driven runtime orchestrator.
//!
//! [`SolarRuntime`] owns the capability registry and drives every kit from
//! the host's simulation loop. It is fully synchronous: the host calls
//! [`SolarRuntime::tick`] once per simulation tick and the extension points
//! from inside its own pipelines. Everything a kit reports is logged and
//! published on the [`EventBus`].

use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use solar_content::ContentFactory;
use solar_content::loaders::LoadResult;
use solar_core::{
    EntityId, Env, IncomingDamage, KitError, KitEvent, Message, MessageKey, NullPresenter,
    Position, Presenter, SolarKit, StatKind, Tick, World,
};

use crate::api::{AbilityCommand, CommandOutcome, Result, RuntimeError};
use crate::capability::CapabilityRegistry;
use crate::events::{Event, EventBus, LifecycleEvent, Topic};
use crate::hooks::{HookContext, HookRegistry, LethalVerdict};
use crate::repository::{KitRecord, KitRepository, RuntimeSnapshot};

/// Session-level settings that are not balance data.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Seeds every random roll; the same seed replays the same session.
    pub game_seed: u64,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_seed: 0,
            event_buffer_size: 256,
        }
    }
}

pub struct SolarRuntime {
    registry: CapabilityRegistry,
    hooks: HookRegistry,
    bus: EventBus,
    tick: Tick,
    config: RuntimeConfig,
    /// Beam faults already logged, keyed by owner and error code.
    reported_faults: HashSet<(EntityId, &'static str)>,
}

impl SolarRuntime {
    pub fn new(registry: CapabilityRegistry, config: RuntimeConfig) -> Self {
        Self {
            registry,
            hooks: HookRegistry::default_hooks(),
            bus: EventBus::with_capacity(config.event_buffer_size),
            tick: Tick::ZERO,
            config,
            reported_faults: HashSet::new(),
        }
    }

    /// Builds a runtime from loaded balance settings and ability table.
    pub fn from_content(factory: &ContentFactory, config: RuntimeConfig) -> LoadResult<Self> {
        let settings = factory.load_settings()?;
        let catalog = factory.load_catalog()?;
        info!(
            target: "runtime",
            data_dir = ?factory.data_dir(),
            disabled = ?catalog.disabled(),
            seed = config.game_seed,
            "runtime content loaded"
        );
        let registry =
            CapabilityRegistry::new(catalog, settings.kit).with_stat_multipliers(settings.stats);
        Ok(Self::new(registry, config))
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    // ===== accessors =====

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn kit(&self, owner: EntityId) -> Option<&SolarKit> {
        self.registry.kit(owner)
    }

    pub fn has_capability(&self, entity: EntityId) -> bool {
        self.registry.has_capability(entity)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    // ===== lifecycle =====

    /// Gives `owner` a fully charged kit. A second grant is rejected and the
    /// player is told so.
    pub fn grant(&mut self, owner: EntityId, presenter: &mut dyn Presenter) -> Result<()> {
        if let Err(error) = self.registry.grant(owner) {
            presenter.message(Message::new(owner, MessageKey::CapabilityAlreadyGranted));
            return Err(error);
        }
        presenter.message(Message::new(owner, MessageKey::CapabilityGranted));
        info!(target: "runtime", %owner, tick = %self.tick, "capability granted");
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::Granted { owner }));
        Ok(())
    }

    pub fn revoke(
        &mut self,
        owner: EntityId,
        world: &mut dyn World,
        presenter: &mut dyn Presenter,
    ) -> Result<()> {
        let mut env = self.env(world, presenter);
        let events = self
            .registry
            .revoke(owner, &mut env)
            .ok_or(RuntimeError::NoCapability(owner))?;
        self.publish_kit_events(owner, events);
        self.reported_faults.retain(|(id, _)| *id != owner);

        info!(target: "runtime", %owner, tick = %self.tick, "capability revoked");
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::Revoked { owner }));
        Ok(())
    }

    // ===== simulation =====

    /// Advances one tick and ticks every kit in owner order.
    ///
    /// Dead owners get their corpse tick every `dormant_tick_interval` ticks,
    /// at the position the host reports for them.
    pub fn tick(&mut self, world: &mut dyn World, presenter: &mut dyn Presenter) {
        self.tick = self.tick.next();
        let interval = u64::from(self.registry.config().dormant_tick_interval.max(1));
        let dormant_due = self.tick.0 % interval == 0;
        let mut env = self.env(world, presenter);

        for owner in self.registry.owners() {
            let Some(kit) = self.registry.kit_mut(owner) else {
                continue;
            };
            kit.tick(&mut env);

            if dormant_due
                && let Some(body) = env.world.entity(owner).filter(|view| view.dead)
            {
                match kit.dormant_tick(body.position, &mut env) {
                    Ok(dormant) if dormant.infused > 0.0 => {
                        debug!(
                            target: "runtime::kit",
                            %owner,
                            infused = dormant.infused,
                            charge = kit.gauge().charge(),
                            "dormant kit absorbed sunlight"
                        );
                    }
                    Ok(_) => {}
                    Err(error) => {
                        warn!(
                            target: "runtime::kit",
                            %owner,
                            code = error.error_code(),
                            %error,
                            "resurrection request failed"
                        );
                    }
                }
            }

            let events = kit.drain_events();
            self.publish_kit_events(owner, events);
        }
    }

    /// Runs one player command against the owner's kit.
    ///
    /// A rejected command has already been shown to the player when this
    /// returns `Err`.
    pub fn execute(
        &mut self,
        owner: EntityId,
        command: AbilityCommand,
        world: &mut dyn World,
        presenter: &mut dyn Presenter,
    ) -> Result<CommandOutcome> {
        let mut env = self.env(world, presenter);
        let kit = self
            .registry
            .kit_mut(owner)
            .ok_or(RuntimeError::NoCapability(owner))?;

        let outcome = match command {
            AbilityCommand::StartBeam { tier, target } => kit
                .start_beam(tier, target, &mut env)
                .map(|()| CommandOutcome::Beam { active: true }),
            AbilityCommand::ToggleBeam { tier, target } => kit
                .toggle_beam(tier, target, &mut env)
                .map(|active| CommandOutcome::Beam { active }),
            AbilityCommand::AimBeam { target } => {
                kit.set_beam_target(target, &env);
                Ok(CommandOutcome::Beam {
                    active: kit.beam().active().is_some(),
                })
            }
            AbilityCommand::StopBeam => {
                kit.stop_beam(&mut env);
                Ok(CommandOutcome::Beam { active: false })
            }
            AbilityCommand::ConeFreeze { aim } => kit
                .cast_cone_freeze(aim, &mut env)
                .map(CommandOutcome::Cast),
            AbilityCommand::AreaStun { target } => kit
                .cast_area_stun(target, &mut env)
                .map(CommandOutcome::Cast),
            AbilityCommand::Reveal => kit.cast_reveal(&mut env).map(CommandOutcome::Cast),
            AbilityCommand::Nova { radius } => {
                kit.cast_nova(radius, &mut env).map(CommandOutcome::Cast)
            }
            AbilityCommand::ToggleFlight => kit
                .toggle_flight(&mut env)
                .map(|flying| CommandOutcome::Flight { flying }),
            AbilityCommand::SetMenu { menu, open } => {
                kit.set_menu(menu, open, &mut env);
                Ok(CommandOutcome::Menus(kit.menus()))
            }
        };

        let events = kit.drain_events();
        self.publish_kit_events(owner, events);
        debug!(
            target: "runtime",
            %owner,
            command = command.name(),
            ok = outcome.is_ok(),
            "command executed"
        );
        outcome.map_err(RuntimeError::from)
    }

    // ===== host extension points =====

    /// Damage about to hit `target`, after every hook rewrote it.
    pub fn before_damage(
        &mut self,
        target: EntityId,
        incoming: IncomingDamage,
        world: &mut dyn World,
        presenter: &mut dyn Presenter,
    ) -> IncomingDamage {
        let mut env = self.env(world, presenter);
        let mut ctx = HookContext::new(&mut self.registry, &mut env);
        let damage = self.hooks.before_damage(&mut ctx, target, incoming);
        self.flush(target);
        damage
    }

    /// A killing blow is about to land on `target`.
    pub fn on_lethal_damage(
        &mut self,
        target: EntityId,
        world: &mut dyn World,
        presenter: &mut dyn Presenter,
    ) -> LethalVerdict {
        let mut env = self.env(world, presenter);
        let mut ctx = HookContext::new(&mut self.registry, &mut env);
        let verdict = self.hooks.on_lethal_damage(&mut ctx, target);
        self.flush(target);
        verdict
    }

    pub fn move_cost(
        &mut self,
        entity: EntityId,
        cell: Position,
        base: f32,
        world: &mut dyn World,
    ) -> f32 {
        let mut presenter = NullPresenter;
        let mut env = self.env(world, &mut presenter);
        let ctx = HookContext::new(&mut self.registry, &mut env);
        self.hooks.move_cost(&ctx, entity, cell, base)
    }

    /// Whether the host may start a fire in `cell`.
    pub fn allow_ignite(&mut self, cell: Position, world: &mut dyn World) -> bool {
        let mut presenter = NullPresenter;
        let mut env = self.env(world, &mut presenter);
        let ctx = HookContext::new(&mut self.registry, &mut env);
        self.hooks.allow_ignite(&ctx, cell)
    }

    pub fn stat_value(
        &mut self,
        entity: EntityId,
        stat: StatKind,
        base: f32,
        world: &mut dyn World,
    ) -> f32 {
        let mut presenter = NullPresenter;
        let mut env = self.env(world, &mut presenter);
        let ctx = HookContext::new(&mut self.registry, &mut env);
        self.hooks.stat_value(&ctx, entity, stat, base)
    }

    // ===== persistence =====

    pub fn snapshot(&self) -> RuntimeSnapshot {
        RuntimeSnapshot {
            tick: self.tick,
            kits: self
                .registry
                .kits()
                .map(|kit| KitRecord {
                    owner: kit.owner(),
                    save: kit.save(),
                })
                .collect(),
        }
    }

    pub fn save(&self, repo: &dyn KitRepository, slot: &str) -> Result<()> {
        let snapshot = self.snapshot();
        repo.save(slot, &snapshot)?;

        let kits = snapshot.kits.len();
        info!(target: "runtime", slot, kits, tick = %self.tick, "kits saved");
        self.bus.publish(Event::Lifecycle(LifecycleEvent::Saved {
            slot: slot.to_owned(),
            kits,
        }));
        Ok(())
    }

    /// Replaces every kit with the ones saved in `slot`. Returns `false` when
    /// the slot is empty, leaving the session untouched.
    ///
    /// Current kits are dismantled first. Restored beams are idle and
    /// exhausted owners get their marker back.
    pub fn load(
        &mut self,
        repo: &dyn KitRepository,
        slot: &str,
        world: &mut dyn World,
        presenter: &mut dyn Presenter,
    ) -> Result<bool> {
        let Some(snapshot) = repo.load(slot)? else {
            debug!(target: "runtime", slot, "nothing saved in slot");
            return Ok(false);
        };

        self.tick = snapshot.tick;
        let mut env = self.env(world, presenter);
        for owner in self.registry.owners() {
            if let Some(events) = self.registry.revoke(owner, &mut env) {
                self.publish_kit_events(owner, events);
            }
        }

        self.registry.restore_all(
            snapshot
                .kits
                .iter()
                .map(|record| (record.owner, record.save)),
        );
        for record in snapshot.kits.iter().filter(|record| record.save.exhausted) {
            env.world.set_exhaustion_marker(record.owner, true);
        }
        self.reported_faults.clear();

        let kits = snapshot.kits.len();
        info!(target: "runtime", slot, kits, tick = %self.tick, "kits loaded");
        self.bus.publish(Event::Lifecycle(LifecycleEvent::Loaded {
            slot: slot.to_owned(),
            kits,
        }));
        Ok(true)
    }

    // ===== internals =====

    fn env<'a>(&self, world: &'a mut dyn World, presenter: &'a mut dyn Presenter) -> Env<'a> {
        Env::new(world, presenter, self.tick).with_seed(self.config.game_seed)
    }

    fn flush(&mut self, owner: EntityId) {
        if let Some(kit) = self.registry.kit_mut(owner) {
            let events = kit.drain_events();
            self.publish_kit_events(owner, events);
        }
    }

    fn publish_kit_events(&mut self, owner: EntityId, events: Vec<KitEvent>) {
        for event in events {
            self.log_kit_event(owner, &event);
            self.bus.publish(Event::Kit {
                tick: self.tick,
                owner,
                event,
            });
        }
    }

    fn log_kit_event(&mut self, owner: EntityId, event: &KitEvent) {
        let tick = self.tick;
        match event {
            KitEvent::BeamFaulted(error) => {
                if self.reported_faults.insert((owner, error.error_code())) {
                    warn!(
                        target: "runtime::kit",
                        %owner,
                        %tick,
                        code = error.error_code(),
                        %error,
                        "beam stopped by host fault"
                    );
                }
            }
            KitEvent::CastFaulted { outcome, error } => {
                warn!(
                    target: "runtime::kit",
                    %owner,
                    %tick,
                    ability = %outcome.kind,
                    spent = outcome.charge_spent,
                    code = error.error_code(),
                    %error,
                    "one-shot interrupted by host fault"
                );
            }
            KitEvent::Rejected(error) if error.severity().is_host_fault() => {
                warn!(
                    target: "runtime::kit",
                    %owner,
                    %tick,
                    code = error.error_code(),
                    severity = error.severity().label(),
                    %error,
                    "ability aborted by host fault"
                );
            }
            KitEvent::Rejected(error) => {
                debug!(
                    target: "runtime::kit",
                    %owner,
                    %tick,
                    code = error.error_code(),
                    severity = error.severity().label(),
                    %error,
                    "ability rejected"
                );
            }
            KitEvent::Exhausted | KitEvent::LethalPrevented | KitEvent::Resurrected => {
                info!(target: "runtime::kit", %owner, %tick, event = event.name(), "kit event");
            }
            _ => {
                debug!(target: "runtime::kit", %owner, %tick, event = event.name(), "kit event");
            }
        }
    }
}
