//! Scripted sandbox session.
//!
//! One hero holds the capability on an open map with a raider, a fuel drum,
//! a crate and a roofed shed. The script walks through every ability, takes
//! hits, dies to a killing blow with an empty gauge, lies in the sun until it
//! comes back, and finally reloads the mid-fight save.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use solar_content::ContentFactory;
use solar_core::env::{GridWorld, RecordingPresenter};
use solar_core::{
    BeamTier, DamageKind, EntityId, IncomingDamage, MenuFlags, Position, StatKind, Tick,
};
use solar_runtime::{
    AbilityCommand, Event, FileKitRepository, LethalVerdict, LifecycleEvent, RuntimeConfig,
    SolarRuntime, Topic,
};

use crate::config::SimConfig;

const SAVE_SLOT: &str = "auto";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Command(AbilityCommand),
    Strike(IncomingDamage),
    /// A killing blow lands unless the kit prevents it.
    LethalBlow,
    Save,
    Load,
}

/// `step` runs just before tick `at` is simulated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptedStep {
    pub at: u64,
    pub step: Step,
}

/// End-of-run summary.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioReport {
    pub tick: Tick,
    pub hero_alive: bool,
    pub raider_alive: bool,
    pub charge: Option<f32>,
    pub fires: usize,
    pub revealed: usize,
    pub explosions: usize,
    /// Published events by name.
    pub events: BTreeMap<&'static str, usize>,
}

impl ScenarioReport {
    pub fn count(&self, name: &str) -> usize {
        self.events.get(name).copied().unwrap_or(0)
    }
}

pub struct Sandbox {
    pub world: GridWorld,
    pub presenter: RecordingPresenter,
    pub runtime: SolarRuntime,
    pub hero: EntityId,
    pub raider: EntityId,
    center: Position,
    receivers: Vec<(Topic, broadcast::Receiver<Event>)>,
    tally: BTreeMap<&'static str, usize>,
}

impl Sandbox {
    pub fn new(size: u32, mut runtime: SolarRuntime) -> Result<Self> {
        let mut world = GridWorld::new(size, size);
        let center = Position::new(size as i32 / 2, size as i32 / 2);
        let hero = world.spawn_character(center);
        let raider = world.spawn_character(Position::new(center.x + 6, center.y));
        // fuel drum and a wooden crate
        world.spawn_object(Position::new(center.x - 8, center.y), false, true);
        world.spawn_object(Position::new(center.x - 3, center.y + 3), true, false);
        for y in center.y - 12..=center.y - 10 {
            for x in center.x - 3..=center.x + 3 {
                world.set_roof(Position::new(x, y), true);
            }
        }
        world.add_wall(Position::new(center.x, center.y - 9));

        let receivers = runtime.event_bus().subscribe_multiple(&Topic::ALL);
        let mut presenter = RecordingPresenter::new();
        runtime
            .grant(hero, &mut presenter)
            .context("Failed to grant the capability")?;

        let mut sandbox = Self {
            world,
            presenter,
            runtime,
            hero,
            raider,
            center,
            receivers,
            tally: BTreeMap::new(),
        };
        sandbox.collect_events();
        Ok(sandbox)
    }

    /// The scripted session, sorted by tick. The final reload runs before
    /// the last tick.
    pub fn script(&self, ticks: u64) -> Vec<ScriptedStep> {
        let raider_at = Position::new(self.center.x + 6, self.center.y);
        let beside_raider = Position::new(self.center.x + 6, self.center.y + 2);
        let command = |at, command| ScriptedStep {
            at,
            step: Step::Command(command),
        };

        let mut script = vec![
            command(
                1,
                AbilityCommand::SetMenu {
                    menu: MenuFlags::POWERS,
                    open: true,
                },
            ),
            command(
                5,
                AbilityCommand::StartBeam {
                    tier: BeamTier::Medium,
                    target: raider_at,
                },
            ),
            command(40, AbilityCommand::AimBeam { target: beside_raider }),
            command(
                80,
                AbilityCommand::ToggleBeam {
                    tier: BeamTier::Medium,
                    target: beside_raider,
                },
            ),
            command(90, AbilityCommand::ConeFreeze { aim: raider_at }),
            command(
                100,
                AbilityCommand::AreaStun {
                    target: self.raider,
                },
            ),
            command(110, AbilityCommand::Reveal),
            command(120, AbilityCommand::ToggleFlight),
            ScriptedStep {
                at: 150,
                step: Step::Strike(IncomingDamage::new(DamageKind::Blunt, 150.0)),
            },
            ScriptedStep {
                at: 150,
                step: Step::Strike(IncomingDamage::new(DamageKind::Flame, 30.0)),
            },
            ScriptedStep {
                at: 180,
                step: Step::Save,
            },
            command(200, AbilityCommand::Nova { radius: 12.0 }),
            command(210, AbilityCommand::ToggleFlight),
            ScriptedStep {
                at: 220,
                step: Step::LethalBlow,
            },
            ScriptedStep {
                at: ticks,
                step: Step::Load,
            },
        ];
        script.sort_by_key(|scripted| scripted.at);
        script
    }

    pub fn apply(&mut self, step: Step, repo: &FileKitRepository) -> Result<()> {
        match step {
            Step::Command(command) => {
                match self.runtime.execute(
                    self.hero,
                    command,
                    &mut self.world,
                    &mut self.presenter,
                ) {
                    Ok(outcome) => {
                        info!(target: "sim", command = command.name(), ?outcome, "command applied");
                    }
                    Err(error) => {
                        warn!(target: "sim", command = command.name(), %error, "command rejected");
                    }
                }
            }
            Step::Strike(incoming) => {
                let landed = self.runtime.before_damage(
                    self.hero,
                    incoming,
                    &mut self.world,
                    &mut self.presenter,
                );
                info!(
                    target: "sim",
                    kind = ?incoming.kind,
                    incoming = incoming.amount,
                    landed = landed.amount,
                    "hero struck"
                );
            }
            Step::LethalBlow => {
                match self
                    .runtime
                    .on_lethal_damage(self.hero, &mut self.world, &mut self.presenter)
                {
                    LethalVerdict::Prevented => {
                        info!(target: "sim", "killing blow absorbed by the kit");
                    }
                    LethalVerdict::Allowed => {
                        self.world.kill(self.hero);
                        info!(target: "sim", "hero fell");
                    }
                }
            }
            Step::Save => {
                self.runtime
                    .save(repo, SAVE_SLOT)
                    .context("Failed to save kits")?;
            }
            Step::Load => {
                let loaded = self
                    .runtime
                    .load(repo, SAVE_SLOT, &mut self.world, &mut self.presenter)
                    .context("Failed to load kits")?;
                info!(target: "sim", loaded, slot = SAVE_SLOT, "reloaded save");
            }
        }
        self.collect_events();
        Ok(())
    }

    pub fn tick(&mut self) {
        self.world.tick();
        self.runtime.tick(&mut self.world, &mut self.presenter);
        self.collect_events();
    }

    /// Logs the hero's gauge along with what the host hooks currently answer.
    pub fn log_status(&mut self) {
        let Some(kit) = self.runtime.kit(self.hero) else {
            return;
        };
        let charge = kit.gauge().charge();
        let exhausted = kit.gauge().is_exhausted();
        let flying = kit.is_flying();

        let melee = self
            .runtime
            .stat_value(self.hero, StatKind::MeleeDps, 1.0, &mut self.world);
        let step_cost = self
            .runtime
            .move_cost(self.hero, self.center, 10.0, &mut self.world);
        let fire_allowed = self.runtime.allow_ignite(self.center, &mut self.world);

        info!(
            target: "sim",
            tick = %self.runtime.current_tick(),
            charge,
            exhausted,
            flying,
            melee,
            step_cost,
            fire_allowed,
            "hero status"
        );
    }

    pub fn report(&self) -> ScenarioReport {
        let alive = |id| {
            self.world
                .entity_state(id)
                .is_some_and(|entity| !entity.view.dead)
        };
        ScenarioReport {
            tick: self.runtime.current_tick(),
            hero_alive: alive(self.hero),
            raider_alive: alive(self.raider),
            charge: self.runtime.kit(self.hero).map(|kit| kit.gauge().charge()),
            fires: self.world.fires().count(),
            revealed: self.world.revealed_count(),
            explosions: self.world.explosions().len(),
            events: self.tally.clone(),
        }
    }

    fn collect_events(&mut self) {
        for (topic, rx) in &mut self.receivers {
            loop {
                match rx.try_recv() {
                    Ok(event) => *self.tally.entry(event_name(&event)).or_default() += 1,
                    Err(TryRecvError::Lagged(missed)) => {
                        warn!(target: "sim", ?topic, missed, "event consumer lagged");
                    }
                    Err(_) => break,
                }
            }
        }
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Kit { event, .. } => event.name(),
        Event::Lifecycle(LifecycleEvent::Granted { .. }) => "granted",
        Event::Lifecycle(LifecycleEvent::Revoked { .. }) => "revoked",
        Event::Lifecycle(LifecycleEvent::Saved { .. }) => "saved",
        Event::Lifecycle(LifecycleEvent::Loaded { .. }) => "loaded",
    }
}

/// Builds the runtime from content, runs the script for `config.ticks`
/// ticks and reports the outcome.
pub fn run_scenario(config: &SimConfig) -> Result<ScenarioReport> {
    let factory = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::embedded(),
    };
    let runtime = SolarRuntime::from_content(
        &factory,
        RuntimeConfig {
            game_seed: config.game_seed,
            ..RuntimeConfig::default()
        },
    )?;
    let repo = FileKitRepository::new(&config.save_dir).with_context(|| {
        format!(
            "Failed to open save directory {}",
            config.save_dir.display()
        )
    })?;

    let mut sandbox = Sandbox::new(config.map_size, runtime)?;
    let mut steps = sandbox.script(config.ticks).into_iter().peekable();
    info!(
        target: "sim",
        ticks = config.ticks,
        seed = config.game_seed,
        hero = %sandbox.hero,
        "scenario started"
    );

    for tick in 1..=config.ticks {
        while let Some(scripted) = steps.next_if(|scripted| scripted.at <= tick) {
            sandbox.apply(scripted.step, &repo)?;
        }
        sandbox.tick();
        if tick % 300 == 0 {
            sandbox.log_status();
        }
    }

    let report = sandbox.report();
    info!(target: "sim", ?report, "scenario finished");
    Ok(report)
}
