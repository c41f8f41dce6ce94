//! End-to-end runtime scenarios against the in-memory grid host.

use solar_core::env::{GridWorld, RecordingPresenter, WorldOp};
use solar_core::{
    AbilityCatalog, AbilityError, BeamTier, DamageKind, EntityId, IncomingDamage, KitConfig,
    KitEvent, KitSave, MenuFlags, MessageKey, OracleError, Position, StatKind, StopReason, Tick,
};
use solar_runtime::{
    AbilityCommand, CapabilityRegistry, CommandOutcome, Event, FileKitRepository,
    InMemoryKitRepository, KitRecord, KitRepository, LethalVerdict, LifecycleEvent,
    RuntimeConfig, RuntimeError, RuntimeSnapshot, SolarRuntime, Topic,
};
use tokio::sync::broadcast;

struct Host {
    world: GridWorld,
    presenter: RecordingPresenter,
    runtime: SolarRuntime,
    owner: EntityId,
}

impl Host {
    fn new() -> Self {
        Self::with_seed(0)
    }

    fn with_seed(game_seed: u64) -> Self {
        let mut world = GridWorld::new(40, 40);
        let owner = world.spawn_character(Position::new(15, 15));
        let mut presenter = RecordingPresenter::new();
        let mut runtime = runtime(game_seed);
        runtime.grant(owner, &mut presenter).unwrap();
        Self {
            world,
            presenter,
            runtime,
            owner,
        }
    }

    fn execute(&mut self, command: AbilityCommand) -> solar_runtime::Result<CommandOutcome> {
        self.runtime
            .execute(self.owner, command, &mut self.world, &mut self.presenter)
    }

    fn tick(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.runtime.tick(&mut self.world, &mut self.presenter);
        }
    }

    fn charge(&self) -> f32 {
        self.runtime.kit(self.owner).unwrap().gauge().charge()
    }

    fn last_message(&self) -> Option<MessageKey> {
        self.presenter.messages().last().map(|message| message.key)
    }
}

fn runtime(game_seed: u64) -> SolarRuntime {
    let registry = CapabilityRegistry::new(AbilityCatalog::standard(), KitConfig::new());
    SolarRuntime::new(
        registry,
        RuntimeConfig {
            game_seed,
            ..RuntimeConfig::default()
        },
    )
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn kit_events(events: &[Event]) -> Vec<KitEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Kit { event, .. } => Some(event.clone()),
            Event::Lifecycle(_) => None,
        })
        .collect()
}

#[test]
fn beam_drains_in_darkness_and_reports_on_beam_topic() {
    let mut host = Host::new();
    host.world.set_sun_glow(0.0);
    let mut beam_events = host.runtime.subscribe(Topic::Beam);

    let outcome = host
        .execute(AbilityCommand::StartBeam {
            tier: BeamTier::Low,
            target: Position::new(20, 15),
        })
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Beam { active: true });

    host.tick(60);
    assert!(host.charge() < 100.0);
    assert!(host.charge() > 99.0);

    let outcome = host.execute(AbilityCommand::StopBeam).unwrap();
    assert_eq!(outcome, CommandOutcome::Beam { active: false });

    let events = kit_events(&drain(&mut beam_events));
    assert!(matches!(
        events.first(),
        Some(KitEvent::BeamStarted {
            tier: BeamTier::Low,
            replaced: false,
            ..
        })
    ));
    assert_eq!(
        events.last(),
        Some(&KitEvent::BeamStopped(StopReason::Requested))
    );
}

#[test]
fn toggling_the_active_tier_stops_it() {
    let mut host = Host::new();
    let toggle = AbilityCommand::ToggleBeam {
        tier: BeamTier::Medium,
        target: Position::new(20, 15),
    };
    assert_eq!(
        host.execute(toggle).unwrap(),
        CommandOutcome::Beam { active: true }
    );
    assert_eq!(
        host.execute(toggle).unwrap(),
        CommandOutcome::Beam { active: false }
    );
}

#[test]
fn granting_twice_is_rejected_with_a_message() {
    let mut host = Host::new();
    assert_eq!(host.last_message(), Some(MessageKey::CapabilityGranted));

    let result = host.runtime.grant(host.owner, &mut host.presenter);
    assert!(matches!(result, Err(RuntimeError::AlreadyGranted(id)) if id == host.owner));
    assert_eq!(host.last_message(), Some(MessageKey::CapabilityAlreadyGranted));
    assert_eq!(host.runtime.registry().len(), 1);
}

#[test]
fn commands_need_the_capability() {
    let mut host = Host::new();
    let stranger = host.world.spawn_character(Position::new(5, 5));
    let result = host.runtime.execute(
        stranger,
        AbilityCommand::Reveal,
        &mut host.world,
        &mut host.presenter,
    );
    assert!(matches!(result, Err(RuntimeError::NoCapability(id)) if id == stranger));
}

#[test]
fn nova_exhausts_and_later_requests_are_rejected_visibly() {
    let mut host = Host::new();
    let mut gauge_events = host.runtime.subscribe(Topic::Gauge);

    let outcome = host.execute(AbilityCommand::Nova { radius: 12.0 }).unwrap();
    assert!(matches!(outcome, CommandOutcome::Cast(_)));
    assert_eq!(host.charge(), 0.0);
    assert!(host.world.has_marker(host.owner));
    assert!(host.world.stun_ticks(host.owner) > 0);

    let result = host.execute(AbilityCommand::ToggleFlight);
    assert!(matches!(
        result,
        Err(RuntimeError::Ability(AbilityError::FlightUnpowered))
    ));
    assert_eq!(host.last_message(), Some(MessageKey::FlightNoEnergy));

    let events = kit_events(&drain(&mut gauge_events));
    assert_eq!(events, vec![KitEvent::Exhausted]);
}

#[test]
fn host_fault_ends_the_beam_with_a_fault_event() {
    let mut host = Host::new();
    host.world.spawn_character(Position::new(17, 15));
    let mut beam_events = host.runtime.subscribe(Topic::Beam);

    host.execute(AbilityCommand::StartBeam {
        tier: BeamTier::Medium,
        target: Position::new(20, 15),
    })
    .unwrap();
    host.world
        .inject_fault(OracleError::Host("combat offline".into()));
    host.tick(1);

    assert!(!host.runtime.kit(host.owner).unwrap().beam().is_active());
    assert_eq!(host.presenter.live_sustainers(), 0);
    let events = kit_events(&drain(&mut beam_events));
    assert!(events.contains(&KitEvent::BeamFaulted(OracleError::Host(
        "combat offline".into()
    ))));
}

#[test]
fn faulted_nova_is_paid_for_and_reported() {
    let mut host = Host::new();
    let mut ability_events = host.runtime.subscribe(Topic::Ability);
    let mut gauge_events = host.runtime.subscribe(Topic::Gauge);
    let fault = OracleError::Host("temp offline".into());
    host.world.fail_op(WorldOp::Heat, fault.clone());

    let result = host.execute(AbilityCommand::Nova { radius: 12.0 });
    assert!(matches!(
        result,
        Err(RuntimeError::Ability(AbilityError::Oracle(_)))
    ));
    assert_eq!(host.charge(), 0.0);
    assert!(host.world.has_marker(host.owner));

    let events = kit_events(&drain(&mut ability_events));
    assert!(matches!(
        events.as_slice(),
        [KitEvent::CastFaulted { error, .. }] if *error == fault
    ));
    assert_eq!(
        kit_events(&drain(&mut gauge_events)),
        vec![KitEvent::Exhausted]
    );
}

#[test]
fn closing_powers_menu_ends_beam_and_misc_menu() {
    let mut host = Host::new();
    host.execute(AbilityCommand::SetMenu {
        menu: MenuFlags::POWERS,
        open: true,
    })
    .unwrap();
    let outcome = host
        .execute(AbilityCommand::SetMenu {
            menu: MenuFlags::MISC,
            open: true,
        })
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Menus(MenuFlags::all()));

    host.execute(AbilityCommand::StartBeam {
        tier: BeamTier::Low,
        target: Position::new(20, 15),
    })
    .unwrap();
    let outcome = host
        .execute(AbilityCommand::SetMenu {
            menu: MenuFlags::POWERS,
            open: false,
        })
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Menus(MenuFlags::empty()));
    assert!(!host.runtime.kit(host.owner).unwrap().beam().is_active());
}

#[test]
fn damage_hooks_shield_holders_only() {
    let mut host = Host::new();
    let bystander = host.world.spawn_character(Position::new(3, 3));
    let fire = IncomingDamage::new(DamageKind::Flame, 50.0);

    let shielded =
        host.runtime
            .before_damage(host.owner, fire, &mut host.world, &mut host.presenter);
    assert_eq!(shielded.amount, 0.0);

    let untouched =
        host.runtime
            .before_damage(bystander, fire, &mut host.world, &mut host.presenter);
    assert_eq!(untouched, fire);

    let heavy = IncomingDamage::new(DamageKind::Blunt, 200.0);
    let absorbed =
        host.runtime
            .before_damage(host.owner, heavy, &mut host.world, &mut host.presenter);
    assert!(absorbed.amount < heavy.amount);
    assert!(host.charge() < 100.0);
}

#[test]
fn lethal_guard_spends_the_whole_gauge_once() {
    let mut host = Host::new();
    let verdict = host
        .runtime
        .on_lethal_damage(host.owner, &mut host.world, &mut host.presenter);
    assert_eq!(verdict, LethalVerdict::Prevented);
    assert_eq!(host.charge(), 0.0);
    assert!(host.world.has_marker(host.owner));

    let verdict = host
        .runtime
        .on_lethal_damage(host.owner, &mut host.world, &mut host.presenter);
    assert_eq!(verdict, LethalVerdict::Allowed);
}

#[test]
fn movement_fire_and_stat_hooks() {
    let mut host = Host::new();
    let owner = host.owner;
    let cell = Position::new(15, 15);

    assert_eq!(host.runtime.move_cost(owner, cell, 10.0, &mut host.world), 10.0);
    host.execute(AbilityCommand::ToggleFlight).unwrap();
    assert_eq!(host.runtime.move_cost(owner, cell, 10.0, &mut host.world), 7.5);
    assert_eq!(host.runtime.move_cost(owner, cell, 1.0, &mut host.world), 1.0);

    assert!(!host.runtime.allow_ignite(cell, &mut host.world));
    assert!(host.runtime.allow_ignite(Position::new(0, 0), &mut host.world));

    let melee = host
        .runtime
        .stat_value(owner, StatKind::MeleeDps, 2.0, &mut host.world);
    assert_eq!(melee, 8.0);
    let speed = host
        .runtime
        .stat_value(owner, StatKind::MoveSpeed, 2.0, &mut host.world);
    assert!((speed - 4.5).abs() < 1e-4);
}

#[test]
fn revoke_clears_marker_and_forgets_kit() {
    let mut host = Host::new();
    let mut lifecycle = host.runtime.subscribe(Topic::Lifecycle);
    host.execute(AbilityCommand::Nova { radius: 10.0 }).unwrap();
    assert!(host.world.has_marker(host.owner));

    host.runtime
        .revoke(host.owner, &mut host.world, &mut host.presenter)
        .unwrap();
    assert!(!host.world.has_marker(host.owner));
    assert!(!host.runtime.has_capability(host.owner));
    assert_eq!(
        drain(&mut lifecycle),
        vec![Event::Lifecycle(LifecycleEvent::Revoked { owner: host.owner })]
    );

    let again = host
        .runtime
        .revoke(host.owner, &mut host.world, &mut host.presenter);
    assert!(matches!(again, Err(RuntimeError::NoCapability(_))));
}

#[test]
fn file_save_and_load_restore_kits_with_idle_beams() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileKitRepository::new(dir.path()).unwrap();

    let mut host = Host::new();
    host.world.set_sun_glow(0.0);
    host.execute(AbilityCommand::SetMenu {
        menu: MenuFlags::POWERS,
        open: true,
    })
    .unwrap();
    host.execute(AbilityCommand::StartBeam {
        tier: BeamTier::High,
        target: Position::new(25, 15),
    })
    .unwrap();
    host.tick(30);
    let charge = host.charge();
    host.runtime.save(&repo, "slot1").unwrap();
    assert!(repo.exists("slot1"));
    assert_eq!(repo.list_slots().unwrap(), vec!["slot1".to_owned()]);

    let mut restored = runtime(0);
    let loaded = restored
        .load(&repo, "slot1", &mut host.world, &mut host.presenter)
        .unwrap();
    assert!(loaded);
    assert_eq!(restored.current_tick(), Tick(30));

    let kit = restored.kit(host.owner).unwrap();
    assert_eq!(kit.gauge().charge(), charge);
    assert_eq!(kit.menus(), MenuFlags::POWERS);
    assert!(!kit.beam().is_active());
    assert!(!kit.is_flying());

    assert!(!restored
        .load(&repo, "missing", &mut host.world, &mut host.presenter)
        .unwrap());
}

#[test]
fn loading_an_exhausted_kit_restores_the_marker() {
    let repo = InMemoryKitRepository::new();
    let mut world = GridWorld::new(10, 10);
    let owner = world.spawn_character(Position::new(2, 2));
    let mut presenter = RecordingPresenter::new();
    repo.save(
        "tired",
        &RuntimeSnapshot {
            tick: Tick(5),
            kits: vec![KitRecord {
                owner,
                save: KitSave {
                    charge: 0.0,
                    cooldown_ticks: 100,
                    exhausted: true,
                    powers_menu: false,
                    misc_menu: true,
                },
            }],
        },
    )
    .unwrap();

    let mut runtime = runtime(0);
    assert!(runtime.load(&repo, "tired", &mut world, &mut presenter).unwrap());
    assert!(world.has_marker(owner));
    let kit = runtime.kit(owner).unwrap();
    assert!(kit.gauge().is_exhausted());
    assert_eq!(kit.menus(), MenuFlags::empty());
}

#[test]
fn dead_owner_bathes_in_sun_and_comes_back() {
    let repo = InMemoryKitRepository::new();
    let mut world = GridWorld::new(10, 10);
    let owner = world.spawn_character(Position::new(2, 2));
    let mut presenter = RecordingPresenter::new();
    repo.save(
        "dusk",
        &RuntimeSnapshot {
            tick: Tick(249),
            kits: vec![KitRecord {
                owner,
                save: KitSave {
                    charge: 95.0,
                    cooldown_ticks: 0,
                    exhausted: false,
                    powers_menu: false,
                    misc_menu: false,
                },
            }],
        },
    )
    .unwrap();

    let mut runtime = runtime(0);
    runtime.load(&repo, "dusk", &mut world, &mut presenter).unwrap();
    let mut gauge_events = runtime.subscribe(Topic::Gauge);
    world.kill(owner);

    runtime.tick(&mut world, &mut presenter);
    assert_eq!(runtime.current_tick(), Tick(250));
    assert!(!world.entity_state(owner).unwrap().view.dead);
    assert_eq!(runtime.kit(owner).unwrap().gauge().charge(), 100.0);
    assert_eq!(
        kit_events(&drain(&mut gauge_events)),
        vec![KitEvent::Resurrected]
    );
}

#[test]
fn roofed_corpse_stays_dormant() {
    let mut host = Host::new();
    host.execute(AbilityCommand::Nova { radius: 10.0 }).unwrap();
    host.world.set_roof(Position::new(15, 15), true);
    host.world.kill(host.owner);

    host.tick(500);
    assert_eq!(host.charge(), 0.0);
    assert!(host.world.entity_state(host.owner).unwrap().view.dead);
}

#[test]
fn same_seed_replays_the_same_detonations() {
    fn run(seed: u64) -> (Vec<Position>, usize) {
        let mut host = Host::with_seed(seed);
        for (x, y) in [(22, 15), (15, 23), (8, 15), (15, 7), (21, 20), (9, 10)] {
            host.world.spawn_object(Position::new(x, y), false, true);
        }
        host.tick(3);
        host.execute(AbilityCommand::Nova { radius: 10.0 }).unwrap();
        (
            host.world.fires().collect(),
            host.world.explosions().len(),
        )
    }

    assert_eq!(run(42), run(42));
    assert_eq!(run(7), run(7));
}
