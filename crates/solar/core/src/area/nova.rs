use super::{Caster, ChargeCost, OneShotAbility, cells_in_radius};
use crate::catalog::{NovaDescriptor, OneShotKind};
use crate::config::KitConfig;
use crate::env::{
    Cue, EntityKind, Env, Explosion, OracleError, Residue, RollContext, Visual,
};
use crate::state::{DamageInfo, DamageKind, Position};

const GLOW_MIN_SCALE: f32 = 6.0;
const SMOKE_SCALE: f32 = 2.0;
const SHAKE_DIVISOR: f32 = 20.0;
const SHAKE_MIN: f32 = 1.0;
const SHAKE_MAX: f32 = 5.0;

/// The ultimate: a radial blast centred on the owner.
///
/// Bands by distance `d` from the owner, for radius `r`:
/// - `d <= inner_band_fraction * r`: characters take lethal damage, other
///   destructibles are destroyed, ground is scorched and left with ash
/// - `d <= r`: fires start and heat rises sharply
/// - `d <= min(outer_band_fraction * r, max radius)`: heat pulse only
///
/// A second pass over `r` gives each volatile object a chance to detonate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nova {
    descriptor: NovaDescriptor,
    radius: f32,
    reach: f32,
}

impl Nova {
    /// `radius` is clamped into the configured bounds.
    pub fn new(descriptor: NovaDescriptor, radius: f32, config: &KitConfig) -> Self {
        let radius = config.clamp_nova_radius(radius);
        let reach = (radius * descriptor.outer_band_fraction).min(config.nova_max_radius);
        Self {
            descriptor,
            radius,
            reach,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance the heat pulse reaches.
    pub fn reach(&self) -> f32 {
        self.reach
    }

    fn inner_radius(&self) -> f32 {
        self.radius * self.descriptor.inner_band_fraction
    }

    fn annihilate(&self, caster: Caster, cell: Position, env: &mut Env<'_>) -> Result<(), OracleError> {
        let lethal = DamageInfo::new(
            DamageKind::Flame,
            self.descriptor.lethal_damage,
            self.descriptor.lethal_armor_penetration,
        )
        .with_instigator(caster.id);

        for occupant in env.world.occupants(cell).into_iter().rev() {
            if occupant.id == caster.id {
                continue;
            }
            match occupant.kind {
                EntityKind::Character => env.world.apply_damage(occupant.id, lethal)?,
                EntityKind::Object {
                    destructible: true, ..
                }
                | EntityKind::Corpse { .. } => env.world.destroy(occupant.id)?,
                EntityKind::Object { .. } => {}
            }
        }
        env.world.scorch(cell)?;
        env.world
            .spawn_residue(cell, Residue::Ash, self.descriptor.ash_per_cell)
    }

    fn detonate_volatiles(&self, caster: Caster, env: &mut Env<'_>) -> Result<(), OracleError> {
        let cells = cells_in_radius(caster.position, self.radius, env);
        for (index, cell) in cells.into_iter().enumerate() {
            let volatile = env.world.occupants(cell).iter().any(|occupant| {
                matches!(occupant.kind, EntityKind::Object { volatile: true, .. })
            });
            if volatile
                && env.roll(
                    caster.id,
                    RollContext::VolatileDetonation,
                    index as u32,
                    self.descriptor.volatile_chance,
                )
            {
                env.world.explode(Explosion {
                    center: cell,
                    radius: self.descriptor.volatile_radius,
                    damage: DamageInfo::new(DamageKind::Flame, self.descriptor.volatile_damage, 0.0)
                        .with_instigator(caster.id),
                    residue: None,
                })?;
            }
        }
        Ok(())
    }
}

impl OneShotAbility for Nova {
    fn kind(&self) -> OneShotKind {
        OneShotKind::Nova
    }

    fn cost(&self) -> ChargeCost {
        ChargeCost::All
    }

    fn affected_cells(&self, caster: Caster, env: &Env<'_>) -> Vec<Position> {
        cells_in_radius(caster.position, self.reach, env)
    }

    fn apply(
        &self,
        caster: Caster,
        cells: &[Position],
        env: &mut Env<'_>,
    ) -> Result<(), OracleError> {
        let center = caster.position;
        env.presenter
            .spawn_visual(Visual::NovaShockwave, center, self.radius);
        env.presenter
            .spawn_visual(Visual::NovaGlow, center, self.radius.max(GLOW_MIN_SCALE));
        env.presenter.play_cue(Cue::NovaPulse, None);

        env.world.explode(Explosion {
            center,
            radius: self.radius,
            damage: DamageInfo::new(DamageKind::Bomb, self.descriptor.blast_damage, 1.0)
                .with_instigator(caster.id),
            residue: Some(Residue::Ash),
        })?;

        let inner = self.inner_radius();
        for cell in cells {
            let distance = center.distance_to(*cell);
            if distance <= inner {
                self.annihilate(caster, *cell, env)?;
            } else if distance <= self.radius {
                env.world
                    .try_ignite(*cell, self.descriptor.fire_size, Some(caster.id))?;
                env.world.push_heat(*cell, self.descriptor.fire_heat)?;
                env.presenter.spawn_visual(Visual::Smoke, *cell, SMOKE_SCALE);
            } else {
                env.world.push_heat(*cell, self.descriptor.pulse_heat)?;
            }
        }

        self.detonate_volatiles(caster, env)
    }

    fn after_drain(&self, caster: Caster, env: &mut Env<'_>) -> Result<(), OracleError> {
        env.world
            .stun(caster.id, self.descriptor.recoil_stun_ticks, Some(caster.id))?;
        env.presenter
            .shake_camera((self.radius / SHAKE_DIVISOR).clamp(SHAKE_MIN, SHAKE_MAX));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{CastError, resolve};
    use crate::catalog::AbilityCatalog;
    use crate::env::{GridWorld, Presented, RecordingPresenter};
    use crate::gauge::{GaugeTransition, SolarGauge};
    use crate::kit::AbilityError;
    use crate::state::Tick;

    fn nova(radius: f32) -> Nova {
        let config = KitConfig::new();
        Nova::new(*AbilityCatalog::standard().nova().unwrap(), radius, &config)
    }

    #[test]
    fn radius_is_clamped_and_reach_capped() {
        assert_eq!(nova(2.0).radius(), 10.0);
        assert_eq!(nova(10.0).reach(), 12.0);
        assert_eq!(nova(79.0).reach(), 79.0);
        assert_eq!(nova(500.0).radius(), 79.0);
    }

    #[test]
    fn drains_everything_and_exhausts() {
        let mut world = GridWorld::new(120, 120);
        let owner = world.spawn_character(Position::new(60, 60));
        let mut presenter = RecordingPresenter::new();
        let config = KitConfig::new();
        let mut gauge = SolarGauge::restore(&config, 37.0, 0, false);
        let mut env = Env::new(&mut world, &mut presenter, Tick::ZERO);

        let outcome = resolve(&nova(50.0), owner, &mut gauge, &mut env).unwrap();
        assert_eq!(outcome.transition, Some(GaugeTransition::Exhausted));
        assert_eq!(outcome.charge_spent, 37.0);
        assert_eq!(gauge.charge(), 0.0);
        assert!(gauge.is_exhausted());
        assert_eq!(gauge.cooldown_ticks(), config.exhaustion_cooldown_ticks);
        assert_eq!(world.stun_ticks(owner), 600);
        assert!(
            presenter
                .log()
                .iter()
                .any(|entry| matches!(entry, Presented::CameraShake(m) if *m == 2.5))
        );
    }

    #[test]
    fn bands_apply_their_effects() {
        let mut world = GridWorld::new(60, 60);
        let center = Position::new(30, 30);
        let owner = world.spawn_character(center);
        let inner_victim = world.spawn_character(Position::new(35, 30));
        let crate_box = world.spawn_object(Position::new(30, 35), true, false);
        let bedrock = world.spawn_object(Position::new(30, 25), false, false);
        let mut presenter = RecordingPresenter::new();
        let config = KitConfig::new();
        let mut gauge = SolarGauge::new(&config);
        let mut env = Env::new(&mut world, &mut presenter, Tick::ZERO);

        // r = 10: inner band to 6, fire band to 10, heat pulse to 12
        resolve(&nova(10.0), owner, &mut gauge, &mut env).unwrap();

        assert_eq!(world.health(inner_victim), Some(0.0));
        assert!(world.entity_state(crate_box).is_none());
        assert!(world.entity_state(bedrock).is_some());
        assert!(world.is_scorched(Position::new(33, 30)));
        assert_eq!(world.residue_at(Position::new(33, 30), Residue::Ash), 3);
        assert_eq!(world.health(owner), Some(GridWorld::DEFAULT_HEALTH));

        let fire_cell = Position::new(38, 30);
        assert!(world.fire_at(fire_cell).is_some());
        assert_eq!(world.heat_at(fire_cell), 2000.0);

        let pulse_cell = Position::new(41, 30);
        assert!(world.fire_at(pulse_cell).is_none());
        assert_eq!(world.heat_at(pulse_cell), 500.0);
        assert_eq!(world.heat_at(Position::new(43, 30)), 0.0);

        let blast = world.explosions()[0];
        assert_eq!(blast.radius, 10.0);
        assert_eq!(blast.damage.kind, DamageKind::Bomb);
        assert_eq!(blast.damage.amount, 500.0);
    }

    #[test]
    fn volatile_rolls_are_deterministic() {
        let run = |seed: u64| {
            let mut world = GridWorld::new(60, 60);
            let owner = world.spawn_character(Position::new(30, 30));
            for x in 0..20 {
                world.spawn_object(Position::new(21 + x, 38), true, true);
            }
            let mut presenter = RecordingPresenter::new();
            let config = KitConfig::new();
            let mut gauge = SolarGauge::new(&config);
            let mut env =
                Env::new(&mut world, &mut presenter, Tick::new(7)).with_seed(seed);
            resolve(&nova(10.0), owner, &mut gauge, &mut env).unwrap();
            world.explosions().len()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn rejected_on_empty_gauge() {
        let mut world = GridWorld::new(40, 40);
        let owner = world.spawn_character(Position::new(20, 20));
        let mut presenter = RecordingPresenter::new();
        let config = KitConfig::new();
        let mut gauge = SolarGauge::restore(&config, 0.0, 0, true);
        let mut env = Env::new(&mut world, &mut presenter, Tick::ZERO);

        let err = resolve(&nova(30.0), owner, &mut gauge, &mut env).unwrap_err();
        assert!(matches!(
            err,
            CastError::Rejected(AbilityError::NotEnoughCharge { .. })
        ));
        assert!(world.explosions().is_empty());
        assert_eq!(world.stun_ticks(owner), 0);
    }
}
