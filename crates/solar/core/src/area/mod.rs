//! One-shot ability resolution.
//!
//! Every one-shot follows the same shape: validate the request, authorize the
//! cost against the gauge, collect the affected cells, apply effects cell by
//! cell, then drain. A rejection aborts before any effect and costs nothing.
//! Once effects start the cost is committed: a collaborator failure part way
//! through still drains the gauge and is reported as [`CastError::Faulted`].

mod cone;
mod nova;
mod reveal;
mod stun;

pub use cone::ConeFreeze;
pub use nova::Nova;
pub use reveal::Reveal;
pub use stun::AreaStun;

use crate::catalog::OneShotKind;
use crate::env::{Env, OracleError};
use crate::gauge::{GaugeTransition, SolarGauge};
use crate::kit::AbilityError;
use crate::state::{EntityId, Position};

/// What a one-shot costs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChargeCost {
    Fixed(f32),
    /// Everything left; needs a non-empty gauge and forces exhaustion.
    All,
}

/// The owner as seen at cast time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caster {
    pub id: EntityId,
    pub position: Position,
}

/// Result of a successful cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastOutcome {
    pub kind: OneShotKind,
    pub cells_affected: usize,
    pub charge_spent: f32,
    pub transition: Option<GaugeTransition>,
}

/// Why a one-shot did not complete.
#[derive(Clone, Debug, PartialEq)]
pub enum CastError {
    /// Aborted before any effect; nothing was spent.
    Rejected(AbilityError),
    /// A host collaborator failed after effects started. `outcome` holds the
    /// charge that was paid and the gauge transition it caused.
    Faulted {
        outcome: CastOutcome,
        error: OracleError,
    },
}

impl From<AbilityError> for CastError {
    fn from(error: AbilityError) -> Self {
        CastError::Rejected(error)
    }
}

pub trait OneShotAbility {
    fn kind(&self) -> OneShotKind;

    fn cost(&self) -> ChargeCost;

    /// Request checks that do not depend on charge.
    fn validate(&self, _caster: Caster, _env: &Env<'_>) -> Result<(), AbilityError> {
        Ok(())
    }

    fn affected_cells(&self, caster: Caster, env: &Env<'_>) -> Vec<Position>;

    fn apply(&self, caster: Caster, cells: &[Position], env: &mut Env<'_>)
    -> Result<(), OracleError>;

    /// Runs after the drain. Only the nova uses it (self-stun, camera shake).
    fn after_drain(&self, _caster: Caster, _env: &mut Env<'_>) -> Result<(), OracleError> {
        Ok(())
    }
}

/// Resolves a one-shot for `owner`. Charge is spent as soon as effects start.
pub fn resolve<A: OneShotAbility + ?Sized>(
    ability: &A,
    owner: EntityId,
    gauge: &mut SolarGauge,
    env: &mut Env<'_>,
) -> Result<CastOutcome, CastError> {
    let view = env
        .world
        .entity(owner)
        .ok_or(AbilityError::OwnerUnavailable(owner))?;
    if !view.is_capable() {
        return Err(AbilityError::OwnerIncapable(owner).into());
    }
    let caster = Caster {
        id: owner,
        position: view.position,
    };

    ability.validate(caster, env)?;
    authorize(ability.cost(), gauge)?;

    let cells = ability.affected_cells(caster, env);
    let applied = ability.apply(caster, &cells, env);

    let before = gauge.charge();
    let transition = match ability.cost() {
        ChargeCost::Fixed(cost) => gauge.drain(cost),
        ChargeCost::All => gauge.drain_all_and_exhaust(),
    };
    let outcome = CastOutcome {
        kind: ability.kind(),
        cells_affected: cells.len(),
        charge_spent: before - gauge.charge(),
        transition,
    };

    match applied.and_then(|()| ability.after_drain(caster, env)) {
        Ok(()) => Ok(outcome),
        Err(error) => Err(CastError::Faulted { outcome, error }),
    }
}

fn authorize(cost: ChargeCost, gauge: &SolarGauge) -> Result<(), AbilityError> {
    let (allowed, required) = match cost {
        ChargeCost::Fixed(cost) => (gauge.try_authorize(cost), cost),
        ChargeCost::All => (!gauge.is_empty(), f32::MIN_POSITIVE),
    };
    if allowed {
        Ok(())
    } else {
        Err(AbilityError::NotEnoughCharge {
            required,
            available: gauge.charge(),
        })
    }
}

/// In-bounds cells within `radius` of `center`, nearest first.
fn cells_in_radius(center: Position, radius: f32, env: &Env<'_>) -> Vec<Position> {
    crate::geometry::radial_cells(center, radius)
        .into_iter()
        .filter(|cell| env.world.contains(*cell))
        .collect()
}
