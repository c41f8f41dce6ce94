//! Typed notifications emitted by a kit.
//!
//! The core never logs. Every state change worth observing is pushed onto the
//! kit's event queue and drained by the runtime.

use crate::area::CastOutcome;
use crate::beam::StopReason;
use crate::catalog::BeamTier;
use crate::env::OracleError;
use crate::mitigation::Mitigation;
use crate::state::Position;

use super::{AbilityError, MenuFlags};

#[derive(Clone, Debug, PartialEq)]
pub enum KitEvent {
    BeamStarted {
        tier: BeamTier,
        target: Position,
        replaced: bool,
    },
    BeamStopped(StopReason),
    /// A host collaborator failed mid-tick and the beam was stopped silently.
    BeamFaulted(OracleError),
    Cast(CastOutcome),
    /// A one-shot started its effects, paid its cost, then a host
    /// collaborator failed.
    CastFaulted {
        outcome: CastOutcome,
        error: OracleError,
    },
    Rejected(AbilityError),
    Exhausted,
    Recovered,
    FlightChanged {
        flying: bool,
    },
    DamageMitigated(Mitigation),
    LethalPrevented,
    /// Dormant sunlight brought the gauge to full and the host revived the owner.
    Resurrected,
    MenusChanged(MenuFlags),
}

impl KitEvent {
    /// Short stable name, used as a log field and by event consumers.
    pub fn name(&self) -> &'static str {
        match self {
            KitEvent::BeamStarted { .. } => "beam_started",
            KitEvent::BeamStopped(_) => "beam_stopped",
            KitEvent::BeamFaulted(_) => "beam_faulted",
            KitEvent::Cast(_) => "cast",
            KitEvent::CastFaulted { .. } => "cast_faulted",
            KitEvent::Rejected(_) => "rejected",
            KitEvent::Exhausted => "exhausted",
            KitEvent::Recovered => "recovered",
            KitEvent::FlightChanged { .. } => "flight_changed",
            KitEvent::DamageMitigated(_) => "damage_mitigated",
            KitEvent::LethalPrevented => "lethal_prevented",
            KitEvent::Resurrected => "resurrected",
            KitEvent::MenusChanged(_) => "menus_changed",
        }
    }
}
