//! Deterministic rules for the solar-charge ability kit.
//!
//! `solar-core` owns no world state and performs no I/O. Hosts implement the
//! collaborator traits in [`env`] and drive one [`SolarKit`] per capability
//! holder; everything the kit wants to tell the outside world comes back as
//! return values, presenter calls, or drained [`KitEvent`]s.
pub mod area;
pub mod beam;
pub mod catalog;
pub mod config;
pub mod env;
pub mod error;
pub mod flight;
pub mod gauge;
pub mod geometry;
pub mod kit;
pub mod mitigation;
pub mod state;
pub mod stats;

pub use area::{AreaStun, CastError, CastOutcome, ChargeCost, ConeFreeze, Nova, OneShotAbility, Reveal};
pub use beam::{ActiveBeam, BeamChannel, BeamStatus, BeamTick, StopReason};
pub use catalog::{
    AbilityCatalog, AbilitySet, AbilityTier, AreaStunDescriptor, BeamDescriptor, BeamTier,
    CatalogError, ConeFreezeDescriptor, NovaDescriptor, OneShotKind, RevealDescriptor,
};
pub use config::KitConfig;
pub use env::{
    Env, EntityKind, EntityView, MapDimensions, MapOracle, Message, MessageKey, NullPresenter,
    OracleError, Presenter, RngOracle, World,
};
pub use error::{ErrorSeverity, KitError};
pub use flight::Flight;
pub use gauge::{GaugeTransition, SolarGauge, SunExposure};
pub use kit::{AbilityError, DormantTick, KitEvent, KitSave, MenuFlags, SolarKit};
pub use mitigation::{Mitigation, MitigationPolicy, MitigationRule};
pub use state::{DamageInfo, DamageKind, DamageTraits, EntityId, IncomingDamage, Position, Tick};
pub use stats::{StatKind, StatMultipliers};
