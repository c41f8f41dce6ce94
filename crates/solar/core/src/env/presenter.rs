//! Presentation collaborator.
//!
//! Sound cues, visual effects and player-facing messages are best-effort: every
//! method has a no-op default and the kit never depends on a result beyond the
//! optional sustainer handle.

use strum::IntoStaticStr;

use crate::state::{EntityId, Position};

pub trait Presenter {
    fn play_cue(&mut self, _cue: Cue, _at: Option<Position>) {}

    fn spawn_visual(&mut self, _visual: Visual, _at: Position, _scale: f32) {}

    fn message(&mut self, _message: Message) {}

    /// Starts a looping sound. `None` when the asset is missing.
    fn start_sustainer(&mut self, _kind: SustainerKind, _at: Position) -> Option<SustainerHandle> {
        None
    }

    fn maintain_sustainer(&mut self, _handle: SustainerHandle) {}

    fn end_sustainer(&mut self, _handle: SustainerHandle) {}

    fn shake_camera(&mut self, _magnitude: f32) {}
}

/// Presenter that drops everything. Used by headless hosts and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// Opaque handle to a looping sound owned by the presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SustainerHandle(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SustainerKind {
    BeamLoop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Cue {
    BeamStop,
    AbilityRejected,
    NovaPulse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Visual {
    BeamGlow,
    BeamBurn,
    Frost,
    NovaShockwave,
    NovaGlow,
    Smoke,
}

/// Player-facing notice. Hosts translate `key` into display text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Message {
    pub subject: EntityId,
    pub key: MessageKey,
    pub tone: MessageTone,
}

impl Message {
    pub fn new(subject: EntityId, key: MessageKey) -> Self {
        Self {
            subject,
            key,
            tone: key.tone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageTone {
    Rejected,
    Neutral,
    Positive,
}

/// Translation keys for every message the kit emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum MessageKey {
    #[strum(serialize = "solar.not_enough_charge")]
    NotEnoughCharge,
    #[strum(serialize = "solar.cannot_hit_target")]
    CannotHitTarget,
    #[strum(serialize = "solar.ability_unavailable")]
    AbilityUnavailable,
    #[strum(serialize = "solar.beam_active")]
    BeamActive,
    #[strum(serialize = "solar.beam_ended")]
    BeamEnded,
    #[strum(serialize = "solar.flight_no_energy")]
    FlightNoEnergy,
    #[strum(serialize = "solar.capability_granted")]
    CapabilityGranted,
    #[strum(serialize = "solar.capability_already_granted")]
    CapabilityAlreadyGranted,
}

impl MessageKey {
    pub fn as_key(self) -> &'static str {
        self.into()
    }

    pub fn tone(self) -> MessageTone {
        match self {
            MessageKey::NotEnoughCharge
            | MessageKey::CannotHitTarget
            | MessageKey::AbilityUnavailable
            | MessageKey::FlightNoEnergy
            | MessageKey::CapabilityAlreadyGranted => MessageTone::Rejected,
            MessageKey::BeamEnded => MessageTone::Neutral,
            MessageKey::BeamActive | MessageKey::CapabilityGranted => MessageTone::Positive,
        }
    }
}
