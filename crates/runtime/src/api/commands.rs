//! Player-issued kit commands.

use solar_core::{BeamTier, CastOutcome, EntityId, MenuFlags, Position};

/// One request from the host's input layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbilityCommand {
    StartBeam { tier: BeamTier, target: Position },
    /// Stops the beam if `tier` is already channeling, starts it otherwise.
    ToggleBeam { tier: BeamTier, target: Position },
    AimBeam { target: Position },
    StopBeam,
    ConeFreeze { aim: Position },
    AreaStun { target: EntityId },
    Reveal,
    Nova { radius: f32 },
    ToggleFlight,
    SetMenu { menu: MenuFlags, open: bool },
}

impl AbilityCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AbilityCommand::StartBeam { .. } => "start_beam",
            AbilityCommand::ToggleBeam { .. } => "toggle_beam",
            AbilityCommand::AimBeam { .. } => "aim_beam",
            AbilityCommand::StopBeam => "stop_beam",
            AbilityCommand::ConeFreeze { .. } => "cone_freeze",
            AbilityCommand::AreaStun { .. } => "area_stun",
            AbilityCommand::Reveal => "reveal",
            AbilityCommand::Nova { .. } => "nova",
            AbilityCommand::ToggleFlight => "toggle_flight",
            AbilityCommand::SetMenu { .. } => "set_menu",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandOutcome {
    /// Whether a beam is channeling after the command.
    Beam { active: bool },
    Cast(CastOutcome),
    Flight { flying: bool },
    Menus(MenuFlags),
}
