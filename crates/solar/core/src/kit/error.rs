//! Ability rejections.
//!
//! Every variant but [`AbilityError::Oracle`] is a clean abort: no charge is
//! spent and no kit state changes. [`SolarKit`](super::SolarKit) surfaces the player-facing ones
//! through the presenter before returning them.

use crate::catalog::{AbilityTier, CatalogError};
use crate::env::{MessageKey, OracleError};
use crate::error::{ErrorSeverity, KitError};
use crate::state::{EntityId, Position};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AbilityError {
    /// Gauge cannot pay the activation cost.
    #[error("not enough charge: need {required}, have {available}")]
    NotEnoughCharge { required: f32, available: f32 },

    /// Flight cannot start on an empty gauge.
    #[error("no charge left to fly")]
    FlightUnpowered,

    /// Target cell is outside the map or otherwise unusable.
    #[error("cannot target {0}")]
    InvalidTarget(Position),

    /// The ability needs a character target.
    #[error("entity {0} is not a character")]
    TargetNotCharacter(EntityId),

    /// Owner is not spawned on a map.
    #[error("owner {0} is not available")]
    OwnerUnavailable(EntityId),

    /// Owner is dead or downed.
    #[error("owner {0} cannot act")]
    OwnerIncapable(EntityId),

    /// Ability definition is missing or failed validation.
    #[error("ability {0} is unavailable")]
    Disabled(AbilityTier),

    /// A host collaborator failed. A one-shot that already started its
    /// effects has still paid for them.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl AbilityError {
    /// Message shown to the player, if this rejection is player-facing.
    pub fn message_key(&self) -> Option<MessageKey> {
        use AbilityError::*;
        match self {
            NotEnoughCharge { .. } => Some(MessageKey::NotEnoughCharge),
            FlightUnpowered => Some(MessageKey::FlightNoEnergy),
            InvalidTarget(_) | TargetNotCharacter(_) => Some(MessageKey::CannotHitTarget),
            Disabled(_) => Some(MessageKey::AbilityUnavailable),
            OwnerUnavailable(_) | OwnerIncapable(_) | Oracle(_) => None,
        }
    }
}

impl From<CatalogError> for AbilityError {
    fn from(error: CatalogError) -> Self {
        AbilityError::Disabled(error.tier())
    }
}

impl KitError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        use AbilityError::*;
        match self {
            NotEnoughCharge { .. } | FlightUnpowered | OwnerIncapable(_) => {
                ErrorSeverity::Recoverable
            }
            InvalidTarget(_) | TargetNotCharacter(_) | Disabled(_) => ErrorSeverity::Validation,
            OwnerUnavailable(_) => ErrorSeverity::Recoverable,
            Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use AbilityError::*;
        match self {
            NotEnoughCharge { .. } => "ABILITY_NOT_ENOUGH_CHARGE",
            FlightUnpowered => "ABILITY_FLIGHT_UNPOWERED",
            InvalidTarget(_) => "ABILITY_INVALID_TARGET",
            TargetNotCharacter(_) => "ABILITY_TARGET_NOT_CHARACTER",
            OwnerUnavailable(_) => "ABILITY_OWNER_UNAVAILABLE",
            OwnerIncapable(_) => "ABILITY_OWNER_INCAPABLE",
            Disabled(_) => "ABILITY_DISABLED",
            Oracle(error) => error.error_code(),
        }
    }
}
