//! Host collaborator errors.
//!
//! Raised when the host cannot complete a request the kit made of it. Inside a
//! beam tick these are caught and turn into a silent stop; inside one-shot
//! abilities they abort the cast before any charge is spent.

use crate::error::{ErrorSeverity, KitError};
use crate::state::{EntityId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// The owner is no longer placed on a map.
    #[error("owner {0} is not placed on a map")]
    OwnerNotPlaced(EntityId),

    /// Entity was not found (destroyed or despawned).
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// Position is outside the map bounds.
    #[error("position {0} is out of map bounds")]
    PositionOutOfBounds(Position),

    /// The map the owner was on has been removed.
    #[error("map is no longer available")]
    MapUnavailable,

    /// Host-specific failure.
    #[error("host failure: {0}")]
    Host(String),
}

impl KitError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            OwnerNotPlaced(_) | MapUnavailable => ErrorSeverity::Fatal,
            EntityNotFound(_) | PositionOutOfBounds(_) => ErrorSeverity::Validation,
            Host(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            OwnerNotPlaced(_) => "ORACLE_OWNER_NOT_PLACED",
            EntityNotFound(_) => "ORACLE_ENTITY_NOT_FOUND",
            PositionOutOfBounds(_) => "ORACLE_POSITION_OUT_OF_BOUNDS",
            MapUnavailable => "ORACLE_MAP_UNAVAILABLE",
            Host(_) => "ORACLE_HOST_FAILURE",
        }
    }
}
