//! Shared error classification.
//!
//! Each concern keeps its own error enum next to the code that raises it
//! ([`AbilityError`](crate::AbilityError), [`OracleError`](crate::OracleError),
//! [`CatalogError`](crate::CatalogError)). They all implement [`KitError`] so
//! hosts can sort failures without matching on every variant.
//!
//! Nothing retries on its own. A failed operation aborts and the kit is left
//! as it was before the call.

use strum::IntoStaticStr;

/// How a host should treat a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The player can fix it: wait for charge, pick another moment.
    Recoverable,
    /// The request can never succeed as issued (bad target, disabled ability).
    Validation,
    /// A host collaborator failed mid-operation.
    Internal,
    /// The kit cannot operate for this owner any more.
    Fatal,
}

impl ErrorSeverity {
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Faults that point at the host rather than at the player's request.
    pub const fn is_host_fault(self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Implemented by every error the kit surfaces.
pub trait KitError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier, used for log fields and fault deduplication.
    fn error_code(&self) -> &'static str;
}
