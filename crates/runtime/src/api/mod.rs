//! Types downstream hosts interact with.
mod commands;
mod errors;

pub use commands::{AbilityCommand, CommandOutcome};
pub use errors::{Result, RuntimeError};
