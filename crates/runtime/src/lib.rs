//! Host-facing orchestration for solar kits.
//!
//! [`SolarRuntime`] owns every kit in the session and is the only thing a host
//! talks to: it ticks kits, dispatches player commands, answers the host's
//! extension points through [`HookRegistry`], publishes kit events on the
//! [`EventBus`], and persists kits through a [`KitRepository`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and its configuration
//! - [`api`] exposes commands and errors
//! - [`capability`] tracks which entities hold a kit
//! - [`events`] provides the topic-based event bus
//! - [`hooks`] answers host extension points (damage, movement, fire, stats)
//! - [`repository`] saves and loads kit state
pub mod api;
pub mod capability;
pub mod events;
pub mod hooks;
pub mod repository;
pub mod runtime;

pub use api::{AbilityCommand, CommandOutcome, Result, RuntimeError};
pub use capability::CapabilityRegistry;
pub use events::{Event, EventBus, LifecycleEvent, Topic};
pub use hooks::{HookContext, HookRegistry, HostHook, LethalVerdict};
pub use repository::{
    FileKitRepository, InMemoryKitRepository, KitRecord, KitRepository, RepositoryError,
    RuntimeSnapshot,
};
pub use runtime::{RuntimeConfig, SolarRuntime};
