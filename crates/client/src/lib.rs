//! Headless sandbox host for the solar kit.
//!
//! The `solar-sim` binary builds a small grid map, grants the capability to
//! one character, and drives [`SolarRuntime`](solar_runtime::SolarRuntime)
//! through a scripted scenario while logging every kit event.
//!
//! - [`config`] reads the simulation settings from the environment
//! - [`dirs`] resolves platform log and save directories
//! - [`logging`] installs the tracing subscriber
//! - [`scenario`] holds the sandbox world and the script

pub mod config;
pub mod dirs;
pub mod logging;
pub mod scenario;

pub use config::SimConfig;
pub use scenario::{Sandbox, ScenarioReport, run_scenario};
