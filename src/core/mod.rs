//! Core module exposing simulation timing and interaction scheduling.
pub mod plugin;

pub use plugin::{CorePlugin, InteractionSet, SimulationClock};
