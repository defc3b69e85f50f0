//! World module housing environment setup and the demo interactables.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
