//! Player module - the WASD-driven agent and its follow camera.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
