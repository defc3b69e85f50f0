//! Interaction core: range detection, the shared activation protocol, and the built-in
//! interactive objects (doors, key pickups, dialogue NPCs).

pub mod base;
pub mod config;
pub mod contract;
pub mod detector;
pub mod door;
pub mod errors;
pub mod events;
pub mod hints;
pub mod inventory;
pub mod npc;
pub mod overlap;
pub mod pickup;
pub mod plugin;
pub mod systems;

#[cfg(test)]
pub(crate) mod testing;

pub use plugin::InteractionPlugin;
