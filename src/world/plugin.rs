//! WorldPlugin spawns the gallery environment and its interactive objects.
use bevy::prelude::*;

use crate::world::systems::{spawn_demo_interactables, spawn_world_environment};

/// Expects `InteractionPlugin` to be added first so its settings are available.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            (spawn_world_environment, spawn_demo_interactables),
        );
    }
}
