//! Player plugin wiring movement and camera systems.
use bevy::prelude::*;

use crate::{
    core::InteractionSet,
    player::systems::{follow_player_camera, move_player, spawn_player},
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player).add_systems(
            Update,
            (
                move_player.before(InteractionSet::Discover),
                follow_player_camera.after(move_player),
            ),
        );
    }
}
