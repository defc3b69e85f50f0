use bevy::prelude::*;

mod core;
mod interaction;
mod player;
mod ui;
mod world;

use crate::{
    core::CorePlugin, interaction::InteractionPlugin, player::PlayerPlugin, ui::UiPlugin,
    world::WorldPlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            InteractionPlugin, // Before WorldPlugin so settings exist for the demo spawns
            WorldPlugin,
            PlayerPlugin,
            UiPlugin,
        ))
        .run();
}
