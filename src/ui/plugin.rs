// src/ui/plugin.rs
//
// UiPlugin mirrors the HintBoard on screen and forwards dialogue dismissals.

use bevy::prelude::*;

use crate::core::InteractionSet;

use super::dialogue_panel::{
    components::{DialoguePanelSettings, DialoguePanelTracker},
    systems::{dismiss_dialogue_on_input, sync_dialogue_panel},
};
use super::hud::systems::{
    fade_acquisition_toast, show_acquisition_toast, spawn_hud, sync_hint_panel,
    update_key_status,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");

        app.insert_resource(DialoguePanelSettings::default())
            .insert_resource(DialoguePanelTracker::default())
            .add_systems(Startup, spawn_hud)
            .add_systems(
                Update,
                (
                    dismiss_dialogue_on_input.before(InteractionSet::Dispatch),
                    (
                        sync_hint_panel,
                        sync_dialogue_panel,
                        update_key_status,
                        show_acquisition_toast,
                        fade_acquisition_toast.after(show_acquisition_toast),
                    )
                        .after(InteractionSet::Publish),
                ),
            );
    }
}
