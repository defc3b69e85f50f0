// src/ui/dialogue_panel/components.rs
//
// Components and resources for the dialogue panel.

use bevy::prelude::*;

use crate::interaction::hints::OpenDialogue;

/// Root node of the panel showing an NPC's dialogue.
#[derive(Component, Debug)]
pub struct DialoguePanel {
    /// NPC that opened the dialogue.
    pub owner: Entity,
}

/// Button that dismisses the open dialogue.
#[derive(Component, Debug, Default)]
pub struct DialogueCloseButton;

/// Resource tracking the panel currently on screen.
///
/// Only one dialogue is shown at a time.
#[derive(Resource, Debug, Default)]
pub struct DialoguePanelTracker {
    pub active_panel: Option<Entity>,
    /// Dialogue the active panel was built from.
    pub shown: Option<OpenDialogue>,
    /// Hint board revision the panel was last synced against.
    pub synced_revision: Option<u64>,
}

impl DialoguePanelTracker {
    pub fn owner(&self) -> Option<Entity> {
        self.shown.as_ref().map(|shown| shown.owner)
    }
}

/// Resource containing layout settings for the dialogue panel.
#[derive(Resource, Debug)]
pub struct DialoguePanelSettings {
    /// Panel width (pixels).
    pub panel_width: f32,

    /// Padding inside panel (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Offset from bottom edge of screen (pixels).
    pub bottom_offset: f32,

    /// Offset from right edge of screen (pixels).
    pub right_offset: f32,

    /// Font size for the title (points).
    pub title_font_size: f32,

    /// Font size for the speaker and attribution lines (points).
    pub caption_font_size: f32,
}

impl Default for DialoguePanelSettings {
    fn default() -> Self {
        Self {
            panel_width: 380.0,
            padding: 14.0,
            border_width: 2.0,
            bottom_offset: 20.0,
            right_offset: 20.0,
            title_font_size: 22.0,
            caption_font_size: 14.0,
        }
    }
}
