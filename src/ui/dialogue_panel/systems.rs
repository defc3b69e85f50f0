// src/ui/dialogue_panel/systems.rs
//
// Systems for showing, replacing, and dismissing the dialogue panel.

use bevy::prelude::*;

use crate::interaction::{
    events::DialogueDismissed,
    hints::{DialogueData, HintBoard},
};

use super::components::{
    DialogueCloseButton, DialoguePanel, DialoguePanelSettings, DialoguePanelTracker,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.92);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;
const TITLE_COLOR: Color = Color::srgb(1.0, 0.9, 0.4); // Yellow/gold
const CAPTION_COLOR: Color = Color::srgb(0.7, 0.7, 0.75);
const BUTTON_COLOR: Color = Color::srgba(0.18, 0.18, 0.22, 0.95);
const BUTTON_BORDER_COLOR: Color = Color::srgb(0.4, 0.4, 0.45);

/// Attribution line such as "Vincent van Gogh, 1889".
pub fn attribution(data: &DialogueData) -> Option<String> {
    match (data.artist.as_deref(), data.year.as_deref()) {
        (Some(artist), Some(year)) => Some(format!("{}, {}", artist, year)),
        (Some(artist), None) => Some(artist.to_owned()),
        (None, Some(year)) => Some(year.to_owned()),
        (None, None) => None,
    }
}

/// Spawn, replace, or despawn the panel to match the hint board.
pub fn sync_dialogue_panel(
    mut commands: Commands,
    board: Res<HintBoard>,
    settings: Res<DialoguePanelSettings>,
    mut tracker: ResMut<DialoguePanelTracker>,
) {
    if tracker.synced_revision == Some(board.revision()) {
        return;
    }
    tracker.synced_revision = Some(board.revision());

    let wanted = board.dialogue();
    if tracker.shown.as_ref() == wanted && tracker.active_panel.is_some() {
        return;
    }

    if let Some(old_panel) = tracker.active_panel.take() {
        commands.entity(old_panel).despawn();
    }
    tracker.shown = None;

    let Some(open) = wanted else {
        return;
    };

    info!(
        "Showing dialogue panel for {}: {:?}",
        open.owner, open.data.title
    );

    let data = &open.data;
    let panel_entity = commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(settings.bottom_offset),
                right: Val::Px(settings.right_offset),
                width: Val::Px(settings.panel_width),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            DialoguePanel { owner: open.owner },
            Name::new("Dialogue Panel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(data.title.clone()),
                TextFont {
                    font_size: settings.title_font_size,
                    ..default()
                },
                TextColor(TITLE_COLOR),
            ));

            if let Some(line) = attribution(data) {
                parent.spawn((
                    Text::new(line),
                    TextFont {
                        font_size: settings.caption_font_size,
                        ..default()
                    },
                    TextColor(CAPTION_COLOR),
                ));
            }

            parent.spawn((
                Text::new(data.body.clone()),
                TextFont {
                    font_size: data.font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                Node {
                    max_width: Val::Px(settings.panel_width - settings.padding * 2.0),
                    ..default()
                },
            ));

            parent.spawn((
                Text::new(format!("- {}", data.speaker)),
                TextFont {
                    font_size: settings.caption_font_size,
                    ..default()
                },
                TextColor(CAPTION_COLOR),
            ));

            parent
                .spawn((
                    Node {
                        align_self: AlignSelf::FlexEnd,
                        padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                        border: UiRect::all(Val::Px(1.5)),
                        ..default()
                    },
                    Button,
                    Interaction::None,
                    BackgroundColor(BUTTON_COLOR),
                    BorderColor::from(BUTTON_BORDER_COLOR),
                    DialogueCloseButton,
                    Name::new("Dialogue Close Button"),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("Close (Esc)"),
                        TextFont {
                            font_size: settings.caption_font_size,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                    ));
                });
        })
        .id();

    tracker.active_panel = Some(panel_entity);
    tracker.shown = Some(open.clone());
}

/// Closes the dialogue on Escape or the close button and tells the owning NPC.
pub fn dismiss_dialogue_on_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Query<&Interaction, (Changed<Interaction>, With<DialogueCloseButton>)>,
    mut board: ResMut<HintBoard>,
    mut dismissed: MessageWriter<DialogueDismissed>,
) {
    let escape = keyboard.is_some_and(|keyboard| keyboard.just_pressed(KeyCode::Escape));
    let clicked = buttons
        .iter()
        .any(|interaction| *interaction == Interaction::Pressed);
    if !escape && !clicked {
        return;
    }

    if let Some(owner) = board.dismiss_dialogue() {
        info!("Dialogue for {} dismissed from the UI", owner);
        dismissed.write(DialogueDismissed { owner });
    }
}
