// src/ui/hud/systems.rs
//
// Systems for the interaction prompt, the key status line, and the acquisition toast.

use bevy::prelude::*;

use crate::interaction::{
    config::InteractionSettings,
    events::{KeyAcquired, KeyRemoved},
    hints::HintBoard,
    inventory::{KeyId, KeyInventory},
};

use super::components::{AcquisitionToast, HintPanel, HintText, KeyStatusText};

// Visual constants
const PANEL_COLOR: Color = Color::srgba(0.08, 0.08, 0.1, 0.85);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.32);
const TEXT_COLOR: Color = Color::WHITE;
const TOAST_COLOR: Color = Color::srgb(1.0, 0.9, 0.4);
const TOAST_FADE_SECONDS: f32 = 0.5;

/// "Keys: A, B" in a stable order, or "Keys: none".
pub fn format_key_status<'a>(keys: impl IntoIterator<Item = &'a KeyId>) -> String {
    let mut names: Vec<&str> = keys.into_iter().map(KeyId::as_str).collect();
    if names.is_empty() {
        return "Keys: none".to_string();
    }
    names.sort_unstable();
    format!("Keys: {}", names.join(", "))
}

/// Spawns the prompt (hidden), the key status line, and the toast.
pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(40.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-150.0)),
                width: Val::Px(300.0),
                padding: UiRect::all(Val::Px(10.0)),
                border: UiRect::all(Val::Px(1.5)),
                justify_content: JustifyContent::Center,
                display: Display::None,
                ..default()
            },
            BackgroundColor(PANEL_COLOR),
            BorderColor::from(BORDER_COLOR),
            HintPanel,
            Name::new("Interaction Hint"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
                HintText,
            ));
        });

    commands.spawn((
        Text::new(format_key_status(std::iter::empty())),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
        KeyStatusText,
        Name::new("Key Status"),
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(TOAST_COLOR.with_alpha(0.0)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(60.0),
            left: Val::Percent(50.0),
            margin: UiRect::left(Val::Px(-120.0)),
            width: Val::Px(240.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        AcquisitionToast::new(TOAST_FADE_SECONDS),
        Name::new("Acquisition Toast"),
    ));
}

/// Mirrors the hint board prompt whenever its revision moves.
pub fn sync_hint_panel(
    board: Res<HintBoard>,
    mut synced_revision: Local<Option<u64>>,
    mut panels: Query<&mut Node, With<HintPanel>>,
    mut texts: Query<&mut Text, With<HintText>>,
) {
    if *synced_revision == Some(board.revision()) {
        return;
    }
    *synced_revision = Some(board.revision());

    let display = if board.hint().is_some() {
        Display::Flex
    } else {
        Display::None
    };
    for mut node in &mut panels {
        node.display = display;
    }
    if let Some(hint) = board.hint() {
        for mut text in &mut texts {
            text.0 = hint.to_owned();
        }
    }
}

pub fn update_key_status(
    mut acquired: MessageReader<KeyAcquired>,
    mut removed: MessageReader<KeyRemoved>,
    keys: Res<KeyInventory>,
    mut texts: Query<&mut Text, With<KeyStatusText>>,
) {
    let changes = acquired.read().count() + removed.read().count();
    if changes == 0 {
        return;
    }

    let status = format_key_status(keys.keys());
    for mut text in &mut texts {
        text.0 = status.clone();
    }
}

pub fn show_acquisition_toast(
    mut acquired: MessageReader<KeyAcquired>,
    settings: Res<InteractionSettings>,
    mut toasts: Query<(&mut AcquisitionToast, &mut Text)>,
) {
    let Some(latest) = acquired.read().last() else {
        return;
    };

    let message = format!("{} key: {}", latest.key, settings.ui.acquisition_message);
    for (mut toast, mut text) in &mut toasts {
        toast.restart(settings.ui.acquisition_seconds);
        text.0 = message.clone();
    }
}

pub fn fade_acquisition_toast(
    time: Res<Time>,
    mut toasts: Query<(&mut AcquisitionToast, &mut TextColor)>,
) {
    for (mut toast, mut color) in &mut toasts {
        toast.tick(time.delta());
        color.0 = TOAST_COLOR.with_alpha(toast.fade_alpha());
    }
}
