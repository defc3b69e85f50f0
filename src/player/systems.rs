//! Systems for spawning and moving the player.
use bevy::prelude::*;

use crate::player::components::{FollowCamera, Player, PlayerMotor};

const PLAYER_START_POS: Vec3 = Vec3::new(0.0, 0.9, 8.0);
const PLAYER_RADIUS: f32 = 0.35;
const PLAYER_HEIGHT: f32 = 1.1;

/// Spawns the capsule agent and the camera that follows it.
pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_HEIGHT))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(70, 110, 200),
            perceptual_roughness: 0.6,
            ..default()
        })),
        Transform::from_translation(PLAYER_START_POS),
        Player,
        PlayerMotor::default(),
        Name::new("Player"),
    ));

    let follow = FollowCamera::default();
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(PLAYER_START_POS + follow.offset)
            .looking_at(PLAYER_START_POS, Vec3::Y),
        follow,
    ));
}

/// Planar direction requested by WASD / arrow keys, normalised or zero.
pub fn input_direction(keyboard: &ButtonInput<KeyCode>) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction += Vec3::NEG_Z;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction += Vec3::Z;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction += Vec3::NEG_X;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction += Vec3::X;
    }
    direction.normalize_or_zero()
}

/// Moves the player on the ground plane and turns it to face the motion.
pub fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<(&PlayerMotor, &mut Transform), With<Player>>,
) {
    let direction = input_direction(&keyboard);
    if direction == Vec3::ZERO {
        return;
    }

    let Ok((motor, mut transform)) = query.single_mut() else {
        return;
    };

    let modifier = if keyboard.pressed(KeyCode::ShiftLeft) {
        motor.sprint_multiplier
    } else {
        1.0
    };
    transform.translation += direction * motor.move_speed * modifier * time.delta_secs();

    let target = transform.translation + direction;
    transform.look_at(target, Vec3::Y);
}

pub fn follow_player_camera(
    time: Res<Time>,
    player: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<(&FollowCamera, &mut Transform)>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };

    for (follow, mut transform) in &mut cameras {
        let desired = player_transform.translation + follow.offset;
        let blend = 1.0 - (-follow.stiffness * time.delta_secs()).exp();
        transform.translation = transform.translation.lerp(desired, blend);
        transform.look_at(player_transform.translation, Vec3::Y);
    }
}
