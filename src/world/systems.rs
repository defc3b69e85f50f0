//! Systems for the world module.
use bevy::{math::primitives::Plane3d, prelude::*};

use crate::{
    interaction::{
        config::InteractionSettings,
        detector::{DetectionMode, Detector},
        door::Door,
        hints::DialogueData,
        inventory::KeyId,
        npc::DialogueNpc,
        overlap::{TriggerRelay, TriggerVolume},
        pickup::KeyPickup,
    },
    world::components::{GalleryWall, PrimarySun},
};

const GROUND_SCALE: f32 = 60.0;
const DEMO_KEY_ID: &str = "Y";

const DOOR_HINGE_POS: Vec3 = Vec3::new(-0.75, 0.0, 0.0);
const DOOR_SIZE: Vec3 = Vec3::new(1.5, 2.2, 0.15);
// Middle of the door frame; the trigger stays here while the panel swings.
const DOOR_FRAME_CENTER: Vec3 = Vec3::new(0.0, 1.1, 0.0);
const WALL_HEIGHT: f32 = 2.6;
const WALL_THICKNESS: f32 = 0.3;
const WALL_LENGTH: f32 = 8.0;

const PICKUP_POS: Vec3 = Vec3::new(6.0, 1.0, 5.0);
const NPC_POS: Vec3 = Vec3::new(-6.0, 0.9, 4.0);
const NPC_TRIGGER_OFFSET: Vec3 = Vec3::new(0.0, 0.1, 1.5);
const NPC_TRIGGER_SIZE: Vec3 = Vec3::new(4.0, 2.0, 3.5);

/// Spawns the ground, the sun, and the wall the door sits in.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(120, 110, 100),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 15_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(16.0, 32.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
        PrimarySun,
    ));

    // Two wall segments leave a gap for the door around the origin.
    let wall_mesh = meshes.add(Cuboid::new(WALL_LENGTH, WALL_HEIGHT, WALL_THICKNESS));
    let wall_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(225, 220, 205),
        perceptual_roughness: 0.8,
        ..default()
    });
    let gap = DOOR_SIZE.x * 0.5;
    for side in [-1.0, 1.0] {
        let x = side * (gap + WALL_LENGTH * 0.5);
        commands.spawn((
            Mesh3d(wall_mesh.clone()),
            MeshMaterial3d(wall_material.clone()),
            Transform::from_xyz(x, WALL_HEIGHT * 0.5, 0.0),
            GalleryWall,
        ));
    }
}

/// Places the key-gated door, the key that opens it, and the gallery guide.
pub fn spawn_demo_interactables(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<InteractionSettings>,
) {
    let key_id = match KeyId::new(DEMO_KEY_ID) {
        Ok(key_id) => key_id,
        Err(err) => {
            warn!("Skipping demo interactables: {}", err);
            return;
        }
    };
    let detector = &settings.detector;

    // The door rotates about its hinge; the visible panel is a child offset along +X.
    let door = settings.configure(
        Door::new(settings.activation_key, settings.door.clone())
            .requiring(key_id.clone())
            .with_locked_hint("The gallery door needs the brass key"),
    );
    let hinge = commands
        .spawn((
            Transform::from_translation(DOOR_HINGE_POS),
            Visibility::default(),
            door,
            Detector::new(DetectionMode::Both, detector.range)
                .with_check_interval(detector.check_interval),
            Name::new("Gallery Door"),
        ))
        .with_children(|hinge| {
            hinge.spawn((
                Mesh3d(meshes.add(Cuboid::from_size(DOOR_SIZE))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb_u8(120, 75, 40),
                    perceptual_roughness: 0.7,
                    ..default()
                })),
                Transform::from_xyz(DOOR_SIZE.x * 0.5, DOOR_SIZE.y * 0.5, 0.0),
            ));
        })
        .id();

    commands.spawn((
        Transform::from_translation(DOOR_FRAME_CENTER),
        TriggerVolume::new(detector.trigger_size),
        TriggerRelay { target: hinge },
        Name::new("Gallery Door Trigger"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.2, 0.5, 0.08))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(212, 175, 55),
            metallic: 0.9,
            perceptual_roughness: 0.3,
            ..default()
        })),
        Transform::from_translation(PICKUP_POS),
        settings.configure(
            KeyPickup::new(settings.activation_key, key_id, &settings.pickup)
                .with_display_name("the brass key"),
        ),
        Detector::new(detector.mode, detector.range).with_check_interval(detector.check_interval),
        Name::new("Brass Key"),
    ));

    let guide = commands
        .spawn((
            Mesh3d(meshes.add(Capsule3d::new(0.35, 1.1))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb_u8(170, 60, 60),
                perceptual_roughness: 0.6,
                ..default()
            })),
            Transform::from_translation(NPC_POS),
            settings.configure(
                DialogueNpc::new(settings.activation_key, settings.npc.auto_close_distance)
                    .with_dialogue(guide_dialogue()),
            ),
            Detector::overlap(),
            Name::new("Gallery Guide"),
        ))
        .id();

    commands.spawn((
        Transform::from_translation(NPC_POS + NPC_TRIGGER_OFFSET),
        TriggerVolume::new(NPC_TRIGGER_SIZE),
        TriggerRelay { target: guide },
        Name::new("Gallery Guide Trigger"),
    ));

    info!(
        "Demo world ready: door locked by key {:?}, guide auto-closes beyond {:.1}m",
        DEMO_KEY_ID, settings.npc.auto_close_distance
    );
}

fn guide_dialogue() -> DialogueData {
    DialogueData::new(
        "Gallery Guide",
        "The Starry Night",
        "Painted from the window of an asylum room at Saint-Remy, shortly before sunrise. \
         The village below was added from memory.",
    )
    .with_artist("Vincent van Gogh")
    .with_year("1889")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        core::CorePlugin,
        interaction::{inventory::KeyInventory, systems::ActivationInput, InteractionPlugin},
        player::components::Player,
    };

    #[test]
    fn demo_world_spawns_each_interactable() {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .insert_resource(InteractionSettings::default())
            .add_systems(Startup, (spawn_world_environment, spawn_demo_interactables));

        app.update();

        let world = app.world_mut();
        let (door, required) = world
            .query::<(Entity, &Door)>()
            .single(world)
            .map(|(entity, door)| (entity, door.required_key().cloned()))
            .expect("one door");
        assert_eq!(required.as_ref().map(KeyId::as_str), Some(DEMO_KEY_ID));

        assert_eq!(world.query::<&KeyPickup>().iter(world).count(), 1);
        assert_eq!(world.query::<&GalleryWall>().iter(world).count(), 2);

        let guide = world
            .query_filtered::<Entity, With<DialogueNpc>>()
            .single(world)
            .expect("one guide");
        let mut targets: Vec<Entity> = world
            .query::<&TriggerRelay>()
            .iter(world)
            .map(|relay| relay.target)
            .collect();
        targets.sort();
        let mut expected = vec![door, guide];
        expected.sort();
        assert_eq!(targets, expected);

        // The door's own entity swings, so its trigger lives elsewhere.
        assert!(world.get::<TriggerVolume>(door).is_none());
    }

    #[test]
    fn open_door_stays_open_while_the_agent_stands_still() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .insert_resource(InteractionSettings::default())
            .add_plugins((
                bevy::transform::TransformPlugin,
                CorePlugin::default(),
                InteractionPlugin,
            ))
            .add_systems(Startup, spawn_demo_interactables);
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(100));
        app.world_mut()
            .resource_mut::<KeyInventory>()
            .add(KeyId::new(DEMO_KEY_ID).expect("valid key id"));

        // Inside the frame trigger, 2.2 m from the hinge.
        app.world_mut()
            .spawn((Player, Transform::from_xyz(1.0, 0.9, 1.0)));
        app.update();
        app.update();

        let world = app.world_mut();
        let door = world
            .query_filtered::<Entity, With<Door>>()
            .single(world)
            .expect("one door");
        assert!(app
            .world()
            .get::<Detector>(door)
            .is_some_and(Detector::in_range));

        app.world_mut()
            .resource_mut::<ActivationInput>()
            .press(KeyCode::KeyF);
        app.update();
        assert!(app.world().get::<Door>(door).is_some_and(Door::is_open));

        for _ in 0..25 {
            app.update();
        }
        let swung = app
            .world()
            .get::<Transform>(door)
            .expect("door should have a transform");
        assert!(swung.rotation.angle_between(Quat::IDENTITY) > 1.0);
        assert!(app.world().get::<Door>(door).is_some_and(Door::is_open));
        assert!(app
            .world()
            .get::<Detector>(door)
            .is_some_and(Detector::in_range));

        for _ in 0..10 {
            app.update();
        }
        assert!(!app.world().get::<Door>(door).is_some_and(Door::is_open));
    }
}
