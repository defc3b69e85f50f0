//! Components for the controllable agent and the camera that follows it.
use bevy::prelude::*;

/// Marker component identifying the agent that interactables detect.
#[derive(Component, Debug, Default)]
pub struct Player;

/// Ground movement for the agent. Also serves as the agent tag when no `Player` exists.
#[derive(Component, Debug)]
pub struct PlayerMotor {
    pub move_speed: f32,
    pub sprint_multiplier: f32,
}

impl Default for PlayerMotor {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            sprint_multiplier: 1.8,
        }
    }
}

/// Camera that trails the player at a fixed offset.
#[derive(Component, Debug)]
pub struct FollowCamera {
    pub offset: Vec3,
    /// Exponential catch-up rate per second.
    pub stiffness: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 7.0, 9.0),
            stiffness: 6.0,
        }
    }
}
