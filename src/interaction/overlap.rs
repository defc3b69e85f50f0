//! Basic overlap primitive: oriented trigger boxes tested against agent collider points.
use std::collections::HashSet;

use bevy::prelude::*;

use super::events::{OverlapChanged, OverlapPhase};

const DEFAULT_TRIGGER_SIZE: Vec3 = Vec3::new(3.0, 2.0, 3.0);

/// Box-shaped trigger in the entity's local space.
#[derive(Component, Debug, Clone)]
pub struct TriggerVolume {
    center: Vec3,
    half_extents: Vec3,
    occupants: HashSet<Entity>,
}

impl TriggerVolume {
    pub fn new(size: Vec3) -> Self {
        Self {
            center: Vec3::ZERO,
            half_extents: size.abs() * 0.5,
            occupants: HashSet::new(),
        }
    }

    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    pub fn contains(&self, volume: &GlobalTransform, point: Vec3) -> bool {
        let local = volume.affine().inverse().transform_point3(point) - self.center;
        local.abs().cmple(self.half_extents).all()
    }

    /// Re-tests every collider and reports membership changes, exits first.
    pub fn refresh(
        &mut self,
        volume_entity: Entity,
        volume: &GlobalTransform,
        colliders: impl IntoIterator<Item = (Entity, Vec3)>,
    ) -> Vec<OverlapChanged> {
        let inside: HashSet<Entity> = colliders
            .into_iter()
            .filter(|(_, point)| self.contains(volume, *point))
            .map(|(entity, _)| entity)
            .collect();

        let mut changes: Vec<OverlapChanged> = self
            .occupants
            .difference(&inside)
            .map(|&other| OverlapChanged {
                volume: volume_entity,
                other,
                phase: OverlapPhase::Ended,
            })
            .collect();
        changes.extend(
            inside
                .difference(&self.occupants)
                .map(|&other| OverlapChanged {
                    volume: volume_entity,
                    other,
                    phase: OverlapPhase::Began,
                }),
        );

        self.occupants = inside;
        changes
    }
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self::new(DEFAULT_TRIGGER_SIZE)
    }
}

/// Forwards overlap events of this volume to the detector on `target`.
///
/// Lets a trigger live on its own entity while detection stays with the interactable.
#[derive(Component, Debug, Clone, Copy)]
pub struct TriggerRelay {
    pub target: Entity,
}

/// Extra collider belonging to the agent (feet, hands, carried props).
#[derive(Component, Debug, Clone, Copy)]
pub struct AgentCollider {
    pub agent: Entity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_respects_volume_rotation() {
        let volume = TriggerVolume::new(Vec3::new(4.0, 2.0, 1.0));
        let transform = GlobalTransform::from(
            Transform::from_xyz(10.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        );

        // The long axis now runs along world z.
        assert!(volume.contains(&transform, Vec3::new(10.0, 0.0, 1.8)));
        assert!(!volume.contains(&transform, Vec3::new(11.8, 0.0, 0.0)));
    }

    #[test]
    fn refresh_reports_enter_and_exit_once() {
        let mut world = World::new();
        let volume_entity = world.spawn_empty().id();
        let body = world.spawn_empty().id();
        let feet = world.spawn_empty().id();
        let transform = GlobalTransform::IDENTITY;
        let mut volume = TriggerVolume::default();

        let both_inside = [(body, Vec3::ZERO), (feet, Vec3::ZERO)];
        let changes = volume.refresh(volume_entity, &transform, both_inside);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|change| change.phase == OverlapPhase::Began));

        let unchanged = volume.refresh(volume_entity, &transform, both_inside);
        assert!(unchanged.is_empty());

        let left = volume.refresh(
            volume_entity,
            &transform,
            [(body, Vec3::ZERO), (feet, Vec3::new(0.0, 0.0, 9.0))],
        );
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].other, feet);
        assert_eq!(left[0].phase, OverlapPhase::Ended);
    }

    #[test]
    fn offset_center_shifts_the_box() {
        let volume = TriggerVolume::new(Vec3::ONE).with_center(Vec3::new(0.0, 0.0, 5.0));
        assert!(volume.contains(&GlobalTransform::IDENTITY, Vec3::new(0.0, 0.0, 5.4)));
        assert!(!volume.contains(&GlobalTransform::IDENTITY, Vec3::ZERO));
        assert!(!volume.contains(&GlobalTransform::IDENTITY, Vec3::new(0.0, 0.0, 5.6)));
    }
}
