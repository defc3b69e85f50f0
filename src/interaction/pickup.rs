//! Floating key item that adds itself to the inventory and disappears.
use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use super::{
    base::{key_label, InteractableBase},
    config::PickupSettings,
    contract::{Interactable, InteractionContext, Interactive, Lifecycle},
    inventory::KeyId,
};

#[derive(Component, Debug, Clone)]
#[require(Interactive)]
pub struct KeyPickup {
    base: InteractableBase,
    key_id: KeyId,
    display_name: String,
    picked_up: bool,
    despawn_delay: f32,
    since_pickup: f32,
    spin_axis: Vec3,
    spin_degrees_per_second: f32,
    float_amplitude: f32,
    float_speed: f32,
    float_phase: f32,
    elapsed: f32,
    rest_height: f32,
}

impl KeyPickup {
    pub fn new(activation_key: KeyCode, key_id: KeyId, settings: &PickupSettings) -> Self {
        let display_name = format!("the {} key", key_id);
        Self {
            base: InteractableBase::new(activation_key),
            key_id,
            display_name,
            picked_up: false,
            despawn_delay: settings.despawn_delay,
            since_pickup: 0.0,
            spin_axis: Vec3::Y,
            spin_degrees_per_second: settings.spin_degrees_per_second,
            float_amplitude: settings.float_amplitude,
            float_speed: settings.float_speed,
            float_phase: rand::thread_rng().gen_range(0.0..TAU),
            elapsed: 0.0,
            rest_height: 0.0,
        }
        .with_spin_axis(settings.spin_axis)
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_spin_axis(mut self, axis: Vec3) -> Self {
        self.spin_axis = axis.try_normalize().unwrap_or(Vec3::Y);
        self
    }

    #[cfg(test)]
    fn with_float_phase(mut self, phase: f32) -> Self {
        self.float_phase = phase;
        self
    }

    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    pub fn is_picked_up(&self) -> bool {
        self.picked_up
    }

    fn wobble(&mut self, transform: &mut Transform, delta: f32) {
        self.elapsed += delta;
        let spin = (self.spin_degrees_per_second * delta).to_radians();
        transform.rotate_local(Quat::from_axis_angle(self.spin_axis, spin));

        let offset = (self.elapsed * self.float_speed + self.float_phase).sin();
        transform.translation.y = self.rest_height + offset * self.float_amplitude;
    }
}

impl Interactable for KeyPickup {
    fn base(&self) -> &InteractableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut InteractableBase {
        &mut self.base
    }

    fn can_interact(&self, _ctx: &InteractionContext) -> bool {
        !self.picked_up
    }

    fn hint_text(&self, _ctx: &InteractionContext) -> String {
        format!(
            "Press {} to pick up {}",
            key_label(self.activation_key()),
            self.display_name
        )
    }

    fn on_spawn(&mut self, transform: &Transform) {
        self.rest_height = transform.translation.y;
    }

    fn interact(&mut self, ctx: &mut InteractionContext) {
        if self.picked_up {
            return;
        }
        self.picked_up = true;
        self.since_pickup = 0.0;

        info!(target: "interaction", "{}: picked up {}", ctx.owner, self.display_name);
        ctx.keys.add(self.key_id.clone());
        self.base.play_interaction_cue(ctx);
        ctx.hints.hide_hint();
    }

    fn advance(
        &mut self,
        transform: &mut Transform,
        delta: f32,
        _ctx: &mut InteractionContext,
    ) -> Lifecycle {
        if !self.picked_up {
            self.wobble(transform, delta);
            return Lifecycle::Active;
        }

        self.since_pickup += delta;
        if self.since_pickup >= self.despawn_delay {
            Lifecycle::Expired
        } else {
            Lifecycle::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{contract::Activation, events::CueKind, testing::Harness};

    fn pickup() -> KeyPickup {
        let key = KeyId::new("Y").expect("valid key id");
        let mut pickup =
            KeyPickup::new(KeyCode::KeyF, key, &PickupSettings::default()).with_float_phase(0.0);
        pickup.on_spawn(&Transform::from_xyz(0.0, 1.0, 0.0));
        pickup
    }

    #[test]
    fn pickup_adds_key_exactly_once() {
        let mut harness = Harness::new();
        let mut pickup = pickup();

        pickup.enter_range(harness.agent, &mut harness.ctx());
        assert_eq!(harness.board.hint(), Some("Press F to pick up the Y key"));

        assert_eq!(
            pickup.poll_activation(true, &mut harness.ctx()),
            Activation::Performed
        );
        assert_eq!(
            pickup.poll_activation(true, &mut harness.ctx()),
            Activation::Rejected
        );
        pickup.interact(&mut harness.ctx());

        assert!(pickup.is_picked_up());
        assert!(harness.keys.has("Y"));
        assert_eq!(harness.keys.drain_changes().len(), 1);
        assert_eq!(harness.cue_kinds(), vec![CueKind::Interact]);
        assert_eq!(harness.board.hint(), None);
    }

    #[test]
    fn already_owned_key_does_not_notify_again() {
        let mut harness = Harness::new();
        harness.keys.add(KeyId::new("Y").expect("valid key id"));
        harness.keys.drain_changes();

        let mut pickup = pickup();
        pickup.interact(&mut harness.ctx());

        assert!(pickup.is_picked_up());
        assert!(harness.keys.drain_changes().is_empty());
    }

    #[test]
    fn expires_after_the_removal_delay() {
        let mut harness = Harness::new();
        let mut pickup = pickup();
        let mut transform = Transform::from_xyz(0.0, 1.0, 0.0);

        pickup.interact(&mut harness.ctx());
        assert_eq!(
            pickup.advance(&mut transform, 0.05, &mut harness.ctx()),
            Lifecycle::Active
        );
        assert_eq!(
            pickup.advance(&mut transform, 0.06, &mut harness.ctx()),
            Lifecycle::Expired
        );
    }

    #[test]
    fn wobbles_only_until_picked_up() {
        let mut harness = Harness::new();
        let mut pickup = pickup();
        let mut transform = Transform::from_xyz(0.0, 1.0, 0.0);

        pickup.advance(&mut transform, 0.5, &mut harness.ctx());
        assert!(transform.translation.y > 1.0);
        assert!(transform.translation.y <= 1.2 + f32::EPSILON);
        assert!(transform.rotation.angle_between(Quat::IDENTITY) > 0.0);

        pickup.interact(&mut harness.ctx());
        let frozen = transform;
        pickup.advance(&mut transform, 0.05, &mut harness.ctx());
        assert_eq!(transform, frozen);
    }
}
