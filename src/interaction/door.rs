//! Hinged door that swings away from whoever opens it, optionally gated behind a key.
use bevy::prelude::*;

use super::{
    base::{key_label, InteractableBase},
    config::DoorSettings,
    contract::{Interactable, InteractionContext, Interactive, Lifecycle},
    events::CueKind,
    inventory::{KeyId, KeyInventory},
};

#[derive(Component, Debug, Clone)]
#[require(Interactive)]
pub struct Door {
    base: InteractableBase,
    settings: DoorSettings,
    required_key: Option<KeyId>,
    locked_hint: Option<String>,
    /// Lock state the current prompt was chosen for.
    prompted_locked: bool,
    rest_rotation: Quat,
    open_rotation: Quat,
    is_open: bool,
    current_open_angle: f32,
    auto_close_timer: f32,
}

impl Door {
    pub fn new(activation_key: KeyCode, settings: DoorSettings) -> Self {
        Self {
            base: InteractableBase::new(activation_key)
                .with_hint_text(format!("Press {} to open the door", key_label(activation_key))),
            settings,
            required_key: None,
            locked_hint: None,
            prompted_locked: false,
            rest_rotation: Quat::IDENTITY,
            open_rotation: Quat::IDENTITY,
            is_open: false,
            current_open_angle: 0.0,
            auto_close_timer: 0.0,
        }
    }

    /// Locks the door until `key` is in the inventory.
    pub fn requiring(mut self, key: KeyId) -> Self {
        self.required_key = Some(key);
        self
    }

    pub fn with_locked_hint(mut self, text: impl Into<String>) -> Self {
        self.locked_hint = Some(text.into());
        self
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn required_key(&self) -> Option<&KeyId> {
        self.required_key.as_ref()
    }

    pub fn is_locked(&self, keys: &KeyInventory) -> bool {
        self.required_key
            .as_ref()
            .is_some_and(|key| !keys.has(key.as_str()))
    }

    pub fn rest_rotation(&self) -> Quat {
        self.rest_rotation
    }

    /// Rotation targeted by the last opening.
    pub fn open_rotation(&self) -> Quat {
        self.open_rotation
    }

    /// Signed swing of the last opening in degrees, zero while closed.
    pub fn current_open_angle(&self) -> f32 {
        self.current_open_angle
    }

    fn target_rotation(&self) -> Quat {
        if self.is_open {
            self.open_rotation
        } else {
            self.rest_rotation
        }
    }

    fn locked_hint(&self) -> String {
        if let Some(text) = &self.locked_hint {
            return text.clone();
        }
        match &self.required_key {
            Some(key) => format!("Requires the {} key", key),
            None => String::new(),
        }
    }

    fn open(&mut self, ctx: &mut InteractionContext) {
        // Swing away from the agent: positive when it stands in front of the door.
        let forward = self.rest_rotation * Vec3::NEG_Z;
        let in_front = ctx
            .agent_position
            .map_or(true, |agent| forward.dot(agent - ctx.origin) > 0.0);
        let angle = if in_front {
            self.settings.open_angle_degrees
        } else {
            -self.settings.open_angle_degrees
        };

        self.current_open_angle = angle;
        self.open_rotation = self.rest_rotation * Quat::from_rotation_y(angle.to_radians());
        self.is_open = true;
        self.auto_close_timer = 0.0;

        debug!(target: "interaction", "{}: door opening by {:.0} degrees", ctx.owner, angle);
        self.base
            .play_cue(ctx, CueKind::DoorOpen, self.settings.open_clip.as_deref());
        ctx.hints.hide_hint();
    }

    pub fn close(&mut self, ctx: &mut InteractionContext) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        self.auto_close_timer = 0.0;
        self.current_open_angle = 0.0;

        debug!(target: "interaction", "{}: door closing", ctx.owner);
        self.base
            .play_cue(ctx, CueKind::DoorClose, self.settings.close_clip.as_deref());
        let text = self.hint_text(ctx);
        self.base.restore_hint(ctx, &text);
    }

    fn show_locked_hint(&self, ctx: &mut InteractionContext) {
        if !self.base.shows_hint() {
            return;
        }
        let text = self.locked_hint();
        if !text.is_empty() {
            ctx.hints.show_hint(&text);
        }
    }

    /// Swaps the prompt when a key arrives or leaves while the agent waits at the door.
    fn refresh_lock_prompt(&mut self, ctx: &mut InteractionContext) {
        let locked = self.is_locked(ctx.keys);
        if locked == self.prompted_locked {
            return;
        }
        self.prompted_locked = locked;
        if locked {
            self.show_locked_hint(ctx);
        } else if !self.is_open {
            let text = self.hint_text(ctx);
            self.base.restore_hint(ctx, &text);
        }
    }

    fn play_locked_cue(&self, ctx: &mut InteractionContext) {
        debug!(target: "interaction", "{}: door is locked", ctx.owner);
        self.base
            .play_cue(ctx, CueKind::DoorLocked, self.settings.locked_clip.as_deref());
    }
}

impl Default for Door {
    fn default() -> Self {
        Self::new(KeyCode::KeyF, DoorSettings::default())
    }
}

impl Interactable for Door {
    fn base(&self) -> &InteractableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut InteractableBase {
        &mut self.base
    }

    fn can_interact(&self, ctx: &InteractionContext) -> bool {
        !self.is_locked(ctx.keys)
    }

    fn hint_text(&self, ctx: &InteractionContext) -> String {
        if self.is_locked(ctx.keys) {
            return String::new();
        }
        let verb = if self.is_open { "close" } else { "open" };
        format!(
            "Press {} to {} the door",
            key_label(self.activation_key()),
            verb
        )
    }

    fn on_spawn(&mut self, transform: &Transform) {
        self.rest_rotation = transform.rotation;
        self.open_rotation = transform.rotation;
    }

    fn interact(&mut self, ctx: &mut InteractionContext) {
        if self.is_locked(ctx.keys) {
            self.play_locked_cue(ctx);
            return;
        }

        if self.is_open {
            self.close(ctx);
        } else {
            self.open(ctx);
        }
    }

    fn on_agent_enter(&mut self, _agent: Entity, ctx: &mut InteractionContext) {
        self.prompted_locked = self.is_locked(ctx.keys);
        if self.prompted_locked {
            self.show_locked_hint(ctx);
        }
    }

    fn on_agent_exit(&mut self, _agent: Entity, ctx: &mut InteractionContext) {
        if self.is_open && self.settings.auto_close {
            self.close(ctx);
        }
    }

    fn on_rejected(&mut self, ctx: &mut InteractionContext) {
        self.play_locked_cue(ctx);
    }

    fn advance(
        &mut self,
        transform: &mut Transform,
        delta: f32,
        ctx: &mut InteractionContext,
    ) -> Lifecycle {
        if self.base.agent_in_range() {
            self.refresh_lock_prompt(ctx);
        }

        let step = (self.settings.rotation_speed * delta).clamp(0.0, 1.0);
        transform.rotation = transform.rotation.slerp(self.target_rotation(), step);

        if self.is_open && self.settings.auto_close {
            self.auto_close_timer += delta;
            if self.auto_close_timer >= self.settings.auto_close_delay {
                self.close(ctx);
            }
        }

        Lifecycle::Active
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::interaction::{contract::Activation, testing::Harness};

    fn spawned_door() -> Door {
        let mut door = Door::default();
        door.on_spawn(&Transform::IDENTITY);
        door
    }

    fn gated_door() -> Door {
        let key = KeyId::new("Y").expect("valid key id");
        let mut door = Door::default().requiring(key);
        door.on_spawn(&Transform::IDENTITY);
        door
    }

    #[test]
    fn door_swings_away_from_the_approach_side() {
        let mut front = Harness::new();
        let mut door = spawned_door();
        door.interact(&mut front.ctx());
        assert!(door.is_open());
        assert!(door.open_rotation().angle_between(Quat::from_rotation_y(FRAC_PI_2)) < 1e-4);

        let mut behind = Harness::new();
        behind.agent_position = Some(Vec3::new(0.0, 0.0, 2.0));
        let mut door = spawned_door();
        door.interact(&mut behind.ctx());
        assert!(door.open_rotation().angle_between(Quat::from_rotation_y(-FRAC_PI_2)) < 1e-4);
        assert!((door.current_open_angle() + 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn approach_side_uses_the_rest_orientation() {
        let mut harness = Harness::new();
        // Rotated half a turn, the door's front now faces +Z.
        harness.agent_position = Some(Vec3::new(0.0, 0.0, 2.0));
        let rest = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::PI));
        let mut door = Door::default();
        door.on_spawn(&rest);

        door.interact(&mut harness.ctx());
        assert!((door.current_open_angle() - 90.0).abs() < f32::EPSILON);
        assert!(
            door.open_rotation()
                .angle_between(rest.rotation * Quat::from_rotation_y(FRAC_PI_2))
                < 1e-4
        );
    }

    #[test]
    fn missing_agent_opens_with_positive_angle() {
        let mut harness = Harness::new();
        harness.agent_position = None;
        let mut door = spawned_door();
        door.interact(&mut harness.ctx());
        assert!((door.current_open_angle() - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn gated_door_rejects_with_locked_cue_and_no_hint() {
        let mut harness = Harness::new();
        let mut door = gated_door();

        assert!(!door.can_interact(&harness.ctx()));
        assert_eq!(door.hint_text(&harness.ctx()), "");

        door.enter_range(harness.agent, &mut harness.ctx());
        assert_eq!(harness.board.hint(), Some("Requires the Y key"));

        assert_eq!(
            door.poll_activation(true, &mut harness.ctx()),
            Activation::Rejected
        );
        // A direct call bypassing the gate is refused the same way.
        door.interact(&mut harness.ctx());

        assert!(!door.is_open());
        assert_eq!(harness.cue_kinds(), vec![CueKind::DoorLocked, CueKind::DoorLocked]);
    }

    #[test]
    fn key_unlocks_the_door() {
        let mut harness = Harness::new();
        let mut door = gated_door();
        harness.keys.add(KeyId::new("Y").expect("valid key id"));

        door.enter_range(harness.agent, &mut harness.ctx());
        assert_eq!(harness.board.hint(), Some("Press F to open the door"));

        assert_eq!(
            door.poll_activation(true, &mut harness.ctx()),
            Activation::Performed
        );
        assert!(door.is_open());
        assert_eq!(harness.board.hint(), None);
        assert_eq!(harness.cue_kinds(), vec![CueKind::DoorOpen]);
    }

    #[test]
    fn key_arriving_in_range_swaps_the_locked_prompt() {
        let mut harness = Harness::new();
        let mut door = gated_door().with_locked_hint("The gallery is closed");
        let mut transform = Transform::IDENTITY;

        door.enter_range(harness.agent, &mut harness.ctx());
        assert_eq!(harness.board.hint(), Some("The gallery is closed"));

        harness.keys.add(KeyId::new("Y").expect("valid key id"));
        door.advance(&mut transform, 0.1, &mut harness.ctx());
        assert_eq!(harness.board.hint(), Some("Press F to open the door"));

        harness.keys.remove("Y");
        door.advance(&mut transform, 0.1, &mut harness.ctx());
        assert_eq!(harness.board.hint(), Some("The gallery is closed"));
    }

    #[test]
    fn auto_close_restores_hint_when_agent_stays() {
        let mut harness = Harness::new();
        let mut door = spawned_door();
        let mut transform = Transform::IDENTITY;

        door.enter_range(harness.agent, &mut harness.ctx());
        door.interact(&mut harness.ctx());

        for _ in 0..29 {
            door.advance(&mut transform, 0.1, &mut harness.ctx());
        }
        assert!(door.is_open());
        assert!(transform.rotation.angle_between(Quat::IDENTITY) > 0.5);

        for _ in 0..2 {
            door.advance(&mut transform, 0.1, &mut harness.ctx());
        }
        assert!(!door.is_open());
        assert_eq!(harness.board.hint(), Some("Press F to open the door"));
        assert_eq!(harness.cue_kinds(), vec![CueKind::DoorOpen, CueKind::DoorClose]);
    }

    #[test]
    fn leaving_range_forces_close() {
        let mut harness = Harness::new();
        let mut door = spawned_door();

        door.enter_range(harness.agent, &mut harness.ctx());
        door.interact(&mut harness.ctx());
        door.exit_range(&mut harness.ctx());

        assert!(!door.is_open());
        assert_eq!(harness.board.hint(), None);
    }

    #[test]
    fn manual_close_and_redundant_close() {
        let mut harness = Harness::new();
        let mut door = spawned_door();

        door.close(&mut harness.ctx());
        assert!(harness.cues.is_empty());

        door.enter_range(harness.agent, &mut harness.ctx());
        door.interact(&mut harness.ctx());
        assert_eq!(harness.board.hint(), None);
        door.interact(&mut harness.ctx());
        assert!(!door.is_open());
        assert_eq!(harness.board.hint(), Some("Press F to open the door"));
    }

    #[test]
    fn rotation_eases_back_to_rest_after_closing() {
        let mut harness = Harness::new();
        let mut door = spawned_door();
        let mut transform = Transform::IDENTITY;

        door.interact(&mut harness.ctx());
        for _ in 0..20 {
            door.advance(&mut transform, 0.1, &mut harness.ctx());
        }
        assert!(transform.rotation.angle_between(door.open_rotation()) < 0.05);

        door.close(&mut harness.ctx());
        for _ in 0..20 {
            door.advance(&mut transform, 0.1, &mut harness.ctx());
        }
        assert!(transform.rotation.angle_between(door.rest_rotation()) < 0.05);
    }
}
