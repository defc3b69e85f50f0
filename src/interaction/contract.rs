//! The capability every interactive object exposes, with the shared activation protocol.
use bevy::prelude::*;

use super::{
    base::InteractableBase,
    events::InteractionCue,
    hints::HintChannel,
    inventory::KeyInventory,
};

/// Collaborators and world facts an interactable may use during one call.
pub struct InteractionContext<'a> {
    /// Entity carrying the interactable.
    pub owner: Entity,
    /// World position of the owner.
    pub origin: Vec3,
    /// Latest agent position known to the owner's detector.
    pub agent_position: Option<Vec3>,
    pub keys: &'a mut KeyInventory,
    pub hints: &'a mut dyn HintChannel,
    /// Cues queued during this call; the calling system publishes them.
    pub cues: &'a mut Vec<InteractionCue>,
}

impl<'a> InteractionContext<'a> {
    pub fn new(
        owner: Entity,
        origin: Vec3,
        agent_position: Option<Vec3>,
        keys: &'a mut KeyInventory,
        hints: &'a mut dyn HintChannel,
        cues: &'a mut Vec<InteractionCue>,
    ) -> Self {
        Self {
            owner,
            origin,
            agent_position,
            keys,
            hints,
            cues,
        }
    }

    pub fn distance_to_agent(&self) -> Option<f32> {
        self.agent_position
            .map(|agent| self.origin.distance(agent))
    }
}

/// Result of polling the activation key for one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Key not pressed, or no agent in range.
    Idle,
    /// `interact()` ran.
    Performed,
    /// Key pressed in range while the object refused interaction.
    Rejected,
}

/// Marker required by every interactable component; detectors without it are disabled.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Interactive;

/// Whether an object stays in the world after its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Expired,
}

/// Uniform operation set shared by doors, pickups and NPCs.
///
/// Implementors provide the variant-specific pieces; the provided methods run
/// the common enter/exit/activation flow on top of [`InteractableBase`].
pub trait Interactable: Send + Sync + 'static {
    fn base(&self) -> &InteractableBase;

    fn base_mut(&mut self) -> &mut InteractableBase;

    /// Re-evaluated on every call; gates whether the activation key does anything.
    fn can_interact(&self, ctx: &InteractionContext) -> bool;

    fn interact(&mut self, ctx: &mut InteractionContext);

    fn hint_text(&self, _ctx: &InteractionContext) -> String {
        self.base().hint_text().to_owned()
    }

    fn activation_key(&self) -> KeyCode {
        self.base().activation_key()
    }

    /// Called once when the owning entity appears.
    fn on_spawn(&mut self, _transform: &Transform) {}

    /// Runs after the base enter flow; lets ineligible variants show their own hint.
    fn on_agent_enter(&mut self, _agent: Entity, _ctx: &mut InteractionContext) {}

    fn on_agent_exit(&mut self, _agent: Entity, _ctx: &mut InteractionContext) {}

    /// Activation key pressed in range while `can_interact` was false.
    fn on_rejected(&mut self, _ctx: &mut InteractionContext) {}

    /// Per-tick behaviour: timers, interpolation, idle effects.
    fn advance(
        &mut self,
        _transform: &mut Transform,
        _delta: f32,
        _ctx: &mut InteractionContext,
    ) -> Lifecycle {
        Lifecycle::Active
    }

    fn enter_range(&mut self, agent: Entity, ctx: &mut InteractionContext) {
        if self.base().agent_in_range() {
            return;
        }
        self.base_mut().mark_entered(agent);
        debug!(target: "interaction", "{}: agent {} entered range", ctx.owner, agent);

        if self.base().shows_hint() && self.can_interact(ctx) {
            let text = self.hint_text(ctx);
            if !text.is_empty() {
                ctx.hints.show_hint(&text);
            }
        }

        self.on_agent_enter(agent, ctx);
    }

    fn exit_range(&mut self, ctx: &mut InteractionContext) {
        if !self.base().agent_in_range() {
            return;
        }
        let agent = self.base_mut().mark_exited();
        debug!(target: "interaction", "{}: agent left range", ctx.owner);

        ctx.hints.hide_hint();

        if let Some(agent) = agent {
            self.on_agent_exit(agent, ctx);
        }
    }

    fn poll_activation(&mut self, pressed: bool, ctx: &mut InteractionContext) -> Activation {
        if !pressed || !self.base().agent_in_range() {
            return Activation::Idle;
        }

        if self.can_interact(ctx) {
            self.interact(ctx);
            Activation::Performed
        } else {
            self.on_rejected(ctx);
            Activation::Rejected
        }
    }
}
