//! Shared state every interactable composes: activation key, hint routing, cue dispatch.
use bevy::prelude::*;

use super::{
    contract::InteractionContext,
    events::{CueKind, InteractionCue},
};

const DEFAULT_CUE_VOLUME: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct InteractableBase {
    activation_key: KeyCode,
    hint_text: String,
    show_hint: bool,
    interaction_clip: Option<String>,
    cue_volume: f32,
    agent_in_range: bool,
    current_agent: Option<Entity>,
}

impl InteractableBase {
    pub fn new(activation_key: KeyCode) -> Self {
        Self {
            activation_key,
            hint_text: format!("Press {} to interact", key_label(activation_key)),
            show_hint: true,
            interaction_clip: None,
            cue_volume: DEFAULT_CUE_VOLUME,
            agent_in_range: false,
            current_agent: None,
        }
    }

    pub fn with_hint_text(mut self, text: impl Into<String>) -> Self {
        self.hint_text = text.into();
        self
    }

    pub fn with_hints_enabled(mut self, enabled: bool) -> Self {
        self.show_hint = enabled;
        self
    }

    pub fn with_interaction_clip(mut self, clip: impl Into<String>) -> Self {
        self.interaction_clip = Some(clip.into());
        self
    }

    pub fn with_cue_volume(mut self, volume: f32) -> Self {
        self.cue_volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn activation_key(&self) -> KeyCode {
        self.activation_key
    }

    pub fn hint_text(&self) -> &str {
        &self.hint_text
    }

    pub fn shows_hint(&self) -> bool {
        self.show_hint
    }

    pub fn agent_in_range(&self) -> bool {
        self.agent_in_range
    }

    pub fn current_agent(&self) -> Option<Entity> {
        self.current_agent
    }

    pub(crate) fn mark_entered(&mut self, agent: Entity) {
        self.agent_in_range = true;
        self.current_agent = Some(agent);
    }

    pub(crate) fn mark_exited(&mut self) -> Option<Entity> {
        self.agent_in_range = false;
        self.current_agent.take()
    }

    /// Queues a cue; `clip` is the configured sound for it, if any.
    pub fn play_cue(&self, ctx: &mut InteractionContext, kind: CueKind, clip: Option<&str>) {
        ctx.cues.push(InteractionCue {
            owner: ctx.owner,
            kind,
            clip: clip.map(str::to_owned),
            volume: self.cue_volume,
        });
    }

    pub fn play_interaction_cue(&self, ctx: &mut InteractionContext) {
        self.play_cue(ctx, CueKind::Interact, self.interaction_clip.as_deref());
    }

    /// Puts `text` back on screen if the agent is still around to read it.
    pub fn restore_hint(&self, ctx: &mut InteractionContext, text: &str) {
        if self.agent_in_range && self.show_hint && !text.is_empty() {
            ctx.hints.show_hint(text);
        }
    }
}

impl Default for InteractableBase {
    fn default() -> Self {
        Self::new(KeyCode::KeyF)
    }
}

/// Short name of a key for prompts, e.g. `KeyF` → `F`.
pub fn key_label(key: KeyCode) -> String {
    let name = format!("{:?}", key);
    match name.strip_prefix("Key") {
        Some(letter) if !letter.is_empty() => letter.to_owned(),
        _ => name,
    }
}
