//! Character that opens a dialogue panel and closes it once the agent walks away.
use bevy::prelude::*;

use super::{
    base::{key_label, InteractableBase},
    contract::{Interactable, InteractionContext, Interactive, Lifecycle},
    errors::InteractionError,
    hints::DialogueData,
};

const DEFAULT_AUTO_CLOSE_DISTANCE: f32 = 5.0;

#[derive(Component, Debug, Clone)]
#[require(Interactive)]
pub struct DialogueNpc {
    base: InteractableBase,
    data: Option<DialogueData>,
    auto_close_distance: f32,
    dialogue_active: bool,
}

impl DialogueNpc {
    pub fn new(activation_key: KeyCode, auto_close_distance: f32) -> Self {
        Self {
            base: InteractableBase::new(activation_key),
            data: None,
            auto_close_distance: auto_close_distance.max(0.0),
            dialogue_active: false,
        }
    }

    pub fn with_dialogue(mut self, data: DialogueData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn dialogue(&self) -> Option<&DialogueData> {
        self.data.as_ref()
    }

    pub fn is_dialogue_active(&self) -> bool {
        self.dialogue_active
    }

    pub fn auto_close_distance(&self) -> f32 {
        self.auto_close_distance
    }

    /// Closes this NPC's dialogue. A panel since taken over by another NPC stays up.
    pub fn close_dialogue(&mut self, ctx: &mut InteractionContext) {
        if !self.dialogue_active {
            return;
        }
        if ctx.hints.dialogue_owner() == Some(ctx.owner) {
            ctx.hints.hide_dialogue();
        }
        self.finish_dialogue(ctx);
    }

    /// The UI already closed the panel; only local state follows. Safe to repeat.
    pub fn acknowledge_dismissal(&mut self, ctx: &mut InteractionContext) {
        if !self.dialogue_active {
            return;
        }
        self.finish_dialogue(ctx);
    }

    fn finish_dialogue(&mut self, ctx: &mut InteractionContext) {
        self.dialogue_active = false;
        debug!(target: "interaction", "{}: dialogue closed", ctx.owner);
        let text = self.hint_text(ctx);
        self.base.restore_hint(ctx, &text);
    }
}

impl Default for DialogueNpc {
    fn default() -> Self {
        Self::new(KeyCode::KeyF, DEFAULT_AUTO_CLOSE_DISTANCE)
    }
}

impl Interactable for DialogueNpc {
    fn base(&self) -> &InteractableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut InteractableBase {
        &mut self.base
    }

    fn can_interact(&self, _ctx: &InteractionContext) -> bool {
        !self.dialogue_active && self.data.is_some()
    }

    fn hint_text(&self, _ctx: &InteractionContext) -> String {
        let key = key_label(self.activation_key());
        match &self.data {
            Some(data) if !data.speaker.is_empty() => {
                format!("Press {} to talk to {}", key, data.speaker)
            }
            _ => format!("Press {} to talk", key),
        }
    }

    fn interact(&mut self, ctx: &mut InteractionContext) {
        if self.dialogue_active {
            return;
        }
        let Some(data) = &self.data else {
            warn!(
                target: "interaction",
                "{}",
                InteractionError::MissingDialogueData { owner: ctx.owner }
            );
            return;
        };

        info!(target: "interaction", "{}: opening dialogue {:?}", ctx.owner, data.title);
        self.base.play_interaction_cue(ctx);
        ctx.hints.show_dialogue(data, ctx.owner);
        ctx.hints.hide_hint();
        self.dialogue_active = true;
    }

    fn advance(
        &mut self,
        _transform: &mut Transform,
        _delta: f32,
        ctx: &mut InteractionContext,
    ) -> Lifecycle {
        if self.dialogue_active {
            let too_far = ctx
                .distance_to_agent()
                .map_or(true, |distance| distance > self.auto_close_distance);
            if too_far {
                self.close_dialogue(ctx);
            }
        }
        Lifecycle::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{
        contract::Activation, events::CueKind, hints::HintChannel, testing::Harness,
    };

    fn guide() -> DialogueNpc {
        DialogueNpc::default().with_dialogue(
            DialogueData::new("Guide", "The Starry Night", "Painted in June 1889.")
                .with_artist("Vincent van Gogh")
                .with_year("1889"),
        )
    }

    #[test]
    fn activation_opens_dialogue_once() {
        let mut harness = Harness::new();
        let mut npc = guide();

        npc.enter_range(harness.agent, &mut harness.ctx());
        assert_eq!(harness.board.hint(), Some("Press F to talk to Guide"));

        assert_eq!(
            npc.poll_activation(true, &mut harness.ctx()),
            Activation::Performed
        );
        assert!(npc.is_dialogue_active());
        assert_eq!(harness.board.hint(), None);
        let open = harness.board.dialogue().expect("dialogue should be open");
        assert_eq!(open.owner, harness.owner);
        assert_eq!(open.data.title, "The Starry Night");

        assert_eq!(
            npc.poll_activation(true, &mut harness.ctx()),
            Activation::Rejected
        );
        assert_eq!(harness.cue_kinds(), vec![CueKind::Interact]);
    }

    #[test]
    fn auto_closes_beyond_distance_but_not_on_range_exit() {
        let mut harness = Harness::new();
        let mut npc = guide();
        let mut transform = Transform::IDENTITY;

        npc.enter_range(harness.agent, &mut harness.ctx());
        npc.interact(&mut harness.ctx());

        // Outside a 3 m detector but inside the 5 m auto-close distance.
        harness.agent_position = Some(Vec3::new(0.0, 0.0, -4.0));
        npc.exit_range(&mut harness.ctx());
        npc.advance(&mut transform, 0.1, &mut harness.ctx());
        assert!(npc.is_dialogue_active());
        assert!(harness.board.dialogue().is_some());

        harness.agent_position = Some(Vec3::new(0.0, 0.0, -5.5));
        npc.advance(&mut transform, 0.1, &mut harness.ctx());
        assert!(!npc.is_dialogue_active());
        assert!(harness.board.dialogue().is_none());
        assert_eq!(harness.board.hint(), None);
    }

    #[test]
    fn closing_in_range_restores_the_hint() {
        let mut harness = Harness::new();
        let mut npc = guide();

        npc.enter_range(harness.agent, &mut harness.ctx());
        npc.interact(&mut harness.ctx());
        npc.close_dialogue(&mut harness.ctx());

        assert_eq!(harness.board.hint(), Some("Press F to talk to Guide"));
        assert!(npc.can_interact(&harness.ctx()));
    }

    #[test]
    fn external_dismissal_is_idempotent() {
        let mut harness = Harness::new();
        let mut npc = guide();
        let mut transform = Transform::IDENTITY;

        npc.enter_range(harness.agent, &mut harness.ctx());
        npc.interact(&mut harness.ctx());

        assert_eq!(harness.board.dismiss_dialogue(), Some(harness.owner));
        npc.acknowledge_dismissal(&mut harness.ctx());
        npc.acknowledge_dismissal(&mut harness.ctx());
        assert!(!npc.is_dialogue_active());

        // Self-close followed by a late dismissal is harmless too.
        npc.interact(&mut harness.ctx());
        harness.agent_position = None;
        npc.advance(&mut transform, 0.1, &mut harness.ctx());
        npc.acknowledge_dismissal(&mut harness.ctx());
        assert!(!npc.is_dialogue_active());
        assert!(harness.board.dialogue().is_none());
    }

    #[test]
    fn closing_leaves_another_npcs_dialogue_open() {
        let mut harness = Harness::new();
        let mut npc = guide();
        npc.interact(&mut harness.ctx());

        let other = harness.agent;
        let other_data = DialogueData::new("Curator", "Irises", "Painted in 1889.");
        harness.board.show_dialogue(&other_data, other);

        npc.close_dialogue(&mut harness.ctx());
        assert!(!npc.is_dialogue_active());
        let open = harness.board.dialogue().expect("other dialogue stays open");
        assert_eq!(open.owner, other);
        assert_eq!(open.data.speaker, "Curator");
    }

    #[test]
    fn missing_dialogue_data_leaves_npc_inert() {
        let mut harness = Harness::new();
        let mut npc = DialogueNpc::default();

        assert!(!npc.can_interact(&harness.ctx()));
        npc.interact(&mut harness.ctx());

        assert!(!npc.is_dialogue_active());
        assert!(harness.cues.is_empty());
        assert_eq!(npc.hint_text(&harness.ctx()), "Press F to talk");
    }
}
