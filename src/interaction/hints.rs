//! The shared hint/dialogue channel interactables talk to, and its default resource binding.
use bevy::prelude::*;
use serde::Deserialize;

const DEFAULT_DIALOGUE_FONT_SIZE: f32 = 16.0;

/// Payload shown by a dialogue NPC.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DialogueData {
    pub speaker: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_font_size() -> f32 {
    DEFAULT_DIALOGUE_FONT_SIZE
}

impl DialogueData {
    pub fn new(
        speaker: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            title: title.into(),
            body: body.into(),
            artist: None,
            year: None,
            font_size: DEFAULT_DIALOGUE_FONT_SIZE,
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }
}

/// UI collaborator that renders interaction prompts and dialogue panels.
///
/// The core only calls into it; it never owns the rendering side.
pub trait HintChannel {
    fn show_hint(&mut self, text: &str);
    fn hide_hint(&mut self);
    fn show_dialogue(&mut self, data: &DialogueData, owner: Entity);
    fn hide_dialogue(&mut self);
    /// NPC whose dialogue is on screen, if the channel tracks one.
    fn dialogue_owner(&self) -> Option<Entity>;
}

/// Dialogue currently shown, and the NPC to notify when the UI closes it.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDialogue {
    pub data: DialogueData,
    pub owner: Entity,
}

/// Default channel binding: records what should be on screen for the UI plugin to mirror.
#[derive(Resource, Debug, Default)]
pub struct HintBoard {
    hint: Option<String>,
    dialogue: Option<OpenDialogue>,
    displaced: Vec<Entity>,
    revision: u64,
}

impl HintBoard {
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn dialogue(&self) -> Option<&OpenDialogue> {
        self.dialogue.as_ref()
    }

    /// Bumped on every visible change; the UI compares it against its last sync.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Owners whose dialogue was replaced by another NPC's since the last call.
    pub fn take_displaced(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.displaced)
    }

    /// Closes the dialogue from the UI side, returning the NPC that owned it.
    pub fn dismiss_dialogue(&mut self) -> Option<Entity> {
        let closed = self.dialogue.take()?;
        self.revision += 1;
        Some(closed.owner)
    }
}

impl HintChannel for HintBoard {
    fn show_hint(&mut self, text: &str) {
        if self.hint.as_deref() == Some(text) {
            return;
        }
        self.hint = Some(text.to_owned());
        self.revision += 1;
    }

    fn hide_hint(&mut self) {
        if self.hint.take().is_some() {
            self.revision += 1;
        }
    }

    fn show_dialogue(&mut self, data: &DialogueData, owner: Entity) {
        let replaced = self.dialogue.replace(OpenDialogue {
            data: data.clone(),
            owner,
        });
        if let Some(previous) = replaced.filter(|previous| previous.owner != owner) {
            self.displaced.push(previous.owner);
        }
        self.revision += 1;
    }

    fn hide_dialogue(&mut self) {
        if self.dialogue.take().is_some() {
            self.revision += 1;
        }
    }

    fn dialogue_owner(&self) -> Option<Entity> {
        self.dialogue.as_ref().map(|open| open.owner)
    }
}

/// Stand-in used when no `HintBoard` exists; interactions keep working without prompts.
#[derive(Debug, Default)]
pub struct DetachedHints;

impl HintChannel for DetachedHints {
    fn show_hint(&mut self, text: &str) {
        debug!(target: "interaction", "No hint channel bound, dropping hint {:?}", text);
    }

    fn hide_hint(&mut self) {}

    fn show_dialogue(&mut self, data: &DialogueData, owner: Entity) {
        warn!(
            target: "interaction",
            "No hint channel bound, cannot show dialogue {:?} for {}",
            data.title,
            owner
        );
    }

    fn hide_dialogue(&mut self) {}

    fn dialogue_owner(&self) -> Option<Entity> {
        None
    }
}
