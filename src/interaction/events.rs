//! Messages exchanged between detection, interactables, and their external listeners.
use bevy::prelude::{Entity, Message};

use super::inventory::KeyId;

/// Boundary crossing of a detector's in-range predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeTransition {
    Entered,
    Exited,
}

/// Raised once per crossing for the interactable on `detector`.
#[derive(Message, Debug, Clone, Copy)]
pub struct AgentRangeChanged {
    pub detector: Entity,
    /// `None` when the agent vanished; only exits are raised without one.
    pub agent: Option<Entity>,
    pub transition: RangeTransition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPhase {
    Began,
    Ended,
}

/// Overlap signal between a trigger volume and some other collider.
///
/// Produced by `TriggerVolume` or any physics adapter; both phases share one
/// message type so their relative order within a tick is preserved.
#[derive(Message, Debug, Clone, Copy)]
pub struct OverlapChanged {
    pub volume: Entity,
    pub other: Entity,
    pub phase: OverlapPhase,
}

/// Feedback sounds requested by interactables. Playback lives outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Interact,
    DoorOpen,
    DoorClose,
    DoorLocked,
}

#[derive(Message, Debug, Clone, PartialEq)]
pub struct InteractionCue {
    pub owner: Entity,
    pub kind: CueKind,
    /// Asset path of the clip, when one was configured.
    pub clip: Option<String>,
    pub volume: f32,
}

#[derive(Message, Debug, Clone)]
pub struct KeyAcquired {
    pub key: KeyId,
}

#[derive(Message, Debug, Clone)]
pub struct KeyRemoved {
    pub key: KeyId,
}

/// The UI closed a dialogue on its own (close button, Escape).
#[derive(Message, Debug, Clone, Copy)]
pub struct DialogueDismissed {
    pub owner: Entity,
}
