//! Error types reported by interactables when a collaborator is missing or input is invalid.
use std::fmt;

use bevy::prelude::Entity;

/// Local, non-fatal failures. Each is logged by the caller and leaves the object inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// No entity carries the agent marker or movement component yet.
    MissingAgent { detector: Entity },
    /// A dialogue NPC was activated without a dialogue payload.
    MissingDialogueData { owner: Entity },
    /// A detector sits on an entity that exposes no interactable component.
    MissingInteractable { detector: Entity },
    /// Key identifiers must contain at least one non-whitespace character.
    EmptyKeyId,
    /// A configured activation key name did not map to a known key code.
    UnknownActivationKey { name: String },
}

impl InteractionError {
    pub fn unknown_activation_key(name: impl Into<String>) -> Self {
        Self::UnknownActivationKey { name: name.into() }
    }
}

impl fmt::Display for InteractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAgent { detector } => {
                write!(f, "Detector {} could not resolve an agent", detector)
            }
            Self::MissingDialogueData { owner } => {
                write!(f, "Dialogue NPC {} has no dialogue data assigned", owner)
            }
            Self::MissingInteractable { detector } => write!(
                f,
                "Detector {} is not attached to an interactable object",
                detector
            ),
            Self::EmptyKeyId => write!(f, "Key id is empty"),
            Self::UnknownActivationKey { name } => {
                write!(f, "Unknown activation key: {:?}", name)
            }
        }
    }
}

impl std::error::Error for InteractionError {}
