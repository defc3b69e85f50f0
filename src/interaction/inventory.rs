//! Process-wide registry of the keys the player has collected.
use std::{borrow::Borrow, collections::HashSet, fmt};

use bevy::prelude::*;
use serde::Deserialize;

use super::errors::InteractionError;

/// Identifier of a key item. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct KeyId(String);

impl KeyId {
    pub fn new(value: impl Into<String>) -> Result<Self, InteractionError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InteractionError::EmptyKeyId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for KeyId {
    type Error = InteractionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Borrow<str> for KeyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A change queued for listeners; drained once per tick by `publish_inventory_changes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryChange {
    Acquired(KeyId),
    Removed(KeyId),
}

/// Owned keys. Lives as a resource for the whole process, so it survives scene changes.
#[derive(Resource, Debug, Default)]
pub struct KeyInventory {
    owned: HashSet<KeyId>,
    changes: Vec<InventoryChange>,
}

impl KeyInventory {
    /// Adds `key`, returning `false` (and queueing nothing) when it was already owned.
    pub fn add(&mut self, key: KeyId) -> bool {
        if self.owned.contains(&key) {
            debug!(target: "interaction", "Key already owned: {}", key);
            return false;
        }

        info!(target: "interaction", "Key acquired: {}", key);
        self.owned.insert(key.clone());
        self.changes.push(InventoryChange::Acquired(key));
        true
    }

    pub fn has(&self, key: &str) -> bool {
        self.owned.contains(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        match self.owned.take(key) {
            Some(removed) => {
                info!(target: "interaction", "Key removed: {}", removed);
                self.changes.push(InventoryChange::Removed(removed));
                true
            }
            None => false,
        }
    }

    /// Drops all state without notifying anyone.
    #[cfg(test)]
    pub fn reset(&mut self) {
        self.owned.clear();
        self.changes.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &KeyId> {
        self.owned.iter()
    }

    pub fn len(&self) -> usize {
        self.owned.len()
    }

    pub fn drain_changes(&mut self) -> Vec<InventoryChange> {
        std::mem::take(&mut self.changes)
    }
}
