//! Test harness giving interactables a context without running an App.
use bevy::prelude::*;

use super::{
    contract::InteractionContext,
    events::{CueKind, InteractionCue},
    hints::HintBoard,
    inventory::KeyInventory,
};

pub(crate) struct Harness {
    _world: World,
    pub owner: Entity,
    pub agent: Entity,
    pub origin: Vec3,
    pub agent_position: Option<Vec3>,
    pub keys: KeyInventory,
    pub board: HintBoard,
    pub cues: Vec<InteractionCue>,
}

impl Harness {
    pub fn new() -> Self {
        let mut world = World::new();
        let owner = world.spawn_empty().id();
        let agent = world.spawn_empty().id();
        Self {
            _world: world,
            owner,
            agent,
            origin: Vec3::ZERO,
            agent_position: Some(Vec3::new(0.0, 0.0, -2.0)),
            keys: KeyInventory::default(),
            board: HintBoard::default(),
            cues: Vec::new(),
        }
    }

    pub fn ctx(&mut self) -> InteractionContext<'_> {
        InteractionContext::new(
            self.owner,
            self.origin,
            self.agent_position,
            &mut self.keys,
            &mut self.board,
            &mut self.cues,
        )
    }

    pub fn cue_kinds(&self) -> Vec<CueKind> {
        self.cues.iter().map(|cue| cue.kind).collect()
    }
}
