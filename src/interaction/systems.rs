//! ECS systems driving detection, dispatch, activation and per-object ticking.
use std::collections::HashSet;

use bevy::{
    ecs::{component::Mutable, system::SystemParam},
    prelude::*,
};

use crate::{
    core::SimulationClock,
    player::components::{Player, PlayerMotor},
};

use super::{
    contract::{Activation, Interactable, InteractionContext, Interactive, Lifecycle},
    detector::Detector,
    errors::InteractionError,
    events::{
        AgentRangeChanged, DialogueDismissed, InteractionCue, KeyAcquired, KeyRemoved,
        OverlapChanged, OverlapPhase, RangeTransition,
    },
    hints::{DetachedHints, HintBoard, HintChannel},
    inventory::{InventoryChange, KeyInventory},
    npc::DialogueNpc,
    overlap::{AgentCollider, TriggerRelay, TriggerVolume},
};

/// Keys pressed this tick, sampled once so every interactable sees the same input.
#[derive(Resource, Debug, Default)]
pub struct ActivationInput {
    pressed: HashSet<KeyCode>,
}

impl ActivationInput {
    pub fn press(&mut self, key: KeyCode) {
        self.pressed.insert(key);
    }

    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

/// Shared collaborators handed to interactables through an [`InteractionContext`].
#[derive(SystemParam)]
pub struct InteractionServices<'w> {
    keys: ResMut<'w, KeyInventory>,
    board: Option<ResMut<'w, HintBoard>>,
    cues: MessageWriter<'w, InteractionCue>,
}

impl InteractionServices<'_> {
    /// Builds a context for `owner`, runs `f`, then publishes the cues it queued.
    fn with_context<R>(
        &mut self,
        owner: Entity,
        origin: Vec3,
        agent_position: Option<Vec3>,
        f: impl FnOnce(&mut InteractionContext) -> R,
    ) -> R {
        let mut detached = DetachedHints;
        let mut queued = Vec::new();
        let hints: &mut dyn HintChannel = match self.board.as_mut() {
            Some(board) => &mut **board,
            None => &mut detached,
        };

        let mut ctx =
            InteractionContext::new(owner, origin, agent_position, &mut self.keys, hints, &mut queued);
        let result = f(&mut ctx);

        if !queued.is_empty() {
            self.cues.write_batch(queued);
        }
        result
    }
}

pub fn sample_activation_input(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut input: ResMut<ActivationInput>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };
    for key in keyboard.get_just_pressed() {
        input.press(*key);
    }
}

pub fn clear_activation_input(mut input: ResMut<ActivationInput>) {
    if !input.is_empty() {
        input.clear();
    }
}

/// Disables detectors that were attached to something that cannot be interacted with.
pub fn disable_orphan_detectors(
    mut detectors: Query<(Entity, &mut Detector), (Added<Detector>, Without<Interactive>)>,
) {
    for (entity, mut detector) in &mut detectors {
        warn!(
            target: "interaction",
            "{}. Disabling it.",
            InteractionError::MissingInteractable { detector: entity }
        );
        detector.disable();
    }
}

/// Runs `on_spawn` once for every freshly added interactable.
pub fn initialise_interactables<T>(mut added: Query<(&Transform, &mut T), Added<T>>)
where
    T: Interactable + Component<Mutability = Mutable>,
{
    for (transform, mut interactable) in &mut added {
        interactable.on_spawn(transform);
    }
}

/// Binds detectors to the agent and refreshes the agent position they see.
pub fn resolve_detector_agents(
    mut detectors: Query<(Entity, &mut Detector)>,
    players: Query<Entity, With<Player>>,
    motors: Query<Entity, With<PlayerMotor>>,
    positions: Query<&GlobalTransform>,
) {
    let candidate = players.iter().next().or_else(|| motors.iter().next());

    for (entity, mut detector) in &mut detectors {
        if !detector.is_enabled() {
            continue;
        }

        if let Some(agent) = detector.agent() {
            if let Ok(transform) = positions.get(agent) {
                detector.observe_agent(Some(transform.translation()));
                continue;
            }
            debug!(target: "interaction", "{}: agent {} is gone", entity, agent);
            detector.lose_agent();
        }

        match candidate {
            Some(agent) => {
                detector.bind_agent(agent);
                let position = positions.get(agent).ok().map(GlobalTransform::translation);
                detector.observe_agent(position);
            }
            None => {
                if detector.note_missing_agent() {
                    warn!(
                        target: "interaction",
                        "{}. Retrying every tick.",
                        InteractionError::MissingAgent { detector: entity }
                    );
                }
            }
        }
    }
}

pub fn sample_proximity(
    clock: Res<SimulationClock>,
    mut detectors: Query<(Entity, &GlobalTransform, &mut Detector)>,
    mut changes: MessageWriter<AgentRangeChanged>,
) {
    let delta = clock.delta_seconds();
    for (entity, transform, mut detector) in &mut detectors {
        if let Some(transition) = detector.sample(transform.translation(), delta) {
            changes.write(AgentRangeChanged {
                detector: entity,
                agent: detector.agent(),
                transition,
            });
        }
    }
}

/// Tests agent colliders against every trigger volume and reports membership changes.
#[allow(clippy::type_complexity)]
pub fn detect_volume_overlaps(
    mut volumes: Query<(Entity, &GlobalTransform, &mut TriggerVolume)>,
    colliders: Query<
        (Entity, &GlobalTransform),
        Or<(With<Player>, With<PlayerMotor>, With<AgentCollider>)>,
    >,
    mut overlaps: MessageWriter<OverlapChanged>,
) {
    for (entity, transform, mut volume) in &mut volumes {
        let points = colliders
            .iter()
            .map(|(collider, collider_transform)| (collider, collider_transform.translation()));
        let changes = volume.refresh(entity, transform, points);
        if !changes.is_empty() {
            overlaps.write_batch(changes);
        }
    }
}

/// Feeds overlap signals into the detectors they belong to.
#[allow(clippy::type_complexity)]
pub fn route_overlaps(
    mut overlaps: MessageReader<OverlapChanged>,
    relays: Query<&TriggerRelay>,
    agents: Query<(), Or<(With<Player>, With<PlayerMotor>)>>,
    colliders: Query<&AgentCollider>,
    mut detectors: Query<&mut Detector>,
    mut changes: MessageWriter<AgentRangeChanged>,
) {
    for overlap in overlaps.read() {
        let target = relays
            .get(overlap.volume)
            .map_or(overlap.volume, |relay| relay.target);

        let agent = if agents.contains(overlap.other) {
            overlap.other
        } else if let Ok(collider) = colliders.get(overlap.other) {
            collider.agent
        } else {
            continue;
        };

        let Ok(mut detector) = detectors.get_mut(target) else {
            continue;
        };
        match detector.agent() {
            None => detector.bind_agent(agent),
            Some(bound) if bound != agent => continue,
            Some(_) => {}
        }

        let transition = match overlap.phase {
            OverlapPhase::Began => detector.overlap_began(),
            OverlapPhase::Ended => detector.overlap_ended(),
        };
        if let Some(transition) = transition {
            changes.write(AgentRangeChanged {
                detector: target,
                agent: Some(agent),
                transition,
            });
        }
    }
}

/// Sub-phases of `InteractionSet::Dispatch`. Exits land first so the object just
/// entered owns the shared hint.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeDispatch {
    Exits,
    Entries,
}

pub fn dispatch_range_exits<T>(
    mut changes: MessageReader<AgentRangeChanged>,
    mut interactables: Query<(&mut T, &GlobalTransform, &Detector)>,
    mut services: InteractionServices,
) where
    T: Interactable + Component<Mutability = Mutable>,
{
    dispatch_range_changes(
        RangeTransition::Exited,
        &mut changes,
        &mut interactables,
        &mut services,
    );
}

pub fn dispatch_range_entries<T>(
    mut changes: MessageReader<AgentRangeChanged>,
    mut interactables: Query<(&mut T, &GlobalTransform, &Detector)>,
    mut services: InteractionServices,
) where
    T: Interactable + Component<Mutability = Mutable>,
{
    dispatch_range_changes(
        RangeTransition::Entered,
        &mut changes,
        &mut interactables,
        &mut services,
    );
}

/// Delivers `wanted` notifications to the interactable of type `T` on the detector's entity.
fn dispatch_range_changes<T>(
    wanted: RangeTransition,
    changes: &mut MessageReader<AgentRangeChanged>,
    interactables: &mut Query<(&mut T, &GlobalTransform, &Detector)>,
    services: &mut InteractionServices,
) where
    T: Interactable + Component<Mutability = Mutable>,
{
    for change in changes.read() {
        if change.transition != wanted {
            continue;
        }
        let Ok((mut interactable, transform, detector)) = interactables.get_mut(change.detector)
        else {
            continue;
        };

        services.with_context(
            change.detector,
            transform.translation(),
            detector.agent_position(),
            |ctx| match (change.transition, change.agent) {
                (RangeTransition::Entered, Some(agent)) => interactable.enter_range(agent, ctx),
                (RangeTransition::Entered, None) => {}
                (RangeTransition::Exited, _) => interactable.exit_range(ctx),
            },
        );
    }
}

pub fn poll_activation<T>(
    input: Res<ActivationInput>,
    mut interactables: Query<(Entity, &mut T, &GlobalTransform, Option<&Detector>)>,
    mut services: InteractionServices,
) where
    T: Interactable + Component<Mutability = Mutable>,
{
    if input.is_empty() {
        return;
    }

    for (entity, mut interactable, transform, detector) in &mut interactables {
        if !input.just_pressed(interactable.activation_key()) {
            continue;
        }

        let outcome = services.with_context(
            entity,
            transform.translation(),
            detector.and_then(Detector::agent_position),
            |ctx| interactable.poll_activation(true, ctx),
        );
        if outcome == Activation::Rejected {
            debug!(target: "interaction", "{}: activation rejected", entity);
        }
    }
}

/// Ticks every interactable of type `T` and despawns the ones that expired.
#[allow(clippy::type_complexity)]
pub fn advance_interactables<T>(
    mut commands: Commands,
    clock: Res<SimulationClock>,
    mut interactables: Query<(
        Entity,
        &mut T,
        &mut Transform,
        &GlobalTransform,
        Option<&Detector>,
    )>,
    mut services: InteractionServices,
) where
    T: Interactable + Component<Mutability = Mutable>,
{
    let delta = clock.delta_seconds();

    for (entity, mut interactable, mut transform, global, detector) in &mut interactables {
        let lifecycle = services.with_context(
            entity,
            global.translation(),
            detector.and_then(Detector::agent_position),
            |ctx| interactable.advance(&mut transform, delta, ctx),
        );

        if lifecycle == Lifecycle::Expired {
            debug!(target: "interaction", "{}: expired, despawning", entity);
            commands.entity(entity).despawn();
        }
    }
}

/// Lets dialogue NPCs follow a panel the UI closed on its own.
pub fn handle_dialogue_dismissals(
    mut dismissals: MessageReader<DialogueDismissed>,
    mut npcs: Query<(&mut DialogueNpc, &GlobalTransform, Option<&Detector>)>,
    mut services: InteractionServices,
) {
    for dismissal in dismissals.read() {
        let Ok((mut npc, transform, detector)) = npcs.get_mut(dismissal.owner) else {
            debug!(
                target: "interaction",
                "Dialogue dismissed for {} which is no longer an NPC",
                dismissal.owner
            );
            continue;
        };

        services.with_context(
            dismissal.owner,
            transform.translation(),
            detector.and_then(Detector::agent_position),
            |ctx| npc.acknowledge_dismissal(ctx),
        );
    }
}

/// Tells NPCs whose dialogue another NPC replaced that it is no longer on screen.
pub fn publish_displaced_dialogues(
    board: Option<ResMut<HintBoard>>,
    mut dismissed: MessageWriter<DialogueDismissed>,
) {
    let Some(mut board) = board else {
        return;
    };
    for owner in board.take_displaced() {
        debug!(target: "interaction", "Dialogue for {} replaced by another NPC", owner);
        dismissed.write(DialogueDismissed { owner });
    }
}

pub fn publish_inventory_changes(
    mut keys: ResMut<KeyInventory>,
    mut acquired: MessageWriter<KeyAcquired>,
    mut removed: MessageWriter<KeyRemoved>,
) {
    let changes = keys.drain_changes();
    if changes.is_empty() {
        return;
    }
    debug!(target: "interaction", "Inventory now holds {} keys", keys.len());
    for change in changes {
        match change {
            InventoryChange::Acquired(key) => {
                acquired.write(KeyAcquired { key });
            }
            InventoryChange::Removed(key) => {
                removed.write(KeyRemoved { key });
            }
        }
    }
}

#[cfg(feature = "interaction_debug")]
pub fn log_detector_states(
    time: Res<Time>,
    mut timer: Local<Option<Timer>>,
    detectors: Query<(Entity, &Detector)>,
) {
    let timer = timer.get_or_insert_with(|| Timer::from_seconds(1.0, TimerMode::Repeating));
    if !timer.tick(time.delta()).just_finished() {
        return;
    }

    for (entity, detector) in &detectors {
        debug!(
            target: "interaction",
            "{}: mode={:?} in_range={} overlaps={} agent={:?} enabled={}",
            entity,
            detector.mode(),
            detector.in_range(),
            detector.overlap_count(),
            detector.agent(),
            detector.is_enabled()
        );
    }
}
