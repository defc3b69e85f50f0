//! InteractionPlugin wires detection, dispatch and the built-in interactables into the app.
use bevy::{ecs::component::Mutable, prelude::*};

use crate::core::InteractionSet;

use super::{
    config::InteractionSettings,
    contract::Interactable,
    door::Door,
    events::{
        AgentRangeChanged, DialogueDismissed, InteractionCue, KeyAcquired, KeyRemoved,
        OverlapChanged,
    },
    hints::HintBoard,
    inventory::KeyInventory,
    npc::DialogueNpc,
    pickup::KeyPickup,
    systems::{
        advance_interactables, clear_activation_input, detect_volume_overlaps,
        disable_orphan_detectors, dispatch_range_entries, dispatch_range_exits,
        handle_dialogue_dismissals, initialise_interactables, poll_activation,
        publish_displaced_dialogues, publish_inventory_changes, resolve_detector_agents,
        route_overlaps, sample_activation_input, sample_proximity, ActivationInput,
        RangeDispatch,
    },
};

/// Activation slot of one registered interactable type; slots poll in registration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivationOrder(usize);

/// Number of interactable types registered so far.
#[derive(Resource, Debug, Default)]
struct InteractableRegistry {
    registered: usize,
}

/// Requires `CorePlugin` for the simulation clock and phase ordering.
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<InteractionSettings>() {
            app.insert_resource(InteractionSettings::load_or_default());
        }

        app.init_resource::<KeyInventory>()
            .init_resource::<HintBoard>()
            .init_resource::<ActivationInput>()
            .add_message::<AgentRangeChanged>()
            .add_message::<OverlapChanged>()
            .add_message::<InteractionCue>()
            .add_message::<KeyAcquired>()
            .add_message::<KeyRemoved>()
            .add_message::<DialogueDismissed>()
            .configure_sets(
                Update,
                (RangeDispatch::Exits, RangeDispatch::Entries)
                    .chain()
                    .in_set(InteractionSet::Dispatch),
            )
            .add_systems(Startup, log_interaction_settings)
            .add_systems(
                Update,
                (
                    (
                        sample_activation_input,
                        disable_orphan_detectors,
                        resolve_detector_agents,
                    )
                        .chain()
                        .in_set(InteractionSet::Discover),
                    (sample_proximity, detect_volume_overlaps, route_overlaps)
                        .chain()
                        .in_set(InteractionSet::Detect),
                    handle_dialogue_dismissals
                        .in_set(InteractionSet::Dispatch)
                        .after(RangeDispatch::Entries),
                    (
                        publish_displaced_dialogues,
                        publish_inventory_changes,
                        clear_activation_input,
                    )
                        .in_set(InteractionSet::Publish),
                ),
            )
            .register_interactable::<Door>()
            .register_interactable::<KeyPickup>()
            .register_interactable::<DialogueNpc>();

        #[cfg(feature = "interaction_debug")]
        app.add_systems(
            Update,
            super::systems::log_detector_states.in_set(InteractionSet::Publish),
        );
    }
}

/// Adds the generic detection, activation and tick systems for one interactable type.
///
/// Types poll the activation key in the order they were registered, so one press
/// reaching several objects resolves the same way every tick.
pub trait AppInteractableExt {
    fn register_interactable<T>(&mut self) -> &mut Self
    where
        T: Interactable + Component<Mutability = Mutable>;
}

impl AppInteractableExt for App {
    fn register_interactable<T>(&mut self) -> &mut Self
    where
        T: Interactable + Component<Mutability = Mutable>,
    {
        let slot = {
            let mut registry = self
                .world_mut()
                .get_resource_or_insert_with(InteractableRegistry::default);
            registry.registered += 1;
            ActivationOrder(registry.registered - 1)
        };
        self.configure_sets(Update, slot.in_set(InteractionSet::Activate));
        if let Some(previous) = slot.0.checked_sub(1) {
            self.configure_sets(Update, slot.after(ActivationOrder(previous)));
        }

        self.add_systems(
            Update,
            (
                initialise_interactables::<T>
                    .in_set(InteractionSet::Discover)
                    .before(resolve_detector_agents),
                dispatch_range_exits::<T>.in_set(RangeDispatch::Exits),
                dispatch_range_entries::<T>.in_set(RangeDispatch::Entries),
                poll_activation::<T>.in_set(slot),
                advance_interactables::<T>.in_set(InteractionSet::Animate),
            ),
        )
    }
}

fn log_interaction_settings(settings: Res<InteractionSettings>) {
    info!(
        target: "interaction",
        "InteractionPlugin initialised: key {:?}, {:?} detection within {:.1}m every {:.2}s",
        settings.activation_key,
        settings.detector.mode,
        settings.detector.range,
        settings.detector.check_interval
    );
}
