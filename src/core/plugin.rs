//! CorePlugin wires the scaled simulation clock and the per-frame interaction schedule.
use bevy::prelude::*;
use std::time::Duration;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
const PAUSE_KEY: KeyCode = KeyCode::KeyP;

/// Ordered phases every interaction tick runs through.
///
/// Range notifications produced in `Detect` are dispatched before `Activate`
/// polls the activation key, so an agent can interact on the tick it enters.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionSet {
    /// Input sampling, agent resolution and spawn-time initialisation.
    Discover,
    /// Proximity sampling and overlap routing.
    Detect,
    /// Delivery of enter/exit and dismissal notifications to interactables.
    Dispatch,
    /// Activation key polling.
    Activate,
    /// Per-object timers and interpolation.
    Animate,
    /// Outbound notifications and end-of-tick cleanup.
    Publish,
}

/// Scaled frame delta shared by every tick-accumulated timer.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    paused: bool,
    last_scaled_delta: Duration,
    elapsed: Duration,
}

impl SimulationClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: time_scale.max(MIN_TIME_SCALE),
            paused: false,
            last_scaled_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Freezes every interaction timer until resumed. A paused tick reports a zero delta.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn delta_seconds(&self) -> f32 {
        self.last_scaled_delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn tick(&mut self, real_delta: Duration) {
        self.last_scaled_delta = if self.paused {
            Duration::ZERO
        } else {
            real_delta.mul_f32(self.time_scale)
        };
        self.elapsed += self.last_scaled_delta;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Registers the simulation clock and orders the interaction phases.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::with_time_scale(DEFAULT_TIME_SCALE)
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .configure_sets(
                Update,
                (
                    InteractionSet::Discover,
                    InteractionSet::Detect,
                    InteractionSet::Dispatch,
                    InteractionSet::Activate,
                    InteractionSet::Animate,
                    InteractionSet::Publish,
                )
                    .chain(),
            )
            .add_systems(Startup, log_startup_time_scale)
            .add_systems(
                Update,
                (toggle_simulation_pause, update_simulation_clock)
                    .chain()
                    .before(InteractionSet::Discover),
            );
    }
}

fn toggle_simulation_pause(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut clock: ResMut<SimulationClock>,
) {
    if !keyboard.is_some_and(|keyboard| keyboard.just_pressed(PAUSE_KEY)) {
        return;
    }
    let paused = !clock.is_paused();
    clock.set_paused(paused);
    info!(
        "Simulation {} at {:.1}s",
        if paused { "paused" } else { "resumed" },
        clock.elapsed().as_secs_f32()
    );
}

fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn log_startup_time_scale(clock: Res<SimulationClock>) {
    info!(
        "CorePlugin initialised with time scale: {:.3} (paused: {})",
        clock.time_scale(),
        clock.is_paused()
    );
}
