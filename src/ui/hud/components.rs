// src/ui/hud/components.rs
//
// Components for the HUD overlays.

use std::time::Duration;

use bevy::prelude::*;

/// Root node of the interaction prompt.
#[derive(Component, Debug, Default)]
pub struct HintPanel;

/// Text node inside the prompt.
#[derive(Component, Debug, Default)]
pub struct HintText;

/// Text node listing the owned keys.
#[derive(Component, Debug, Default)]
pub struct KeyStatusText;

/// Short-lived message shown when a key is acquired.
#[derive(Component, Debug)]
pub struct AcquisitionToast {
    /// Counts down the visible time; `None` until the first key arrives.
    lifetime: Option<Timer>,

    /// Duration of fade-out effect (stored for fade calculation).
    fade_duration: f32,
}

impl AcquisitionToast {
    pub fn new(fade_duration: f32) -> Self {
        Self {
            lifetime: None,
            fade_duration: fade_duration.max(0.0),
        }
    }

    /// Shows the toast again for `seconds`.
    pub fn restart(&mut self, seconds: f32) {
        self.lifetime = Some(Timer::from_seconds(seconds.max(0.0), TimerMode::Once));
    }

    pub fn tick(&mut self, delta: Duration) {
        if let Some(lifetime) = self.lifetime.as_mut() {
            lifetime.tick(delta);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.lifetime.as_ref().map_or(true, Timer::is_finished)
    }

    /// Calculate the alpha fade value (1.0 = fully visible, 0.0 = transparent).
    ///
    /// Fades out during the final `fade_duration` seconds of lifetime.
    pub fn fade_alpha(&self) -> f32 {
        let Some(lifetime) = self.lifetime.as_ref().filter(|timer| !timer.is_finished()) else {
            return 0.0;
        };
        let remaining = lifetime.remaining_secs();
        if remaining < self.fade_duration {
            remaining / self.fade_duration
        } else {
            1.0
        }
    }
}
