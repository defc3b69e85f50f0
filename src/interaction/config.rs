use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use super::{contract::Interactable, detector::DetectionMode, errors::InteractionError};

const CONFIG_PATH: &str = "config/interaction.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawInteractionConfig {
    #[serde(default)]
    input: RawInput,
    #[serde(default)]
    detector: RawDetector,
    #[serde(default)]
    door: RawDoor,
    #[serde(default)]
    pickup: RawPickup,
    #[serde(default)]
    npc: RawNpc,
    #[serde(default)]
    ui: RawUi,
    #[serde(default)]
    audio: RawAudio,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawInput {
    activation_key: String,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            activation_key: "F".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDetector {
    mode: DetectionMode,
    range: f32,
    check_interval: f32,
    trigger_size: [f32; 3],
}

impl Default for RawDetector {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Proximity,
            range: 3.0,
            check_interval: 0.2,
            trigger_size: [3.0, 2.0, 3.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDoor {
    open_angle_degrees: f32,
    rotation_speed: f32,
    auto_close: bool,
    auto_close_delay: f32,
    open_clip: Option<String>,
    close_clip: Option<String>,
    locked_clip: Option<String>,
}

impl Default for RawDoor {
    fn default() -> Self {
        Self {
            open_angle_degrees: 90.0,
            rotation_speed: 3.0,
            auto_close: true,
            auto_close_delay: 3.0,
            open_clip: None,
            close_clip: None,
            locked_clip: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPickup {
    despawn_delay: f32,
    spin_degrees_per_second: f32,
    float_amplitude: f32,
    float_speed: f32,
    spin_axis: [f32; 3],
}

impl Default for RawPickup {
    fn default() -> Self {
        Self {
            despawn_delay: 0.1,
            spin_degrees_per_second: 50.0,
            float_amplitude: 0.2,
            float_speed: 1.0,
            spin_axis: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawNpc {
    auto_close_distance: f32,
}

impl Default for RawNpc {
    fn default() -> Self {
        Self {
            auto_close_distance: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawUi {
    show_hints: bool,
    acquisition_message: String,
    acquisition_seconds: f32,
}

impl Default for RawUi {
    fn default() -> Self {
        Self {
            show_hints: true,
            acquisition_message: "Acquired!".to_string(),
            acquisition_seconds: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawAudio {
    cue_volume: f32,
}

impl Default for RawAudio {
    fn default() -> Self {
        Self { cue_volume: 0.5 }
    }
}

/// Runtime configuration derived from `config/interaction.toml`.
#[derive(Resource, Debug, Clone)]
pub struct InteractionSettings {
    pub activation_key: KeyCode,
    pub detector: DetectorSettings,
    pub door: DoorSettings,
    pub pickup: PickupSettings,
    pub npc: NpcSettings,
    pub ui: UiSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub mode: DetectionMode,
    pub range: f32,
    pub check_interval: f32,
    pub trigger_size: Vec3,
}

#[derive(Debug, Clone)]
pub struct DoorSettings {
    pub open_angle_degrees: f32,
    pub rotation_speed: f32,
    pub auto_close: bool,
    pub auto_close_delay: f32,
    pub open_clip: Option<String>,
    pub close_clip: Option<String>,
    pub locked_clip: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PickupSettings {
    pub despawn_delay: f32,
    pub spin_degrees_per_second: f32,
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub spin_axis: Vec3,
}

#[derive(Debug, Clone)]
pub struct NpcSettings {
    pub auto_close_distance: f32,
}

#[derive(Debug, Clone)]
pub struct UiSettings {
    /// Whether interactables push prompts to the hint channel at all.
    pub show_hints: bool,
    pub acquisition_message: String,
    pub acquisition_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct AudioSettings {
    /// Volume stamped on every interaction cue, 0..=1.
    pub cue_volume: f32,
}

impl InteractionSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawInteractionConfig::default().into()
            }
        }
    }

    /// Applies the shared prompt and cue options to a freshly built interactable.
    pub fn configure<T: Interactable>(&self, mut interactable: T) -> T {
        let base = interactable
            .base()
            .clone()
            .with_hints_enabled(self.ui.show_hints)
            .with_cue_volume(self.audio.cue_volume);
        *interactable.base_mut() = base;
        interactable
    }

    fn from_toml_str(raw: &str) -> Self {
        match toml::from_str::<RawInteractionConfig>(raw) {
            Ok(parsed) => parsed.into(),
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawInteractionConfig::default().into()
            }
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        RawInteractionConfig::default().into()
    }
}

impl Default for DoorSettings {
    fn default() -> Self {
        InteractionSettings::default().door
    }
}

impl Default for PickupSettings {
    fn default() -> Self {
        InteractionSettings::default().pickup
    }
}

impl From<RawInteractionConfig> for InteractionSettings {
    fn from(value: RawInteractionConfig) -> Self {
        let activation_key = match parse_key_code(&value.input.activation_key) {
            Ok(key) => key,
            Err(err) => {
                warn!("{}. Using F.", err);
                KeyCode::KeyF
            }
        };

        let range = value.detector.range.max(0.0);
        let detector = DetectorSettings {
            mode: value.detector.mode,
            range,
            check_interval: value.detector.check_interval.max(0.0),
            trigger_size: Vec3::from_array(value.detector.trigger_size).abs(),
        };

        let door = DoorSettings {
            open_angle_degrees: value.door.open_angle_degrees.clamp(-180.0, 180.0),
            rotation_speed: value.door.rotation_speed.max(0.0),
            auto_close: value.door.auto_close,
            auto_close_delay: value.door.auto_close_delay.max(0.0),
            open_clip: value.door.open_clip,
            close_clip: value.door.close_clip,
            locked_clip: value.door.locked_clip,
        };

        let pickup = PickupSettings {
            despawn_delay: value.pickup.despawn_delay.max(0.0),
            spin_degrees_per_second: value.pickup.spin_degrees_per_second,
            float_amplitude: value.pickup.float_amplitude.max(0.0),
            float_speed: value.pickup.float_speed.max(0.0),
            spin_axis: Vec3::from_array(value.pickup.spin_axis)
                .try_normalize()
                .unwrap_or(Vec3::Y),
        };

        // Dialogue must stay open at least as far as the agent can be detected.
        let npc = NpcSettings {
            auto_close_distance: value.npc.auto_close_distance.max(range),
        };

        let ui = UiSettings {
            show_hints: value.ui.show_hints,
            acquisition_message: value.ui.acquisition_message,
            acquisition_seconds: value.ui.acquisition_seconds.max(0.1),
        };

        let audio = AudioSettings {
            cue_volume: value.audio.cue_volume.clamp(0.0, 1.0),
        };

        Self {
            activation_key,
            detector,
            door,
            pickup,
            npc,
            ui,
            audio,
        }
    }
}

/// Parses single letters, digits and a few named keys, case-insensitively.
pub fn parse_key_code(name: &str) -> Result<KeyCode, InteractionError> {
    let trimmed = name.trim();
    let upper = trimmed.to_ascii_uppercase();
    let key = match upper.as_str() {
        "A" => KeyCode::KeyA,
        "B" => KeyCode::KeyB,
        "C" => KeyCode::KeyC,
        "D" => KeyCode::KeyD,
        "E" => KeyCode::KeyE,
        "F" => KeyCode::KeyF,
        "G" => KeyCode::KeyG,
        "H" => KeyCode::KeyH,
        "I" => KeyCode::KeyI,
        "J" => KeyCode::KeyJ,
        "K" => KeyCode::KeyK,
        "L" => KeyCode::KeyL,
        "M" => KeyCode::KeyM,
        "N" => KeyCode::KeyN,
        "O" => KeyCode::KeyO,
        "P" => KeyCode::KeyP,
        "Q" => KeyCode::KeyQ,
        "R" => KeyCode::KeyR,
        "S" => KeyCode::KeyS,
        "T" => KeyCode::KeyT,
        "U" => KeyCode::KeyU,
        "V" => KeyCode::KeyV,
        "W" => KeyCode::KeyW,
        "X" => KeyCode::KeyX,
        "Y" => KeyCode::KeyY,
        "Z" => KeyCode::KeyZ,
        "0" => KeyCode::Digit0,
        "1" => KeyCode::Digit1,
        "2" => KeyCode::Digit2,
        "3" => KeyCode::Digit3,
        "4" => KeyCode::Digit4,
        "5" => KeyCode::Digit5,
        "6" => KeyCode::Digit6,
        "7" => KeyCode::Digit7,
        "8" => KeyCode::Digit8,
        "9" => KeyCode::Digit9,
        "SPACE" => KeyCode::Space,
        "ENTER" | "RETURN" => KeyCode::Enter,
        "TAB" => KeyCode::Tab,
        _ => return Err(InteractionError::unknown_activation_key(trimmed)),
    };
    Ok(key)
}
