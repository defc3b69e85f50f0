// src/ui/mod.rs
//
// UI module providing the screen-space side of the interaction hint channel.
//
// Current features:
// - Interaction hint panel (mirrors the HintBoard prompt)
// - Dialogue panel with close button and Escape dismissal
// - Key status line and the "Acquired!" toast

pub mod dialogue_panel;
pub mod hud;
pub mod plugin;

pub use plugin::UiPlugin;
