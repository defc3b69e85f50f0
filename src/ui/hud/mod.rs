// src/ui/hud/mod.rs
//
// HUD overlays: interaction prompt, owned keys, acquisition toast.

pub mod components;
pub mod systems;
