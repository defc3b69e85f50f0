// src/ui/dialogue_panel/mod.rs
//
// Dialogue panel module showing the dialogue an NPC opened on the hint board.

pub mod components;
pub mod systems;
