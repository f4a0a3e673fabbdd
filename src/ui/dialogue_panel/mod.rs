// src/ui/dialogue_panel/mod.rs
//
// Dialogue panel showing the speaker and the typewriter text at the bottom of the screen.

pub mod components;
pub mod systems;
