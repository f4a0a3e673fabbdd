// src/ui/hud/mod.rs
//
// Always-present overlays: proximity prompt, carried item, and the screen fade.

pub mod components;
pub mod systems;
