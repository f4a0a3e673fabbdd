// src/ui/mod.rs
//
// UI module providing screen-space presentation for the interaction core.
//
// Current features:
// - Proximity prompt, carried-item HUD, and the teleport fade overlay
// - Dialogue panel with typewriter text
// - Book panel with page image and paging buttons
//
// Presentation systems only read core state; nothing here feeds back into it.

pub mod book_panel;
pub mod dialogue_panel;
pub mod hud;
pub mod plugin;

pub use plugin::UiPlugin;
