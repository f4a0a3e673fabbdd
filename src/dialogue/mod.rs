//! Dialogue module hosting the typewriter engine and its systems.
pub mod engine;
pub mod plugin;
pub mod systems;

pub use plugin::DialoguePlugin;
