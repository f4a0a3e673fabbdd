//! Player actor module - locomotion gated by the modal movement lock.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
