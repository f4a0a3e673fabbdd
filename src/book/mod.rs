//! Book reader module - paged reading with exclusive input capture.
pub mod components;
pub mod plugin;
pub mod reader;
pub mod systems;

pub use plugin::BookPlugin;
