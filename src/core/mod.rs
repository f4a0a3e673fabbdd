//! Core services shared by every interaction subsystem: clock, settings, input,
//! modal coordination, timed transitions, and the fault taxonomy.
pub mod config;
pub mod errors;
pub mod input;
pub mod modal;
pub mod plugin;
pub mod transition;

pub use plugin::{CorePlugin, InteractionSet};
