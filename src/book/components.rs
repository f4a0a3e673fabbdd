//! Components and resources owned by the book module.
use bevy::prelude::*;
use bevy::window::CursorGrabMode;

/// Button in the book panel.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookControl {
    Previous,
    Next,
    Close,
}

/// Cursor state saved while the reader holds input capture.
#[derive(Resource, Debug, Default)]
pub struct CursorCapture {
    pub saved: Option<(bool, CursorGrabMode)>,
}
