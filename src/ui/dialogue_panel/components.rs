// src/ui/dialogue_panel/components.rs
//
// Components and layout settings for the dialogue panel.

use bevy::prelude::*;

/// Root node of the dialogue panel.
#[derive(Component, Debug)]
pub struct DialoguePanel;

/// Text node holding the speaker's name.
#[derive(Component, Debug)]
pub struct DialogueSpeakerLabel;

/// Text node holding the revealed part of the current line.
#[derive(Component, Debug)]
pub struct DialogueBodyLabel;

/// Resource containing layout settings for the dialogue panel.
#[derive(Resource, Debug)]
pub struct DialoguePanelSettings {
    /// Panel width as a share of the screen width (percent).
    pub width_percent: f32,

    /// Minimum panel height (pixels).
    pub min_height: f32,

    /// Padding inside panel (pixels).
    pub padding: f32,

    /// Border width (pixels).
    pub border_width: f32,

    /// Offset from bottom edge of screen (pixels).
    pub bottom_offset: f32,

    /// Font size for the speaker name (points).
    pub name_font_size: f32,

    /// Font size for dialogue text (points).
    pub text_font_size: f32,
}

impl Default for DialoguePanelSettings {
    fn default() -> Self {
        Self {
            width_percent: 60.0,
            min_height: 120.0,
            padding: 16.0,
            border_width: 2.0,
            bottom_offset: 24.0,
            name_font_size: 18.0,
            text_font_size: 20.0,
        }
    }
}
