// src/ui/book_panel/components.rs

use bevy::prelude::*;

/// Root node of the book panel.
#[derive(Component, Debug)]
pub struct BookPanel;

#[derive(Component, Debug)]
pub struct BookTitleLabel;

/// Image node showing the displayed page.
#[derive(Component, Debug)]
pub struct BookPageImage;

#[derive(Component, Debug)]
pub struct BookPageCounter;

/// Page image currently loaded into the panel, to avoid reloading every tick.
#[derive(Resource, Debug, Default)]
pub struct BookPanelState {
    pub loaded_page: Option<String>,
}
