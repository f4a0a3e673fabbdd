// src/ui/book_panel/mod.rs
//
// Centred book panel: title, page image, page counter, and paging buttons.

pub mod components;
pub mod systems;
