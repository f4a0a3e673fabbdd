// src/ui/book_panel/systems.rs
//
// Systems for spawning the book panel and mirroring the reader into it.

use bevy::prelude::*;

use crate::book::{components::BookControl, reader::BookReader};

use super::components::{
    BookPageCounter, BookPageImage, BookPanel, BookPanelState, BookTitleLabel,
};

const PANEL_BACKGROUND: Color = Color::srgba(0.16, 0.12, 0.09, 0.97);
const BUTTON_BACKGROUND: Color = Color::srgba(0.18, 0.18, 0.22, 0.95);
const BUTTON_BORDER: Color = Color::srgb(0.4, 0.4, 0.45);
const TITLE_COLOR: Color = Color::srgb(0.95, 0.9, 0.75);
const PAGE_SIZE_PERCENT: f32 = 100.0;

/// Spawns the book panel once, hidden.
pub fn spawn_book_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(20.0),
                top: Val::Percent(8.0),
                width: Val::Percent(60.0),
                height: Val::Percent(84.0),
                padding: UiRect::all(Val::Px(16.0)),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND.with_alpha(0.0)),
            Visibility::Hidden,
            GlobalZIndex(10),
            BookPanel,
            Name::new("Book Panel"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(""),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(TITLE_COLOR),
                BookTitleLabel,
            ));

            panel
                .spawn((
                    Node {
                        flex_grow: 1.0,
                        width: Val::Percent(100.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    Name::new("Book Page Frame"),
                ))
                .with_children(|frame| {
                    frame.spawn((
                        Node {
                            width: Val::Percent(PAGE_SIZE_PERCENT),
                            height: Val::Percent(PAGE_SIZE_PERCENT),
                            ..default()
                        },
                        ImageNode::default(),
                        BookPageImage,
                    ));
                });

            panel
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(12.0),
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    spawn_control(row, BookControl::Previous, "< Prev");
                    row.spawn((
                        Text::new(""),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                        BookPageCounter,
                    ));
                    spawn_control(row, BookControl::Next, "Next >");
                    spawn_control(row, BookControl::Close, "Close");
                });
        });
}

fn spawn_control(parent: &mut ChildSpawnerCommands, control: BookControl, label: &str) {
    parent
        .spawn((
            Node {
                padding: UiRect::axes(Val::Px(12.0), Val::Px(6.0)),
                border: UiRect::all(Val::Px(1.5)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            Button,
            Interaction::None,
            BackgroundColor(BUTTON_BACKGROUND),
            BorderColor::from(BUTTON_BORDER),
            control,
            Name::new(format!("Book Button {:?}", control)),
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Applies the reader's panel fade, page flip, and button availability.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn update_book_panel(
    reader: Res<BookReader>,
    asset_server: Res<AssetServer>,
    mut state: ResMut<BookPanelState>,
    mut panels: Query<(&mut BackgroundColor, &mut Visibility), (With<BookPanel>, Without<BookControl>)>,
    mut titles: Query<&mut Text, (With<BookTitleLabel>, Without<BookPageCounter>)>,
    mut counters: Query<&mut Text, (With<BookPageCounter>, Without<BookTitleLabel>)>,
    mut pages: Query<(&mut ImageNode, &mut Node), With<BookPageImage>>,
    mut buttons: Query<(&BookControl, &mut BackgroundColor), Without<BookPanel>>,
) {
    let alpha = reader.panel_alpha();
    let showing = reader.captures_input();

    for (mut background, mut visibility) in &mut panels {
        background.0 = PANEL_BACKGROUND.with_alpha(alpha * 0.97);
        *visibility = if showing {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    if !showing {
        state.loaded_page = None;
        return;
    }

    for mut title in &mut titles {
        if title.0 != reader.title() {
            title.0 = reader.title().to_string();
        }
    }

    let counter = format!("{} / {}", reader.page_index() + 1, reader.page_count());
    for mut text in &mut counters {
        if text.0 != counter {
            text.0 = counter.clone();
        }
    }

    let displayed = reader.displayed_page().map(str::to_string);
    let reload = displayed != state.loaded_page;
    for (mut image, mut node) in &mut pages {
        if reload {
            image.image = match &displayed {
                Some(path) => asset_server.load(path.clone()),
                None => Handle::default(),
            };
        }
        image.color = Color::WHITE.with_alpha(reader.page_alpha() * alpha);
        let size = Val::Percent(PAGE_SIZE_PERCENT * reader.page_scale());
        node.width = size;
        node.height = size;
    }
    if reload {
        state.loaded_page = displayed;
    }

    for (control, mut background) in &mut buttons {
        let enabled = match control {
            BookControl::Previous => reader.has_previous() && !reader.is_flipping(),
            BookControl::Next => reader.has_next() && !reader.is_flipping(),
            BookControl::Close => reader.is_open(),
        };
        let strength = if enabled { 0.95 } else { 0.35 };
        background.0 = BUTTON_BACKGROUND.with_alpha(strength * alpha);
    }
}
