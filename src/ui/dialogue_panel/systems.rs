// src/ui/dialogue_panel/systems.rs
//
// Systems for spawning the dialogue panel and mirroring the engine into it.

use bevy::prelude::*;

use crate::dialogue::engine::DialogueEngine;

use super::components::{
    DialogueBodyLabel, DialoguePanel, DialoguePanelSettings, DialogueSpeakerLabel,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.9);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const TEXT_COLOR: Color = Color::WHITE;
const NAME_COLOR: Color = Color::srgb(1.0, 0.9, 0.4); // Yellow/gold

/// Spawns the dialogue panel once, hidden.
pub fn spawn_dialogue_panel(mut commands: Commands, settings: Res<DialoguePanelSettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(settings.bottom_offset),
                left: Val::Percent((100.0 - settings.width_percent) / 2.0),
                width: Val::Percent(settings.width_percent),
                min_height: Val::Px(settings.min_height),
                padding: UiRect::all(Val::Px(settings.padding)),
                border: UiRect::all(Val::Px(settings.border_width)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR.with_alpha(0.0)),
            BorderColor::from(BORDER_COLOR.with_alpha(0.0)),
            Visibility::Hidden,
            DialoguePanel,
            Name::new("Dialogue Panel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.name_font_size,
                    ..default()
                },
                TextColor(NAME_COLOR.with_alpha(0.0)),
                DialogueSpeakerLabel,
            ));

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: settings.text_font_size,
                    ..default()
                },
                TextColor(TEXT_COLOR.with_alpha(0.0)),
                DialogueBodyLabel,
            ));
        });
}

/// Applies the engine's panel opacity, speaker, and revealed text.
#[allow(clippy::type_complexity)]
pub fn update_dialogue_panel(
    engine: Res<DialogueEngine>,
    mut panels: Query<
        (&mut BackgroundColor, &mut BorderColor, &mut Visibility),
        With<DialoguePanel>,
    >,
    mut speakers: Query<
        (&mut Text, &mut TextColor),
        (With<DialogueSpeakerLabel>, Without<DialogueBodyLabel>),
    >,
    mut bodies: Query<
        (&mut Text, &mut TextColor),
        (With<DialogueBodyLabel>, Without<DialogueSpeakerLabel>),
    >,
) {
    let alpha = engine.panel_alpha();

    for (mut background, mut border, mut visibility) in &mut panels {
        background.0 = BACKGROUND_COLOR.with_alpha(alpha * 0.9);
        *border = BorderColor::from(BORDER_COLOR.with_alpha(alpha));
        *visibility = if alpha > 0.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    for (mut text, mut color) in &mut speakers {
        if text.0 != engine.speaker() {
            text.0 = engine.speaker().to_string();
        }
        color.0 = NAME_COLOR.with_alpha(alpha);
    }

    for (mut text, mut color) in &mut bodies {
        let visible = engine.visible_text();
        if text.0 != visible {
            text.0 = visible.to_string();
        }
        color.0 = TEXT_COLOR.with_alpha(alpha);
    }
}
