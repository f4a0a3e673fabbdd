// src/ui/hud/systems.rs
//
// Systems for the prompt panel, carried-item HUD, and fade overlay.

use bevy::prelude::*;

use crate::{
    core::{config::InteractionSettings, plugin::SimulationClock},
    dialogue::engine::DialogueEngine,
    interaction::{carry::CarryState, registry::ProximityPrompt, teleport::ScreenFader},
};

use super::components::{
    CarriedItemHud, CarriedItemLabel, FadeOverlay, PromptFade, PromptLabel, PromptPanel,
};

const PROMPT_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.08, 0.8);
const PROMPT_TEXT: Color = Color::WHITE;
const HUD_BACKGROUND: Color = Color::srgba(0.12, 0.12, 0.15, 0.85);
const HUD_TEXT: Color = Color::srgb(0.9, 0.85, 0.6);

/// Spawns the prompt, carried-item HUD, and fade overlay.
pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Percent(22.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Name::new("Prompt Row"),
        ))
        .with_children(|row| {
            row.spawn((
                Node {
                    padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                    ..default()
                },
                BackgroundColor(PROMPT_BACKGROUND.with_alpha(0.0)),
                PromptPanel,
                Name::new("Prompt Panel"),
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new(""),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                    TextColor(PROMPT_TEXT.with_alpha(0.0)),
                    PromptLabel,
                ));
            });
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                right: Val::Px(16.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(HUD_BACKGROUND),
            Visibility::Hidden,
            CarriedItemHud,
            Name::new("Carried Item HUD"),
        ))
        .with_children(|hud| {
            hud.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(HUD_TEXT),
                CarriedItemLabel,
            ));
        });

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::BLACK.with_alpha(0.0)),
        GlobalZIndex(100),
        FadeOverlay,
        Name::new("Fade Overlay"),
    ));
}

/// Fades the prompt toward the registry's prompt, gated by the dialogue.
#[allow(clippy::type_complexity)]
pub fn update_prompt_panel(
    clock: Res<SimulationClock>,
    settings: Res<InteractionSettings>,
    prompt: Res<ProximityPrompt>,
    dialogue: Res<DialogueEngine>,
    mut fade: ResMut<PromptFade>,
    mut panels: Query<&mut BackgroundColor, With<PromptPanel>>,
    mut labels: Query<(&mut Text, &mut TextColor), With<PromptLabel>>,
) {
    let alpha = fade.update(
        &prompt.current,
        clock.real_secs(),
        settings.proximity.prompt_fade_seconds,
    ) * dialogue.prompt_gate();

    for mut background in &mut panels {
        background.0 = PROMPT_BACKGROUND.with_alpha(alpha * 0.8);
    }

    for (mut text, mut color) in &mut labels {
        if text.0 != fade.shown() {
            text.0 = fade.shown().to_string();
        }
        color.0 = PROMPT_TEXT.with_alpha(alpha);
    }
}

/// Shows what the actor carries unless the dialogue suppresses the HUD.
pub fn update_carried_item_hud(
    carry: Res<CarryState>,
    dialogue: Res<DialogueEngine>,
    mut huds: Query<&mut Visibility, With<CarriedItemHud>>,
    mut labels: Query<&mut Text, With<CarriedItemLabel>>,
) {
    let carried = carry.carried();
    let visible = carried.is_some() && !dialogue.suppresses_sibling_panel();

    for mut visibility in &mut huds {
        *visibility = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    if let Some(item) = carried {
        let label = format!("Carrying: {}", item.display_name);
        for mut text in &mut labels {
            if text.0 != label {
                text.0 = label.clone();
            }
        }
    }
}

/// Copies the screen fader's opacity onto the overlay.
pub fn update_fade_overlay(
    fader: Res<ScreenFader>,
    mut overlays: Query<&mut BackgroundColor, With<FadeOverlay>>,
) {
    let Ok(mut background) = overlays.single_mut() else {
        if fader.is_fading() {
            debug!(target: "teleport", "Screen fade running without an overlay node");
        }
        return;
    };
    background.0 = Color::BLACK.with_alpha(fader.alpha());
}
