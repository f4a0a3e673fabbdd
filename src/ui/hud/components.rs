// src/ui/hud/components.rs
//
// Components and resources for the prompt, carried-item HUD, and fade overlay.

use bevy::prelude::*;

use crate::{core::transition::TransitionSlot, interaction::registry::PromptText};

/// Root node of the proximity prompt.
#[derive(Component, Debug)]
pub struct PromptPanel;

/// Text node inside the prompt panel.
#[derive(Component, Debug)]
pub struct PromptLabel;

/// Root node of the carried-item HUD.
#[derive(Component, Debug)]
pub struct CarriedItemHud;

/// Text node naming the carried item.
#[derive(Component, Debug)]
pub struct CarriedItemLabel;

/// Full-screen black overlay driven by the screen fader.
#[derive(Component, Debug)]
pub struct FadeOverlay;

/// Prompt opacity and the text it last showed.
///
/// Fading out keeps the old text on screen until the panel is transparent.
#[derive(Resource, Debug)]
pub struct PromptFade {
    alpha: TransitionSlot<f32>,
    target: f32,
    shown: String,
}

impl PromptFade {
    /// Follows `prompt`, returning the opacity to apply this tick.
    pub fn update(&mut self, prompt: &PromptText, delta_seconds: f32, fade_seconds: f32) -> f32 {
        let target = if prompt.is_visible() { 1.0 } else { 0.0 };
        if target != self.target {
            self.target = target;
            self.alpha.start(target, fade_seconds);
        }
        if let Some(text) = prompt.text() {
            if self.shown != text {
                self.shown = text.to_string();
            }
        }
        self.alpha.tick(delta_seconds);
        self.alpha.value()
    }

    pub fn shown(&self) -> &str {
        &self.shown
    }
}

impl Default for PromptFade {
    fn default() -> Self {
        Self {
            alpha: TransitionSlot::new(0.0),
            target: 0.0,
            shown: String::new(),
        }
    }
}
