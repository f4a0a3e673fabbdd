//! Tunables for proximity, dialogue, book, and teleport behaviour.
use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_PATH: &str = "config/interaction.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawInteractionConfig {
    #[serde(default)]
    proximity: RawProximity,
    #[serde(default)]
    prompts: RawPrompts,
    #[serde(default)]
    dialogue: RawDialogue,
    #[serde(default)]
    book: RawBook,
    #[serde(default)]
    teleport: RawTeleport,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawProximity {
    hysteresis_margin: f32,
    prompt_fade_seconds: f32,
}

impl Default for RawProximity {
    fn default() -> Self {
        Self {
            hysteresis_margin: 0.25,
            prompt_fade_seconds: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawPrompts {
    interact: String,
    locked: String,
    talk: String,
    pickup: String,
    drop: String,
}

impl Default for RawPrompts {
    fn default() -> Self {
        Self {
            interact: "Press [E] to interact".to_string(),
            locked: "The door is locked".to_string(),
            talk: "Press [E] to talk".to_string(),
            pickup: "Press [F] to pick up".to_string(),
            drop: "Press [G] to drop".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawDialogue {
    chars_per_second: f32,
    min_line_seconds: f32,
    switch_delay_seconds: f32,
    fade_seconds: f32,
}

impl Default for RawDialogue {
    fn default() -> Self {
        Self {
            chars_per_second: 45.0,
            min_line_seconds: 1.0,
            switch_delay_seconds: 1.0,
            fade_seconds: 0.25,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawBook {
    panel_fade_seconds: f32,
    flip_phase_seconds: f32,
    flip_min_scale: f32,
}

impl Default for RawBook {
    fn default() -> Self {
        Self {
            panel_fade_seconds: 1.0 / 12.0,
            flip_phase_seconds: 0.08,
            flip_min_scale: 0.95,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTeleport {
    fade_out_seconds: f32,
    fade_in_seconds: f32,
    arrival_epsilon: f32,
    confirm_timeout_seconds: f32,
}

impl Default for RawTeleport {
    fn default() -> Self {
        Self {
            fade_out_seconds: 0.4,
            fade_in_seconds: 0.2,
            arrival_epsilon: 0.02,
            confirm_timeout_seconds: 1.0,
        }
    }
}

/// Runtime configuration derived from `config/interaction.toml`.
#[derive(Resource, Debug, Clone)]
pub struct InteractionSettings {
    pub proximity: ProximitySettings,
    pub prompts: PromptTexts,
    pub dialogue: DialogueSettings,
    pub book: BookSettings,
    pub teleport: TeleportSettings,
}

#[derive(Debug, Clone)]
pub struct ProximitySettings {
    pub hysteresis_margin: f32,
    pub prompt_fade_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct PromptTexts {
    pub interact: String,
    pub locked: String,
    pub talk: String,
    pub pickup: String,
    pub drop: String,
}

#[derive(Debug, Clone)]
pub struct DialogueSettings {
    pub chars_per_second: f32,
    pub min_line_seconds: f32,
    pub switch_delay_seconds: f32,
    pub fade_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct BookSettings {
    pub panel_fade_seconds: f32,
    pub flip_phase_seconds: f32,
    pub flip_min_scale: f32,
}

#[derive(Debug, Clone)]
pub struct TeleportSettings {
    pub fade_out_seconds: f32,
    pub fade_in_seconds: f32,
    pub arrival_epsilon: f32,
    pub confirm_timeout_seconds: f32,
}

impl InteractionSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_or_default(&raw),
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawInteractionConfig::default().into()
            }
        }
    }

    fn from_toml_or_default(raw: &str) -> Self {
        match toml::from_str::<RawInteractionConfig>(raw) {
            Ok(parsed) => parsed.into(),
            Err(err) => {
                warn!(
                    "Failed to parse {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                RawInteractionConfig::default().into()
            }
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        RawInteractionConfig::default().into()
    }
}

impl From<RawInteractionConfig> for InteractionSettings {
    fn from(value: RawInteractionConfig) -> Self {
        let proximity = ProximitySettings {
            hysteresis_margin: value.proximity.hysteresis_margin.max(0.0),
            prompt_fade_seconds: value.proximity.prompt_fade_seconds.max(0.0),
        };

        let defaults = RawPrompts::default();
        let prompts = PromptTexts {
            interact: non_empty_or(value.prompts.interact, defaults.interact),
            locked: non_empty_or(value.prompts.locked, defaults.locked),
            talk: non_empty_or(value.prompts.talk, defaults.talk),
            pickup: non_empty_or(value.prompts.pickup, defaults.pickup),
            drop: non_empty_or(value.prompts.drop, defaults.drop),
        };

        let dialogue = DialogueSettings {
            // At least one character per second, so a line always finishes.
            chars_per_second: value.dialogue.chars_per_second.max(1.0),
            min_line_seconds: value.dialogue.min_line_seconds.max(0.0),
            switch_delay_seconds: value.dialogue.switch_delay_seconds.max(0.0),
            fade_seconds: value.dialogue.fade_seconds.max(0.0),
        };

        let book = BookSettings {
            panel_fade_seconds: value.book.panel_fade_seconds.max(0.0),
            flip_phase_seconds: value.book.flip_phase_seconds.max(0.0),
            flip_min_scale: value.book.flip_min_scale.clamp(0.0, 1.0),
        };

        let teleport = TeleportSettings {
            fade_out_seconds: value.teleport.fade_out_seconds.max(0.0),
            fade_in_seconds: value.teleport.fade_in_seconds.max(0.0),
            arrival_epsilon: value.teleport.arrival_epsilon.max(f32::EPSILON),
            confirm_timeout_seconds: value.teleport.confirm_timeout_seconds.max(0.0),
        };

        Self {
            proximity,
            prompts,
            dialogue,
            book,
            teleport,
        }
    }
}

fn non_empty_or(value: String, fallback: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let settings = InteractionSettings::default();
        assert_eq!(settings.proximity.hysteresis_margin, 0.25);
        assert_eq!(settings.teleport.arrival_epsilon, 0.02);
        assert_eq!(settings.teleport.confirm_timeout_seconds, 1.0);
        assert_eq!(settings.dialogue.min_line_seconds, 1.0);
        assert_eq!(settings.prompts.drop, "Press [G] to drop");
    }

    #[test]
    fn partial_toml_overrides_and_sanitises() {
        let settings = InteractionSettings::from_toml_or_default(
            r#"
            [proximity]
            hysteresis_margin = -3.0

            [dialogue]
            chars_per_second = 0.0
            fade_seconds = 0.5

            [prompts]
            locked = "   "
            "#,
        );

        assert_eq!(settings.proximity.hysteresis_margin, 0.0);
        assert_eq!(settings.dialogue.chars_per_second, 1.0);
        assert_eq!(settings.dialogue.fade_seconds, 0.5);
        assert_eq!(settings.dialogue.switch_delay_seconds, 1.0);
        assert_eq!(settings.prompts.locked, "The door is locked");
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let settings = InteractionSettings::from_toml_or_default("[book\nbroken");
        assert_eq!(settings.book.flip_phase_seconds, 0.08);
    }
}
