//! InteractionPlugin registers the proximity registry, activation dispatch, and teleports.
use bevy::prelude::*;

use crate::core::{config::InteractionSettings, InteractionSet};

use super::{
    carry::CarryState,
    components::InteractableArena,
    events::{
        BookRequested, DialogueRequested, InteractableActivated, InteractionFaulted,
        ModalTransitioned, OverlapBegan, OverlapEnded,
    },
    registry::{ProximityPrompt, ProximityRegistry},
    systems::{
        apply_overlap_messages, detect_trigger_overlaps, drive_teleport, handle_activation_input,
        handle_carry_input, resolve_active_interactable, tick_screen_fader,
    },
    telemetry::{
        flush_interaction_telemetry_log, record_interaction_telemetry, report_interaction_summary,
        InteractionTelemetry, InteractionTelemetryLog,
    },
    teleport::{ScreenFader, TeleportController},
};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<InteractionSettings>()
            .cloned()
            .unwrap_or_else(InteractionSettings::load_or_default);

        app.insert_resource(ProximityRegistry::new(
            settings.proximity.hysteresis_margin,
        ))
        .insert_resource(ScreenFader::from_settings(&settings.teleport))
        .init_resource::<InteractableArena>()
        .init_resource::<CarryState>()
        .init_resource::<ProximityPrompt>()
        .init_resource::<TeleportController>()
        .init_resource::<InteractionTelemetry>()
        .init_resource::<InteractionTelemetryLog>()
        .add_message::<OverlapBegan>()
        .add_message::<OverlapEnded>()
        .add_message::<DialogueRequested>()
        .add_message::<BookRequested>()
        .add_message::<InteractableActivated>()
        .add_message::<InteractionFaulted>()
        .add_message::<ModalTransitioned>()
        .add_systems(
            Update,
            (
                (detect_trigger_overlaps, apply_overlap_messages)
                    .chain()
                    .in_set(InteractionSet::Overlap),
                resolve_active_interactable.in_set(InteractionSet::Proximity),
                (handle_activation_input, handle_carry_input)
                    .chain()
                    .in_set(InteractionSet::Activation),
                (tick_screen_fader, drive_teleport)
                    .chain()
                    .in_set(InteractionSet::Modal),
                (record_interaction_telemetry, flush_interaction_telemetry_log)
                    .chain()
                    .after(InteractionSet::Presentation),
            ),
        )
        .add_systems(Last, report_interaction_summary);

        info!(
            "InteractionPlugin ready (hysteresis margin {:.2})",
            settings.proximity.hysteresis_margin
        );
    }
}
