//! Telemetry storage for activations, modal transitions, and absorbed faults.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::Serialize;

use crate::core::{errors::InteractionFault, modal::ModalKind};

use super::{
    components::InteractableId,
    events::{InteractableActivated, InteractionFaulted, ModalTransitioned},
};

const DEFAULT_INTERACTION_LOG_PATH: &str = "logs/interaction_history.jsonl";

const DEFAULT_INTERACTION_TELEMETRY_CAPACITY: usize = 64;

/// Rolling log of recent interaction records.
#[derive(Resource, Debug)]
pub struct InteractionTelemetry {
    capacity: usize,
    records: VecDeque<InteractionRecord>,
}

impl InteractionTelemetry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::new(),
        }
    }

    pub fn push(&mut self, record: InteractionRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-kind counts over the records still held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetrySummary {
    pub activations: usize,
    pub modal_transitions: usize,
    pub faults: usize,
}

impl InteractionTelemetry {
    pub fn summary(&self) -> TelemetrySummary {
        self.records()
            .fold(TelemetrySummary::default(), |mut summary, record| {
                match record.event {
                    InteractionTelemetryEvent::Activated { .. } => summary.activations += 1,
                    InteractionTelemetryEvent::Modal { .. } => summary.modal_transitions += 1,
                    InteractionTelemetryEvent::Fault { .. } => summary.faults += 1,
                }
                summary
            })
    }
}

impl Default for InteractionTelemetry {
    fn default() -> Self {
        Self::new(DEFAULT_INTERACTION_TELEMETRY_CAPACITY)
    }
}

/// Single telemetry entry.
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub occurred_at_seconds: f64,
    pub event: InteractionTelemetryEvent,
}

#[derive(Debug, Clone)]
pub enum InteractionTelemetryEvent {
    Activated {
        interactable: InteractableId,
        outcome: &'static str,
    },
    Modal {
        kind: ModalKind,
        opened: bool,
    },
    Fault {
        source: &'static str,
        fault: InteractionFault,
    },
}

/// Records activations, modal transitions, and faults into both sinks.
pub fn record_interaction_telemetry(
    time: Res<Time>,
    mut telemetry: ResMut<InteractionTelemetry>,
    mut activations: MessageReader<InteractableActivated>,
    mut modals: MessageReader<ModalTransitioned>,
    mut faults: MessageReader<InteractionFaulted>,
    mut log: ResMut<InteractionTelemetryLog>,
) {
    let now = time.elapsed_secs_f64();

    for event in activations.read() {
        let record = InteractionRecord {
            occurred_at_seconds: now,
            event: InteractionTelemetryEvent::Activated {
                interactable: event.interactable,
                outcome: event.outcome,
            },
        };
        log.push(&record);
        telemetry.push(record);
    }

    for event in modals.read() {
        let record = InteractionRecord {
            occurred_at_seconds: now,
            event: InteractionTelemetryEvent::Modal {
                kind: event.kind,
                opened: event.opened,
            },
        };
        log.push(&record);
        telemetry.push(record);
    }

    for event in faults.read() {
        let record = InteractionRecord {
            occurred_at_seconds: now,
            event: InteractionTelemetryEvent::Fault {
                source: event.source,
                fault: event.fault.clone(),
            },
        };
        log.push(&record);
        telemetry.push(record);
    }
}

/// Pending records waiting to be appended to the JSON-lines history file.
#[derive(Resource, Debug)]
pub struct InteractionTelemetryLog {
    output_path: PathBuf,
    pending: Vec<InteractionRecord>,
}

impl InteractionTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &InteractionRecord) {
        self.pending.push(record.clone());
    }

    fn ensure_directory(&self) -> std::io::Result<()> {
        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        self.ensure_directory()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;

        for record in std::mem::take(&mut self.pending) {
            let serialisable: SerializableInteractionRecord = record.into();
            serde_json::to_writer(&mut file, &serialisable)?;
            file.write_all(b"\n")?;
        }

        file.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }
}

impl Default for InteractionTelemetryLog {
    fn default() -> Self {
        Self::new(DEFAULT_INTERACTION_LOG_PATH)
    }
}

/// Flushes pending records, logging a warning if persistence fails.
pub fn flush_interaction_telemetry_log(mut log: ResMut<InteractionTelemetryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            "Failed to persist interaction telemetry to {:?}: {}",
            log.path(),
            err
        );
    }
}

/// On exit, reports what the rolling log still holds and flushes the history file.
pub fn report_interaction_summary(
    mut exits: MessageReader<AppExit>,
    telemetry: Res<InteractionTelemetry>,
    mut log: ResMut<InteractionTelemetryLog>,
) {
    if exits.read().next().is_none() {
        return;
    }

    let summary = telemetry.summary();
    info!(
        "Interaction session ended: {} recent record(s) ({} activations, {} modal transitions, {} faults)",
        telemetry.len(),
        summary.activations,
        summary.modal_transitions,
        summary.faults
    );
    if let Err(err) = log.flush() {
        warn!(
            "Failed to persist interaction telemetry to {:?}: {}",
            log.path(),
            err
        );
    }
}

#[derive(Serialize)]
struct SerializableInteractionRecord {
    occurred_at_seconds: f64,
    event: SerializableInteractionEvent,
}

impl From<InteractionRecord> for SerializableInteractionRecord {
    fn from(value: InteractionRecord) -> Self {
        Self {
            occurred_at_seconds: value.occurred_at_seconds,
            event: value.event.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum SerializableInteractionEvent {
    Activated {
        interactable: String,
        outcome: String,
    },
    Modal {
        modal: ModalKind,
        opened: bool,
    },
    Fault {
        source: String,
        fault_kind: String,
        message: String,
    },
}

impl From<InteractionTelemetryEvent> for SerializableInteractionEvent {
    fn from(value: InteractionTelemetryEvent) -> Self {
        match value {
            InteractionTelemetryEvent::Activated {
                interactable,
                outcome,
            } => Self::Activated {
                interactable: interactable.to_string(),
                outcome: outcome.to_string(),
            },
            InteractionTelemetryEvent::Modal { kind, opened } => Self::Modal {
                modal: kind,
                opened,
            },
            InteractionTelemetryEvent::Fault { source, fault } => Self::Fault {
                source: source.to_string(),
                fault_kind: fault.label().to_string(),
                message: fault.to_string(),
            },
        }
    }
}
