//! Fault taxonomy shared by every interaction subsystem.
//!
//! None of these are fatal. Callers log the fault where it is absorbed and the
//! affected operation degrades to a no-op.
use std::fmt;

/// Local degradations reported by the interaction core.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionFault {
    /// A collaborator (panel, transform, target point) was never supplied.
    MissingReference { what: &'static str },
    /// A page or line index fell outside its sequence and was clamped.
    InvalidIndex { index: usize, len: usize },
    /// The teleport arrival poll ran past its deadline.
    TimeoutExceeded { waited_seconds: f32 },
    /// The request arrived while the target was busy or already terminal.
    StateConflict {
        operation: &'static str,
        state: &'static str,
    },
}

impl InteractionFault {
    pub fn missing(what: &'static str) -> Self {
        Self::MissingReference { what }
    }

    pub fn invalid_index(index: usize, len: usize) -> Self {
        Self::InvalidIndex { index, len }
    }

    pub fn timeout(waited_seconds: f32) -> Self {
        Self::TimeoutExceeded { waited_seconds }
    }

    pub fn conflict(operation: &'static str, state: &'static str) -> Self {
        Self::StateConflict { operation, state }
    }

    /// Stable label used by telemetry records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingReference { .. } => "missing_reference",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::TimeoutExceeded { .. } => "timeout_exceeded",
            Self::StateConflict { .. } => "state_conflict",
        }
    }
}

impl fmt::Display for InteractionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference { what } => write!(f, "Missing reference: {}", what),
            Self::InvalidIndex { index, len } => {
                write!(f, "Index {} out of bounds for length {}", index, len)
            }
            Self::TimeoutExceeded { waited_seconds } => {
                write!(f, "Timed out after {:.2}s", waited_seconds)
            }
            Self::StateConflict { operation, state } => {
                write!(f, "Cannot {} while {}", operation, state)
            }
        }
    }
}

impl std::error::Error for InteractionFault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_detail() {
        let missing = InteractionFault::missing("teleport target");
        assert!(missing.to_string().contains("teleport target"));
        assert_eq!(missing.label(), "missing_reference");

        let index = InteractionFault::invalid_index(7, 3);
        assert_eq!(index.to_string(), "Index 7 out of bounds for length 3");

        let timeout = InteractionFault::timeout(1.0);
        assert!(timeout.to_string().contains("1.00s"));

        let conflict = InteractionFault::conflict("open book", "dialogue open");
        assert_eq!(conflict.to_string(), "Cannot open book while dialogue open");
        assert_eq!(conflict.label(), "state_conflict");
    }
}
