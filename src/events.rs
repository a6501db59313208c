//! Outbound event persistence boundary (spec §4.9, §6). `EventSink` is the
//! seam a host application implements to route checkpoints/trajectories/
//! failures into its own storage; grounded in the teacher's
//! `coordinator/persistence.rs` JSON-event-log idiom, generalized to a trait.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// The three event kinds this crate ever emits, matching the wire strings
/// used by the originating system (`AGENT_CHECKPOINT`, `AGENT_TRAJECTORY`,
/// `AgentFailed`, per spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistedEventType {
    AgentCheckpoint,
    AgentTrajectory,
    AgentFailed,
}

impl fmt::Display for PersistedEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PersistedEventType::AgentCheckpoint => "AGENT_CHECKPOINT",
            PersistedEventType::AgentTrajectory => "AGENT_TRAJECTORY",
            PersistedEventType::AgentFailed => "AgentFailed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct PersistedEvent {
    pub event_type: PersistedEventType,
    pub correlation_id: String,
    pub case_id: Option<String>,
    pub payload: Value,
}

impl PersistedEvent {
    pub fn checkpoint(correlation_id: impl Into<String>, payload: Value, case_id: Option<&str>) -> Self {
        Self {
            event_type: PersistedEventType::AgentCheckpoint,
            correlation_id: correlation_id.into(),
            case_id: case_id.map(str::to_string),
            payload,
        }
    }

    pub fn trajectory(correlation_id: impl Into<String>, payload: Value, case_id: Option<&str>) -> Self {
        Self {
            event_type: PersistedEventType::AgentTrajectory,
            correlation_id: correlation_id.into(),
            case_id: case_id.map(str::to_string),
            payload,
        }
    }

    /// `payload` carries the `AgentFailed` shape: error kind name plus a
    /// truncated `Display` rendering (spec §6).
    pub fn failed(correlation_id: impl Into<String>, payload: Value, case_id: Option<&str>) -> Self {
        Self {
            event_type: PersistedEventType::AgentFailed,
            correlation_id: correlation_id.into(),
            case_id: case_id.map(str::to_string),
            payload,
        }
    }
}

/// Host-provided sink for checkpoints, trajectories, and failure events.
/// All three are best-effort: callers log and continue on error rather than
/// let persistence failures abort the research loop (§4.9).
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn append(&self, event: PersistedEvent) -> eyre::Result<()>;
}

/// An `EventSink` that drops everything; useful as a default when the host
/// application doesn't care about observability output.
pub struct NullEventSink;

#[async_trait]
impl EventSink for NullEventSink {
    async fn append(&self, _event: PersistedEvent) -> eyre::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_display_matches_wire_strings() {
        assert_eq!(PersistedEventType::AgentCheckpoint.to_string(), "AGENT_CHECKPOINT");
        assert_eq!(PersistedEventType::AgentTrajectory.to_string(), "AGENT_TRAJECTORY");
        assert_eq!(PersistedEventType::AgentFailed.to_string(), "AgentFailed");
    }

    #[tokio::test]
    async fn null_sink_always_succeeds() {
        let sink = NullEventSink;
        let event = PersistedEvent::checkpoint("c1", serde_json::json!({}), None);
        assert!(sink.append(event).await.is_ok());
    }
}
