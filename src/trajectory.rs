//! Append-only per-step audit log (spec §4.9). Method names and truncation
//! semantics are grounded directly in
//! `original_source/backend/apps/agents/tests/test_trajectory.py`.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::events::{EventSink, PersistedEvent};

/// Every string field of a `TrajectoryEvent` is truncated to this length.
pub const MAX_PROMPT_CHARS: usize = 4000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrajectoryEvent {
    pub step_name: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub input_summary: String,
    #[serde(default)]
    pub output_summary: String,
    #[serde(default)]
    pub decision_rationale: String,
    #[serde(default)]
    pub metrics: Map<String, Value>,
    #[serde(default)]
    pub duration_ms: u64,
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_PROMPT_CHARS {
        s.to_string()
    } else {
        s.chars().take(MAX_PROMPT_CHARS).collect()
    }
}

impl TrajectoryEvent {
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            input_summary: String::new(),
            output_summary: String::new(),
            decision_rationale: String::new(),
            metrics: Map::new(),
            duration_ms: 0,
        }
    }

    pub fn with_input_summary(mut self, input_summary: impl Into<String>) -> Self {
        self.input_summary = input_summary.into();
        self
    }

    pub fn with_output_summary(mut self, output_summary: impl Into<String>) -> Self {
        self.output_summary = output_summary.into();
        self
    }

    pub fn with_decision_rationale(mut self, decision_rationale: impl Into<String>) -> Self {
        self.decision_rationale = decision_rationale.into();
        self
    }

    pub fn with_metrics(mut self, metrics: Map<String, Value>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Truncated wire form (`MAX_PROMPT_CHARS` per string field).
    pub fn to_dict(&self) -> Value {
        serde_json::json!({
            "step_name": self.step_name,
            "timestamp": self.timestamp,
            "input_summary": truncate(&self.input_summary),
            "output_summary": truncate(&self.output_summary),
            "decision_rationale": truncate(&self.decision_rationale),
            "metrics": self.metrics,
            "duration_ms": self.duration_ms,
        })
    }
}

struct Inner {
    correlation_id: String,
    events: Vec<TrajectoryEvent>,
    started_at: std::time::Instant,
}

/// Append-only recorder, shared via `Arc` so the composition root can call
/// `save` after the Loop returns while the Loop itself records during the run.
pub struct TrajectoryRecorder {
    inner: Mutex<Inner>,
}

impl TrajectoryRecorder {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                correlation_id: correlation_id.into(),
                events: Vec::new(),
                started_at: std::time::Instant::now(),
            }),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(String::new())
    }

    /// Records a step with freeform summaries/metrics; `timestamp` is
    /// auto-filled.
    pub fn record_step(
        &self,
        step_name: impl Into<String>,
        input_summary: impl Into<String>,
        output_summary: impl Into<String>,
        decision_rationale: impl Into<String>,
        metrics: Map<String, Value>,
        duration_ms: u64,
    ) {
        let event = TrajectoryEvent::new(step_name)
            .with_input_summary(input_summary)
            .with_output_summary(output_summary)
            .with_decision_rationale(decision_rationale)
            .with_metrics(metrics)
            .with_duration_ms(duration_ms);
        self.record(event);
    }

    pub fn record(&self, event: TrajectoryEvent) {
        self.inner.lock().unwrap().events.push(event);
    }

    /// A copy of the events recorded so far.
    pub fn events(&self) -> Vec<TrajectoryEvent> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn finalize(&self) -> Value {
        let inner = self.inner.lock().unwrap();
        serde_json::json!({
            "correlation_id": inner.correlation_id,
            "total_steps": inner.events.len(),
            "total_duration_ms": inner.started_at.elapsed().as_millis() as u64,
            "events": inner.events.iter().map(TrajectoryEvent::to_dict).collect::<Vec<_>>(),
        })
    }

    /// Best-effort: pushes the finalized trajectory through an `EventSink`.
    /// Failures are logged, never raised (spec §4.9).
    pub async fn save(&self, sink: &dyn EventSink, case_id: Option<&str>) {
        let payload = self.finalize();
        let correlation_id = self.inner.lock().unwrap().correlation_id.clone();
        let event = PersistedEvent::trajectory(correlation_id, payload, case_id);

        if let Err(err) = sink.append(event).await {
            tracing::warn!(error = %err, "failed to save trajectory event");
        }
    }
}
