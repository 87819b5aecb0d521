//! Agent responses and response batches.

use bizflow_core::catalogue::EventType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Urgency of a suggested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    /// Can wait.
    Low,
    /// Should be handled soon.
    Medium,
    /// Needs attention now.
    High,
}

/// A follow-up an agent recommends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedAction {
    /// Action kind, e.g. `send_reminder`.
    #[serde(rename = "type")]
    pub action_type: String,
    /// What to do.
    pub description: String,
    /// How urgent it is.
    pub priority: ActionPriority,
    /// Whether the action may run without human approval.
    #[serde(default)]
    pub auto_execute: bool,
}

/// How an agent's completion text was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// The text parsed as a structured reply.
    Structured,
    /// The text was kept verbatim as the analysis.
    RawText,
}

/// One agent's output for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// The agent that produced it.
    pub agent_id: String,
    /// Free-text analysis.
    pub analysis: String,
    /// Recommended follow-ups.
    pub suggested_actions: Vec<SuggestedAction>,
    /// Short observations.
    pub insights: Vec<String>,
    /// Structured or raw-text.
    pub mode: ResponseMode,
}

impl AgentResponse {
    /// A response that keeps `text` verbatim as the analysis.
    #[must_use]
    pub fn raw_text(agent_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            analysis: text.into(),
            suggested_actions: Vec::new(),
            insights: Vec::new(),
            mode: ResponseMode::RawText,
        }
    }
}

/// All agent responses produced for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBatch {
    /// The analysed event.
    pub event_id: Uuid,
    /// Its type.
    pub event_type: EventType,
    /// One response per agent that produced output, in table order.
    pub responses: Vec<AgentResponse>,
    /// When the batch was assembled.
    pub timestamp: DateTime<Utc>,
}
