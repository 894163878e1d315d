//! AI-coach chat messages.

use super::coach::CoachId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Coach,
}

/// One message in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// History entry as sent to the backend.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub role: ChatRole,
    pub content: String,
}

/// Body of `POST /api/coach/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub coach: CoachId,
    pub conversation_history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_context: Option<Value>,
}

/// An action the coach proposes and the user must confirm.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PendingAction {
    pub id: String,
    pub kind: String,
    pub summary: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub pending_action: Option<PendingAction>,
}
