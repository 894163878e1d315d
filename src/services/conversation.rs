// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach chat transcript and pending-action confirmations.
//!
//! Replies are appended in the order they arrive, which may differ from the
//! order messages were sent. All reasoning happens on the backend.

use crate::models::chat::{
    ChatMessage, ChatRequest, ChatResponse, ChatRole, HistoryEntry, PendingAction,
};
use crate::models::coach::CoachId;
use chrono::Utc;
use serde_json::Value;

/// Number of previous messages sent with each chat request.
pub const HISTORY_LIMIT: usize = 10;

/// Conversation with one coach.
#[derive(Debug, Clone)]
pub struct Conversation {
    coach: CoachId,
    messages: Vec<ChatMessage>,
    pending: Option<PendingAction>,
    workout_context: Option<Value>,
}

impl Conversation {
    pub fn new(coach: CoachId) -> Self {
        Self {
            coach,
            messages: Vec::new(),
            pending: None,
            workout_context: None,
        }
    }

    pub fn coach(&self) -> CoachId {
        self.coach
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Action awaiting the user's confirmation, if any.
    pub fn pending_action(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// Attach the active workout so the coach can reference it.
    pub fn set_workout_context(&mut self, context: Option<Value>) {
        self.workout_context = context;
    }

    /// Record a user message and build the request for it.
    ///
    /// Returns None for blank input.
    pub fn compose(&mut self, text: &str) -> Option<ChatRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let start = self.messages.len().saturating_sub(HISTORY_LIMIT);
        let conversation_history = self.messages[start..]
            .iter()
            .map(|m| HistoryEntry {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: text.to_string(),
            sent_at: Utc::now(),
        });

        Some(ChatRequest {
            message: text.to_string(),
            coach: self.coach,
            conversation_history,
            workout_context: self.workout_context.clone(),
        })
    }

    /// Append the coach's reply. A new pending action replaces any older one.
    pub fn apply_response(&mut self, response: ChatResponse) {
        self.messages.push(ChatMessage {
            role: ChatRole::Coach,
            content: response.response,
            sent_at: Utc::now(),
        });

        if let Some(action) = response.pending_action {
            tracing::debug!(action_id = %action.id, kind = %action.kind, "Coach proposed an action");
            self.pending = Some(action);
        }
    }

    /// Accept the pending action, returning it for the caller to carry out.
    pub fn confirm_action(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Reject the pending action.
    pub fn dismiss_action(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}
