// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the client.

pub mod api;
pub mod chat;
pub mod coach;
pub mod onboarding;

pub use api::{AuthResponse, RegistrationRequest, UserProfile};
pub use chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole, PendingAction};
pub use coach::{catalog, CoachId, CoachProfile, DEFAULT_COACH};
pub use onboarding::OnboardingAnswers;
