// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - client-side logic behind the screens.

pub mod conversation;
pub mod matching;
pub mod onboarding;

pub use conversation::Conversation;
pub use matching::{match_coach, score_coaches, CoachScores};
pub use onboarding::{Advance, CompletedOnboarding, OnboardingWizard, Retreat, Step, ValidationError};
