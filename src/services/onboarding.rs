// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Onboarding wizard state machine.
//!
//! The wizard walks a fixed list of steps. Moving forward requires the
//! current step's answer to pass validation; moving back is always allowed,
//! and leaving the first step backwards hands control to the login screen.
//! Entering the final step runs the coach matcher once and returns the
//! completed answers for registration. The wizard does no I/O.

use super::matching::match_coach;
use crate::models::api::RegistrationRequest;
use crate::models::coach::CoachId;
use crate::models::onboarding::{Equipment, Goal, OnboardingAnswers, WorkoutType};
use rand::Rng;
use serde::Serialize;

pub const NAME_MAX_CHARS: usize = 30;
pub const EXPLANATION_MAX_CHARS: usize = 100;
pub const TRAINING_DAYS_RANGE: (u8, u8) = (1, 7);
pub const SESSION_MINUTES_RANGE: (u16, u16) = (10, 180);
pub const AGE_RANGE: (u8, u8) = (13, 100);
pub const HEIGHT_CM_RANGE: (u16, u16) = (100, 250);
pub const WEIGHT_KG_RANGE: (f32, f32) = (30.0, 300.0);

/// Wizard steps, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Name,
    Goal,
    Gender,
    FitnessLevel,
    WorkoutType,
    Equipment,
    TrainingDays,
    SessionDuration,
    CoachingStyle,
    BodyMetrics,
    Complete,
}

impl Step {
    pub const ORDER: [Step; 11] = [
        Step::Name,
        Step::Goal,
        Step::Gender,
        Step::FitnessLevel,
        Step::WorkoutType,
        Step::Equipment,
        Step::TrainingDays,
        Step::SessionDuration,
        Step::CoachingStyle,
        Step::BodyMetrics,
        Step::Complete,
    ];

    pub const FIRST: Step = Step::Name;

    fn position(self) -> usize {
        Step::ORDER
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Step::ORDER.len() - 1)
    }

    /// Whether this step is shown for the answers given so far.
    pub fn is_applicable(self, answers: &OnboardingAnswers) -> bool {
        match self {
            // Bodyweight training needs no equipment.
            Step::Equipment => answers.workout_type != Some(WorkoutType::Bodyweight),
            _ => true,
        }
    }
}

/// Inline validation failure for the current step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Please tell us more about your {field}")]
    MissingExplanation { field: &'static str },
}

impl ValidationError {
    /// Answer field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MissingExplanation { field } => *field,
        }
    }
}

/// Check the answer(s) collected by `step`.
pub fn validate_step(step: Step, answers: &OnboardingAnswers) -> Result<(), ValidationError> {
    match step {
        Step::Name => {
            let name = answers.name.as_deref().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(ValidationError::Required { field: "name" });
            }
            if name.chars().count() > NAME_MAX_CHARS {
                return Err(ValidationError::TooLong {
                    field: "name",
                    max: NAME_MAX_CHARS,
                });
            }
            Ok(())
        }
        Step::Goal => match answers.goal {
            None => Err(ValidationError::Required { field: "goal" }),
            Some(Goal::Other) => require_explanation("goal", answers.goal_other.as_deref()),
            Some(_) => Ok(()),
        },
        Step::Gender => required("gender", answers.gender.is_some()),
        Step::FitnessLevel => required("fitness level", answers.fitness_level.is_some()),
        Step::WorkoutType => required("workout type", answers.workout_type.is_some()),
        Step::Equipment => match answers.equipment {
            None => Err(ValidationError::Required { field: "equipment" }),
            Some(Equipment::Other) => {
                require_explanation("equipment", answers.equipment_other.as_deref())
            }
            Some(_) => Ok(()),
        },
        Step::TrainingDays => in_range(
            "training days",
            answers.training_days.map(f64::from),
            TRAINING_DAYS_RANGE.0.into(),
            TRAINING_DAYS_RANGE.1.into(),
        ),
        Step::SessionDuration => in_range(
            "session length",
            answers.session_minutes.map(f64::from),
            SESSION_MINUTES_RANGE.0.into(),
            SESSION_MINUTES_RANGE.1.into(),
        ),
        Step::CoachingStyle => required("coaching style", answers.coaching_style.is_some()),
        Step::BodyMetrics => {
            let metrics = &answers.body_metrics;
            in_range(
                "age",
                metrics.age.map(f64::from),
                AGE_RANGE.0.into(),
                AGE_RANGE.1.into(),
            )?;
            in_range(
                "height",
                metrics.height_cm.map(f64::from),
                HEIGHT_CM_RANGE.0.into(),
                HEIGHT_CM_RANGE.1.into(),
            )?;
            in_range(
                "weight",
                metrics.weight_kg.map(f64::from),
                WEIGHT_KG_RANGE.0.into(),
                WEIGHT_KG_RANGE.1.into(),
            )
        }
        Step::Complete => Ok(()),
    }
}

fn required(field: &'static str, present: bool) -> Result<(), ValidationError> {
    if present {
        Ok(())
    } else {
        Err(ValidationError::Required { field })
    }
}

fn require_explanation(field: &'static str, text: Option<&str>) -> Result<(), ValidationError> {
    let text = text.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ValidationError::MissingExplanation { field });
    }
    if text.chars().count() > EXPLANATION_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field,
            max: EXPLANATION_MAX_CHARS,
        });
    }
    Ok(())
}

fn in_range(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    match value {
        None => Err(ValidationError::Required { field }),
        Some(v) if v.is_nan() || v < min || v > max => {
            Err(ValidationError::OutOfRange { field, min, max })
        }
        Some(_) => Ok(()),
    }
}

/// Answers plus matched coach, handed to registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedOnboarding {
    pub answers: OnboardingAnswers,
    pub coach: CoachId,
}

impl CompletedOnboarding {
    /// Registration body for the account being created.
    pub fn into_registration(
        self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> RegistrationRequest {
        RegistrationRequest {
            email: email.into(),
            password: password.into(),
            coach_id: self.coach,
            profile: self.answers,
        }
    }
}

/// Result of a successful `next`.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved(Step),
    Completed(CompletedOnboarding),
}

/// Result of `back`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved(Step),
    /// Back from the first step leaves onboarding for the login screen.
    ExitToLogin,
}

/// Onboarding wizard state.
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    step: Step,
    answers: OnboardingAnswers,
    matched: Option<CoachId>,
}

impl Default for OnboardingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self::with_answers(OnboardingAnswers::default())
    }

    /// Start at the first step with pre-filled answers (e.g. name from a social login).
    pub fn with_answers(answers: OnboardingAnswers) -> Self {
        Self {
            step: Step::FIRST,
            answers,
            matched: None,
        }
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn answers(&self) -> &OnboardingAnswers {
        &self.answers
    }

    /// Edit the answers. Any coach already matched is discarded.
    pub fn answers_mut(&mut self) -> &mut OnboardingAnswers {
        self.matched = None;
        &mut self.answers
    }

    /// Validation result for the current step, for inline display.
    pub fn validate_current(&self) -> Result<(), ValidationError> {
        validate_step(self.step, &self.answers)
    }

    pub fn can_advance(&self) -> bool {
        self.validate_current().is_ok()
    }

    /// (1-based index of the current step, number of question steps).
    pub fn progress(&self) -> (usize, usize) {
        let visible: Vec<Step> = Step::ORDER
            .into_iter()
            .filter(|s| *s != Step::Complete && s.is_applicable(&self.answers))
            .collect();
        let current = visible
            .iter()
            .position(|s| *s == self.step)
            .map_or(visible.len(), |i| i + 1);
        (current, visible.len())
    }

    /// Move to the next step if the current one validates.
    ///
    /// Reaching `Complete` matches a coach and returns the completed answers.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Advance, ValidationError> {
        if self.step == Step::Complete {
            return Ok(Advance::Completed(self.completed(rng)));
        }

        self.validate_current()?;

        let next = self.following(self.step);
        self.step = next;
        if next == Step::Complete {
            let completed = self.completed(rng);
            tracing::info!(coach = %completed.coach, "Onboarding complete");
            return Ok(Advance::Completed(completed));
        }

        Ok(Advance::Moved(next))
    }

    /// Move to the previous step.
    pub fn back(&mut self) -> Retreat {
        if self.step == Step::FIRST {
            return Retreat::ExitToLogin;
        }

        self.matched = None;
        self.step = self.preceding(self.step);
        Retreat::Moved(self.step)
    }

    fn following(&self, step: Step) -> Step {
        Step::ORDER[step.position() + 1..]
            .iter()
            .copied()
            .find(|s| s.is_applicable(&self.answers))
            .unwrap_or(Step::Complete)
    }

    fn preceding(&self, step: Step) -> Step {
        Step::ORDER[..step.position()]
            .iter()
            .rev()
            .copied()
            .find(|s| s.is_applicable(&self.answers))
            .unwrap_or(Step::FIRST)
    }

    /// Answers with fields from skipped steps removed.
    fn effective_answers(&self) -> OnboardingAnswers {
        let mut answers = self.answers.clone();
        if !Step::Equipment.is_applicable(&answers) {
            answers.equipment = None;
            answers.equipment_other = None;
        }
        if answers.goal != Some(Goal::Other) {
            answers.goal_other = None;
        }
        if answers.equipment != Some(Equipment::Other) {
            answers.equipment_other = None;
        }
        answers
    }

    fn completed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CompletedOnboarding {
        let answers = self.effective_answers();
        let coach = *self
            .matched
            .get_or_insert_with(|| match_coach(&answers, rng));
        CompletedOnboarding { answers, coach }
    }
}
