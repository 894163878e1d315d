//! Onboarding answers collected by the wizard.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    BuildMuscle,
    Endurance,
    Mobility,
    GeneralFitness,
    /// Requires `goal_other` to explain
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    NonBinary,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Hiit,
    Yoga,
    Bodyweight,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    FullGym,
    HomeBasic,
    None,
    /// Requires `equipment_other` to explain
    Other,
}

/// Motivation style the user wants from their coach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingStyle {
    Tough,
    Supportive,
    Analytical,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetrics {
    pub age: Option<u8>,
    pub height_cm: Option<u16>,
    pub weight_kg: Option<f32>,
}

/// Answers gathered across the onboarding steps.
///
/// Every field is optional; a missing field means "no preference".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingAnswers {
    pub name: Option<String>,
    pub goal: Option<Goal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_other: Option<String>,
    pub gender: Option<Gender>,
    pub fitness_level: Option<FitnessLevel>,
    pub workout_type: Option<WorkoutType>,
    pub equipment: Option<Equipment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_other: Option<String>,
    pub training_days: Option<u8>,
    pub session_minutes: Option<u16>,
    pub coaching_style: Option<CoachingStyle>,
    #[serde(default)]
    pub body_metrics: BodyMetrics,
}
