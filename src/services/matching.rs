// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach matching for the end of onboarding.
//!
//! Every coach starts at zero. Each answered category adds a fixed bonus to
//! the coaches in that category, then a small random jitter is added per
//! coach so identical answers do not always land on the same coach. The
//! highest score wins; on a tie the coach earlier in catalog order wins.
//!
//! The weights are a tuning heuristic. The gender bonus must stay above
//! `MAX_JITTER` so a stated gender preference is never overridden by noise.

use crate::models::coach::{catalog, CoachGender, CoachId, COACH_COUNT, DEFAULT_COACH};
use crate::models::onboarding::{
    CoachingStyle, Equipment, FitnessLevel, Gender, Goal, OnboardingAnswers, WorkoutType,
};
use rand::Rng;

const GENDER_BONUS: u32 = 6;
const GOAL_BONUS: u32 = 4;
const WORKOUT_TYPE_BONUS: u32 = 3;
const FITNESS_LEVEL_BONUS: u32 = 2;
const EQUIPMENT_BONUS: u32 = 2;
const COACHING_STYLE_BONUS: u32 = 2;

/// Upper bound (inclusive) of the per-coach random jitter.
pub const MAX_JITTER: u32 = 2;

/// Per-coach scores for one matching run, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachScores {
    scores: [u32; COACH_COUNT],
    signal: bool,
}

impl CoachScores {
    fn new() -> Self {
        Self {
            scores: [0; COACH_COUNT],
            signal: false,
        }
    }

    fn award(&mut self, coaches: &[CoachId], bonus: u32) {
        if coaches.is_empty() {
            return;
        }
        self.signal = true;
        for coach in coaches {
            self.scores[coach.index()] += bonus;
        }
    }

    pub fn get(&self, coach: CoachId) -> u32 {
        self.scores[coach.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CoachId, u32)> + '_ {
        CoachId::ALL.into_iter().zip(self.scores.iter().copied())
    }

    /// Whether any answer matched a scoring rule.
    pub fn any_signal(&self) -> bool {
        self.signal
    }

    /// Highest-scoring coach; the first in catalog order wins a tie.
    pub fn best(&self) -> CoachId {
        let mut best = CoachId::ALL[0];
        let mut best_score = self.scores[0];
        for (coach, score) in self.iter().skip(1) {
            if score > best_score {
                best = coach;
                best_score = score;
            }
        }
        best
    }

    /// Copy of these scores with `0..=MAX_JITTER` added to each coach.
    pub fn with_jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut jittered = self.clone();
        for score in jittered.scores.iter_mut() {
            *score += rng.gen_range(0..=MAX_JITTER);
        }
        jittered
    }
}

/// Deterministic scoring of the answers (no jitter).
pub fn score_coaches(answers: &OnboardingAnswers) -> CoachScores {
    let mut scores = CoachScores::new();

    if let Some(gender) = answers.gender {
        scores.award(&coaches_for_gender(gender), GENDER_BONUS);
    }
    if let Some(goal) = answers.goal {
        scores.award(coaches_for_goal(goal), GOAL_BONUS);
    }
    if let Some(workout_type) = answers.workout_type {
        scores.award(coaches_for_workout_type(workout_type), WORKOUT_TYPE_BONUS);
    }
    if let Some(level) = answers.fitness_level {
        scores.award(coaches_for_level(level), FITNESS_LEVEL_BONUS);
    }
    if let Some(equipment) = answers.equipment {
        scores.award(coaches_for_equipment(equipment), EQUIPMENT_BONUS);
    }
    if let Some(style) = answers.coaching_style {
        scores.award(coaches_for_style(style), COACHING_STYLE_BONUS);
    }

    scores
}

/// Pick a coach for the given answers.
///
/// Never fails: answers with no usable signal get [`DEFAULT_COACH`].
pub fn match_coach<R: Rng + ?Sized>(answers: &OnboardingAnswers, rng: &mut R) -> CoachId {
    let scores = score_coaches(answers);
    if !scores.any_signal() {
        tracing::debug!(coach = %DEFAULT_COACH, "No matching signal, using default coach");
        return DEFAULT_COACH;
    }

    let coach = scores.with_jitter(rng).best();
    tracing::debug!(coach = %coach, score = scores.get(coach), "Coach matched");
    coach
}

fn coaches_for_gender(gender: Gender) -> Vec<CoachId> {
    let wanted = match gender {
        Gender::Female => CoachGender::Female,
        Gender::Male => CoachGender::Male,
        Gender::NonBinary | Gender::PreferNotToSay => return Vec::new(),
    };
    catalog()
        .iter()
        .filter(|profile| profile.gender == wanted)
        .map(|profile| profile.id)
        .collect()
}

fn coaches_for_goal(goal: Goal) -> &'static [CoachId] {
    match goal {
        Goal::LoseWeight => &[CoachId::Marcus, CoachId::Sofia],
        Goal::BuildMuscle => &[CoachId::Leo, CoachId::Maya],
        Goal::Endurance => &[CoachId::Sofia],
        Goal::Mobility => &[CoachId::Ava],
        Goal::GeneralFitness => &[CoachId::Ava, CoachId::Kai],
        Goal::Other => &[],
    }
}

fn coaches_for_workout_type(workout_type: WorkoutType) -> &'static [CoachId] {
    match workout_type {
        WorkoutType::Strength => &[CoachId::Maya, CoachId::Leo],
        WorkoutType::Cardio => &[CoachId::Sofia, CoachId::Marcus],
        WorkoutType::Hiit => &[CoachId::Marcus],
        WorkoutType::Yoga => &[CoachId::Ava],
        WorkoutType::Bodyweight => &[CoachId::Kai],
        WorkoutType::Mixed => &[],
    }
}

fn coaches_for_level(level: FitnessLevel) -> &'static [CoachId] {
    match level {
        FitnessLevel::Beginner => &[CoachId::Ava, CoachId::Kai],
        FitnessLevel::Intermediate => &[CoachId::Maya, CoachId::Sofia],
        FitnessLevel::Advanced => &[CoachId::Leo, CoachId::Marcus],
    }
}

fn coaches_for_equipment(equipment: Equipment) -> &'static [CoachId] {
    match equipment {
        Equipment::FullGym => &[CoachId::Leo, CoachId::Maya],
        Equipment::HomeBasic => &[CoachId::Marcus, CoachId::Sofia],
        Equipment::None => &[CoachId::Kai, CoachId::Ava],
        Equipment::Other => &[],
    }
}

fn coaches_for_style(style: CoachingStyle) -> &'static [CoachId] {
    match style {
        CoachingStyle::Tough => &[CoachId::Marcus, CoachId::Leo],
        CoachingStyle::Supportive => &[CoachId::Ava, CoachId::Sofia],
        CoachingStyle::Analytical => &[CoachId::Maya, CoachId::Kai],
    }
}
