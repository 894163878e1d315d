// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walks the onboarding wizard the way the screens drive it.

use fitcoach_client::models::coach::CoachGender;
use fitcoach_client::models::onboarding::{
    BodyMetrics, CoachingStyle, Equipment, FitnessLevel, Gender, Goal, WorkoutType,
};
use fitcoach_client::services::{Advance, OnboardingWizard, Retreat, Step, ValidationError};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Fill in the answer for the wizard's current step.
fn answer_current(wizard: &mut OnboardingWizard) {
    let step = wizard.current_step();
    let answers = wizard.answers_mut();
    match step {
        Step::Name => answers.name = Some("Sam".to_string()),
        Step::Goal => answers.goal = Some(Goal::Endurance),
        Step::Gender => answers.gender = Some(Gender::Female),
        Step::FitnessLevel => answers.fitness_level = Some(FitnessLevel::Intermediate),
        Step::WorkoutType => answers.workout_type = Some(WorkoutType::Cardio),
        Step::Equipment => answers.equipment = Some(Equipment::HomeBasic),
        Step::TrainingDays => answers.training_days = Some(4),
        Step::SessionDuration => answers.session_minutes = Some(45),
        Step::CoachingStyle => answers.coaching_style = Some(CoachingStyle::Supportive),
        Step::BodyMetrics => {
            answers.body_metrics = BodyMetrics {
                age: Some(34),
                height_cm: Some(170),
                weight_kg: Some(68.5),
            }
        }
        Step::Complete => {}
    }
}

#[test]
fn test_name_step_blocks_until_valid() {
    let mut wizard = OnboardingWizard::new();
    let mut rng = rng();

    assert_eq!(wizard.current_step(), Step::Name);
    assert!(!wizard.can_advance());
    assert_eq!(
        wizard.next(&mut rng),
        Err(ValidationError::Required { field: "name" })
    );
    assert_eq!(wizard.current_step(), Step::Name);

    wizard.answers_mut().name = Some("   ".to_string());
    assert!(!wizard.can_advance());

    wizard.answers_mut().name = Some("x".repeat(31));
    assert!(matches!(
        wizard.validate_current(),
        Err(ValidationError::TooLong { max: 30, .. })
    ));

    wizard.answers_mut().name = Some("x".repeat(30));
    assert!(wizard.can_advance());

    wizard.answers_mut().name = Some("Sam".to_string());
    assert_eq!(wizard.next(&mut rng), Ok(Advance::Moved(Step::Goal)));
}

#[test]
fn test_full_walk_completes_with_coach() {
    let mut wizard = OnboardingWizard::new();
    let mut rng = rng();
    let mut visited = Vec::new();

    let completed = loop {
        visited.push(wizard.current_step());
        answer_current(&mut wizard);
        match wizard.next(&mut rng).expect("step should validate") {
            Advance::Moved(_) => {}
            Advance::Completed(completed) => break completed,
        }
    };

    assert_eq!(visited.len(), 10);
    assert_eq!(wizard.current_step(), Step::Complete);
    assert_eq!(completed.answers.name.as_deref(), Some("Sam"));
    // A female preference always lands on a female coach.
    assert_eq!(completed.coach.profile().gender, CoachGender::Female);

    // Asking again at the end returns the same match.
    match wizard.next(&mut StdRng::seed_from_u64(999)).unwrap() {
        Advance::Completed(again) => assert_eq!(again.coach, completed.coach),
        other => panic!("expected completion, got {other:?}"),
    }

    let registration = completed.into_registration("sam@example.com", "pw");
    let body = serde_json::to_value(&registration).unwrap();
    assert_eq!(body["email"], "sam@example.com");
    assert_eq!(body["profile"]["goal"], "endurance");
    assert_eq!(body["profile"]["bodyMetrics"]["heightCm"], 170);
}

#[test]
fn test_back_from_first_step_exits_to_login() {
    let mut wizard = OnboardingWizard::new();
    let mut rng = rng();

    assert_eq!(wizard.back(), Retreat::ExitToLogin);
    assert_eq!(wizard.current_step(), Step::Name);

    answer_current(&mut wizard);
    wizard.next(&mut rng).unwrap();
    assert_eq!(wizard.back(), Retreat::Moved(Step::Name));
    assert_eq!(wizard.back(), Retreat::ExitToLogin);
    // Answers survive navigation.
    assert_eq!(wizard.answers().name.as_deref(), Some("Sam"));
}

#[test]
fn test_bodyweight_skips_equipment() {
    let mut wizard = OnboardingWizard::new();
    let mut rng = rng();

    while wizard.current_step() != Step::WorkoutType {
        answer_current(&mut wizard);
        wizard.next(&mut rng).unwrap();
    }
    wizard.answers_mut().workout_type = Some(WorkoutType::Bodyweight);

    assert_eq!(wizard.next(&mut rng), Ok(Advance::Moved(Step::TrainingDays)));
    assert_eq!(wizard.back(), Retreat::Moved(Step::WorkoutType));
    assert_eq!(wizard.progress().1, 9);
}

#[test]
fn test_other_goal_requires_explanation() {
    let mut wizard = OnboardingWizard::new();
    let mut rng = rng();
    answer_current(&mut wizard);
    wizard.next(&mut rng).unwrap();

    wizard.answers_mut().goal = Some(Goal::Other);
    assert_eq!(
        wizard.next(&mut rng),
        Err(ValidationError::MissingExplanation { field: "goal" })
    );

    wizard.answers_mut().goal_other = Some("Train for a charity hike".to_string());
    assert_eq!(wizard.next(&mut rng), Ok(Advance::Moved(Step::Gender)));
}

#[test]
fn test_out_of_range_session_length_blocks() {
    let mut wizard = OnboardingWizard::new();
    let mut rng = rng();
    while wizard.current_step() != Step::SessionDuration {
        answer_current(&mut wizard);
        wizard.next(&mut rng).unwrap();
    }

    wizard.answers_mut().session_minutes = Some(5);
    let err = wizard.next(&mut rng).unwrap_err();
    assert_eq!(err.field(), "session length");
    assert_eq!(wizard.current_step(), Step::SessionDuration);

    wizard.answers_mut().session_minutes = Some(180);
    assert_eq!(wizard.next(&mut rng), Ok(Advance::Moved(Step::CoachingStyle)));
}

#[test]
fn test_progress_counts_visible_steps() {
    let mut wizard = OnboardingWizard::new();
    assert_eq!(wizard.progress(), (1, 10));

    answer_current(&mut wizard);
    wizard.next(&mut rng()).unwrap();
    assert_eq!(wizard.progress(), (2, 10));
}

#[test]
fn test_editing_on_complete_rematches_coach() {
    let mut wizard = OnboardingWizard::new();
    let mut rng = rng();
    let first = loop {
        answer_current(&mut wizard);
        if let Advance::Completed(completed) = wizard.next(&mut rng).unwrap() {
            break completed;
        }
    };
    assert_eq!(first.coach.profile().gender, CoachGender::Female);

    // Male plus answers that all favor Marcus.
    let answers = wizard.answers_mut();
    answers.gender = Some(Gender::Male);
    answers.goal = Some(Goal::LoseWeight);
    answers.workout_type = Some(WorkoutType::Hiit);
    answers.coaching_style = Some(CoachingStyle::Tough);

    match wizard.next(&mut rng).unwrap() {
        Advance::Completed(second) => {
            assert_eq!(second.answers.gender, Some(Gender::Male));
            assert_eq!(second.coach.profile().gender, CoachGender::Male);
        }
        other => panic!("expected completion, got {other:?}"),
    }
}
