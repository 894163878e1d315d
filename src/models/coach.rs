// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a coach persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachId {
    Maya,
    Leo,
    Sofia,
    Marcus,
    Ava,
    Kai,
}

/// Number of coaches in the catalog.
pub const COACH_COUNT: usize = 6;

/// Coach used when onboarding answers give no usable signal.
pub const DEFAULT_COACH: CoachId = CoachId::Ava;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachGender {
    Female,
    Male,
}

/// Static catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct CoachProfile {
    pub id: CoachId,
    pub name: &'static str,
    pub gender: CoachGender,
    pub specialty: &'static str,
    pub tagline: &'static str,
}

static CATALOG: [CoachProfile; COACH_COUNT] = [
    CoachProfile {
        id: CoachId::Maya,
        name: "Maya",
        gender: CoachGender::Female,
        specialty: "Strength & powerlifting",
        tagline: "Lift heavy, move well, track every rep.",
    },
    CoachProfile {
        id: CoachId::Leo,
        name: "Leo",
        gender: CoachGender::Male,
        specialty: "Hypertrophy",
        tagline: "Structured volume, steady progress.",
    },
    CoachProfile {
        id: CoachId::Sofia,
        name: "Sofia",
        gender: CoachGender::Female,
        specialty: "Running & endurance",
        tagline: "Build the engine one easy mile at a time.",
    },
    CoachProfile {
        id: CoachId::Marcus,
        name: "Marcus",
        gender: CoachGender::Male,
        specialty: "HIIT & fat loss",
        tagline: "Short sessions, no excuses.",
    },
    CoachProfile {
        id: CoachId::Ava,
        name: "Ava",
        gender: CoachGender::Female,
        specialty: "Mobility & foundations",
        tagline: "Start where you are and keep showing up.",
    },
    CoachProfile {
        id: CoachId::Kai,
        name: "Kai",
        gender: CoachGender::Male,
        specialty: "Calisthenics",
        tagline: "Your body is the only gym you need.",
    },
];

/// All coach profiles, in catalog order.
pub fn catalog() -> &'static [CoachProfile] {
    &CATALOG
}

impl CoachId {
    /// Every id, in catalog order. Ties during matching go to the earlier id.
    pub const ALL: [CoachId; COACH_COUNT] = [
        CoachId::Maya,
        CoachId::Leo,
        CoachId::Sofia,
        CoachId::Marcus,
        CoachId::Ava,
        CoachId::Kai,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CoachId::Maya => "maya",
            CoachId::Leo => "leo",
            CoachId::Sofia => "sofia",
            CoachId::Marcus => "marcus",
            CoachId::Ava => "ava",
            CoachId::Kai => "kai",
        }
    }

    pub fn profile(self) -> &'static CoachProfile {
        // CATALOG is laid out in the same order as ALL.
        &CATALOG[self.index()]
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CoachId::Maya => 0,
            CoachId::Leo => 1,
            CoachId::Sofia => 2,
            CoachId::Marcus => 3,
            CoachId::Ava => 4,
            CoachId::Kai => 5,
        }
    }

    /// Parse an id coming from the backend or a deep link.
    /// Unknown ids fall back to [`DEFAULT_COACH`] so onboarding never breaks.
    pub fn parse_or_default(raw: &str) -> CoachId {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(coach = raw, "Unknown coach id, using default");
            DEFAULT_COACH
        })
    }
}

impl fmt::Display for CoachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown coach id: {0}")]
pub struct UnknownCoach(pub String);

impl FromStr for CoachId {
    type Err = UnknownCoach;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoachId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCoach(s.to_string()))
    }
}
