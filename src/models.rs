use std::fmt::Display;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Role of whoever is authoring a programme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Athlete,
    Coach,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Athlete => "athlete",
            Self::Coach => "coach",
        };

        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "athlete" => Ok(Self::Athlete),
            "coach" => Ok(Self::Coach),
            other => Err(format!("unknown role `{other}` (expected athlete or coach)")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgrammeType {
    Personal,
    Team,
}

impl Display for ProgrammeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::Team => write!(f, "team"),
        }
    }
}

impl std::str::FromStr for ProgrammeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Self::Personal),
            "team" => Ok(Self::Team),
            other => Err(format!("unknown programme type `{other}`")),
        }
    }
}

/// A programme as authored, before it has been stored.
/// Workouts, exercises and sets keep the order they were written in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Programme {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProgrammeType,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,
    #[serde(default)]
    pub workout_exercises: Vec<WorkoutExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    #[serde(default)]
    pub exercise_id: Option<String>,
    #[serde(default)]
    pub exercise_order: u32,
    #[serde(default)]
    pub sets: Vec<TargetSet>,
}

/// Authoring-time set: how many reps, at what share of the athlete's max.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TargetSet {
    #[serde(default)]
    pub reps: Option<i64>,
    #[serde(default)]
    pub percentage: Option<f64>,
}

/// Response of a successful programme insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedProgramme {
    pub status: String,
    pub programme_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgrammeSummary {
    pub programme_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub team_id: Option<String>,
    pub workouts: i64,
    pub created_at: String,
}

/// A stored programme expanded down to its sets, with every id resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgrammeDetails {
    pub programme_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub team_id: Option<String>,
    pub workouts: Vec<WorkoutDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDetails {
    pub workout_id: String,
    pub name: String,
    pub exercises: Vec<ExerciseDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseDetails {
    pub exercise_id: String,
    pub name: String,
    pub sets: Vec<SetDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDetails {
    pub set_id: String,
    pub reps: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub exercise_id: String,
    pub name: String,
    pub primary_muscle: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    pub name: String,
    pub coach_id: Option<String>,
}

/// One training day of an exercise, aggregated over the logged sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub top_weight: f64,
    pub sets: i64,
    pub successful_sets: i64,
    pub total_reps: i64,
}

/// A target weight for an exercise at a rep count, with the current PR next to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub goal_id: String,
    pub exercise_id: String,
    pub exercise: String,
    pub rep_scheme: String,
    pub target_weight: f64,
    pub current_weight: Option<f64>,
}

impl Goal {
    pub fn is_met(&self) -> bool {
        self.current_weight
            .is_some_and(|w| w >= self.target_weight)
    }

    /// Share of the target already lifted, in percent, capped at 100.
    pub fn progress(&self) -> f64 {
        match self.current_weight {
            Some(w) if self.target_weight > 0.0 => (w / self.target_weight * 100.0).min(100.0),
            _ => 0.0,
        }
    }
}
