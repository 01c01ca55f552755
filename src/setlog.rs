//! Logged sets as they come back from a workout, and the batch sent to storage.

use serde::{Deserialize, Serialize};

/// A workout as performed, with the actual weight and outcome of every set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedWorkout {
    pub workout_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "workout_exercises")]
    pub exercises: Vec<LoggedExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedExercise {
    pub exercise_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub sets: Vec<LoggedSet>,
}

impl LoggedExercise {
    /// Name to show for this exercise, falling back to its id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.exercise_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedSet {
    pub set_id: String,
    pub reps: u32,
    pub weight: f64,
    pub success: bool,
}

/// The whole submission for one user, in the shape the store persists.
///
/// Built once from the logged workouts and owned outright, so later edits to
/// the caller's workouts cannot change what gets stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetLogBatch {
    pub user_id: String,
    pub workouts: Vec<WorkoutLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    pub workout_id: String,
    pub exercises: Vec<ExerciseLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub sets: Vec<SetLog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetLog {
    pub set_id: String,
    pub weight: f64,
    pub reps: u32,
    pub success: bool,
}

impl SetLogBatch {
    pub fn snapshot(user_id: &str, workouts: &[LoggedWorkout]) -> Self {
        Self {
            user_id: user_id.to_string(),
            workouts: workouts
                .iter()
                .map(|w| WorkoutLog {
                    workout_id: w.workout_id.clone(),
                    exercises: w
                        .exercises
                        .iter()
                        .map(|e| ExerciseLog {
                            exercise_id: e.exercise_id.clone(),
                            sets: e.sets.iter().map(SetLog::from).collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn set_count(&self) -> usize {
        self.workouts
            .iter()
            .flat_map(|w| &w.exercises)
            .map(|e| e.sets.len())
            .sum()
    }
}

impl From<&LoggedSet> for SetLog {
    fn from(s: &LoggedSet) -> Self {
        Self {
            set_id: s.set_id.clone(),
            weight: s.weight,
            reps: s.reps,
            success: s.success,
        }
    }
}

/// Shape problems that make a submission unusable, 1-based like the
/// programme validator. Checked before anything is sent to the store.
pub fn structural_problems(workouts: &[LoggedWorkout]) -> Vec<String> {
    let mut problems = Vec::new();

    if workouts.is_empty() {
        problems.push("Submission must contain at least one workout.".to_string());
    }

    for (w_idx, workout) in workouts.iter().enumerate() {
        let w = w_idx + 1;

        if workout.workout_id.trim().is_empty() {
            problems.push(format!("Workout {w} must have an id."));
        }
        if workout.exercises.is_empty() {
            problems.push(format!("Workout {w} must have at least one exercise."));
            continue;
        }

        for (e_idx, exercise) in workout.exercises.iter().enumerate() {
            let e = e_idx + 1;

            if exercise.exercise_id.trim().is_empty() {
                problems.push(format!("Exercise {e} in Workout {w} must be selected."));
            }
            if exercise.sets.is_empty() {
                problems.push(format!("Exercise {e} in Workout {w} must have at least one set."));
                continue;
            }

            for (s_idx, set) in exercise.sets.iter().enumerate() {
                let s = s_idx + 1;

                if set.reps == 0 {
                    problems.push(format!(
                        "Set {s} in Exercise {e} in Workout {w} must have a valid number of reps."
                    ));
                }
                // Successful sets carry the load they were lifted with.
                let weight_ok = set.weight.is_finite()
                    && if set.success { set.weight > 0.0 } else { set.weight >= 0.0 };
                if !weight_ok {
                    problems.push(format!(
                        "Set {s} in Exercise {e} in Workout {w} must have a valid weight."
                    ));
                }
            }
        }
    }

    problems
}
