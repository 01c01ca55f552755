//! Structural and role checks run on a programme before it is stored.

use crate::models::{Programme, ProgrammeType, Role, TargetSet};

/// Check `programme` as authored by someone with `role`.
///
/// Every problem found is returned, in the order it was found, so the author
/// can fix them all at once. An empty list means the programme can be stored.
/// Positions in the messages are 1-based within their parent.
pub fn validate_programme(programme: &Programme, role: Option<Role>) -> Vec<String> {
    let mut errors = Vec::new();

    if programme.name.trim().is_empty() {
        errors.push("Programme must have a name.".to_string());
    }

    match role {
        Some(Role::Athlete) => {
            if programme.kind != ProgrammeType::Personal {
                errors.push("Athletes can only create personal programmes.".to_string());
            }
            if programme.team_id.is_some() {
                errors.push("Athletes cannot select a team.".to_string());
            }
        }
        Some(Role::Coach) => {
            if !is_present(programme.team_id.as_deref()) {
                errors.push("Coaches must select a team.".to_string());
            }
        }
        None => {}
    }

    if programme.workouts.is_empty() {
        errors.push("Programme must have at least one workout.".to_string());
        return errors;
    }

    for (w_idx, workout) in programme.workouts.iter().enumerate() {
        let w = w_idx + 1;

        if workout.name.trim().is_empty() {
            errors.push(format!("Workout {w} must have a name."));
        }

        if workout.workout_exercises.is_empty() {
            errors.push(format!("Workout {w} must have at least one exercise."));
            continue;
        }

        for (e_idx, exercise) in workout.workout_exercises.iter().enumerate() {
            let e = e_idx + 1;

            if !is_present(exercise.exercise_id.as_deref()) {
                errors.push(format!("Exercise {e} in Workout {w} must be selected."));
            }

            if exercise.sets.is_empty() {
                errors.push(format!("Exercise {e} in Workout {w} must have at least one set."));
                continue;
            }

            for (s_idx, set) in exercise.sets.iter().enumerate() {
                check_set(set, s_idx + 1, e, w, &mut errors);
            }
        }
    }

    errors
}

fn check_set(set: &TargetSet, s: usize, e: usize, w: usize, errors: &mut Vec<String>) {
    if !set.reps.is_some_and(|r| r > 0) {
        errors.push(format!(
            "Set {s} in Exercise {e} in Workout {w} must have a valid number of reps."
        ));
    }
    // NaN fails the comparison and is rejected with the nulls.
    if !set.percentage.is_some_and(|p| p > 0.0) {
        errors.push(format!(
            "Set {s} in Exercise {e} in Workout {w} must have a valid percentage."
        ));
    }
}

fn is_present(id: Option<&str>) -> bool {
    id.is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Workout, WorkoutExercise};

    fn set(reps: Option<i64>, percentage: Option<f64>) -> TargetSet {
        TargetSet { reps, percentage }
    }

    fn exercise(id: Option<&str>, sets: Vec<TargetSet>) -> WorkoutExercise {
        WorkoutExercise {
            exercise_id: id.map(str::to_string),
            exercise_order: 1,
            sets,
        }
    }

    fn valid_programme() -> Programme {
        Programme {
            name: "Strength Block".into(),
            kind: ProgrammeType::Personal,
            team_id: None,
            workouts: vec![Workout {
                name: "Day 1".into(),
                workout_exercises: vec![exercise(
                    Some("squat"),
                    vec![set(Some(5), Some(75.0)), set(Some(5), Some(80.0))],
                )],
            }],
        }
    }

    #[test]
    fn valid_personal_programme_passes_for_athlete() {
        assert!(validate_programme(&valid_programme(), Some(Role::Athlete)).is_empty());
        assert!(validate_programme(&valid_programme(), None).is_empty());
    }

    #[test]
    fn blank_name_is_reported_once() {
        let mut p = valid_programme();
        p.name = "   ".into();

        let errors = validate_programme(&p, Some(Role::Athlete));
        let hits = errors
            .iter()
            .filter(|e| *e == "Programme must have a name.")
            .count();
        assert_eq!(hits, 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn athletes_cannot_author_team_programmes() {
        let mut p = valid_programme();
        p.kind = ProgrammeType::Team;
        p.team_id = Some("team-1".into());

        let errors = validate_programme(&p, Some(Role::Athlete));
        assert_eq!(
            errors,
            vec![
                "Athletes can only create personal programmes.",
                "Athletes cannot select a team."
            ]
        );
    }

    #[test]
    fn athlete_team_reference_counts_even_when_blank() {
        let mut p = valid_programme();
        p.team_id = Some(String::new());

        let errors = validate_programme(&p, Some(Role::Athlete));
        assert_eq!(errors, vec!["Athletes cannot select a team."]);
    }

    #[test]
    fn coaches_must_pick_a_team() {
        let mut p = valid_programme();
        p.kind = ProgrammeType::Team;

        assert_eq!(
            validate_programme(&p, Some(Role::Coach)),
            vec!["Coaches must select a team."]
        );

        p.team_id = Some(" ".into());
        assert_eq!(
            validate_programme(&p, Some(Role::Coach)),
            vec!["Coaches must select a team."]
        );

        p.team_id = Some("team-1".into());
        assert!(validate_programme(&p, Some(Role::Coach)).is_empty());
    }

    #[test]
    fn missing_workouts_stop_structural_checks() {
        let mut p = valid_programme();
        p.name = String::new();
        p.workouts.clear();

        assert_eq!(
            validate_programme(&p, None),
            vec![
                "Programme must have a name.",
                "Programme must have at least one workout."
            ]
        );
    }

    #[test]
    fn workout_and_exercise_problems_are_indexed() {
        let mut p = valid_programme();
        p.workouts.push(Workout {
            name: String::new(),
            workout_exercises: vec![],
        });
        p.workouts.push(Workout {
            name: "Day 3".into(),
            workout_exercises: vec![
                exercise(Some("bench"), vec![set(Some(3), Some(90.0))]),
                exercise(None, vec![]),
            ],
        });

        assert_eq!(
            validate_programme(&p, None),
            vec![
                "Workout 2 must have a name.",
                "Workout 2 must have at least one exercise.",
                "Exercise 2 in Workout 3 must be selected.",
                "Exercise 2 in Workout 3 must have at least one set.",
            ]
        );
    }

    #[test]
    fn bad_sets_name_their_exact_position() {
        let mut p = valid_programme();
        p.workouts[0].workout_exercises.push(exercise(
            Some("deadlift"),
            vec![
                set(Some(5), Some(70.0)),
                set(Some(0), None),
                set(None, Some(-5.0)),
            ],
        ));

        assert_eq!(
            validate_programme(&p, None),
            vec![
                "Set 2 in Exercise 2 in Workout 1 must have a valid number of reps.",
                "Set 2 in Exercise 2 in Workout 1 must have a valid percentage.",
                "Set 3 in Exercise 2 in Workout 1 must have a valid number of reps.",
                "Set 3 in Exercise 2 in Workout 1 must have a valid percentage.",
            ]
        );
    }

    #[test]
    fn empty_exercise_id_is_not_selected() {
        let mut p = valid_programme();
        p.workouts[0].workout_exercises[0].exercise_id = Some(String::new());

        assert_eq!(
            validate_programme(&p, None),
            vec!["Exercise 1 in Workout 1 must be selected."]
        );
    }
}
