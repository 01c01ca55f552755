//! Creating programmes behind the validator, and turning stored ones into
//! logging templates.

use std::path::Path;

use tracing::{info, warn};

use crate::{
    error::ProgrammeError,
    gateway::CatalogGateway,
    models::{CreatedProgramme, Programme, ProgrammeDetails, Role},
    setlog::{LoggedExercise, LoggedSet, LoggedWorkout},
    validation::validate_programme,
};

/// Validate `programme` for `role` and store it for `owner_id`.
///
/// Nothing reaches the gateway unless the validator came back clean.
pub async fn create_programme<G>(
    gateway: &G,
    programme: &Programme,
    role: Option<Role>,
    owner_id: &str,
) -> Result<CreatedProgramme, ProgrammeError>
where
    G: CatalogGateway + ?Sized,
{
    let errors = validate_programme(programme, role);
    if !errors.is_empty() {
        warn!(
            owner_id,
            name = %programme.name,
            problems = errors.len(),
            "programme rejected by validation"
        );
        return Err(ProgrammeError::Invalid(errors));
    }

    let created = gateway.create_programme(programme, owner_id).await?;
    info!(owner_id, programme_id = %created.programme_id, "programme stored");
    Ok(created)
}

/// Read an authored programme from a TOML file.
pub fn load_programme_file(path: &Path) -> Result<Programme, ProgrammeError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ProgrammeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&raw).map_err(|source| ProgrammeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Logging template for a stored programme: one logged workout per workout,
/// every set with its target reps, no weight and not yet successful.
pub fn logging_template(details: &ProgrammeDetails) -> Vec<LoggedWorkout> {
    details
        .workouts
        .iter()
        .map(|w| LoggedWorkout {
            workout_id: w.workout_id.clone(),
            name: Some(w.name.clone()),
            exercises: w
                .exercises
                .iter()
                .map(|e| LoggedExercise {
                    exercise_id: e.exercise_id.clone(),
                    name: Some(e.name.clone()),
                    sets: e
                        .sets
                        .iter()
                        .map(|s| LoggedSet {
                            set_id: s.set_id.clone(),
                            reps: u32::try_from(s.reps).unwrap_or(0),
                            weight: 0.0,
                            success: false,
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
