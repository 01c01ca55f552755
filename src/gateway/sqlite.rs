use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, sqlite::SqliteRow};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    db::{self, DB},
    error::GatewayError,
    gateway::{CatalogGateway, RecordGateway},
    models::{
        CreatedProgramme, Exercise, ExerciseDetails, Goal, HistoryEntry, Programme,
        ProgrammeDetails, ProgrammeSummary, SetDetails, Team, WorkoutDetails,
    },
    records::{NewRecord, PersonalRecord, RecordWrite, RepScheme},
    setlog::SetLogBatch,
};

/// SQLITE_CONSTRAINT_UNIQUE
const UNIQUE_VIOLATION: &str = "2067";

/// Gateway backed by a local SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DB,
}

fn now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn record_from_row(r: &SqliteRow) -> PersonalRecord {
    PersonalRecord {
        user_id: r.get("user_id"),
        exercise_id: r.get("exercise_id"),
        rep_scheme: RepScheme::from(r.get::<String, _>("rep_scheme")),
        weight: r.get("weight"),
        achieved_at: r.get("achieved_at"),
    }
}

fn exercise_from_row(r: &SqliteRow) -> Exercise {
    Exercise {
        exercise_id: r.get("exercise_id"),
        name: r.get("name"),
        primary_muscle: r.get("primary_muscle"),
        description: r.get("description"),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
}

impl SqliteStore {
    pub fn new(pool: DB) -> Self {
        Self { pool }
    }

    pub async fn open(path: &str) -> Result<Self, GatewayError> {
        Ok(Self::new(db::open(path).await?))
    }

    pub async fn open_in_memory() -> Result<Self, GatewayError> {
        Ok(Self::new(db::open_in_memory().await?))
    }

    pub fn pool(&self) -> &DB {
        &self.pool
    }

    pub async fn add_exercise(
        &self,
        name: &str,
        primary_muscle: &str,
        description: Option<&str>,
    ) -> Result<Exercise, GatewayError> {
        let exercise = Exercise {
            exercise_id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            primary_muscle: primary_muscle.to_string(),
            description: description.unwrap_or_default().to_string(),
        };

        let res = sqlx::query(
            r#"
            INSERT INTO exercises
            (exercise_id, name, primary_muscle, description, created_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            "#,
        )
        .bind(&exercise.exercise_id)
        .bind(&exercise.name)
        .bind(&exercise.primary_muscle)
        .bind(&exercise.description)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(exercise),
            Err(e) if is_unique_violation(&e) => Err(GatewayError::Rejected(format!(
                "exercise `{}` already exists",
                exercise.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert an exercise unless one with the same name exists.
    /// Returns whether a row was inserted.
    pub async fn import_exercise(
        &self,
        name: &str,
        primary_muscle: &str,
        description: Option<&str>,
    ) -> Result<bool, GatewayError> {
        let res = sqlx::query(
            r#"
            INSERT OR IGNORE INTO exercises
              (exercise_id, name, primary_muscle, description, created_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name.trim())
        .bind(primary_muscle)
        .bind(description.unwrap_or_default())
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Look an exercise up by id or, failing that, by exact name (case-insensitive).
    pub async fn find_exercise(&self, id_or_name: &str) -> Result<Option<Exercise>, GatewayError> {
        let row = sqlx::query(
            r#"
            SELECT exercise_id, name, primary_muscle, COALESCE(description, '') AS description
            FROM   exercises
            WHERE  exercise_id = ?1 OR lower(name) = lower(?1)
            ORDER  BY exercise_id = ?1 DESC
            LIMIT  1
            "#,
        )
        .bind(id_or_name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(exercise_from_row))
    }

    pub async fn add_team(&self, name: &str, coach_id: Option<&str>) -> Result<Team, GatewayError> {
        let team = Team {
            team_id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            coach_id: coach_id.map(str::to_string),
        };

        let res = sqlx::query(
            "INSERT INTO teams (team_id, name, coach_id, created_at) VALUES (?1, ?2, ?3, datetime('now'))",
        )
        .bind(&team.team_id)
        .bind(&team.name)
        .bind(team.coach_id.as_deref())
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(team),
            Err(e) if is_unique_violation(&e) => Err(GatewayError::Rejected(format!(
                "team `{}` already exists",
                team.name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_team(&self, id_or_name: &str) -> Result<Option<Team>, GatewayError> {
        let row: Option<(String, String, Option<String>)> = sqlx::query_as(
            "SELECT team_id, name, coach_id FROM teams WHERE team_id = ?1 OR name = ?1 LIMIT 1",
        )
        .bind(id_or_name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(team_id, name, coach_id)| Team {
            team_id,
            name,
            coach_id,
        }))
    }

    pub async fn add_team_member(&self, team_id: &str, user_id: &str) -> Result<(), GatewayError> {
        sqlx::query("INSERT OR IGNORE INTO team_members (team_id, user_id) VALUES (?1, ?2)")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn add_goal(
        &self,
        user_id: &str,
        exercise_id: &str,
        rep_scheme: &RepScheme,
        target_weight: f64,
    ) -> Result<String, GatewayError> {
        let goal_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"INSERT INTO goals (goal_id, user_id, exercise_id, rep_scheme, target_weight, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))"#,
        )
        .bind(&goal_id)
        .bind(user_id)
        .bind(exercise_id)
        .bind(rep_scheme.as_str())
        .bind(target_weight)
        .execute(&self.pool)
        .await?;

        Ok(goal_id)
    }
}

#[async_trait]
impl RecordGateway for SqliteStore {
    async fn submit_workout_setlogs(&self, batch: &SetLogBatch) -> Result<(), GatewayError> {
        let logged_at = now();
        let mut tx = self.pool.begin().await?;

        for workout in &batch.workouts {
            for exercise in &workout.exercises {
                for set in &exercise.sets {
                    sqlx::query(
                        r#"INSERT INTO set_logs
                             (log_id, user_id, workout_id, exercise_id, set_id,
                              weight, reps, success, logged_at)
                           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                    )
                    .bind(Uuid::new_v4().to_string())
                    .bind(&batch.user_id)
                    .bind(&workout.workout_id)
                    .bind(&exercise.exercise_id)
                    .bind(&set.set_id)
                    .bind(set.weight)
                    .bind(set.reps as i64)
                    .bind(set.success)
                    .bind(&logged_at)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        info!(
            user_id = %batch.user_id,
            sets = batch.set_count(),
            "set logs stored"
        );
        Ok(())
    }

    async fn fetch_specific_pr(
        &self,
        user_id: &str,
        exercise_id: &str,
        rep_scheme: &RepScheme,
    ) -> Result<Option<PersonalRecord>, GatewayError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, exercise_id, rep_scheme, weight, achieved_at
            FROM   personal_records
            WHERE  user_id = ? AND exercise_id = ? AND rep_scheme = ?
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .bind(rep_scheme.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn submit_new_pr(&self, record: &NewRecord) -> Result<RecordWrite, GatewayError> {
        let res = sqlx::query(
            r#"
            INSERT INTO personal_records (user_id, exercise_id, rep_scheme, weight, achieved_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (user_id, exercise_id, rep_scheme) DO UPDATE
               SET weight = excluded.weight,
                   achieved_at = excluded.achieved_at
             WHERE excluded.weight > personal_records.weight
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.exercise_id)
        .bind(record.rep_scheme.as_str())
        .bind(record.weight)
        .bind(now())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 1 {
            Ok(RecordWrite::Written)
        } else {
            debug!(
                user_id = %record.user_id,
                exercise_id = %record.exercise_id,
                rep_scheme = %record.rep_scheme,
                "stored record is already at least as heavy"
            );
            Ok(RecordWrite::Kept)
        }
    }
}

#[async_trait]
impl CatalogGateway for SqliteStore {
    async fn create_programme(
        &self,
        programme: &Programme,
        owner_id: &str,
    ) -> Result<CreatedProgramme, GatewayError> {
        let mut tx = self.pool.begin().await?;

        let programme_id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"INSERT INTO programmes (programme_id, name, type, team_id, owner_id, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))"#,
        )
        .bind(&programme_id)
        .bind(programme.name.trim())
        .bind(programme.kind.to_string())
        .bind(programme.team_id.as_deref())
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        for (w_pos, workout) in programme.workouts.iter().enumerate() {
            let workout_id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO workouts (workout_id, programme_id, name, position) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(&workout_id)
            .bind(&programme_id)
            .bind(workout.name.trim())
            .bind(w_pos as i64)
            .execute(&mut *tx)
            .await?;

            for (e_pos, exercise) in workout.workout_exercises.iter().enumerate() {
                let exercise_id = exercise.exercise_id.as_deref().ok_or_else(|| {
                    GatewayError::Rejected(format!(
                        "exercise {} of workout `{}` has no exercise selected",
                        e_pos + 1,
                        workout.name
                    ))
                })?;
                let order = if exercise.exercise_order == 0 {
                    e_pos as i64 + 1
                } else {
                    exercise.exercise_order as i64
                };

                let we_id = Uuid::new_v4().to_string();
                sqlx::query(
                    r#"INSERT INTO workout_exercises
                         (workout_exercise_id, workout_id, exercise_id, exercise_order)
                       VALUES (?1, ?2, ?3, ?4)"#,
                )
                .bind(&we_id)
                .bind(&workout_id)
                .bind(exercise_id)
                .bind(order)
                .execute(&mut *tx)
                .await?;

                for (s_pos, set) in exercise.sets.iter().enumerate() {
                    sqlx::query(
                        r#"INSERT INTO programme_sets
                             (set_id, workout_exercise_id, position, reps, percentage)
                           VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    )
                    .bind(Uuid::new_v4().to_string())
                    .bind(&we_id)
                    .bind(s_pos as i64)
                    .bind(set.reps.unwrap_or_default())
                    .bind(set.percentage.unwrap_or_default())
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        info!(%programme_id, owner_id, name = %programme.name, "programme created");

        Ok(CreatedProgramme {
            status: "Success".to_string(),
            programme_id,
        })
    }

    async fn fetch_programme_details(
        &self,
        programme_id: &str,
    ) -> Result<Option<ProgrammeDetails>, GatewayError> {
        let head: Option<(String, String, String, Option<String>)> = sqlx::query_as(
            "SELECT programme_id, name, type, team_id FROM programmes WHERE programme_id = ?",
        )
        .bind(programme_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((programme_id, name, kind, team_id)) = head else {
            return Ok(None);
        };

        let workouts: Vec<(String, String)> = sqlx::query_as(
            "SELECT workout_id, name FROM workouts WHERE programme_id = ? ORDER BY position",
        )
        .bind(&programme_id)
        .fetch_all(&self.pool)
        .await?;

        let mut details = ProgrammeDetails {
            programme_id,
            name,
            kind,
            team_id,
            workouts: Vec::with_capacity(workouts.len()),
        };

        for (workout_id, workout_name) in workouts {
            let exercises: Vec<(String, String, String)> = sqlx::query_as(
                r#"
                SELECT we.workout_exercise_id, e.exercise_id, e.name
                FROM   workout_exercises we
                JOIN   exercises e ON e.exercise_id = we.exercise_id
                WHERE  we.workout_id = ?
                ORDER  BY we.exercise_order, we.rowid
                "#,
            )
            .bind(&workout_id)
            .fetch_all(&self.pool)
            .await?;

            let mut workout = WorkoutDetails {
                workout_id,
                name: workout_name,
                exercises: Vec::with_capacity(exercises.len()),
            };

            for (we_id, exercise_id, exercise_name) in exercises {
                let sets: Vec<SetDetails> = sqlx::query(
                    r#"SELECT set_id, reps, percentage
                       FROM   programme_sets
                       WHERE  workout_exercise_id = ?
                       ORDER  BY position"#,
                )
                .bind(&we_id)
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(|r| SetDetails {
                    set_id: r.get("set_id"),
                    reps: r.get("reps"),
                    percentage: r.get("percentage"),
                })
                .collect();

                workout.exercises.push(ExerciseDetails {
                    exercise_id,
                    name: exercise_name,
                    sets,
                });
            }

            details.workouts.push(workout);
        }

        Ok(Some(details))
    }

    async fn fetch_user_programmes(
        &self,
        user_id: &str,
    ) -> Result<Vec<ProgrammeSummary>, GatewayError> {
        let rows = sqlx::query(
            r#"
            SELECT p.programme_id, p.name, p.type, p.team_id, p.created_at,
                   (SELECT COUNT(*) FROM workouts w WHERE w.programme_id = p.programme_id) AS workouts
            FROM   programmes p
            WHERE  p.owner_id = ?1
               OR  p.team_id IN (SELECT team_id FROM teams WHERE coach_id = ?1)
               OR  p.team_id IN (SELECT team_id FROM team_members WHERE user_id = ?1)
            ORDER  BY p.created_at, p.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| ProgrammeSummary {
                programme_id: r.get("programme_id"),
                name: r.get("name"),
                kind: r.get("type"),
                team_id: r.get("team_id"),
                workouts: r.get("workouts"),
                created_at: r.get("created_at"),
            })
            .collect())
    }

    async fn fetch_exercises(&self) -> Result<Vec<Exercise>, GatewayError> {
        let rows = sqlx::query(
            r#"
            SELECT exercise_id, name, primary_muscle, COALESCE(description, '') AS description
            FROM   exercises
            ORDER  BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(exercise_from_row).collect())
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>, GatewayError> {
        let rows: Vec<(String, String, Option<String>)> =
            sqlx::query_as("SELECT team_id, name, coach_id FROM teams ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(team_id, name, coach_id)| Team {
                team_id,
                name,
                coach_id,
            })
            .collect())
    }

    async fn fetch_exercise_prs(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Vec<PersonalRecord>, GatewayError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, exercise_id, rep_scheme, weight, achieved_at
            FROM   personal_records
            WHERE  user_id = ? AND exercise_id = ?
            ORDER  BY CAST(rep_scheme AS INTEGER), rep_scheme
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn fetch_user_prs(&self, user_id: &str) -> Result<Vec<PersonalRecord>, GatewayError> {
        let rows = sqlx::query(
            r#"
            SELECT pr.user_id, pr.exercise_id, pr.rep_scheme, pr.weight, pr.achieved_at
            FROM   personal_records pr
            JOIN   exercises e ON e.exercise_id = pr.exercise_id
            WHERE  pr.user_id = ?
            ORDER  BY e.name, CAST(pr.rep_scheme AS INTEGER), pr.rep_scheme
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(record_from_row).collect())
    }

    async fn fetch_exercise_history(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Vec<HistoryEntry>, GatewayError> {
        let rows = sqlx::query(
            r#"
            SELECT date(logged_at)                                        AS day,
                   COALESCE(MAX(CASE WHEN success THEN weight END), 0.0)  AS top_weight,
                   COUNT(*)                                               AS sets,
                   SUM(success)                                           AS successful_sets,
                   SUM(CASE WHEN success THEN reps ELSE 0 END)            AS total_reps
            FROM   set_logs
            WHERE  user_id = ? AND exercise_id = ?
            GROUP  BY day
            ORDER  BY day
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| HistoryEntry {
                date: r.get("day"),
                top_weight: r.get("top_weight"),
                sets: r.get("sets"),
                successful_sets: r.get("successful_sets"),
                total_reps: r.get("total_reps"),
            })
            .collect())
    }

    async fn fetch_user_goals(&self, user_id: &str) -> Result<Vec<Goal>, GatewayError> {
        let rows = sqlx::query(
            r#"
            SELECT g.goal_id, g.exercise_id, e.name AS exercise, g.rep_scheme,
                   g.target_weight, pr.weight AS current_weight
            FROM   goals g
            JOIN   exercises e ON e.exercise_id = g.exercise_id
            LEFT   JOIN personal_records pr
                   ON  pr.user_id = g.user_id
                   AND pr.exercise_id = g.exercise_id
                   AND pr.rep_scheme = g.rep_scheme
            WHERE  g.user_id = ?
            ORDER  BY g.created_at, e.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Goal {
                goal_id: r.get("goal_id"),
                exercise_id: r.get("exercise_id"),
                exercise: r.get("exercise"),
                rep_scheme: r.get("rep_scheme"),
                target_weight: r.get("target_weight"),
                current_weight: r.get("current_weight"),
            })
            .collect())
    }
}
