use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::debug;

pub type DB = SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS teams (
    team_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    coach_id    TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS team_members (
    team_id  TEXT NOT NULL REFERENCES teams(team_id) ON DELETE CASCADE,
    user_id  TEXT NOT NULL,
    PRIMARY KEY (team_id, user_id)
);

CREATE TABLE IF NOT EXISTS exercises (
    exercise_id     TEXT PRIMARY KEY,
    name            TEXT NOT NULL UNIQUE,
    primary_muscle  TEXT NOT NULL,
    description     TEXT,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS programmes (
    programme_id  TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    type          TEXT NOT NULL CHECK (type IN ('personal', 'team')),
    team_id       TEXT REFERENCES teams(team_id),
    owner_id      TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workouts (
    workout_id    TEXT PRIMARY KEY,
    programme_id  TEXT NOT NULL REFERENCES programmes(programme_id) ON DELETE CASCADE,
    name          TEXT NOT NULL,
    position      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS workout_exercises (
    workout_exercise_id  TEXT PRIMARY KEY,
    workout_id           TEXT NOT NULL REFERENCES workouts(workout_id) ON DELETE CASCADE,
    exercise_id          TEXT NOT NULL REFERENCES exercises(exercise_id),
    exercise_order       INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS programme_sets (
    set_id               TEXT PRIMARY KEY,
    workout_exercise_id  TEXT NOT NULL REFERENCES workout_exercises(workout_exercise_id) ON DELETE CASCADE,
    position             INTEGER NOT NULL,
    reps                 INTEGER NOT NULL,
    percentage           REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS set_logs (
    log_id       TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    workout_id   TEXT NOT NULL,
    exercise_id  TEXT NOT NULL REFERENCES exercises(exercise_id),
    set_id       TEXT NOT NULL,
    weight       REAL NOT NULL,
    reps         INTEGER NOT NULL,
    success      INTEGER NOT NULL,
    logged_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS set_logs_by_user_exercise
    ON set_logs (user_id, exercise_id, logged_at);

CREATE TABLE IF NOT EXISTS personal_records (
    user_id      TEXT NOT NULL,
    exercise_id  TEXT NOT NULL REFERENCES exercises(exercise_id),
    rep_scheme   TEXT NOT NULL,
    weight       REAL NOT NULL,
    achieved_at  TEXT NOT NULL,
    PRIMARY KEY (user_id, exercise_id, rep_scheme)
);

CREATE TABLE IF NOT EXISTS goals (
    goal_id        TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL,
    exercise_id    TEXT NOT NULL REFERENCES exercises(exercise_id),
    rep_scheme     TEXT NOT NULL,
    target_weight  REAL NOT NULL,
    created_at     TEXT NOT NULL
);
"#;

pub async fn open(path: &str) -> Result<DB, sqlx::Error> {
    let opts = SqliteConnectOptions::from_str(path)?
        .create_if_missing(true)
        .foreign_keys(true);

    // Every connection to `:memory:` gets its own database, so keep exactly one alive.
    let pool_opts = if path.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_opts.connect_with(opts).await?;

    init_schema(&pool).await?;
    debug!(path, "database ready");
    Ok(pool)
}

pub async fn open_in_memory() -> Result<DB, sqlx::Error> {
    open("sqlite::memory:").await
}

async fn init_schema(pool: &DB) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
