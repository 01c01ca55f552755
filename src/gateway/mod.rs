//! Contracts of the data platform the tracker talks to.
//!
//! [`RecordGateway`] is all the set submission workflow needs. Reads and
//! writes around programmes, the exercise catalog and teams live on
//! [`CatalogGateway`]; they carry no logic of their own.

use async_trait::async_trait;

use crate::{
    error::GatewayError,
    models::{
        CreatedProgramme, Exercise, Goal, HistoryEntry, Programme, ProgrammeDetails,
        ProgrammeSummary, Team,
    },
    records::{NewRecord, PersonalRecord, RecordWrite, RepScheme},
    setlog::SetLogBatch,
};

pub mod sqlite;

pub use sqlite::SqliteStore;

#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// Persist every set of the batch, or none of them.
    async fn submit_workout_setlogs(&self, batch: &SetLogBatch) -> Result<(), GatewayError>;

    async fn fetch_specific_pr(
        &self,
        user_id: &str,
        exercise_id: &str,
        rep_scheme: &RepScheme,
    ) -> Result<Option<PersonalRecord>, GatewayError>;

    /// Upsert a record, keeping the stored one if it is at least as heavy.
    async fn submit_new_pr(&self, record: &NewRecord) -> Result<RecordWrite, GatewayError>;
}

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn create_programme(
        &self,
        programme: &Programme,
        owner_id: &str,
    ) -> Result<CreatedProgramme, GatewayError>;

    async fn fetch_programme_details(
        &self,
        programme_id: &str,
    ) -> Result<Option<ProgrammeDetails>, GatewayError>;

    async fn fetch_user_programmes(
        &self,
        user_id: &str,
    ) -> Result<Vec<ProgrammeSummary>, GatewayError>;

    async fn fetch_exercises(&self) -> Result<Vec<Exercise>, GatewayError>;

    async fn fetch_teams(&self) -> Result<Vec<Team>, GatewayError>;

    /// Every rep-count record of one exercise, lightest rep count first.
    async fn fetch_exercise_prs(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Vec<PersonalRecord>, GatewayError>;

    async fn fetch_user_prs(&self, user_id: &str) -> Result<Vec<PersonalRecord>, GatewayError>;

    async fn fetch_exercise_history(
        &self,
        user_id: &str,
        exercise_id: &str,
    ) -> Result<Vec<HistoryEntry>, GatewayError>;

    async fn fetch_user_goals(&self, user_id: &str) -> Result<Vec<Goal>, GatewayError>;
}
