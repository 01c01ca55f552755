//! Personal records: looking up the current best and writing a new one.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::ReconciliationError,
    gateway::RecordGateway,
    setlog::LoggedSet,
};

/// The rep count a record is kept for, in its string form (`5` -> `"5"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepScheme(String);

impl RepScheme {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rep count, when the scheme is a plain number.
    pub fn reps(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl From<u32> for RepScheme {
    fn from(reps: u32) -> Self {
        Self(reps.to_string())
    }
}

impl From<String> for RepScheme {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for RepScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Best known weight for one user, exercise and rep count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalRecord {
    pub user_id: String,
    pub exercise_id: String,
    pub rep_scheme: RepScheme,
    pub weight: f64,
    pub achieved_at: String,
}

/// A candidate record handed to the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRecord {
    pub user_id: String,
    pub exercise_id: String,
    pub rep_scheme: RepScheme,
    pub weight: f64,
}

/// What the store did with a [`NewRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordWrite {
    Written,
    /// The stored weight was already at least as heavy; nothing changed.
    Kept,
}

/// Record lookup and record writer over a gateway.
pub struct RecordBook<'g, G: RecordGateway + ?Sized> {
    gateway: &'g G,
}

impl<'g, G: RecordGateway + ?Sized> RecordBook<'g, G> {
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    /// Current record, or `None` when the user never logged this rep count.
    pub async fn get(
        &self,
        user_id: &str,
        exercise_id: &str,
        rep_scheme: &RepScheme,
    ) -> Result<Option<PersonalRecord>, ReconciliationError> {
        let found = self
            .gateway
            .fetch_specific_pr(user_id, exercise_id, rep_scheme)
            .await
            .map_err(ReconciliationError::Lookup)?;

        debug!(
            user_id,
            exercise_id,
            rep_scheme = %rep_scheme,
            current = ?found.as_ref().map(|r| r.weight),
            "record lookup"
        );
        Ok(found)
    }

    /// Store `set` as the new best for its rep count.
    ///
    /// Callers decide beforehand that the set beats the current record; the
    /// store only refuses to overwrite a heavier record.
    pub async fn put(
        &self,
        user_id: &str,
        exercise_id: &str,
        set: &LoggedSet,
    ) -> Result<RecordWrite, ReconciliationError> {
        let record = NewRecord {
            user_id: user_id.to_string(),
            exercise_id: exercise_id.to_string(),
            rep_scheme: RepScheme::from(set.reps),
            weight: set.weight,
        };

        let outcome = self
            .gateway
            .submit_new_pr(&record)
            .await
            .map_err(ReconciliationError::Write)?;

        debug!(
            user_id,
            exercise_id,
            rep_scheme = %record.rep_scheme,
            weight = record.weight,
            ?outcome,
            "record write"
        );
        Ok(outcome)
    }
}
