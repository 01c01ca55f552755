//! Submitting a batch of logged sets and reconciling personal records.
//!
//! The raw log is the source of truth: it is stored in a single call first,
//! and only once that succeeded is every successful set compared against the
//! athlete's record for its exercise and rep count. A record that cannot be
//! read or written is reported next to the achieved records and never undoes
//! the stored log.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{ReconciliationError, SubmissionError},
    gateway::RecordGateway,
    records::{RecordBook, RecordWrite, RepScheme},
    setlog::{LoggedExercise, LoggedSet, LoggedWorkout, SetLogBatch, structural_problems},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Success,
    Error,
}

/// A set that beat (or set) the athlete's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievedPr {
    pub exercise_id: String,
    pub exercise: String,
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedStage {
    Lookup,
    Write,
}

/// A set whose record could not be reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationFailure {
    pub workout_id: String,
    pub exercise_id: String,
    pub set_id: String,
    pub stage: FailedStage,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub status: SubmissionStatus,
    #[serde(rename = "achievedPRs")]
    pub achieved_prs: Vec<AchievedPr>,
    pub failures: Vec<ReconciliationFailure>,
}

impl SubmissionReport {
    fn failed() -> Self {
        Self {
            status: SubmissionStatus::Error,
            achieved_prs: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SubmissionStatus::Success
    }
}

/// Store `workouts` for `user_id` and update their personal records.
///
/// Returns `Err` only when the workouts are malformed, in which case nothing
/// was sent to the gateway. A rejected batch comes back as a report with
/// [`SubmissionStatus::Error`] and no records touched.
pub async fn submit_sets<G>(
    gateway: &G,
    workouts: &[LoggedWorkout],
    user_id: &str,
) -> Result<SubmissionReport, SubmissionError>
where
    G: RecordGateway + ?Sized,
{
    let problems = structural_problems(workouts);
    if !problems.is_empty() {
        return Err(SubmissionError::Malformed(problems));
    }

    let batch = SetLogBatch::snapshot(user_id, workouts);
    if let Err(e) = gateway.submit_workout_setlogs(&batch).await {
        warn!(user_id, error = %e, "set log batch rejected; records left untouched");
        return Ok(SubmissionReport::failed());
    }

    let book = RecordBook::new(gateway);
    let mut report = SubmissionReport {
        status: SubmissionStatus::Success,
        achieved_prs: Vec::new(),
        failures: Vec::new(),
    };

    for workout in workouts {
        for exercise in &workout.exercises {
            for set in exercise.sets.iter().filter(|s| s.success) {
                match reconcile(&book, user_id, exercise, set).await {
                    Ok(Some(pr)) => report.achieved_prs.push(pr),
                    Ok(None) => {}
                    Err(e) => {
                        warn!(
                            user_id,
                            workout_id = %workout.workout_id,
                            exercise_id = %exercise.exercise_id,
                            set_id = %set.set_id,
                            error = %e,
                            "personal record not reconciled"
                        );
                        report.failures.push(ReconciliationFailure {
                            workout_id: workout.workout_id.clone(),
                            exercise_id: exercise.exercise_id.clone(),
                            set_id: set.set_id.clone(),
                            stage: match e {
                                ReconciliationError::Lookup(_) => FailedStage::Lookup,
                                ReconciliationError::Write(_) => FailedStage::Write,
                            },
                            message: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    info!(
        user_id,
        sets = batch.set_count(),
        prs = report.achieved_prs.len(),
        failures = report.failures.len(),
        "submission reconciled"
    );
    Ok(report)
}

async fn reconcile<G>(
    book: &RecordBook<'_, G>,
    user_id: &str,
    exercise: &LoggedExercise,
    set: &LoggedSet,
) -> Result<Option<AchievedPr>, ReconciliationError>
where
    G: RecordGateway + ?Sized,
{
    let scheme = RepScheme::from(set.reps);
    let current = book.get(user_id, &exercise.exercise_id, &scheme).await?;

    if current.is_some_and(|pr| set.weight <= pr.weight) {
        return Ok(None);
    }

    match book.put(user_id, &exercise.exercise_id, set).await? {
        RecordWrite::Written => Ok(Some(AchievedPr {
            exercise_id: exercise.exercise_id.clone(),
            exercise: exercise.display_name().to_string(),
            reps: set.reps,
            weight: set.weight,
        })),
        RecordWrite::Kept => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, HashSet},
        sync::Mutex,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        error::GatewayError,
        records::{NewRecord, PersonalRecord},
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Submit(SetLogBatch),
        Lookup(String, String, String),
        Write(String, String, String, f64),
    }

    /// In-memory gateway that records every call and can be told to fail.
    #[derive(Default)]
    struct RecordingGateway {
        records: Mutex<HashMap<(String, String, String), f64>>,
        calls: Mutex<Vec<Call>>,
        reject_batch: bool,
        failing_lookups: HashSet<String>,
        failing_writes: HashSet<String>,
    }

    impl RecordingGateway {
        fn with_record(self, user: &str, exercise: &str, scheme: &str, weight: f64) -> Self {
            self.records.lock().unwrap().insert(
                (user.to_string(), exercise.to_string(), scheme.to_string()),
                weight,
            );
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn writes(&self) -> Vec<f64> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Write(_, _, _, w) => Some(w),
                    _ => None,
                })
                .collect()
        }

        fn lookups(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::Lookup(..)))
                .count()
        }
    }

    #[async_trait]
    impl RecordGateway for RecordingGateway {
        async fn submit_workout_setlogs(&self, batch: &SetLogBatch) -> Result<(), GatewayError> {
            self.calls.lock().unwrap().push(Call::Submit(batch.clone()));
            if self.reject_batch {
                return Err(GatewayError::Rejected("backend unavailable".into()));
            }
            Ok(())
        }

        async fn fetch_specific_pr(
            &self,
            user_id: &str,
            exercise_id: &str,
            rep_scheme: &RepScheme,
        ) -> Result<Option<PersonalRecord>, GatewayError> {
            self.calls.lock().unwrap().push(Call::Lookup(
                user_id.into(),
                exercise_id.into(),
                rep_scheme.to_string(),
            ));
            if self.failing_lookups.contains(exercise_id) {
                return Err(GatewayError::Rejected("lookup timed out".into()));
            }

            let key = (
                user_id.to_string(),
                exercise_id.to_string(),
                rep_scheme.to_string(),
            );
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(&key)
                .map(|w| PersonalRecord {
                    user_id: user_id.into(),
                    exercise_id: exercise_id.into(),
                    rep_scheme: rep_scheme.clone(),
                    weight: *w,
                    achieved_at: "2024-01-01 00:00:00".into(),
                }))
        }

        async fn submit_new_pr(&self, record: &NewRecord) -> Result<RecordWrite, GatewayError> {
            self.calls.lock().unwrap().push(Call::Write(
                record.user_id.clone(),
                record.exercise_id.clone(),
                record.rep_scheme.to_string(),
                record.weight,
            ));
            if self.failing_writes.contains(&record.exercise_id) {
                return Err(GatewayError::Rejected("write refused".into()));
            }

            self.records.lock().unwrap().insert(
                (
                    record.user_id.clone(),
                    record.exercise_id.clone(),
                    record.rep_scheme.to_string(),
                ),
                record.weight,
            );
            Ok(RecordWrite::Written)
        }
    }

    fn set(id: &str, reps: u32, weight: f64, success: bool) -> LoggedSet {
        LoggedSet {
            set_id: id.into(),
            reps,
            weight,
            success,
        }
    }

    fn workout(id: &str, exercises: Vec<(&str, Vec<LoggedSet>)>) -> LoggedWorkout {
        LoggedWorkout {
            workout_id: id.into(),
            name: None,
            exercises: exercises
                .into_iter()
                .map(|(ex, sets)| LoggedExercise {
                    exercise_id: ex.into(),
                    name: None,
                    sets,
                })
                .collect(),
        }
    }

    fn pr(exercise: &str, reps: u32, weight: f64) -> AchievedPr {
        AchievedPr {
            exercise_id: exercise.into(),
            exercise: exercise.into(),
            reps,
            weight,
        }
    }

    #[tokio::test]
    async fn first_ever_set_becomes_a_record() {
        let gw = RecordingGateway::default();
        let input = vec![workout("w1", vec![("E", vec![set("s1", 5, 100.0, true)])])];

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(report.status, SubmissionStatus::Success);
        assert_eq!(report.achieved_prs, vec![pr("E", 5, 100.0)]);
        assert!(report.failures.is_empty());
        assert_eq!(
            gw.calls()[1..],
            [
                Call::Lookup("U".into(), "E".into(), "5".into()),
                Call::Write("U".into(), "E".into(), "5".into(), 100.0),
            ]
        );
    }

    #[tokio::test]
    async fn heavier_set_replaces_the_record() {
        let gw = RecordingGateway::default().with_record("U", "E", "5", 100.0);
        let input = vec![workout("w1", vec![("E", vec![set("s1", 5, 110.0, true)])])];

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(gw.writes(), vec![110.0]);
        assert_eq!(report.achieved_prs, vec![pr("E", 5, 110.0)]);
    }

    #[tokio::test]
    async fn lighter_or_equal_set_leaves_the_record() {
        let gw = RecordingGateway::default().with_record("U", "E", "5", 100.0);
        let input = vec![workout(
            "w1",
            vec![("E", vec![set("s1", 5, 90.0, true), set("s2", 5, 100.0, true)])],
        )];

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert!(gw.writes().is_empty());
        assert!(report.achieved_prs.is_empty());
        assert_eq!(report.status, SubmissionStatus::Success);
    }

    #[tokio::test]
    async fn failed_sets_are_never_reconciled() {
        let gw = RecordingGateway::default();
        let input = vec![workout("w1", vec![("E", vec![set("s1", 1, 999.0, false)])])];

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(gw.lookups(), 0);
        assert!(gw.writes().is_empty());
        assert!(report.achieved_prs.is_empty());
        // The failed attempt is still part of the stored log.
        match &gw.calls()[0] {
            Call::Submit(batch) => assert_eq!(batch.set_count(), 1),
            other => panic!("expected a batch submit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_batch_stops_before_reconciliation() {
        let gw = RecordingGateway {
            reject_batch: true,
            ..Default::default()
        };
        let input = vec![workout("w1", vec![("E", vec![set("s1", 5, 100.0, true)])])];

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(report.status, SubmissionStatus::Error);
        assert!(report.achieved_prs.is_empty());
        assert!(report.failures.is_empty());
        assert_eq!(gw.calls().len(), 1);
    }

    #[tokio::test]
    async fn resubmitting_the_same_set_reports_no_second_record() {
        let gw = RecordingGateway::default();
        let input = vec![workout("w1", vec![("E", vec![set("s1", 5, 100.0, true)])])];

        let first = submit_sets(&gw, &input, "U").await.unwrap();
        let second = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(first.achieved_prs.len(), 1);
        assert!(second.achieved_prs.is_empty());
        assert_eq!(gw.writes(), vec![100.0]);
    }

    #[tokio::test]
    async fn one_failing_set_does_not_stop_the_rest() {
        let gw = RecordingGateway {
            failing_lookups: HashSet::from(["bad-lookup".to_string()]),
            failing_writes: HashSet::from(["bad-write".to_string()]),
            ..Default::default()
        };
        let input = vec![workout(
            "w1",
            vec![
                ("bad-lookup", vec![set("s1", 5, 100.0, true)]),
                ("bad-write", vec![set("s2", 3, 80.0, true)]),
                ("ok", vec![set("s3", 1, 150.0, true)]),
            ],
        )];

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(report.status, SubmissionStatus::Success);
        assert_eq!(report.achieved_prs, vec![pr("ok", 1, 150.0)]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].set_id, "s1");
        assert_eq!(report.failures[0].stage, FailedStage::Lookup);
        assert_eq!(report.failures[1].set_id, "s2");
        assert_eq!(report.failures[1].stage, FailedStage::Write);
    }

    #[tokio::test]
    async fn records_follow_input_order_and_rep_counts_are_separate() {
        let gw = RecordingGateway::default().with_record("U", "squat", "5", 140.0);
        let input = vec![
            workout(
                "w1",
                vec![
                    ("squat", vec![set("a", 5, 145.0, true), set("b", 3, 150.0, true)]),
                    ("bench", vec![set("c", 5, 90.0, true)]),
                ],
            ),
            workout("w2", vec![("squat", vec![set("d", 5, 150.0, true)])]),
        ];

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(
            report.achieved_prs,
            vec![
                pr("squat", 5, 145.0),
                pr("squat", 3, 150.0),
                pr("bench", 5, 90.0),
                pr("squat", 5, 150.0),
            ]
        );
    }

    #[tokio::test]
    async fn kept_write_is_not_reported() {
        struct RacingGateway;

        #[async_trait]
        impl RecordGateway for RacingGateway {
            async fn submit_workout_setlogs(&self, _: &SetLogBatch) -> Result<(), GatewayError> {
                Ok(())
            }

            async fn fetch_specific_pr(
                &self,
                _: &str,
                _: &str,
                _: &RepScheme,
            ) -> Result<Option<PersonalRecord>, GatewayError> {
                Ok(None)
            }

            async fn submit_new_pr(&self, _: &NewRecord) -> Result<RecordWrite, GatewayError> {
                // Someone else stored a heavier record in between.
                Ok(RecordWrite::Kept)
            }
        }

        let input = vec![workout("w1", vec![("E", vec![set("s1", 5, 100.0, true)])])];
        let report = submit_sets(&RacingGateway, &input, "U").await.unwrap();

        assert_eq!(report.status, SubmissionStatus::Success);
        assert!(report.achieved_prs.is_empty());
    }

    #[tokio::test]
    async fn malformed_input_never_reaches_the_gateway() {
        let gw = RecordingGateway::default();
        let input = vec![workout("w1", vec![])];

        let err = submit_sets(&gw, &input, "U").await.unwrap_err();

        match err {
            SubmissionError::Malformed(problems) => {
                assert_eq!(problems, vec!["Workout 1 must have at least one exercise."])
            }
        }
        assert!(gw.calls().is_empty());
    }

    #[tokio::test]
    async fn untouched_template_sets_never_reach_the_gateway() {
        let gw = RecordingGateway::default();
        let input = vec![workout(
            "w1",
            vec![("E", vec![set("s1", 0, 0.0, true), set("s2", 5, 80.0, true)])],
        )];

        let err = submit_sets(&gw, &input, "U").await.unwrap_err();

        match err {
            SubmissionError::Malformed(problems) => assert_eq!(
                problems,
                vec![
                    "Set 1 in Exercise 1 in Workout 1 must have a valid number of reps.",
                    "Set 1 in Exercise 1 in Workout 1 must have a valid weight.",
                ]
            ),
        }
        assert!(gw.calls().is_empty());
    }

    #[tokio::test]
    async fn display_name_is_used_in_the_report() {
        let gw = RecordingGateway::default();
        let mut input = vec![workout("w1", vec![("bench-id", vec![set("s1", 5, 80.0, true)])])];
        input[0].exercises[0].name = Some("Bench Press".into());

        let report = submit_sets(&gw, &input, "U").await.unwrap();

        assert_eq!(report.achieved_prs[0].exercise, "Bench Press");
        assert_eq!(report.achieved_prs[0].exercise_id, "bench-id");
    }
}
