use anyhow::{Context, Result, bail};
use colored::Colorize;

use ironlog::{
    error::SubmissionError,
    gateway::SqliteStore,
    setlog::LoggedWorkout,
    submission::{FailedStage, SubmissionReport, submit_sets},
    utils::format_weight,
};

use crate::{cli::LogCmd, output::emit};

use super::Ctx;

pub async fn handle(cmd: LogCmd, store: &SqliteStore, ctx: &Ctx) -> Result<()> {
    match cmd {
        LogCmd::Submit { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Could not read file: `{}`", file.display()))?;
            let workouts: Vec<LoggedWorkout> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing `{}`: expected a JSON array of workouts", file.display()))?;
            let user = ctx.user()?;

            let report = match submit_sets(store, &workouts, user).await {
                Ok(report) => report,
                Err(SubmissionError::Malformed(problems)) => {
                    println!("{}", "Submission is malformed:".red().bold());
                    for p in &problems {
                        println!("  {} {}", "•".yellow(), p);
                    }
                    bail!("nothing was submitted");
                }
            };

            emit(ctx.fmt, &report, || pretty_report(&report));

            if !report.is_success() {
                bail!("set logs were not stored");
            }
        }
    }

    Ok(())
}

fn pretty_report(report: &SubmissionReport) {
    if !report.is_success() {
        println!(
            "{} the sets could not be stored – nothing was recorded",
            "error:".red().bold()
        );
        return;
    }

    println!("{} sets stored", "ok:".green().bold());

    if report.achieved_prs.is_empty() {
        println!("{}", "  (no new personal records)".dimmed());
    } else {
        println!("\n{}", "New personal records:".cyan().bold());
        for pr in &report.achieved_prs {
            println!(
                "  {} {} – {} × {}",
                "★".yellow(),
                pr.exercise.bold(),
                format_weight(pr.weight).red().bold(),
                pr.reps
            );
        }
    }

    if !report.failures.is_empty() {
        println!(
            "\n{} {} record(s) could not be checked:",
            "warning:".yellow().bold(),
            report.failures.len()
        );
        for f in &report.failures {
            let stage = match f.stage {
                FailedStage::Lookup => "lookup",
                FailedStage::Write => "write",
            };
            println!(
                "  {} set {} of {} ({}): {}",
                "•".yellow(),
                f.set_id,
                f.exercise_id,
                stage,
                f.message.dimmed()
            );
        }
    }
}
