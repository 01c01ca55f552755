use std::collections::HashMap;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use ironlog::{
    gateway::{CatalogGateway, SqliteStore},
    models::Exercise,
    records::PersonalRecord,
    utils::{calculate_1rm, format_weight},
};

use crate::{
    cli::PrCmd,
    output::{emit, print_columns},
};

use super::Ctx;

#[derive(Serialize)]
struct PrRow<'a> {
    exercise: &'a str,
    #[serde(flatten)]
    record: &'a PersonalRecord,
    estimated_1rm: Option<f64>,
}

async fn resolve_exercise(store: &SqliteStore, exercise: &str) -> Result<Exercise> {
    store
        .find_exercise(exercise)
        .await?
        .with_context(|| format!("no exercise `{exercise}` – see `ironlog ex list`"))
}

pub async fn handle(cmd: PrCmd, store: &SqliteStore, ctx: &Ctx) -> Result<()> {
    let user = ctx.user()?;

    match cmd {
        PrCmd::List { exercise, formula } => {
            let records = match &exercise {
                Some(ex) => {
                    let ex = resolve_exercise(store, ex).await?;
                    store.fetch_exercise_prs(user, &ex.exercise_id).await?
                }
                None => store.fetch_user_prs(user).await?,
            };

            let names: HashMap<String, String> = store
                .fetch_exercises()
                .await?
                .into_iter()
                .map(|e| (e.exercise_id, e.name))
                .collect();

            let rows: Vec<PrRow> = records
                .iter()
                .map(|r| PrRow {
                    exercise: names
                        .get(&r.exercise_id)
                        .map(String::as_str)
                        .unwrap_or(r.exercise_id.as_str()),
                    record: r,
                    estimated_1rm: r
                        .rep_scheme
                        .reps()
                        .map(|reps| calculate_1rm(r.weight, reps, formula)),
                })
                .collect();

            emit(ctx.fmt, &rows, || {
                if rows.is_empty() {
                    println!("{}", "  (no personal records yet)".dimmed());
                    return;
                }
                println!("{}", "Personal records:".cyan().bold());

                let mut left = Vec::new();
                let mut right = Vec::new();
                let mut last = "";
                for row in &rows {
                    let name = if row.exercise == last {
                        " ".repeat(row.exercise.chars().count())
                    } else {
                        row.exercise.bold().to_string()
                    };
                    last = row.exercise;

                    left.push(format!(
                        " {}  {} × {}",
                        name,
                        format_weight(row.record.weight).red().bold(),
                        row.record.rep_scheme
                    ));
                    let est = row
                        .estimated_1rm
                        .map(|w| format!("1RM ≈ {} · ", format_weight(w.round())))
                        .unwrap_or_default();
                    right.push(format!("{est}{}", row.record.achieved_at).dimmed().to_string());
                }
                print_columns(left, right, &"|".blue().to_string());
            });
        }

        PrCmd::History { exercise } => {
            let ex = resolve_exercise(store, &exercise).await?;
            let history = store.fetch_exercise_history(user, &ex.exercise_id).await?;

            emit(ctx.fmt, &history, || {
                println!("{} {}", "History:".cyan().bold(), ex.name.bold());
                if history.is_empty() {
                    println!("{}", "  (nothing logged yet)".dimmed());
                    return;
                }
                for h in &history {
                    println!(
                        "  {}  top {}  {} sets ({} ok)  {} reps",
                        h.date.yellow(),
                        format_weight(h.top_weight).bold(),
                        h.sets,
                        h.successful_sets,
                        h.total_reps
                    );
                }
            });
        }
    }

    Ok(())
}
