use std::collections::BTreeSet;

use anyhow::{Context, Result};
use colored::Colorize;

use ironlog::{
    error::GatewayError,
    gateway::{CatalogGateway, SqliteStore},
    types::{ALLOWED_MUSCLES, ExerciseImport, best_muscle_suggestion, canonical_muscle},
};

use crate::{
    cli::ExerciseCmd,
    output::{emit, print_columns},
};

use super::Ctx;

fn unknown_muscle(name: &str, muscle: &str) {
    match best_muscle_suggestion(muscle) {
        Some(sug) => println!(
            "{} `{}` skipped – unknown muscle `{}` -- did you mean: `{}`?",
            "warning:".yellow().bold(),
            name,
            muscle,
            sug.green()
        ),
        None => println!(
            "{} `{}` skipped – unknown muscle `{}`",
            "warning:".yellow().bold(),
            name,
            muscle
        ),
    }
}

pub async fn handle(cmd: ExerciseCmd, store: &SqliteStore, ctx: &Ctx) -> Result<()> {
    match cmd {
        ExerciseCmd::Add { name, muscle, desc } => {
            let Some(musc) = canonical_muscle(&muscle) else {
                unknown_muscle(&name, &muscle);
                return Ok(());
            };

            match store.add_exercise(&name, &musc, desc.as_deref()).await {
                Ok(ex) => emit(ctx.fmt, &ex, || {
                    println!(
                        "{} Exercise \"{}\" added (id: {})",
                        "info:".blue().bold(),
                        ex.name,
                        ex.exercise_id
                    )
                }),
                Err(GatewayError::Rejected(_)) => println!(
                    "{} Exercise \"{}\" already exists – use `ex list` to view all exercises",
                    "warning:".yellow().bold(),
                    name
                ),
                Err(e) => return Err(e.into()),
            }
        }

        ExerciseCmd::Import { file } => {
            let toml_str = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Could not read file: `{}`", file.display()))?;
            let import: ExerciseImport = toml::from_str(&toml_str)
                .context("Failed to parse TOML: Expected `[[exercise]] entries`")?;

            if import.exercise.is_empty() {
                println!("{}", "warning: no [[exercise]] entries found".yellow().bold());
                return Ok(());
            }

            let mut inserted = 0;
            let mut skipped = 0;
            let mut unknowns = BTreeSet::new();

            for ex in import.exercise {
                if ex.name.trim().is_empty() {
                    println!("{} entry without a name skipped", "warning:".yellow().bold());
                    skipped += 1;
                    continue;
                }

                let Some(musc) = canonical_muscle(&ex.primary_muscle) else {
                    unknown_muscle(&ex.name, &ex.primary_muscle);
                    skipped += 1;
                    unknowns.insert(ex.primary_muscle);
                    continue;
                };

                let added = store
                    .import_exercise(&ex.name, &musc, ex.description.as_deref())
                    .await
                    .with_context(|| format!("DB error inserting `{}`", ex.name))?;

                if added {
                    inserted += 1;
                    println!("{} `{}`", "ok:".green().bold(), ex.name);
                } else {
                    skipped += 1;
                    println!("{} `{}` (already exists)", "info:".blue().bold(), ex.name);
                }
            }

            println!(
                "\n{} {} inserted, {} skipped",
                "Summary:".cyan().bold(),
                inserted,
                skipped
            );

            if !unknowns.is_empty() {
                let allowed = ALLOWED_MUSCLES.iter().copied().collect::<Vec<_>>().join(", ");
                let bad = unknowns.into_iter().collect::<Vec<_>>().join(", ");

                println!();
                println!("{} {}", "Unknown muscles:".yellow().bold(), bad);
                println!("{} {}", "Allowed muscles:".cyan().bold(), allowed);
            }
        }

        ExerciseCmd::List { muscle } => {
            let filter = match muscle.as_deref().map(canonical_muscle) {
                Some(None) => {
                    unknown_muscle("filter", muscle.as_deref().unwrap_or_default());
                    return Ok(());
                }
                Some(m) => m,
                None => None,
            };

            let exercises: Vec<_> = store
                .fetch_exercises()
                .await?
                .into_iter()
                .filter(|e| filter.as_ref().is_none_or(|m| &e.primary_muscle == m))
                .collect();

            emit(ctx.fmt, &exercises, || {
                if exercises.is_empty() {
                    println!("{}", "  (no exercises found)".dimmed());
                    return;
                }
                println!("{}", "Exercises:".cyan().bold());

                let idx_w = exercises.len().to_string().len();
                let mut left = Vec::new();
                let mut right = Vec::new();
                for (i, ex) in exercises.iter().enumerate() {
                    let idx_col = format!("{:>width$}", i + 1, width = idx_w).yellow();
                    let desc = if ex.description.is_empty() {
                        String::new()
                    } else {
                        format!("– {}", ex.description).dimmed().to_string()
                    };
                    left.push(format!(
                        " {} • {} ({}) {}",
                        idx_col,
                        ex.name.bold(),
                        ex.primary_muscle,
                        desc
                    ));
                    right.push(ex.exercise_id.dimmed().to_string());
                }
                print_columns(left, right, &"|".blue().to_string());
            });
        }
    }

    Ok(())
}
