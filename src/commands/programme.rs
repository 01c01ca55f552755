use anyhow::{Context, Result, bail};
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;

use ironlog::{
    error::ProgrammeError,
    gateway::{CatalogGateway, SqliteStore},
    models::ProgrammeDetails,
    programme::{create_programme, load_programme_file, logging_template},
    validation::validate_programme,
};

use crate::{
    cli::ProgrammeCmd,
    output::{OutputFmt, emit, print_columns},
};

use super::Ctx;

#[derive(Serialize)]
struct Rejected<'a> {
    status: &'static str,
    errors: &'a [String],
}

fn print_problems(fmt: OutputFmt, errors: &[String]) {
    emit(
        fmt,
        &Rejected {
            status: "Error",
            errors,
        },
        || {
            println!("{}", "Programme has problems:".red().bold());
            let w = errors.len().to_string().len();
            for (i, e) in errors.iter().enumerate() {
                println!(" {} {}", format!("{:>w$}.", i + 1, w = w).yellow(), e);
            }
        },
    );
}

pub async fn handle(cmd: ProgrammeCmd, store: &SqliteStore, ctx: &Ctx) -> Result<()> {
    match cmd {
        ProgrammeCmd::Create { file } => {
            let programme = load_programme_file(&file)?;
            let owner = ctx.user()?;

            match create_programme(store, &programme, ctx.role, owner).await {
                Ok(created) => emit(ctx.fmt, &created, || {
                    println!(
                        "{} `{}` created (id: {})",
                        "ok:".green().bold(),
                        programme.name,
                        created.programme_id
                    );
                }),
                Err(ProgrammeError::Invalid(errors)) => {
                    print_problems(ctx.fmt, &errors);
                    bail!("programme `{}` was not created", programme.name);
                }
                Err(e) => return Err(e).context("storing programme"),
            }
        }

        ProgrammeCmd::Validate { file } => {
            let programme = load_programme_file(&file)?;
            let errors = validate_programme(&programme, ctx.role);
            if errors.is_empty() {
                emit(
                    ctx.fmt,
                    &Rejected {
                        status: "Success",
                        errors: &[],
                    },
                    || println!("{} `{}` is valid", "ok:".green().bold(), programme.name),
                );
            } else {
                print_problems(ctx.fmt, &errors);
                bail!("{} problem(s) found", errors.len());
            }
        }

        ProgrammeCmd::List => {
            let progs = store.fetch_user_programmes(ctx.user()?).await?;

            emit(ctx.fmt, &progs, || {
                if progs.is_empty() {
                    println!("{}", "  (no programmes found)".dimmed());
                    return;
                }
                println!("{}", "Programmes:".cyan().bold());

                let idx_w = progs.len().to_string().len();
                let mut left = Vec::new();
                let mut right = Vec::new();
                for (i, p) in progs.iter().enumerate() {
                    let idx = format!("{:>width$}", i + 1, width = idx_w).yellow();
                    left.push(format!(
                        " {} • {} {}",
                        idx,
                        p.name.bold(),
                        format!("({}, {} workouts)", p.kind, p.workouts).dimmed()
                    ));
                    right.push(
                        format!("{} · added {}", p.programme_id, p.created_at.get(..10).unwrap_or(&p.created_at))
                            .dimmed()
                            .to_string(),
                    );
                }
                print_columns(left, right, &"|".blue().to_string());
            });
        }

        ProgrammeCmd::Show { programme } => {
            let details = fetch(store, &programme).await?;
            emit(ctx.fmt, &details, || pretty_details(&details));
        }

        ProgrammeCmd::Template { programme, workout } => {
            let details = fetch(store, &programme).await?;
            let mut template = logging_template(&details);

            if let Some(n) = workout {
                let idx = n
                    .checked_sub(1)
                    .filter(|i| *i < template.len())
                    .with_context(|| {
                        format!("programme has {} workout(s), no workout {}", template.len(), n)
                    })?;
                template = vec![template.swap_remove(idx)];
            }

            // Templates are meant to be edited and fed back, so always JSON.
            println!("{}", serde_json::to_string_pretty(&template)?);
        }
    }

    Ok(())
}

async fn fetch(store: &SqliteStore, programme_id: &str) -> Result<ProgrammeDetails> {
    store
        .fetch_programme_details(programme_id)
        .await?
        .with_context(|| format!("no programme with id `{programme_id}`"))
}

fn pretty_details(p: &ProgrammeDetails) {
    let team = p
        .team_id
        .as_deref()
        .map(|t| format!(", team {t}"))
        .unwrap_or_default();
    println!(
        "{} {} {}",
        "Programme:".cyan().bold(),
        p.name.bold(),
        format!("({}{})", p.kind, team).dimmed()
    );

    for (w_idx, w) in p.workouts.iter().enumerate() {
        println!("\n{} {}", format!("{}.", w_idx + 1).yellow(), w.name.bold());

        for (e_idx, e) in w.exercises.iter().enumerate() {
            let connector = if e_idx + 1 == w.exercises.len() {
                "└─"
            } else {
                "├─"
            };
            let sets = e
                .sets
                .iter()
                .map(|s| format!("{}@{}%", s.reps, s.percentage))
                .join("  ");
            println!("   {} {}  {}", connector, e.name, sets.dimmed());
        }
    }
}
