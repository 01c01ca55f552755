use anyhow::{Context, Result, ensure};
use colored::Colorize;

use ironlog::{
    gateway::{CatalogGateway, SqliteStore},
    records::RepScheme,
    utils::format_weight,
};

use crate::{cli::GoalCmd, output::emit};

use super::Ctx;

pub async fn handle(cmd: GoalCmd, store: &SqliteStore, ctx: &Ctx) -> Result<()> {
    let user = ctx.user()?;

    match cmd {
        GoalCmd::Add {
            exercise,
            reps,
            weight,
        } => {
            ensure!(reps > 0, "reps must be at least 1");
            ensure!(weight.is_finite() && weight > 0.0, "weight must be positive");

            let ex = store
                .find_exercise(&exercise)
                .await?
                .with_context(|| format!("no exercise `{exercise}` – see `ironlog ex list`"))?;
            let goal_id = store
                .add_goal(user, &ex.exercise_id, &RepScheme::from(reps), weight)
                .await?;

            println!(
                "{} goal {} × {} for {} (id: {})",
                "ok:".green().bold(),
                format_weight(weight),
                reps,
                ex.name.bold(),
                goal_id
            );
        }

        GoalCmd::List => {
            let goals = store.fetch_user_goals(user).await?;
            emit(ctx.fmt, &goals, || {
                if goals.is_empty() {
                    println!("{}", "  (no goals set)".dimmed());
                    return;
                }
                println!("{}", "Goals:".cyan().bold());
                for g in &goals {
                    let current = g
                        .current_weight
                        .map(format_weight)
                        .unwrap_or_else(|| "–".to_string());
                    let mark = if g.is_met() {
                        "✔".green().bold()
                    } else {
                        "•".yellow()
                    };
                    println!(
                        "  {} {} {} × {}  {} {}",
                        mark,
                        g.exercise.bold(),
                        format_weight(g.target_weight),
                        g.rep_scheme,
                        format!("now {current}").dimmed(),
                        format!("({:.0}%)", g.progress()).dimmed()
                    );
                }
            });
        }
    }

    Ok(())
}
