use anyhow::{Context, Result};
use colored::Colorize;

use ironlog::{
    error::GatewayError,
    gateway::{CatalogGateway, SqliteStore},
};

use crate::{
    cli::TeamCmd,
    output::{emit, print_columns},
};

use super::Ctx;

pub async fn handle(cmd: TeamCmd, store: &SqliteStore, ctx: &Ctx) -> Result<()> {
    match cmd {
        TeamCmd::Add { name } => {
            let coach = ctx.user()?;
            match store.add_team(&name, Some(coach)).await {
                Ok(team) => emit(ctx.fmt, &team, || {
                    println!(
                        "{} team `{}` created (id: {})",
                        "ok:".green().bold(),
                        team.name,
                        team.team_id
                    )
                }),
                Err(GatewayError::Rejected(msg)) => {
                    println!("{} {}", "warning:".yellow().bold(), msg)
                }
                Err(e) => return Err(e.into()),
            }
        }

        TeamCmd::Join { team } => {
            let user = ctx.user()?;
            let found = store
                .find_team(&team)
                .await?
                .with_context(|| format!("no team named `{team}`"))?;
            store.add_team_member(&found.team_id, user).await?;
            println!("{} `{}` joined `{}`", "ok:".green().bold(), user, found.name);
        }

        TeamCmd::List => {
            let teams = store.fetch_teams().await?;
            emit(ctx.fmt, &teams, || {
                if teams.is_empty() {
                    println!("{}", "  (no teams found)".dimmed());
                    return;
                }
                println!("{}", "Teams:".cyan().bold());

                let mut left = Vec::new();
                let mut right = Vec::new();
                for t in &teams {
                    let coach = t
                        .coach_id
                        .as_deref()
                        .map(|c| format!("coach {c}"))
                        .unwrap_or_else(|| "no coach".to_string());
                    left.push(format!(" • {} {}", t.name.bold(), format!("({coach})").dimmed()));
                    right.push(t.team_id.dimmed().to_string());
                }
                print_columns(left, right, &"|".blue().to_string());
            });
        }
    }

    Ok(())
}
