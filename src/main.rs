use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use ironlog::{
    config::{self, Config, DEFAULT_DB, DEFAULT_LOG},
    gateway::SqliteStore,
    logging,
    models::Role,
};
use output::OutputFmt;
use tracing::debug;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg = match config::default_path().and_then(|p| Config::load(&p)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("warning: config not loaded ({e}), using defaults");
            Config::default()
        }
    };
    let env = |k: &str| std::env::var(k).ok();

    let log = cfg
        .resolve("log", None, env)
        .unwrap_or_else(|| DEFAULT_LOG.to_string());
    logging::init(&log);

    let role_flag = cli.role.map(|r| r.to_string());
    let role = cfg
        .resolve("role", role_flag.as_deref(), env)
        .map(|r| r.parse::<Role>())
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let ctx = commands::Ctx {
        fmt: OutputFmt::from_flag(cli.json),
        user: cfg.resolve("user", cli.user.as_deref(), env),
        role,
    };

    if let Commands::Config(cmd) = cli.cmd {
        return commands::config::handle(cmd, &ctx);
    }

    let db_path = cfg
        .resolve("db", cli.db.as_deref(), env)
        .unwrap_or_else(|| DEFAULT_DB.to_string());
    let store = SqliteStore::open(&db_path)
        .await
        .with_context(|| format!("opening database `{db_path}`"))?;
    debug!(db = %db_path, user = ?ctx.user, role = ?ctx.role, "store opened");

    match cli.cmd {
        Commands::Programme(cmd) => commands::programme::handle(cmd, &store, &ctx).await?,
        Commands::Log(cmd) => commands::log::handle(cmd, &store, &ctx).await?,
        Commands::Exercise(cmd) => commands::exercise::handle(cmd, &store, &ctx).await?,
        Commands::Team(cmd) => commands::team::handle(cmd, &store, &ctx).await?,
        Commands::Pr(cmd) => commands::record::handle(cmd, &store, &ctx).await?,
        Commands::Goal(cmd) => commands::goal::handle(cmd, &store, &ctx).await?,
        Commands::Config(cmd) => commands::config::handle(cmd, &ctx)?,
    }

    Ok(())
}
