use anyhow::{Context, Result};
use colored::Colorize;
use ironlog::config::{self, Config, KNOWN_KEYS};

use crate::{cli::ConfigCmd, output::emit};

use super::Ctx;

pub fn handle(cmd: ConfigCmd, ctx: &Ctx) -> Result<()> {
    let config_path = config::default_path()?;
    let mut cfg = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    match cmd {
        ConfigCmd::List => {
            emit(ctx.fmt, &cfg.map, || {
                if cfg.map.is_empty() {
                    println!("{}", "(no config set)".dimmed());
                } else {
                    println!("{}", "Config:".cyan().bold());
                    for (k, v) in &cfg.map {
                        println!("  {} = {}", k.green(), v);
                    }
                }
            });
        }

        ConfigCmd::Get { key } => match cfg.get(&key) {
            Some(val) => println!("{}", val),
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                println!(
                    "{} `{}` is not read by ironlog (known keys: {})",
                    "warning:".yellow().bold(),
                    key,
                    KNOWN_KEYS.join(", ")
                );
            }
            if key == "role" {
                val.parse::<ironlog::models::Role>()
                    .map_err(anyhow::Error::msg)?;
            }

            cfg.map.insert(key.clone(), val.clone());
            cfg.save(&config_path)?;
            println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), val);
        }

        ConfigCmd::Unset { key } => {
            if cfg.map.remove(&key).is_some() {
                cfg.save(&config_path)?;
                println!("{} removed `{}`", "info:".blue().bold(), key.green());
            } else {
                println!("{} key `{}` not found", "warning:".yellow().bold(), key);
            }
        }
    }

    Ok(())
}
