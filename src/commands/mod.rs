use anyhow::{Result, anyhow};

use ironlog::models::Role;

use crate::output::OutputFmt;

pub mod config;
pub mod exercise;
pub mod goal;
pub mod log;
pub mod programme;
pub mod record;
pub mod team;

/// Who is running the command and how they want the answer printed.
pub struct Ctx {
    pub fmt: OutputFmt,
    pub user: Option<String>,
    pub role: Option<Role>,
}

impl Ctx {
    pub fn user(&self) -> Result<&str> {
        self.user.as_deref().ok_or_else(|| {
            anyhow!("no user set – pass `--user <ID>` or run `ironlog config set user <ID>`")
        })
    }
}
