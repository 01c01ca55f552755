use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ironlog::{models::Role, utils::OneRMFormula};

#[derive(Parser)]
#[command(name = "ironlog", version, about = "Training programmes, set logs and personal records")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    /// Act as this user (overrides IRONLOG_USER and the `user` config key).
    #[arg(global = true, long, short = 'u')]
    pub user: Option<String>,

    /// Author role used when validating programmes.
    #[arg(global = true, long, value_enum)]
    pub role: Option<Role>,

    /// Database file (overrides IRONLOG_DB and the `db` config key).
    #[arg(global = true, long)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Programme authoring and browsing
    #[command(subcommand, visible_alias = "p")]
    Programme(ProgrammeCmd),

    /// Submit logged sets and reconcile personal records
    #[command(subcommand, visible_alias = "l")]
    Log(LogCmd),

    /// Exercise catalog
    #[command(subcommand, visible_alias = "ex")]
    Exercise(ExerciseCmd),

    /// Teams
    #[command(subcommand, visible_alias = "t")]
    Team(TeamCmd),

    /// Personal records and exercise history
    #[command(subcommand)]
    Pr(PrCmd),

    /// Strength goals
    #[command(subcommand, visible_alias = "g")]
    Goal(GoalCmd),

    /// View or edit ironlog config
    #[command(subcommand)]
    Config(ConfigCmd),
}

#[derive(Subcommand)]
pub enum ProgrammeCmd {
    /// Validate and store a programme from a TOML file
    #[command(visible_alias = "c")]
    Create { file: PathBuf },

    /// Check a programme file without storing it
    #[command(visible_alias = "v")]
    Validate { file: PathBuf },

    /// List programmes visible to the current user
    #[command(visible_alias = "ls")]
    List,

    /// Show a programme with all workouts, exercises and sets
    #[command(visible_alias = "s")]
    Show { programme: String },

    /// Print a JSON logging template for `log submit`
    Template {
        programme: String,

        /// Only this workout (1-based)
        #[arg(long, short = 'w')]
        workout: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum LogCmd {
    /// Submit a JSON file of logged workouts
    #[command(visible_alias = "s")]
    Submit { file: PathBuf },
}

#[derive(Subcommand)]
pub enum ExerciseCmd {
    /// Add a new exercise
    #[command(visible_alias = "a")]
    Add {
        /// Exercise name
        name: String,

        /// Primary muscle group
        #[arg(short, long)]
        muscle: String,

        /// Exercise description
        #[arg(short, long)]
        desc: Option<String>,
    },

    /// Import exercises from a TOML file
    #[command(visible_alias = "i")]
    Import {
        /// Path to TOML file
        file: PathBuf,
    },

    /// List all exercises
    #[command(visible_alias = "ls")]
    List {
        /// Filter by muscle group
        #[arg(short, long)]
        muscle: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TeamCmd {
    /// Create a team coached by the current user
    #[command(visible_alias = "a")]
    Add { name: String },

    /// Join a team as the current user
    Join { team: String },

    /// List teams
    #[command(visible_alias = "ls")]
    List,
}

#[derive(Subcommand)]
pub enum PrCmd {
    /// List personal records
    #[command(visible_alias = "ls")]
    List {
        /// Only this exercise (id or name)
        #[arg(short, long)]
        exercise: Option<String>,

        /// Formula for the estimated one-rep max
        #[arg(short, long, value_enum, default_value_t = OneRMFormula::Epley)]
        formula: OneRMFormula,
    },

    /// Per-day history of an exercise
    #[command(visible_alias = "h")]
    History { exercise: String },
}

#[derive(Subcommand)]
pub enum GoalCmd {
    /// Set a target weight for an exercise at a rep count
    #[command(visible_alias = "a")]
    Add {
        exercise: String,
        reps: u32,
        weight: f64,
    },

    /// List goals with progress
    #[command(visible_alias = "ls")]
    List,
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Remove a key
    Unset { key: String },
}
