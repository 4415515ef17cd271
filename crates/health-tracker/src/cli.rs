use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracker_core::{ActivityType, MealPattern, OutputFormat};
use tracker_validate::RangeRequest;

#[derive(Parser)]
#[command(name = "tracker", version)]
#[command(about = "Personal health tracker: weight, exercise, fasting and soda logs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Data directory (overrides TRACKER_DATA_DIR and the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Use the test data set and fixed list anchors
    #[arg(long, global = true)]
    pub test_mode: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Accept entries dated after today
    #[arg(long, global = true)]
    pub allow_future: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track body weight
    Weight {
        #[command(subcommand)]
        cmd: WeightCommands,
    },

    /// Track exercise sessions
    Exercise {
        #[command(subcommand)]
        cmd: ExerciseCommands,
    },

    /// Track daily fasting patterns
    Fasting {
        #[command(subcommand)]
        cmd: FastingCommands,
    },

    /// Track soda consumption
    Soda {
        #[command(subcommand)]
        cmd: SodaCommands,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

/// Shared `list` range flags.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// Start date (YYYY-MM-DD)
    #[arg(short, long)]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(short, long)]
    pub to: Option<String>,

    /// Show the last 7 days
    #[arg(short, long)]
    pub week: bool,

    /// Show the last month
    #[arg(short, long)]
    pub month: bool,
}

impl RangeArgs {
    pub fn to_request(&self) -> RangeRequest {
        RangeRequest {
            from: self.from.clone(),
            to: self.to.clone(),
            week: self.week,
            month: self.month,
        }
    }
}

#[derive(Subcommand)]
pub enum WeightCommands {
    /// Record a weight
    Add {
        /// Weight in pounds
        #[arg(short = 'v', long)]
        value: f64,

        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show the weight recorded on a date
    Get {
        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List weights with summary statistics
    List(RangeArgs),

    /// Edit a weight entry by ID
    Update {
        /// Entry ID (e.g. w00001)
        id: String,

        /// New weight in pounds
        #[arg(short = 'v', long)]
        value: Option<f64>,

        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// New notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a weight entry by ID
    Delete {
        /// Entry ID (e.g. w00001)
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ExerciseCommands {
    /// Record an exercise session
    Add {
        /// Activity type
        #[arg(short, long, value_enum)]
        activity: ActivityType,

        /// Activity name when type is 'other'
        #[arg(short, long)]
        other_activity: Option<String>,

        /// Duration in minutes
        #[arg(short = 'u', long, allow_negative_numbers = true)]
        duration: i32,

        /// Date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Mark the session as completed
        #[arg(short, long)]
        completed: bool,
    },

    /// Show the session recorded on a date
    Get {
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List sessions with summary statistics
    List(RangeArgs),

    /// Edit the session recorded on a date
    Update {
        /// Date of the entry to edit (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        #[arg(short, long, value_enum)]
        activity: Option<ActivityType>,

        #[arg(short, long)]
        other_activity: Option<String>,

        #[arg(short = 'u', long, allow_negative_numbers = true)]
        duration: Option<i32>,

        #[arg(short, long)]
        notes: Option<String>,

        /// Mark as completed
        #[arg(short, long)]
        completed: bool,

        /// Mark as not completed
        #[arg(long)]
        not_completed: bool,
    },

    /// Delete the session recorded on a date
    Delete {
        #[arg(short, long)]
        date: String,
    },
}

#[derive(Subcommand)]
pub enum FastingCommands {
    /// Record the day's eating pattern
    Add {
        /// Pattern actually followed
        #[arg(short, long, value_enum)]
        pattern: MealPattern,

        /// Planned pattern (default: weekday schedule)
        #[arg(short, long, value_enum)]
        expected: Option<MealPattern>,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show the pattern recorded on a date
    Get {
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List patterns with compliance statistics
    List(RangeArgs),

    /// Edit the pattern recorded on a date
    Update {
        #[arg(short, long)]
        date: String,

        #[arg(short, long, value_enum)]
        pattern: Option<MealPattern>,

        #[arg(short, long, value_enum)]
        expected: Option<MealPattern>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete the pattern recorded on a date
    Delete {
        #[arg(short, long)]
        date: String,
    },
}

#[derive(Subcommand)]
pub enum SodaCommands {
    /// Record the day's soda consumption
    Add {
        /// Soda was consumed
        #[arg(short, long)]
        consumed: bool,

        /// Ounces consumed
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        quantity: f64,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show the consumption recorded on a date
    Get {
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List consumption with compliance statistics
    List(RangeArgs),

    /// Edit the consumption recorded on a date
    Update {
        #[arg(short, long)]
        date: String,

        #[arg(short, long)]
        consumed: bool,

        #[arg(long)]
        not_consumed: bool,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<f64>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete the consumption recorded on a date
    Delete {
        #[arg(short, long)]
        date: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a commented config template if none exists
    Init,

    /// Print the config file path
    Path,
}
