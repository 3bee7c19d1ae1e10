use clap::{Parser, Subcommand};

/// Command-line interface definition for rDaytracker
/// Tap a category to track your day, with idle, wind-up and custom reminders
#[derive(Parser)]
#[command(
    name = "rdaytracker",
    version = env!("CARGO_PKG_VERSION"),
    about = "A day timeline tracker: tap categories, review totals, get reminders (SQLite backed)",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "activity", help = "Only start/switch/continue/stop entries")]
        activity: bool,
    },

    /// Start tracking a category (switches away from the running one)
    Start {
        /// work, cooking, commute, kids, study, rest, exercise, social
        category: String,
    },

    /// Stop the running block
    Stop,

    /// Append a timestamped note to the running (or latest) block
    Note {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Edit a block
    Edit {
        id: i64,

        #[arg(long = "cat", help = "New category")]
        category: Option<String>,

        #[arg(long = "start", help = "Start: HH:MM (today) or \"YYYY-MM-DD HH:MM\"")]
        start: Option<String>,

        #[arg(long = "end", help = "End: HH:MM (today) or \"YYYY-MM-DD HH:MM\"")]
        end: Option<String>,

        #[arg(long = "note", help = "Replace the note")]
        note: Option<String>,
    },

    /// Delete a block by ID, or every block of today
    Del {
        #[arg(required_unless_present = "today", conflicts_with = "today")]
        id: Option<i64>,

        #[arg(long = "today", help = "Clear all blocks of today (asks for confirmation)")]
        today: bool,
    },

    /// List the blocks of a day
    List {
        #[arg(long, short, help = "Day to show (YYYY-MM-DD, default: today)")]
        date: Option<String>,
    },

    /// Show what is running and the notification state
    Status,

    /// Show today's totals per category
    Stats,

    /// Print the wind-up summary of today
    Windup,

    /// Export today's blocks as JSON
    Export {
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// View or change the runtime settings
    Settings {
        #[arg(long = "idle", value_name = "MINUTES", help = "Idle reminder threshold")]
        idle: Option<i64>,

        #[arg(long = "windup", value_name = "HH:MM", help = "Daily wind-up time")]
        windup: Option<String>,

        #[arg(long = "enable", conflicts_with = "disable", help = "Enable reminders")]
        enable: bool,

        #[arg(long = "disable", help = "Disable reminders")]
        disable: bool,
    },

    /// Desktop notification permission
    Notify {
        #[arg(long = "enable", help = "Request permission to show notifications")]
        enable: bool,

        #[arg(long = "test", help = "Send a test notification")]
        test: bool,
    },

    /// Manage custom reminders
    Reminder {
        #[command(subcommand)]
        action: ReminderCmd,
    },

    /// Run the reminder engine in the foreground
    Watch {
        #[arg(long = "once", help = "Evaluate idle and custom reminders once, then exit")]
        once: bool,

        #[arg(long = "console", help = "Print notifications instead of using the desktop")]
        console: bool,
    },
}

#[derive(Subcommand)]
pub enum ReminderCmd {
    /// Create a reminder
    Add {
        category: String,

        title: String,

        #[arg(long = "type", default_value = "today", help = "today | date | monthly")]
        kind: String,

        #[arg(long, help = "Date (YYYY-MM-DD), required for date and monthly")]
        date: Option<String>,

        #[arg(long, help = "Time of day (HH:MM)")]
        time: Option<String>,

        #[arg(long, value_name = "MINUTES", help = "Repeat interval for today reminders")]
        repeat: Option<i64>,
    },

    /// List reminders
    List {
        #[arg(long = "cat", help = "Only this category")]
        category: Option<String>,
    },

    /// Mark a reminder done (or open again)
    Done { id: i64 },

    /// Silence a reminder for a while
    Snooze {
        id: i64,

        #[arg(long, value_name = "MINUTES")]
        minutes: Option<i64>,
    },

    /// Pause or resume a reminder
    Toggle { id: i64 },

    /// Delete a reminder
    Del { id: i64 },
}
