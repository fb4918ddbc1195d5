use clap::{Args, Parser, Subcommand};

use crate::form::{IntervalUnit, ScheduleType};

#[derive(Parser)]
#[command(name = "accessiscan", version, about = "Website accessibility scans from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Backend base URL (overrides ACCESSISCAN_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the scanning backend is up
    Health(HealthArgs),
    /// Request a scan now or on a schedule
    Scan(ScanArgs),
    /// Manage scheduled scan jobs
    Jobs(JobsArgs),
    /// Manage addresses subscribed to product updates
    Emails(EmailsArgs),
    /// Run connectivity checks against the backend
    Doctor(DoctorArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct HealthArgs {
    /// Keep polling until the backend answers
    #[arg(short, long)]
    pub wait: bool,

    /// Maximum polls after the first one (with --wait)
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Seconds between polls (with --wait)
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Args, Clone, Default)]
pub struct ScanArgs {
    /// Website to scan
    #[arg(short, long)]
    pub url: Option<String>,

    /// Address the report is sent to
    #[arg(short, long)]
    pub email: Option<String>,

    /// When to run the scan
    #[arg(short, long, value_enum, default_value_t = ScheduleType::Immediate)]
    pub schedule: ScheduleType,

    /// IANA timezone for scheduled scans
    #[arg(long)]
    pub timezone: Option<String>,

    /// Cron minute field
    #[arg(long)]
    pub minute: Option<String>,

    /// Cron hour field
    #[arg(long)]
    pub hour: Option<String>,

    /// Cron day-of-week field, e.g. mon-fri
    #[arg(long)]
    pub day_of_week: Option<String>,

    /// Interval length
    #[arg(long)]
    pub every: Option<String>,

    /// Interval unit
    #[arg(long, value_enum)]
    pub unit: Option<IntervalUnit>,

    /// Local date-time for a one-off scan, e.g. 2030-01-31T09:00
    #[arg(long)]
    pub at: Option<String>,

    /// Also subscribe the email to product updates
    #[arg(long)]
    pub subscribe: bool,

    /// Name stored with the subscription
    #[arg(long, requires = "subscribe")]
    pub name: Option<String>,

    /// Show estimated progress for an immediate scan
    #[arg(long)]
    pub progress: bool,

    /// Do not list jobs after a successful request
    #[arg(long)]
    pub no_list: bool,
}

#[derive(Args, Clone)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub command: JobsCommand,
}

#[derive(Subcommand, Clone)]
pub enum JobsCommand {
    /// List scheduled jobs
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one job
    Show {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a scheduled job
    Delete { id: String },
    /// Run a job's scan once, right now
    Run { id: String },
}

#[derive(Args, Clone)]
pub struct EmailsArgs {
    #[command(subcommand)]
    pub command: EmailsCommand,
}

#[derive(Subcommand, Clone)]
pub enum EmailsCommand {
    /// Subscribe an address
    Add {
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// List subscribed addresses
    List {
        /// Include deactivated addresses
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change an address or its display name
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Deactivate an address
    Delete { id: String },
}

#[derive(Args, Clone)]
pub struct DoctorArgs {
    /// Also request a real scan as part of the checks
    #[arg(long)]
    pub with_scan: bool,

    /// Address used for the test scan
    #[arg(long, default_value = "test@gmail.com")]
    pub scan_email: String,

    /// Website used for the test scan
    #[arg(long, default_value = "https://example.com")]
    pub scan_url: String,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
