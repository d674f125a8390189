//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prodlog")]
#[command(about = "Shop-floor production log entry", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Entry fields; anything omitted is left as it is
#[derive(Args, Debug, Default)]
pub struct EntryArgs {
    /// Operator name (must match the operator list)
    #[arg(long)]
    pub operator: Option<String>,

    /// Machine name (must match the machine list)
    #[arg(long)]
    pub machine: Option<String>,

    /// Operation name (must match the operation list)
    #[arg(long)]
    pub operation: Option<String>,

    /// Quantity produced
    #[arg(long)]
    pub qty: Option<u32>,

    /// Job card number
    #[arg(long = "job-card")]
    pub job_card_no: Option<String>,

    /// Serial number
    #[arg(long = "sr-no")]
    pub sr_no: Option<u32>,

    /// Work description
    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(long)]
    pub remark1: Option<String>,

    #[arg(long)]
    pub remark2: Option<String>,

    /// Log against this date instead of the current one (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Log against this shift instead of the current one (first, second)
    #[arg(long)]
    pub shift: Option<String>,

    /// Start time (e.g. 7AM, "06:00 PM", or a bare hour)
    #[arg(long)]
    pub start: Option<String>,

    /// End time (e.g. 3PM, "06:00 AM", or a bare hour)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new prodlog workspace
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Base URL of the log server
        #[arg(long)]
        api_base: Option<String>,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },

    /// Set the working date (YYYY-MM-DD)
    Date { date: String },

    /// Select the shift; resets the time window to the shift default
    Shift { shift: String },

    /// Adjust the time window
    Time {
        /// Start time (e.g. 7AM, "06:00 PM", or a bare hour)
        #[arg(long)]
        start: Option<String>,

        /// End time (e.g. 3PM, "06:00 AM", or a bare hour)
        #[arg(long)]
        end: Option<String>,

        /// Step the start hour, wrapping around 12
        #[arg(long, allow_negative_numbers = true)]
        step_start: Option<i32>,

        /// Step the end hour, wrapping around 12
        #[arg(long, allow_negative_numbers = true)]
        step_end: Option<i32>,

        /// Flip start between AM and PM
        #[arg(long)]
        toggle_start: bool,

        /// Flip end between AM and PM
        #[arg(long)]
        toggle_end: bool,
    },

    /// Show the current date, shift, window and draft counts
    Status,

    /// Show selectable names for a category (operator, machine, operation)
    Options {
        category: String,

        /// Only names containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Validate and save a new entry to the current draft batch
    Add {
        #[command(flatten)]
        fields: EntryArgs,
    },

    /// List entries in the current draft batch
    List,

    /// Change a saved entry in the current draft batch
    Edit {
        /// Entry index as shown by 'prodlog list'
        index: usize,

        #[command(flatten)]
        fields: EntryArgs,
    },

    /// Delete an entry from the current draft batch
    Delete {
        /// Entry index as shown by 'prodlog list'
        index: usize,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Send the current draft batch to the log server
    Submit {
        /// Give up after this many seconds (default: config timeout_secs)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List draft batches not yet submitted
    Pending,
}
