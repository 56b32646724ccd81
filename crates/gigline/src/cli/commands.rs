//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Add command arguments (the create path).
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Year label for the event (free text)
    #[arg(short, long)]
    pub year: String,

    /// Date of the event (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: String,

    /// Location ("City Venue", first word is the city)
    #[arg(short, long)]
    pub location: String,

    /// Optional remarks
    #[arg(short, long)]
    pub remarks: Option<String>,

    /// Path to the band photo file
    #[arg(long, value_name = "FILE")]
    pub band_photo: Option<PathBuf>,

    /// Path to the live photo file
    #[arg(long, value_name = "FILE")]
    pub live_photo: Option<PathBuf>,

    /// Path to a video clip file
    #[arg(long, value_name = "FILE")]
    pub video: Option<PathBuf>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Event id
    pub id: i64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Edit command arguments (the update path).
///
/// Omitted fields keep their stored values; attachments are not editable.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Event id
    pub id: i64,

    /// Replacement year label
    #[arg(short, long)]
    pub year: Option<String>,

    /// Replacement date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Replacement location
    #[arg(short, long)]
    pub location: Option<String>,

    /// Replacement remarks
    #[arg(short, long)]
    pub remarks: Option<String>,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RmCommand {
    /// Event id
    pub id: i64,
}

/// Timeline command arguments.
#[derive(Debug, Args)]
pub struct TimelineCommand {
    /// Output directory for the rendered page and assets
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
