//! Command-line interface for gigline.
//!
//! This module provides the CLI structure and command definitions for the
//! `gig` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, EditCommand, ListCommand, OutputFormat, RmCommand, ShowCommand,
    StatsCommand, StatusCommand, TimelineCommand,
};

/// gig - Your concert and festival attendance journal
///
/// Records each show (year, date, location, remarks, photos, video) in a
/// local database, renders them as an HTML timeline, and computes
/// attendance statistics.
#[derive(Debug, Parser)]
#[command(name = "gig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new event
    Add(AddCommand),

    /// List all recorded events
    List(ListCommand),

    /// Show one event by id
    Show(ShowCommand),

    /// Edit an event's text fields
    Edit(EditCommand),

    /// Delete an event by id
    Rm(RmCommand),

    /// Render the HTML timeline
    Timeline(TimelineCommand),

    /// Print attendance statistics
    Stats(StatsCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
