//! `gig` - CLI for gigline
//!
//! This binary provides the command-line interface for recording attendance
//! events, rendering the timeline, and printing statistics.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use gigline::cli::{
    AddCommand, Cli, Command, ConfigCommand, EditCommand, ListCommand, OutputFormat, RmCommand,
    ShowCommand, StatsCommand, TimelineCommand,
};
use gigline::event::{Attachment, Event, EventDraft, EventPatch};
use gigline::stats::StatsReport;
use gigline::timeline::TimelineRenderer;
use gigline::{init_logging, Config, Error, Store};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Add(cmd) => handle_add(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Edit(cmd) => handle_edit(&config, &cmd),
        Command::Rm(cmd) => handle_rm(&config, &cmd),
        Command::Timeline(cmd) => handle_timeline(&config, &cmd),
        Command::Stats(cmd) => handle_stats(&config, &cmd),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the store at the configured database path.
fn open_store(config: &Config) -> Result<Store> {
    Ok(Store::open(config.database_path())?)
}

fn handle_add(config: &Config, cmd: &AddCommand) -> Result<()> {
    let draft = EventDraft {
        year: cmd.year.clone(),
        date: cmd.date.clone(),
        location: cmd.location.clone(),
        remarks: cmd.remarks.clone(),
        band_photo: cmd.band_photo.as_deref().map(Attachment::from_path).transpose()?,
        live_photo: cmd.live_photo.as_deref().map(Attachment::from_path).transpose()?,
        video: cmd.video.as_deref().map(Attachment::from_path).transpose()?,
    };

    let store = open_store(config)?;
    let id = store.insert(&draft)?;
    println!("Added event {id}");
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let store = open_store(config)?;
    let events = store.list_all()?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
        OutputFormat::Plain => {
            if events.is_empty() {
                println!("No events recorded.");
                return Ok(());
            }
            for event in &events {
                println!("{}", event_line(event));
            }
        }
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> Result<()> {
    let store = open_store(config)?;
    let event = store.get(cmd.id)?.ok_or(Error::NotFound { id: cmd.id })?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&event)?),
        OutputFormat::Plain => print_event_detail(&event),
    }
    Ok(())
}

fn handle_edit(config: &Config, cmd: &EditCommand) -> Result<()> {
    let patch = EventPatch {
        year: cmd.year.clone(),
        date: cmd.date.clone(),
        location: cmd.location.clone(),
        remarks: cmd.remarks.clone(),
    };

    if patch.is_empty() {
        println!("Nothing to change for event {}.", cmd.id);
        return Ok(());
    }

    let mut store = open_store(config)?;
    let updated = store.update(cmd.id, &patch)?;
    println!("Updated event {}", updated.id);
    print_event_detail(&updated);
    Ok(())
}

fn handle_rm(config: &Config, cmd: &RmCommand) -> Result<()> {
    let store = open_store(config)?;
    if store.delete(cmd.id)? {
        println!("Deleted event {}", cmd.id);
    } else {
        // Absent id is a no-op, matching the store semantics.
        println!("No event with id {}, nothing deleted.", cmd.id);
    }
    Ok(())
}

fn handle_timeline(config: &Config, cmd: &TimelineCommand) -> Result<()> {
    let store = open_store(config)?;
    let events = store.list_all()?;

    let out_dir = cmd
        .out
        .clone()
        .unwrap_or_else(|| config.timeline_output_dir());
    let renderer = TimelineRenderer::new(out_dir, config.render.title.clone());
    let page = renderer.render(&events)?;

    println!("Rendered {} events to {}", events.len(), page.display());
    Ok(())
}

fn handle_stats(config: &Config, cmd: &StatsCommand) -> Result<()> {
    let store = open_store(config)?;
    let events = store.list_all()?;
    let report = StatsReport::from_events(&events);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => print!("{report}"),
    }
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let summary = store.summary()?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "total_events": summary.total_events,
            "distinct_years": summary.distinct_years,
            "db_size_bytes": summary.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("gig status");
        println!("----------");
        println!("Database:       {}", config.database_path().display());
        println!("Events:         {}", summary.total_events);
        println!("Distinct years: {}", summary.distinct_years);
        println!("Database size:  {} bytes", summary.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path: {}", config.database_path().display());
                println!();
                println!("[Render]");
                println!(
                    "  Output dir:    {}",
                    config.timeline_output_dir().display()
                );
                println!("  Title:         {}", config.render.title);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// One-line summary of an event for list output.
fn event_line(event: &Event) -> String {
    let mut line = format!(
        "{:>4}  {}  {}  {}",
        event.id, event.year, event.date, event.location
    );
    if let Some(remarks) = &event.remarks {
        line.push_str("  # ");
        line.push_str(remarks);
    }
    line
}

/// Multi-line detail view of an event.
fn print_event_detail(event: &Event) {
    println!("Event {}", event.id);
    println!("  Year:     {}", event.year);
    println!("  Date:     {}", event.date);
    println!("  Location: {}", event.location);
    if let Some(remarks) = &event.remarks {
        println!("  Remarks:  {remarks}");
    }
    for (label, attachment) in [
        ("Band photo", event.band_photo.as_ref()),
        ("Live photo", event.live_photo.as_ref()),
        ("Video", event.video.as_ref()),
    ] {
        if let Some(attachment) = attachment {
            println!(
                "  {label}: {} ({} bytes)",
                attachment.file_name,
                attachment.len()
            );
        }
    }
    println!("  Created:  {}", event.created_at.to_rfc3339());
}
