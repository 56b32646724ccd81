//! `gigline` - A local journal for concert and festival attendance
//!
//! This library provides the core functionality for recording attendance
//! events (with photo and video attachments) in a local `SQLite` database,
//! rendering them as an HTML timeline, and computing aggregate statistics.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod stats;
pub mod storage;
pub mod timeline;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{Attachment, AttachmentKind, Event, EventDraft, EventPatch};
pub use logging::init_logging;
pub use stats::StatsReport;
pub use storage::{Store, StoreSummary};
pub use timeline::TimelineRenderer;
