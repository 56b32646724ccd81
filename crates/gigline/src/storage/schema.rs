//! `SQLite` schema definitions for gigline.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the events table.
///
/// Attachments are stored inline as BLOB columns; none of them is required
/// at the storage level.
pub const CREATE_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year TEXT NOT NULL,
    date TEXT NOT NULL,
    location TEXT NOT NULL,
    remarks TEXT,
    band_photo_name TEXT,
    band_photo BLOB,
    live_photo_name TEXT,
    live_photo BLOB,
    video_name TEXT,
    video BLOB,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the facet index on year.
pub const CREATE_YEAR_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_events_year ON events(year)
";

/// SQL statement to create the facet index on date.
pub const CREATE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_events_date ON events(date)
";

/// SQL statement to create the facet index on location.
pub const CREATE_LOCATION_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_events_location ON events(location)
";

/// SQL statement to create the facet index on remarks.
pub const CREATE_REMARKS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_events_remarks ON events(remarks)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_EVENTS_TABLE,
    CREATE_YEAR_INDEX,
    CREATE_DATE_INDEX,
    CREATE_LOCATION_INDEX,
    CREATE_REMARKS_INDEX,
    CREATE_METADATA_TABLE,
];
