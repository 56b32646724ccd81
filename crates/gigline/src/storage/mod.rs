//! Storage layer for gigline.
//!
//! This module provides `SQLite`-based persistent storage for attendance
//! events, including inline binary attachments and the secondary facet
//! indexes used for lookup.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::event::{Attachment, Event, EventDraft, EventPatch};

/// Column list shared by every event SELECT.
const EVENT_COLUMNS: &str = "id, year, date, location, remarks, \
    band_photo_name, band_photo, live_photo_name, live_photo, \
    video_name, video, created_at";

/// Storage engine for attendance events.
///
/// Provides persistent storage using `SQLite` with:
/// - Auto-assigned integer ids, never reused
/// - Inline BLOB attachments
/// - Non-unique facet indexes on year, date, location, and remarks
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Store {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a new event, assigning the next identifier.
    ///
    /// The record is durable once this returns. Returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, draft: &EventDraft) -> Result<i64> {
        let created_at = Utc::now().to_rfc3339();

        self.conn.execute(
            r"
            INSERT INTO events (year, date, location, remarks,
                band_photo_name, band_photo, live_photo_name, live_photo,
                video_name, video, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
            params![
                draft.year,
                draft.date,
                draft.location,
                draft.remarks,
                draft.band_photo.as_ref().map(|a| a.file_name.as_str()),
                draft.band_photo.as_ref().map(|a| a.data.as_slice()),
                draft.live_photo.as_ref().map(|a| a.file_name.as_str()),
                draft.live_photo.as_ref().map(|a| a.data.as_slice()),
                draft.video.as_ref().map(|a| a.file_name.as_str()),
                draft.video.as_ref().map(|a| a.data.as_slice()),
                created_at,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted event with id {}", id);
        Ok(id)
    }

    /// Get an event by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Event>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                [id],
                Self::row_to_event,
            )
            .optional()?;
        Ok(result)
    }

    /// Return every event in storage (insertion) order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_all(&self) -> Result<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id"))?;

        let events = stmt
            .query_map([], Self::row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }

    /// Apply a patch to the event with the given id.
    ///
    /// Only the patched text fields change; attachments and the id are
    /// preserved. Runs as one read-modify-write transaction, rolled back if
    /// any step fails. Returns the updated event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no event with the id exists, or an
    /// error if the database operation fails.
    pub fn update(&mut self, id: i64, patch: &EventPatch) -> Result<Event> {
        let tx = self.conn.transaction()?;

        let mut event = tx
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                [id],
                Self::row_to_event,
            )
            .optional()?
            .ok_or(Error::NotFound { id })?;

        patch.apply(&mut event);

        tx.execute(
            r"
            UPDATE events SET year = ?1, date = ?2, location = ?3, remarks = ?4
            WHERE id = ?5
            ",
            params![event.year, event.date, event.location, event.remarks, id],
        )?;

        tx.commit()?;
        debug!("Updated event {}", id);
        Ok(event)
    }

    /// Delete an event by id.
    ///
    /// Returns `true` if an event was deleted, `false` if the id was absent
    /// (a no-op, matching the underlying store semantics).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
        if affected > 0 {
            debug!("Deleted event {}", id);
        }
        Ok(affected > 0)
    }

    /// Count total events in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get a summary of the store's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn summary(&self) -> Result<StoreSummary> {
        let total_events = self.count()?;

        let distinct_years: i64 = self
            .conn
            .query_row("SELECT COUNT(DISTINCT year) FROM events", [], |row| {
                row.get(0)
            })?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StoreSummary {
            total_events,
            distinct_years,
            db_size_bytes,
        })
    }

    /// Convert a database row to an Event struct.
    fn row_to_event(row: &rusqlite::Row) -> rusqlite::Result<Event> {
        let id: i64 = row.get(0)?;
        let year: String = row.get(1)?;
        let date: String = row.get(2)?;
        let location: String = row.get(3)?;
        let remarks: Option<String> = row.get(4)?;
        let band_photo = Self::column_to_attachment(row, 5, 6)?;
        let live_photo = Self::column_to_attachment(row, 7, 8)?;
        let video = Self::column_to_attachment(row, 9, 10)?;
        let created_at_str: String = row.get(11)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(Event {
            id,
            year,
            date,
            location,
            remarks,
            band_photo,
            live_photo,
            video,
            created_at,
        })
    }

    /// Read an attachment from a name/data column pair.
    ///
    /// The attachment is present iff the data column is non-null.
    fn column_to_attachment(
        row: &rusqlite::Row,
        name_idx: usize,
        data_idx: usize,
    ) -> rusqlite::Result<Option<Attachment>> {
        let data: Option<Vec<u8>> = row.get(data_idx)?;
        let Some(data) = data else {
            return Ok(None);
        };
        let file_name: Option<String> = row.get(name_idx)?;
        Ok(Some(Attachment {
            file_name: file_name.unwrap_or_else(|| "attachment".to_string()),
            data,
        }))
    }
}

/// Summary of the store's contents.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreSummary {
    /// Total number of events stored.
    pub total_events: i64,
    /// Number of distinct year labels.
    pub distinct_years: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> Store {
        Store::open_in_memory().expect("failed to create test store")
    }

    fn create_test_draft(year: &str, date: &str, location: &str) -> EventDraft {
        EventDraft {
            year: year.to_string(),
            date: date.to_string(),
            location: location.to_string(),
            remarks: None,
            band_photo: Some(Attachment::new("band.jpg", vec![0xFF, 0xD8])),
            live_photo: Some(Attachment::new("live.jpg", vec![0xFF, 0xD9])),
            video: None,
        }
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_insert_and_get() {
        let store = create_test_store();
        let draft = create_test_draft("2021", "2021-07-15", "Beijing Livehouse");

        let id = store.insert(&draft).unwrap();
        let event = store.get(id).unwrap().expect("event should exist");

        assert_eq!(event.id, id);
        assert_eq!(event.year, "2021");
        assert_eq!(event.date, "2021-07-15");
        assert_eq!(event.location, "Beijing Livehouse");
        assert!(event.remarks.is_none());
        assert_eq!(event.band_photo.as_ref().unwrap().file_name, "band.jpg");
        assert_eq!(event.band_photo.as_ref().unwrap().data, vec![0xFF, 0xD8]);
        assert!(event.video.is_none());
    }

    #[test]
    fn test_insert_without_attachments() {
        let store = create_test_store();
        let draft = EventDraft {
            year: "2020".to_string(),
            date: "2020-01-01".to_string(),
            location: "Wuhan Vox".to_string(),
            ..EventDraft::default()
        };

        let id = store.insert(&draft).unwrap();
        let event = store.get(id).unwrap().unwrap();
        assert!(event.band_photo.is_none());
        assert!(event.live_photo.is_none());
        assert!(event.video.is_none());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let store = create_test_store();
        let id1 = store
            .insert(&create_test_draft("2019", "2019-05-01", "A B"))
            .unwrap();
        let id2 = store
            .insert(&create_test_draft("2019", "2019-06-01", "C D"))
            .unwrap();
        assert!(id2 > id1);
    }

    #[test]
    fn test_get_nonexistent() {
        let store = create_test_store();
        assert!(store.get(99999).unwrap().is_none());
    }

    #[test]
    fn test_list_all_insertion_order() {
        let store = create_test_store();

        for i in 0..5 {
            let draft = create_test_draft("2021", &format!("2021-0{}-01", i + 1), "X Y");
            store.insert(&draft).unwrap();
        }

        let events = store.list_all().unwrap();
        assert_eq!(events.len(), 5);
        for pair in events.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn test_each_listed_event_retrievable() {
        let store = create_test_store();
        for i in 0..3 {
            store
                .insert(&create_test_draft("2022", &format!("2022-01-0{}", i + 1), "P Q"))
                .unwrap();
        }

        for event in store.list_all().unwrap() {
            let fetched = store.get(event.id).unwrap().unwrap();
            assert_eq!(fetched, event);
        }
    }

    #[test]
    fn test_update_changes_only_patched_fields() {
        let mut store = create_test_store();
        let mut draft = create_test_draft("2021", "2021-07-15", "Beijing Livehouse");
        draft.remarks = Some("first row".to_string());
        let id = store.insert(&draft).unwrap();

        let patch = EventPatch {
            location: Some("Shanghai Arena".to_string()),
            ..EventPatch::default()
        };
        let updated = store.update(id, &patch).unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.location, "Shanghai Arena");
        assert_eq!(updated.year, "2021");
        assert_eq!(updated.date, "2021-07-15");
        assert_eq!(updated.remarks, Some("first row".to_string()));

        // Attachments survive the edit path untouched.
        let reread = store.get(id).unwrap().unwrap();
        assert_eq!(reread.band_photo.as_ref().unwrap().file_name, "band.jpg");
        assert_eq!(reread.location, "Shanghai Arena");
    }

    #[test]
    fn test_update_round_trip_no_stale_fields() {
        let mut store = create_test_store();
        let id = store
            .insert(&create_test_draft("2021", "2021-07-15", "Beijing Livehouse"))
            .unwrap();

        let patch = EventPatch {
            year: Some("2022".to_string()),
            date: Some("2022-02-02".to_string()),
            location: Some("Chengdu Nuspace".to_string()),
            remarks: Some("moved".to_string()),
        };
        store.update(id, &patch).unwrap();

        let event = store.get(id).unwrap().unwrap();
        assert_eq!(event.year, "2022");
        assert_eq!(event.date, "2022-02-02");
        assert_eq!(event.location, "Chengdu Nuspace");
        assert_eq!(event.remarks, Some("moved".to_string()));
    }

    #[test]
    fn test_update_nonexistent() {
        let mut store = create_test_store();
        let result = store.update(12345, &EventPatch::default());
        assert!(matches!(result, Err(Error::NotFound { id: 12345 })));
    }

    #[test]
    fn test_delete() {
        let store = create_test_store();
        let id = store
            .insert(&create_test_draft("2021", "2021-07-15", "A B"))
            .unwrap();

        assert!(store.get(id).unwrap().is_some());
        assert!(store.delete(id).unwrap());
        assert!(store.get(id).unwrap().is_none());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let store = create_test_store();
        store
            .insert(&create_test_draft("2021", "2021-07-15", "A B"))
            .unwrap();

        assert!(!store.delete(99999).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        store
            .insert(&create_test_draft("2021", "2021-01-01", "A B"))
            .unwrap();
        store
            .insert(&create_test_draft("2022", "2022-01-01", "C D"))
            .unwrap();

        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_summary() {
        let store = create_test_store();
        store
            .insert(&create_test_draft("2019", "2019-01-01", "A B"))
            .unwrap();
        store
            .insert(&create_test_draft("2020", "2020-01-01", "C D"))
            .unwrap();
        store
            .insert(&create_test_draft("2019", "2019-06-01", "E F"))
            .unwrap();

        let summary = store.summary().unwrap();
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.distinct_years, 2);
        assert_eq!(summary.db_size_bytes, 0); // in-memory
    }

    #[test]
    fn test_large_attachment_round_trip() {
        let store = create_test_store();
        let mut draft = create_test_draft("2021", "2021-07-15", "A B");
        draft.video = Some(Attachment::new("clip.mp4", vec![7; 1_000_000]));

        let id = store.insert(&draft).unwrap();
        let event = store.get(id).unwrap().unwrap();
        assert_eq!(event.video.as_ref().unwrap().data.len(), 1_000_000);
    }

    #[test]
    fn test_unicode_fields_round_trip() {
        let store = create_test_store();
        let mut draft = create_test_draft("2021", "2021-07-15", "北京 乐空间");
        draft.remarks = Some("安可两首".to_string());

        let id = store.insert(&draft).unwrap();
        let event = store.get(id).unwrap().unwrap();
        assert_eq!(event.location, "北京 乐空间");
        assert_eq!(event.remarks, Some("安可两首".to_string()));
    }

    #[test]
    fn test_open_file_based() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("gigline_test_{}.db", std::process::id()));

        let store = Store::open(&db_path).unwrap();
        store
            .insert(&create_test_draft("2021", "2021-07-15", "A B"))
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.path(), db_path);

        drop(store);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = std::env::temp_dir();
        let nested_path = temp_dir.join(format!(
            "gigline_test_{}/nested/db.sqlite",
            std::process::id()
        ));

        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let store = Store::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent.parent().unwrap());
        }
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = create_test_store();
        let id1 = store
            .insert(&create_test_draft("2021", "2021-01-01", "A B"))
            .unwrap();
        store.delete(id1).unwrap();

        let id2 = store
            .insert(&create_test_draft("2021", "2021-02-01", "C D"))
            .unwrap();
        assert!(id2 > id1);
    }

    #[test]
    fn test_store_summary_serialize() {
        let summary = StoreSummary {
            total_events: 3,
            distinct_years: 2,
            db_size_bytes: 1024,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("total_events"));
        assert!(json.contains("distinct_years"));
    }
}
