//! Core event types for gigline.
//!
//! This module defines the data structures for attendance records: the
//! persisted [`Event`], the pre-insert [`EventDraft`], the edit-path
//! [`EventPatch`], and binary [`Attachment`]s.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which slot an attachment occupies on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Promotional/band photo.
    BandPhoto,
    /// Photo taken at the show.
    LivePhoto,
    /// Video clip from the show.
    Video,
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BandPhoto => write!(f, "band_photo"),
            Self::LivePhoto => write!(f, "live_photo"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// A binary attachment (photo or video) belonging to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original file name, kept for display and extension handling.
    pub file_name: String,
    /// Raw file bytes.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub data: Vec<u8>,
}

impl Attachment {
    /// Create an attachment from in-memory bytes.
    #[must_use]
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    /// Read an attachment from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttachmentRead`] if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| Error::AttachmentRead {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "attachment".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { file_name, data })
    }

    /// BLAKE3 hash of the attachment bytes.
    ///
    /// Used for stable, content-addressed asset file names when exporting.
    #[must_use]
    pub fn content_hash(&self) -> String {
        blake3::hash(&self.data).to_hex().to_string()
    }

    /// File extension of the original file name, if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name).extension().and_then(|e| e.to_str())
    }

    /// Size of the attachment in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the attachment has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An attendance record's field set prior to identifier assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Year label, free text.
    pub year: String,
    /// Date in `YYYY-MM-DD` form.
    pub date: String,
    /// Free text; first whitespace token is the city, the remainder the venue.
    pub location: String,
    /// Optional notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Band photo, expected by the timeline but not enforced by the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_photo: Option<Attachment>,
    /// Live photo, expected by the timeline but not enforced by the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_photo: Option<Attachment>,
    /// Optional video clip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Attachment>,
}

/// A persisted attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier assigned by the storage layer, never reused.
    pub id: i64,
    /// Year label, free text.
    pub year: String,
    /// Date in `YYYY-MM-DD` form.
    pub date: String,
    /// Free text; first whitespace token is the city, the remainder the venue.
    pub location: String,
    /// Optional notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Band photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_photo: Option<Attachment>,
    /// Live photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_photo: Option<Attachment>,
    /// Optional video clip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Attachment>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Get an attachment by slot.
    #[must_use]
    pub fn attachment(&self, kind: AttachmentKind) -> Option<&Attachment> {
        match kind {
            AttachmentKind::BandPhoto => self.band_photo.as_ref(),
            AttachmentKind::LivePhoto => self.live_photo.as_ref(),
            AttachmentKind::Video => self.video.as_ref(),
        }
    }
}

/// Field subset applied on the edit path.
///
/// Only the text fields are editable; attachments survive an update
/// unchanged. A `None` field leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    /// Replacement year label.
    pub year: Option<String>,
    /// Replacement date.
    pub date: Option<String>,
    /// Replacement location.
    pub location: Option<String>,
    /// Replacement remarks.
    pub remarks: Option<String>,
}

impl EventPatch {
    /// Check whether the patch changes anything at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.remarks.is_none()
    }

    /// Apply the patch to an event in place.
    pub fn apply(&self, event: &mut Event) {
        if let Some(year) = &self.year {
            event.year.clone_from(year);
        }
        if let Some(date) = &self.date {
            event.date.clone_from(date);
        }
        if let Some(location) = &self.location {
            event.location.clone_from(location);
        }
        if let Some(remarks) = &self.remarks {
            event.remarks = Some(remarks.clone());
        }
    }
}
