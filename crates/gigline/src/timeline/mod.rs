//! Timeline rendering for gigline.
//!
//! Projects the full record set into an HTML page: one entry per event in
//! storage order, alternating left/right placement by index parity, followed
//! by one marker per distinct year label in first-seen order. Attachment
//! bytes are exported to an asset directory that is wiped before each render.

pub mod assets;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::event::{AttachmentKind, Event};

use assets::AssetDir;

/// Placement of a timeline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Even-indexed entries.
    Left,
    /// Odd-indexed entries.
    Right,
}

impl Side {
    /// Placement for the entry at the given position.
    #[must_use]
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// CSS class name for this side.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Distinct year labels across all events, first-seen order.
#[must_use]
pub fn distinct_years(events: &[Event]) -> Vec<&str> {
    let mut years: Vec<&str> = Vec::new();
    for event in events {
        if !years.contains(&event.year.as_str()) {
            years.push(&event.year);
        }
    }
    years
}

/// Escape text for embedding in HTML.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Asset file names exported for one event, as hrefs relative to the page.
#[derive(Debug, Clone, Default)]
struct EntryAssets {
    band_photo: Option<String>,
    live_photo: Option<String>,
    video: Option<String>,
}

/// Build the HTML fragment for one timeline entry.
fn entry_html(event: &Event, side: Side, assets: &EntryAssets) -> String {
    let mut html = format!(
        "<div class=\"timeline-item {}\" data-id=\"{}\">\n",
        side.class(),
        event.id
    );
    html.push_str(&format!(
        "  <h3>{} - {}</h3>\n",
        escape_html(&event.year),
        escape_html(&event.date)
    ));
    html.push_str(&format!(
        "  <p class=\"location\">{}</p>\n",
        escape_html(&event.location)
    ));
    if let Some(remarks) = &event.remarks {
        html.push_str(&format!(
            "  <p class=\"remarks\">{}</p>\n",
            escape_html(remarks)
        ));
    }
    if let Some(href) = &assets.band_photo {
        html.push_str(&format!(
            "  <img src=\"assets/{href}\" alt=\"band photo\">\n"
        ));
    }
    if let Some(href) = &assets.live_photo {
        html.push_str(&format!(
            "  <img src=\"assets/{href}\" alt=\"live photo\">\n"
        ));
    }
    if let Some(href) = &assets.video {
        html.push_str(&format!(
            "  <video controls src=\"assets/{href}\"></video>\n"
        ));
    }
    // Edit and delete affordances, addressed by id.
    html.push_str(&format!(
        "  <p class=\"actions\"><code>gig edit {0}</code> <code>gig rm {0}</code></p>\n",
        event.id
    ));
    html.push_str("</div>\n");
    html
}

/// Renders the full record set into an HTML page plus exported assets.
#[derive(Debug)]
pub struct TimelineRenderer {
    out_dir: PathBuf,
    title: String,
}

impl TimelineRenderer {
    /// Create a renderer writing into the given output directory.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            out_dir: out_dir.into(),
            title: title.into(),
        }
    }

    /// Output directory for the rendered page.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Render the events into `index.html` under the output directory.
    ///
    /// Clears previously exported assets first, then exports every
    /// attachment and writes the page. Returns the path to the page.
    ///
    /// # Errors
    ///
    /// Returns an error if asset export or page writing fails.
    pub fn render(&self, events: &[Event]) -> Result<PathBuf> {
        let assets = AssetDir::create(self.out_dir.join("assets"))?;
        assets.clear()?;

        let mut body = String::from("<div class=\"timeline\"></div>\n");
        for (index, event) in events.iter().enumerate() {
            let entry_assets = EntryAssets {
                band_photo: self.export(&assets, event, AttachmentKind::BandPhoto)?,
                live_photo: self.export(&assets, event, AttachmentKind::LivePhoto)?,
                video: self.export(&assets, event, AttachmentKind::Video)?,
            };
            body.push_str(&entry_html(event, Side::for_index(index), &entry_assets));
        }

        for year in distinct_years(events) {
            body.push_str(&format!(
                "<div class=\"timeline-year\">{}</div>\n",
                escape_html(year)
            ));
        }

        let title = escape_html(&self.title);
        let page = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n\
             <div class=\"timeline-container\">\n{body}</div>\n</body>\n</html>\n"
        );

        let page_path = self.out_dir.join("index.html");
        std::fs::write(&page_path, page)?;
        info!(
            "Rendered {} events to {}",
            events.len(),
            page_path.display()
        );
        Ok(page_path)
    }

    /// Export one attachment slot of an event, if present.
    fn export(
        &self,
        assets: &AssetDir,
        event: &Event,
        kind: AttachmentKind,
    ) -> Result<Option<String>> {
        event
            .attachment(kind)
            .map(|attachment| assets.export(event.id, kind, attachment))
            .transpose()
    }
}
