//! Asset export for timeline rendering.
//!
//! Attachment bytes live in the database; to be displayable from the
//! rendered HTML they are exported as files into an assets directory. The
//! directory is owned by the renderer and wiped before every render, so
//! assets from earlier renders never accumulate.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{Attachment, AttachmentKind};

/// Directory holding exported attachment files for one rendered page.
#[derive(Debug)]
pub struct AssetDir {
    dir: PathBuf,
}

impl AssetDir {
    /// Create (or reuse) the asset directory at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Path to the asset directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Remove all previously exported assets.
    ///
    /// Called before each render so every exported file on disk belongs to
    /// the current page.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be recreated.
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        std::fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
            path: self.dir.clone(),
            source,
        })?;
        debug!("Cleared asset directory {}", self.dir.display());
        Ok(())
    }

    /// Export one attachment, returning the file name within the directory.
    ///
    /// File names are content-addressed (`{id}-{kind}-{hash}.{ext}`) so
    /// re-renders of unchanged attachments produce identical names.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export(
        &self,
        event_id: i64,
        kind: AttachmentKind,
        attachment: &Attachment,
    ) -> Result<String> {
        let hash = attachment.content_hash();
        let ext = attachment.extension().unwrap_or("bin");
        let file_name = format!("{event_id}-{kind}-{}.{ext}", &hash[..16]);

        std::fs::write(self.dir.join(&file_name), &attachment.data)?;
        Ok(file_name)
    }
}
