use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// JsonConnection owns the location of the guestbook JSON document
/// and performs whole-file reads and atomic rewrites of it
#[derive(Clone, Debug)]
pub struct JsonConnection {
    file_path: PathBuf,
}

impl JsonConnection {
    /// Create a new JSON connection for a document path
    ///
    /// The parent directory is created if it doesn't exist; the document
    /// itself is only written on the first mutation.
    pub fn new<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref().to_path_buf();

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
                info!("Created data directory: {}", parent.display());
            }
        }

        Ok(Self { file_path })
    }

    /// Path of the backing document
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Whether the document has been written yet
    pub fn exists(&self) -> bool {
        self.file_path.exists()
    }

    /// Read the raw document contents, or `None` if the file doesn't exist
    pub fn read(&self) -> Result<Option<String>> {
        if !self.exists() {
            debug!("Document {} does not exist yet", self.file_path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        Ok(Some(content))
    }

    /// Replace the document contents
    ///
    /// Writes to a sibling temp file and renames it over the document so a
    /// reader never sees a half-written file.
    pub fn write(&self, content: &str) -> Result<()> {
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.file_path)
            .with_context(|| format!("Failed to replace {}", self.file_path.display()))?;

        debug!("Wrote {} bytes to {}", content.len(), self.file_path.display());
        Ok(())
    }
}
