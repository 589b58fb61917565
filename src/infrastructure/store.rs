//! Record store implementations

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, instrument};

use crate::domain::Dataset;
use crate::infrastructure::traits::{FileSystem, RecordStore};

/// Records kept in a single pretty-printed JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> io::Result<Dataset> {
        if !self.fs.exists(&self.path) {
            debug!("no record file yet, starting empty");
            return Ok(Dataset::default());
        }
        let content = self.fs.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Dataset::default());
        }
        let data = serde_json::from_str(&content)?;
        Ok(data)
    }

    #[instrument(level = "debug", skip(self, data), fields(path = %self.path.display()))]
    fn save(&self, data: &Dataset) -> io::Result<()> {
        let content = serde_json::to_string_pretty(data)?;
        self.fs.ensure_parent(&self.path)?;
        // Write aside, then move into place
        let temp = self.temp_path();
        self.fs.write(&temp, &content)?;
        self.fs.rename(&temp, &self.path)
    }
}

/// Records held in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: Dataset) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> io::Result<Dataset> {
        self.data
            .lock()
            .map(|data| data.clone())
            .map_err(|_| io::Error::other("record store lock poisoned"))
    }

    fn save(&self, data: &Dataset) -> io::Result<()> {
        let mut guard = self
            .data
            .lock()
            .map_err(|_| io::Error::other("record store lock poisoned"))?;
        *guard = data.clone();
        Ok(())
    }
}
