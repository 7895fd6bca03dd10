// Durable key-value slot backends

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed key under which the task list snapshot is stored.
pub const TASKS_KEY: &str = "tasks";

/// A single-process key-value store holding string values under string keys.
///
/// The production backend is [`FileSlot`]; tests and demos substitute
/// [`MemorySlot`]. The task store only ever touches [`TASKS_KEY`], but the
/// interface is a plain key-value pair so backends stay interchangeable.
pub trait StorageSlot {
    /// Read the value stored under `key`, or `None` if absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed slot: one `<key>.json` file per key under a base directory.
pub struct FileSlot {
    base_path: PathBuf,
}

impl FileSlot {
    /// Open or create a slot rooted at the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).context("Failed to create slot directory")?;
        debug!(path = ?base_path, "Opened file slot");

        Ok(Self { base_path })
    }

    /// Default slot location in the per-user data directory.
    pub fn default_dir() -> Result<PathBuf> {
        let dir = dirs::data_dir().ok_or_else(|| eyre!("No user data directory available"))?;
        Ok(dir.join("justtasks"))
    }

    /// Get the base path of this slot
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.is_empty() {
            return Err(eyre!("Slot key cannot be empty"));
        }
        if key.len() > 64 {
            return Err(eyre!("Slot key too long: {} (max 64 chars)", key));
        }
        if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
            return Err(eyre!("Invalid slot key: {} (must be alphanumeric with _/-)", key));
        }
        Ok(())
    }
}

impl StorageSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Self::validate_key(key)?;

        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path).context("Failed to read slot file")?;
        Ok(Some(value))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;

        let path = self.key_path(key);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .context("Failed to open slot file for writing")?;

        // Acquire exclusive lock before writing
        file.lock_exclusive().context("Failed to acquire file lock")?;

        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        // Lock is automatically released when file is dropped
        Ok(())
    }
}

/// In-memory slot for tests and demos.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, e.g. a pre-existing snapshot for a reload scenario.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut slot = Self::new();
        slot.values.insert(key.to_string(), value.to_string());
        slot
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
