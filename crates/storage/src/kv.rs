//! Small string key-value stores backing per-client submission history.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use moka::ops::compute::Op;
use moka::sync::Cache;

use crate::error::Result;

/// Read-modify-write step for [`KeyValueStore::update`]. Returning
/// `Ok(None)` leaves the stored value untouched.
pub type Update<'a> = dyn FnMut(Option<String>) -> Result<Option<String>> + 'a;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Applies `f` to the current value and stores its result. No other
    /// write to `key` interleaves between the read and the write.
    fn update(&self, key: &str, f: &mut Update<'_>) -> Result<()>;
}

pub const DEFAULT_MEMORY_CAPACITY: u64 = 100_000;
/// Histories untouched for a day hold nothing the daily window still counts.
pub const DEFAULT_MEMORY_IDLE: Duration = Duration::from_secs(24 * 60 * 60);

/// Process-local store. Contents are lost on restart, and keys idle past
/// the configured timeout or beyond the capacity are evicted.
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MEMORY_CAPACITY, DEFAULT_MEMORY_IDLE)
    }

    pub fn with_limits(max_capacity: u64, time_to_idle: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(time_to_idle)
            .build();
        Self { entries }
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn update(&self, key: &str, f: &mut Update<'_>) -> Result<()> {
        let mut outcome = Ok(());
        self.entries
            .entry(key.to_string())
            .and_compute_with(|current| match f(current.map(|entry| entry.into_value())) {
                Ok(Some(value)) => Op::Put(value),
                Ok(None) => Op::Nop,
                Err(e) => {
                    outcome = Err(e);
                    Op::Nop
                }
            });
        outcome
    }
}

/// Stores each key as `<dir>/<base64url key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", URL_SAFE_NO_PAD.encode(key)))
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.read(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write(key, value)
    }

    fn update(&self, key: &str, f: &mut Update<'_>) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        match f(self.read(key)?)? {
            Some(value) => self.write(key, &value),
            None => Ok(()),
        }
    }
}
