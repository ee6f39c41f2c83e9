use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use storage::kv::{FileStore, KeyValueStore, MemoryStore};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub submission_store_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            submission_store_dir: std::env::var("SUBMISSION_STORE_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    /// Store holding per-client submission history
    pub fn submission_store(&self) -> Result<Arc<dyn KeyValueStore>> {
        match &self.submission_store_dir {
            Some(dir) => {
                let store = FileStore::new(dir).with_context(|| {
                    format!("Cannot create submission store at {}", dir.display())
                })?;
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }
}
