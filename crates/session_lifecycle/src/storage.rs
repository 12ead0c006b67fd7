//! Session store trait and implementations

use crate::error::Result;
use crate::structs::SessionRecord;
use async_trait::async_trait;
use log::warn;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Persistent client storage keyed by identity.
///
/// Each identity's record lives under its own slot so one browser profile
/// can hold independent sessions for multiple users. Multiple watchers may
/// race on the same slot; last-write-wins is the accepted policy.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the record for an identity slot, if any.
    async fn get(&self, identity: &str) -> Result<Option<SessionRecord>>;

    /// Store (or replace) the record for an identity slot.
    async fn set(&self, identity: &str, record: &SessionRecord) -> Result<()>;

    /// Remove the record for an identity slot. Clearing an absent slot is
    /// a no-op.
    async fn clear(&self, identity: &str) -> Result<()>;
}

/// In-memory store. The deterministic backend for unit tests, and the
/// per-tab storage analog when no persistence is wanted.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    slots: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, identity: &str) -> Result<Option<SessionRecord>> {
        Ok(self.slots.read().await.get(identity).cloned())
    }

    async fn set(&self, identity: &str, record: &SessionRecord) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(identity.to_string(), record.clone());
        Ok(())
    }

    async fn clear(&self, identity: &str) -> Result<()> {
        self.slots.write().await.remove(identity);
        Ok(())
    }
}

/// File-based store: one JSON file per identity under a base directory.
#[derive(Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self, identity: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", identity))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, identity: &str) -> Result<Option<SessionRecord>> {
        let path = self.slot_path(identity);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).await?;
        match serde_json::from_str::<SessionRecord>(&contents) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // A half-written or corrupt slot reads as no session; the
                // manager treats that as logged out rather than erroring.
                warn!("Unreadable session slot for '{}': {}", identity, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, identity: &str, record: &SessionRecord) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.slot_path(identity);
        let contents = serde_json::to_string_pretty(record)?;

        fs::write(&path, contents).await?;

        Ok(())
    }

    async fn clear(&self, identity: &str) -> Result<()> {
        let path = self.slot_path(identity);

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }
}
