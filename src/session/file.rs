//! JSON file session store

use super::{SellingSession, SessionStore};
use crate::persist;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

type SessionMap = BTreeMap<String, SellingSession>;

/// Session store persisted as a JSON object keyed by asset
pub struct JsonFileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> anyhow::Result<SessionMap> {
        Ok(persist::read_json(&self.path).await?.unwrap_or_default())
    }

    async fn write_all(&self, sessions: &SessionMap) -> anyhow::Result<()> {
        persist::write_json(&self.path, sessions).await
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self, asset_id: &str) -> anyhow::Result<Option<SellingSession>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(asset_id))
    }

    async fn save(&self, session: &SellingSession) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.read_all().await?;
        sessions.insert(session.asset_id.clone(), session.clone());
        self.write_all(&sessions).await
    }

    async fn clear(&self, asset_id: &str) -> anyhow::Result<bool> {
        let _guard = self.lock.lock().await;
        let mut sessions = self.read_all().await?;
        if sessions.remove(asset_id).is_none() {
            return Ok(false);
        }
        self.write_all(&sessions).await?;
        Ok(true)
    }
}
