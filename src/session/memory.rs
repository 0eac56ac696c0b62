//! In-memory session store

use super::{SellingSession, SessionStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Session store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SellingSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, asset_id: &str) -> anyhow::Result<Option<SellingSession>> {
        Ok(self.sessions.read().await.get(asset_id).cloned())
    }

    async fn save(&self, session: &SellingSession) -> anyhow::Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.asset_id.clone(), session.clone());
        Ok(())
    }

    async fn clear(&self, asset_id: &str) -> anyhow::Result<bool> {
        Ok(self.sessions.write().await.remove(asset_id).is_some())
    }
}
