use std::sync::Arc;
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::session_store::SessionStore;

pub type SharedStore = Arc<Mutex<SessionStore>>;

/// Owns one [`SessionStore`] per live session. Each store sits behind its own
/// mutex so interactions on one session run one at a time while different
/// sessions never contend.
///
/// At capacity the least recently used session is evicted, so a freshly
/// created session is always stored.
pub struct SessionRegistry {
    sessions: Cache<String, SharedStore>,
}

impl SessionRegistry {
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(|id: Arc<String>, _store, cause| {
                debug!(session_id = %id, ?cause, "Session ended");
            })
            .build();

        Self { sessions }
    }

    pub fn create(&self) -> String {
        // The id is the only credential for the session's data.
        let id = Uuid::new_v4().to_string();
        self.sessions
            .insert(id.clone(), Arc::new(Mutex::new(SessionStore::new())));
        info!(session_id = %id, "Session created");
        id
    }

    pub fn get(&self, id: &str) -> Result<SharedStore, AppError> {
        self.sessions
            .get(id)
            .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
    }

    pub fn end(&self, id: &str) -> Result<(), AppError> {
        if self.sessions.remove(id).is_none() {
            return Err(AppError::SessionNotFound(id.to_string()));
        }
        info!(session_id = %id, "Session ended by client");
        Ok(())
    }
}
