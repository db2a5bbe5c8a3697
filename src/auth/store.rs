use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::broadcast;
use uuid::Uuid;

/// Key holding the opaque session token.
pub const AUTH_TOKEN_KEY: &str = "soft_projects_auth_token";
/// Key holding the signed-in user and session expiry as JSON.
pub const USER_DATA_KEY: &str = "soft_projects_user_data";

const EVENT_CAPACITY: usize = 64;

/// A key changed in the shared store. `source` is the id of the handle that
/// made the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub source: Uuid,
}

/// Key/value session storage shared between tabs.
///
/// Every handle has its own id; change events carry the id of the writer so
/// a tab can skip its own writes.
pub trait SessionStore: Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}

#[derive(Debug)]
struct Shared {
    entries: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

/// In-process [`SessionStore`]. Use [`MemorySessionStore::attach`] to open
/// another tab onto the same storage.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    id: Uuid,
    shared: Arc<Shared>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            shared: Arc::new(Shared {
                entries: Mutex::new(HashMap::new()),
                events,
            }),
        }
    }

    pub fn attach(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            shared: Arc::clone(&self.shared),
        }
    }

    fn notify(&self, key: &str) {
        // No subscribers is fine.
        let _ = self.shared.events.send(StorageEvent {
            key: key.to_string(),
            source: self.id,
        });
    }
}

impl SessionStore for MemorySessionStore {
    fn id(&self) -> Uuid {
        self.id
    }

    fn get(&self, key: &str) -> Option<String> {
        let entries = self
            .shared
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        let changed = {
            let mut entries = self
                .shared
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            entries.insert(key.to_string(), value.clone()).as_ref() != Some(&value)
        };
        if changed {
            self.notify(key);
        }
    }

    fn remove(&self, key: &str) {
        let removed = {
            let mut entries = self
                .shared
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            entries.remove(key).is_some()
        };
        if removed {
            self.notify(key);
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.shared.events.subscribe()
    }
}
