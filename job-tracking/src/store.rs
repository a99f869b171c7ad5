use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::sync::Mutex;
use tokio::sync::broadcast;

use crate::error::StoreError;
use crate::models::{JobIdentity, SavedJob};
use crate::state::JobTrackingState;

/// Global key written by older clients before saved jobs were kept per user.
pub const LEGACY_SAVED_KEY: &str = "savedJobs";

pub fn saved_key(username: &str) -> String {
    format!("savedJobs_{}", username)
}

pub fn hidden_key(username: &str) -> String {
    format!("hiddenJobs_{}", username)
}

/// String key/value storage, the shape of browser local storage.
#[async_trait]
pub trait KeyValue: Send + Sync {
    type E: std::error::Error + Send + Sync + 'static;
    async fn get(&self, key: &str) -> Result<Option<String>, Self::E>;
    async fn set(&self, key: &str, value: &str) -> Result<(), Self::E>;
    async fn remove(&self, key: &str) -> Result<(), Self::E>;
}

/// Per-user tracking state storage.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self, username: &str) -> Result<JobTrackingState, StoreError>;
    async fn persist(&self, username: &str, state: &JobTrackingState) -> Result<(), StoreError>;
    fn subscribe(&self, username: &str) -> Subscription;
}

/// Fan-out of "state of this user changed" events.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<String>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self { sender }
    }

    pub fn publish(&self, username: &str) {
        // no subscribers is fine
        let receivers = self.sender.send(username.to_owned()).unwrap_or(0);
        log::debug!("notified {} listener(s) of a change for {}", receivers, username);
    }

    pub fn subscribe(&self, username: &str) -> Subscription {
        Subscription {
            username: username.to_owned(),
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Change events for a single user.
#[derive(Debug)]
pub struct Subscription {
    username: String,
    receiver: broadcast::Receiver<String>,
}

impl Subscription {
    /// Resolves once the user's state changed. Missed events count as a
    /// change, since the listener only needs to re-read. Returns `false`
    /// when the notifier is gone.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.receiver.recv().await {
                Ok(username) if username == self.username => return true,
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("listener for {} lagged by {} events", self.username, skipped);
                    return true;
                }
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// `Store` over any `KeyValue`, using the browser client's key layout.
pub struct KeyedStore<K: KeyValue> {
    kv: K,
    notifier: ChangeNotifier,
}

impl<K: KeyValue> KeyedStore<K> {
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn key_value(&self) -> &K {
        &self.kv
    }

    async fn migrate_legacy(&self, username: &str) -> Result<(), StoreError> {
        let key = saved_key(username);
        if self.kv.get(&key).await.map_err(StoreError::backend)?.is_some() {
            return Ok(());
        }
        if let Some(legacy) = self
            .kv
            .get(LEGACY_SAVED_KEY)
            .await
            .map_err(StoreError::backend)?
        {
            log::info!("migrating legacy saved jobs into {}", key);
            self.kv.set(&key, &legacy).await.map_err(StoreError::backend)?;
            self.kv
                .remove(LEGACY_SAVED_KEY)
                .await
                .map_err(StoreError::backend)?;
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.kv.get(key).await.map_err(StoreError::backend)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                key: key.to_owned(),
                source,
            }),
            None => Ok(T::default()),
        }
    }
}

#[async_trait]
impl<K: KeyValue> Store for KeyedStore<K> {
    async fn load(&self, username: &str) -> Result<JobTrackingState, StoreError> {
        self.migrate_legacy(username).await?;
        let saved: Vec<SavedJob> = self.read_json(&saved_key(username)).await?;
        let hidden: Vec<JobIdentity> = self.read_json(&hidden_key(username)).await?;
        let mut state = JobTrackingState::new(saved, hidden.into_iter().collect::<BTreeSet<_>>());
        if state.repair() {
            log::warn!("stored state of {} had saved jobs that were not hidden", username);
        }
        log::debug!(
            "loaded {} saved and {} hidden jobs for {}",
            state.saved.len(),
            state.hidden.len(),
            username
        );
        Ok(state)
    }

    async fn persist(&self, username: &str, state: &JobTrackingState) -> Result<(), StoreError> {
        let saved = serde_json::to_string(&state.saved)?;
        let hidden = serde_json::to_string(&state.hidden)?;
        self.kv
            .set(&saved_key(username), &saved)
            .await
            .map_err(StoreError::backend)?;
        self.kv
            .set(&hidden_key(username), &hidden)
            .await
            .map_err(StoreError::backend)?;
        self.notifier.publish(username);
        Ok(())
    }

    fn subscribe(&self, username: &str) -> Subscription {
        self.notifier.subscribe(username)
    }
}

/// In-process `KeyValue`.
#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // a poisoned map is still a valid map
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValue for MemoryKeyValue {
    type E = Infallible;

    async fn get(&self, key: &str) -> Result<Option<String>, Infallible> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Infallible> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Infallible> {
        self.entries().remove(key);
        Ok(())
    }
}
