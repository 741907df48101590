//! In-process collaborator implementations.
//!
//! `MemoryStore` models the key-path tree semantics the portal's real
//! backend has: a write replaces the subtree at a path, and reading a
//! collection root returns the map of its children. The identity provider
//! double reproduces the session-swap side effect of account creation and
//! supports scripted failures for exercising the retry paths.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{IdentityError, NotifyError, StoreError};
use crate::traits::{
    AccountId, DocumentStore, IdentityProvider, Notification, Notifier, Subscription,
};

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

/// In-memory key-path document tree.
pub struct MemoryStore {
    root: Mutex<Value>,
    watchers: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<Value>>>>,
    /// When set, every read and write fails with `Unavailable`.
    offline: Mutex<bool>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Value::Object(Map::new())),
            watchers: Mutex::new(HashMap::new()),
            offline: Mutex::new(false),
        }
    }

    /// Toggle simulated unavailability.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().expect("offline lock") = offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if *self.offline.lock().expect("offline lock") {
            return Err(StoreError::unavailable("memory store is offline"));
        }
        Ok(())
    }

    fn value_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
        let mut current = root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    fn set_at(root: &mut Value, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut current = root;
        for (i, segment) in segments.iter().enumerate() {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            let map = current.as_object_mut().expect("object ensured above");
            if i == segments.len() - 1 {
                map.insert((*segment).to_string(), value);
                return;
            }
            current = map
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
    }

    /// Fan out change events to watchers whose path overlaps the write.
    fn notify_watchers(&self, written_path: &str) {
        let root = self.root.lock().expect("root lock");
        let mut watchers = self.watchers.lock().expect("watchers lock");
        for (watched, senders) in watchers.iter_mut() {
            let overlaps = written_path.starts_with(watched.as_str())
                || watched.starts_with(written_path);
            if !overlaps {
                continue;
            }
            let snapshot = Self::value_at(&root, watched)
                .cloned()
                .unwrap_or(Value::Null);
            // Dropped subscriptions fail to send; prune them here.
            senders.retain(|tx| tx.send(snapshot.clone()).is_ok());
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.check_online()?;
        let root = self.root.lock().expect("root lock");
        Ok(Self::value_at(&root, path).cloned())
    }

    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.check_online()?;
        {
            let mut root = self.root.lock().expect("root lock");
            Self::set_at(&mut root, path, value);
        }
        self.notify_watchers(path);
        Ok(())
    }

    async fn subscribe(&self, path: &str) -> Result<Subscription, StoreError> {
        self.check_online()?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers
            .lock()
            .expect("watchers lock")
            .entry(path.to_string())
            .or_default()
            .push(tx);
        Ok(Subscription::new(rx))
    }
}

// ---------------------------------------------------------------------------
// Identity provider
// ---------------------------------------------------------------------------

/// What a scripted failure should look like.
#[derive(Debug, Clone, Copy)]
pub enum ScriptedFailure {
    Unavailable,
    RateLimited,
    PermissionDenied,
}

impl ScriptedFailure {
    fn build(self) -> IdentityError {
        match self {
            ScriptedFailure::Unavailable => IdentityError::unavailable("scripted outage"),
            ScriptedFailure::RateLimited => IdentityError::RateLimited {
                message: "scripted rate limit".to_string(),
            },
            ScriptedFailure::PermissionDenied => IdentityError::PermissionDenied {
                message: "scripted permission denial".to_string(),
            },
        }
    }
}

struct IdentityState {
    /// email (lowercase) -> password
    accounts: HashMap<String, String>,
    active: Option<String>,
    /// email (lowercase) -> (failure kind, remaining failures; u32::MAX = always)
    scripted: HashMap<String, (ScriptedFailure, u32)>,
    create_calls: HashMap<String, u32>,
    fail_next_reauth: bool,
}

/// In-memory identity provider with the session-swap side effect.
pub struct MemoryIdentityProvider {
    state: Mutex<IdentityState>,
}

impl MemoryIdentityProvider {
    /// Create a provider with a pre-registered operator account signed in.
    #[must_use]
    pub fn with_operator(email: &str, password: &str) -> Self {
        let mut accounts = HashMap::new();
        accounts.insert(email.to_lowercase(), password.to_string());
        Self {
            state: Mutex::new(IdentityState {
                accounts,
                active: Some(email.to_lowercase()),
                scripted: HashMap::new(),
                create_calls: HashMap::new(),
                fail_next_reauth: false,
            }),
        }
    }

    /// Script `count` creation failures for `email` (`u32::MAX` = always).
    pub fn script_create_failure(&self, email: &str, kind: ScriptedFailure, count: u32) {
        self.state
            .lock()
            .expect("identity lock")
            .scripted
            .insert(email.to_lowercase(), (kind, count));
    }

    /// Make the next reauthenticate call fail once.
    pub fn fail_next_reauthenticate(&self) {
        self.state.lock().expect("identity lock").fail_next_reauth = true;
    }

    /// Number of accounts that exist.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.state.lock().expect("identity lock").accounts.len()
    }

    /// Whether an account exists for `email`.
    #[must_use]
    pub fn has_account(&self, email: &str) -> bool {
        self.state
            .lock()
            .expect("identity lock")
            .accounts
            .contains_key(&email.to_lowercase())
    }

    /// How many create calls were made for `email` (attempt counting).
    #[must_use]
    pub fn create_calls(&self, email: &str) -> u32 {
        self.state
            .lock()
            .expect("identity lock")
            .create_calls
            .get(&email.to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountId, IdentityError> {
        let key = email.to_lowercase();
        let mut state = self.state.lock().expect("identity lock");
        *state.create_calls.entry(key.clone()).or_insert(0) += 1;

        if let Some((kind, remaining)) = state.scripted.get_mut(&key) {
            if *remaining > 0 {
                let err = kind.build();
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(err);
            }
        }

        if state.accounts.contains_key(&key) {
            return Err(IdentityError::EmailAlreadyInUse {
                email: email.to_string(),
            });
        }

        state.accounts.insert(key.clone(), password.to_string());
        // Side effect: the new account displaces the caller's session.
        state.active = Some(key);
        Ok(AccountId(Uuid::new_v4().to_string()))
    }

    async fn reauthenticate(&self, email: &str, password: &str) -> Result<(), IdentityError> {
        let key = email.to_lowercase();
        let mut state = self.state.lock().expect("identity lock");
        if state.fail_next_reauth {
            state.fail_next_reauth = false;
            return Err(IdentityError::unavailable("scripted reauth outage"));
        }
        match state.accounts.get(&key) {
            Some(stored) if stored == password => {
                state.active = Some(key);
                Ok(())
            }
            _ => Err(IdentityError::AuthenticationFailed),
        }
    }

    async fn active_session(&self) -> Option<String> {
        self.state.lock().expect("identity lock").active.clone()
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Recording notifier with an optional failure switch.
pub struct MemoryNotifier {
    sent: Mutex<Vec<(String, Notification)>>,
    failing: Mutex<bool>,
}

impl MemoryNotifier {
    /// Create a notifier that records deliveries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(false),
        }
    }

    /// Make every delivery fail.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().expect("failing lock") = failing;
    }

    /// Notifications delivered so far.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, Notification)> {
        self.sent.lock().expect("sent lock").clone()
    }
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, user_id: &str, notification: Notification) -> Result<(), NotifyError> {
        if *self.failing.lock().expect("failing lock") {
            return Err(NotifyError::Delivery {
                message: "notifier set to failing".to_string(),
            });
        }
        self.sent
            .lock()
            .expect("sent lock")
            .push((user_id.to_string(), notification));
        Ok(())
    }
}
