//! Collaborator traits.
//!
//! Capability-based trait definitions for the document store, the
//! identity provider, and the notification side-channel. Engines depend
//! on `Arc<dyn Trait>` so production backends and the in-memory test
//! doubles are interchangeable.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{IdentityError, NotifyError, StoreError};

/// Opaque account identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountId(pub String);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live subscription to a key path.
///
/// Yields the new value of the subtree on every change. Dropping the
/// subscription unsubscribes.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Value>,
}

impl Subscription {
    /// Wrap a change-event receiver.
    #[must_use]
    pub fn new(receiver: mpsc::UnboundedReceiver<Value>) -> Self {
        Self { receiver }
    }

    /// Wait for the next change event. Returns `None` once the store
    /// drops its sending side.
    pub async fn next_change(&mut self) -> Option<Value> {
        self.receiver.recv().await
    }
}

/// A key-path document tree.
///
/// `write` is a full overwrite of the subtree at `path` and is atomic per
/// path; there is no multi-path transaction primitive.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the value at `path`, `None` if absent.
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the subtree at `path`.
    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Subscribe to changes at `path`.
    async fn subscribe(&self, path: &str) -> Result<Subscription, StoreError>;
}

/// The external identity system.
///
/// `create_account` has a side effect the portal must compensate for:
/// the newly created account becomes the active session, displacing the
/// operator who drove the call. The session is observable through
/// [`IdentityProvider::active_session`] so the swap window is an explicit
/// state, not a hidden one.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. On success the new account is the active session.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountId, IdentityError>;

    /// Re-authenticate, restoring `email` as the active session.
    async fn reauthenticate(&self, email: &str, password: &str) -> Result<(), IdentityError>;

    /// Email of the currently active session, if any.
    async fn active_session(&self) -> Option<String>;
}

/// Priority of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationPriority {
    Low,
    #[default]
    Normal,
    High,
}

/// A user-facing notification payload.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub category: String,
    pub priority: NotificationPriority,
}

/// Fire-and-forget notification channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification to a user. Callers treat failures as
    /// best-effort and never roll back state on them.
    async fn notify(&self, user_id: &str, notification: Notification) -> Result<(), NotifyError>;
}
