//! # caredesk-store
//!
//! Trait seams for the three external collaborators of the portal:
//!
//! - [`DocumentStore`] — a key-path tree with single-path atomic writes,
//!   no multi-path transactions. All cross-record "consistency" upstream
//!   is achieved by ordering single-key operations and accepting the
//!   resulting partial-failure windows.
//! - [`IdentityProvider`] — account creation and re-authentication.
//!   Creating an account switches the active session to the new account;
//!   callers must compensate with [`IdentityProvider::reauthenticate`].
//! - [`Notifier`] — fire-and-forget user notifications.
//!
//! The `memory` module provides in-process implementations used by the
//! engine test suites and local tooling.

pub mod error;
pub mod memory;
pub mod paths;
pub mod traits;

pub use error::{IdentityError, NotifyError, StoreError};
pub use memory::{MemoryIdentityProvider, MemoryNotifier, MemoryStore, ScriptedFailure};
pub use traits::{
    AccountId, DocumentStore, IdentityProvider, Notification, NotificationPriority, Notifier,
    Subscription,
};
