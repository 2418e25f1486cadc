//! Session Store
//!
//! Process-wide reactive session state: `user`, `ready`, and the derived
//! `role`. All mutation goes through `set_user`/`set_ready`; reads get a
//! defensive copy. Initialization is memoized so concurrent callers share
//! one in-flight restoration instead of racing.

use std::future::Future;
use std::sync::{Arc, Mutex};

use kernel::error::app_error::AppResult;
use kernel::id::SubscriptionId;
use platform::storage::KeyStore;
use tokio::sync::OnceCell;

use crate::domain::entity::session::SessionSnapshot;
use crate::domain::entity::user::User;

/// Subscriber callback, invoked synchronously on every mutation
pub type Subscriber = Box<dyn Fn(&SessionSnapshot) + Send + Sync>;

struct StoreState {
    user: Option<User>,
    ready: bool,
}

/// Reactive session store backed by persistent storage
pub struct SessionStore {
    state: Mutex<StoreState>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    storage: Arc<dyn KeyStore>,
    storage_key: String,
    boot: OnceCell<()>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyStore>, storage_key: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                user: None,
                ready: false,
            }),
            subscribers: Mutex::new(Vec::new()),
            storage,
            storage_key: storage_key.into(),
            boot: OnceCell::new(),
        }
    }

    /// Synchronous snapshot; always a copy, never a view into the store
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().unwrap();
        SessionSnapshot::from_parts(state.user.clone(), state.ready)
    }

    pub fn is_ready(&self) -> bool {
        self.state.lock().unwrap().ready
    }

    /// Register a subscriber; returns the handle for `unsubscribe`
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.subscribers
            .lock()
            .unwrap()
            .push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .lock()
            .unwrap()
            .retain(|(existing, _)| *existing != id);
    }

    /// Replace the user wholesale
    ///
    /// A non-null user is persisted to storage; null removes the entry.
    /// Every subscriber is notified synchronously, in subscription order.
    pub fn set_user(&self, user: Option<User>) {
        match &user {
            Some(user) => match serde_json::to_string(user) {
                Ok(raw) => self.storage.set(&self.storage_key, &raw),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to persist user");
                }
            },
            None => self.storage.remove(&self.storage_key),
        }

        self.state.lock().unwrap().user = user;
        self.notify();
    }

    /// Flip the readiness flag
    ///
    /// Becomes true exactly once per process, at the end of initialization;
    /// nothing in the library sets it back.
    pub fn set_ready(&self, ready: bool) {
        self.state.lock().unwrap().ready = ready;
        self.notify();
    }

    pub fn sign_out(&self) {
        self.set_user(None);
    }

    /// Initialize from persistent storage only
    ///
    /// Idempotent: concurrent and repeated callers all await the same
    /// one-shot restoration.
    pub async fn init_once(&self) {
        self.boot
            .get_or_init(|| async {
                self.finish_init(None);
            })
            .await;
    }

    /// Initialize, preferring a provider restoration when it yields a user
    ///
    /// The provider is only invoked by the first caller; its failure is
    /// logged and demoted to the storage fallback. Readiness is reached
    /// unconditionally so the UI never hangs on a loading state.
    pub async fn init_once_with<F, Fut>(&self, provider_init: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Option<User>>>,
    {
        self.boot
            .get_or_init(|| async {
                let provided = match provider_init().await {
                    Ok(user) => user,
                    Err(e) => {
                        tracing::warn!(error = %e, "Provider init failed");
                        None
                    }
                };
                self.finish_init(provided);
            })
            .await;
    }

    fn finish_init(&self, provided: Option<User>) {
        let user = provided.or_else(|| self.restore_from_storage());
        self.set_user(user);
        self.set_ready(true);

        tracing::debug!(
            authenticated = self.snapshot().is_authenticated(),
            "Session store ready"
        );
    }

    fn restore_from_storage(&self) -> Option<User> {
        let raw = self.storage.get(&self.storage_key)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unparseable stored user");
                self.storage.remove(&self.storage_key);
                None
            }
        }
    }

    // Callbacks run under the subscriber lock and must not re-enter
    // subscribe/unsubscribe.
    fn notify(&self) {
        let snapshot = self.snapshot();
        let subscribers = self.subscribers.lock().unwrap();
        for (_, callback) in subscribers.iter() {
            callback(&snapshot);
        }
    }
}
