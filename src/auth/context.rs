use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::auth::store::{AUTH_TOKEN_KEY, SessionStore, USER_DATA_KEY};
use crate::auth::{AuthState, Authenticator, User};
use crate::error::RegistryError;

/// Value stored under [`USER_DATA_KEY`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    user: User,
    /// Unix timestamp, seconds.
    expires_at: i64,
}

fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Aborts the spawned task when dropped.
#[derive(Debug)]
pub struct TaskGuard(JoinHandle<()>);

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// One tab's authentication state, backed by a shared [`SessionStore`].
pub struct AuthContext<S: SessionStore> {
    store: S,
    state: watch::Sender<AuthState>,
    session_ttl: Duration,
}

impl<S: SessionStore> std::fmt::Debug for AuthContext<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("store", &self.store.id())
            .field("state", &*self.state.borrow())
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl<S: SessionStore> AuthContext<S> {
    /// Create a context, restoring any live session already in `store`.
    pub fn new(store: S, session_ttl: Duration) -> Self {
        let initial = read_session(&store).unwrap_or_default();
        let (state, _) = watch::channel(initial);
        Self {
            store,
            state,
            session_ttl,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Fails with [`RegistryError::Forbidden`] unless an admin is signed in.
    pub fn require_admin(&self, action: &'static str) -> Result<(), RegistryError> {
        if self.state.borrow().is_admin() {
            Ok(())
        } else {
            Err(RegistryError::Forbidden(action))
        }
    }

    pub fn require_signed_in(&self) -> Result<(), RegistryError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(RegistryError::SessionExpired)
        }
    }

    /// Sign in. Wrong credentials and authenticator failures both leave the
    /// tab signed out and return `false`.
    pub async fn login<A: Authenticator>(
        &self,
        authenticator: &A,
        username: &str,
        password: &str,
    ) -> bool {
        let user = match authenticator.authenticate(username, password).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(username = %username, "login rejected");
                return false;
            }
            Err(e) => {
                tracing::error!(username = %username, error = %e, "login failed");
                return false;
            }
        };

        let token = Uuid::new_v4().to_string();
        if let Err(e) = self.write_session(&user) {
            tracing::error!(error = %e, "failed to persist session");
            return false;
        }
        self.store.set(AUTH_TOKEN_KEY, token.clone());
        tracing::info!(username = %user.username, role = %user.role, "signed in");
        self.publish(AuthState::signed_in(user, token));
        true
    }

    pub fn logout(&self) {
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_DATA_KEY);
        if self.is_authenticated() {
            tracing::info!("signed out");
        }
        self.publish(AuthState::signed_out());
    }

    /// Extend the session by the configured lifetime.
    pub fn refresh_session(&self) -> Result<(), RegistryError> {
        let current = self.state();
        let (Some(user), Some(token)) = (current.user, current.token) else {
            return Err(RegistryError::SessionExpired);
        };
        let live = read_session(&self.store);
        if live.as_ref().and_then(|s| s.token.as_deref()) != Some(token.as_str()) {
            return Err(RegistryError::SessionExpired);
        }
        self.write_session(&user)
            .map_err(|_| RegistryError::SessionExpired)?;
        tracing::debug!(username = %user.username, "session refreshed");
        Ok(())
    }

    /// Adopt whatever session the shared store currently holds.
    pub fn sync_from_store(&self) {
        let next = read_session(&self.store).unwrap_or_default();
        self.publish(next);
    }

    /// Refresh every `period` while signed in; sign out when a refresh fails.
    pub fn spawn_refresh_timer(self: &Arc<Self>, period: Duration) -> TaskGuard {
        let ctx = Arc::clone(self);
        TaskGuard(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                if !ctx.is_authenticated() {
                    continue;
                }
                if let Err(e) = ctx.refresh_session() {
                    tracing::info!(error = %e, "session refresh failed, signing out");
                    ctx.logout();
                }
            }
        }))
    }

    /// Follow session changes made by other tabs.
    pub fn spawn_storage_listener(self: &Arc<Self>) -> TaskGuard {
        let ctx = Arc::clone(self);
        let own_id = self.store.id();
        let mut events = self.store.subscribe();
        TaskGuard(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if event.source == own_id {
                            continue;
                        }
                        if event.key == AUTH_TOKEN_KEY || event.key == USER_DATA_KEY {
                            ctx.sync_from_store();
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "storage events lagged, resyncing");
                        ctx.sync_from_store();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }))
    }

    fn write_session(&self, user: &User) -> anyhow::Result<()> {
        let ttl = i64::try_from(self.session_ttl.as_secs())?;
        let session = StoredSession {
            user: user.clone(),
            expires_at: now_unix().saturating_add(ttl),
        };
        self.store
            .set(USER_DATA_KEY, serde_json::to_string(&session)?);
        Ok(())
    }

    fn publish(&self, next: AuthState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// The live session in `store`, if both keys are present and unexpired.
fn read_session<S: SessionStore>(store: &S) -> Option<AuthState> {
    let token = store.get(AUTH_TOKEN_KEY)?;
    let raw = store.get(USER_DATA_KEY)?;
    let session: StoredSession = match serde_json::from_str(&raw) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable session data");
            return None;
        }
    };
    if session.expires_at <= now_unix() {
        return None;
    }
    Some(AuthState::signed_in(session.user, token))
}
