//! Session state: who is signed in, shared by every view.
//!
//! A [`SessionManager`] is built once at startup and handed to each view.
//! The session itself is published through a `watch` channel so views can
//! read a snapshot or subscribe to changes. Only the manager's operations
//! mutate it, and each one replaces the state in a single step.
//!
//! Persisting the credential, swapping the bearer token and publishing the
//! new session happen under one commit lock, so concurrent logins and logouts
//! leave storage, token and session describing the same user.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use shared::models::{LoginRequest, RegisterRequest, TokenResponse, UserRecord};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    api::RecruxClient,
    credentials::{CredentialStore, PersistedCredential},
    error::ClientResult,
};

/// The client's view of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The signed-in user, `None` when anonymous.
    pub user: Option<UserRecord>,
    /// True until the persisted credential has been checked once.
    pub is_loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

impl Session {
    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Owns the session and the credential backing it.
#[derive(Debug, Clone)]
pub struct SessionManager {
    api: RecruxClient,
    credentials: CredentialStore,
    state: Arc<watch::Sender<Session>>,
    restored: Arc<AtomicBool>,
    commit: Arc<Mutex<()>>,
}

impl SessionManager {
    /// A manager with an unrestored session. Call [`SessionManager::restore`]
    /// before the first view runs.
    #[must_use]
    pub fn new(api: RecruxClient, credentials: CredentialStore) -> Self {
        Self {
            api,
            credentials,
            state: Arc::new(watch::Sender::new(Session::default())),
            restored: Arc::new(AtomicBool::new(false)),
            commit: Arc::new(Mutex::new(())),
        }
    }

    /// The API client whose bearer token follows this session.
    #[must_use]
    pub fn api(&self) -> &RecruxClient {
        &self.api
    }

    /// A copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserRecord> {
        self.state.borrow().user.clone()
    }

    /// Receives every subsequent session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Restores the session from the persisted credential.
    ///
    /// No request is made: the stored token is trusted until an authenticated
    /// call is refused. Only the first call does any work; later calls return
    /// the current snapshot.
    pub fn restore(&self) -> Session {
        if self.restored.swap(true, Ordering::SeqCst) {
            return self.snapshot();
        }

        let _commit = self.lock_commit();
        let credential = self.credentials.load().unwrap_or_else(|err| {
            warn!(error = %err, "failed to read persisted credential");
            None
        });

        match credential {
            Some(PersistedCredential { token, user }) => {
                debug!(email = %user.email, "restored persisted session");
                self.api.set_token(Some(token));
                self.state.send_modify(|session| {
                    session.user = Some(user);
                    session.is_loading = false;
                });
            }
            None => {
                debug!("no persisted session");
                self.state.send_modify(|session| session.is_loading = false);
            }
        }

        self.snapshot()
    }

    /// Signs in and persists the resulting credential.
    ///
    /// # Errors
    /// [`crate::ClientError::Authentication`] when the credentials are
    /// rejected, or any transport or storage failure. The session is left
    /// untouched on error.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<UserRecord> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await?;
        let user = self.establish(response)?;
        info!(email = %user.email, role = %user.role, "signed in");
        Ok(user)
    }

    /// Registers a company and its first user, then signs in as that user.
    ///
    /// # Errors
    /// [`crate::ClientError::Registration`] when the server refuses the
    /// registration, or any transport or storage failure.
    pub async fn register(
        &self,
        company_name: &str,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> ClientResult<UserRecord> {
        let request = RegisterRequest {
            company_name: company_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.map(str::to_string),
        };
        let response = self.api.register(&request).await?;
        let user = self.establish(response)?;
        info!(email = %user.email, company = ?user.company_name, "registered");
        Ok(user)
    }

    /// Signs out. Storage failures are logged, never returned.
    pub fn logout(&self) {
        let _commit = self.lock_commit();
        if let Err(err) = self.credentials.clear_credential() {
            warn!(error = %err, "failed to clear persisted credential");
        }
        self.api.set_token(None);
        self.state.send_modify(|session| session.user = None);
        info!("signed out");
    }

    /// Drops a session whose token the server has refused.
    pub fn expire(&self) {
        warn!("stored credential was rejected by the server");
        self.logout();
    }

    fn establish(&self, response: TokenResponse) -> ClientResult<UserRecord> {
        let TokenResponse {
            access_token, user, ..
        } = response;

        let _commit = self.lock_commit();
        self.credentials.write_credential(&access_token, &user)?;
        self.api.set_token(Some(access_token));
        self.state
            .send_modify(|session| session.user = Some(user.clone()));
        Ok(user)
    }

    fn lock_commit(&self) -> MutexGuard<'_, ()> {
        self.commit.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
