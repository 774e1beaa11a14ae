// # Session Store
//
// The only mutable shared state of a client: the current session, guarded
// by a `tokio::sync::RwLock`.
//
// ## Locking
//
// - Readers (every authenticated request) take the shared lock to copy the
//   session id out.
// - When no valid session exists, the first caller takes the exclusive lock,
//   re-checks, and runs the login while still holding it. Callers that raced
//   it queue on the exclusive lock and find the session already populated,
//   so concurrent first use produces exactly one login exchange.
// - A session is only ever written as a whole value under the exclusive
//   lock; no reader can observe a partially written session.
//
// ## Cancellation
//
// If the future running the login is dropped, the guard is released and the
// slot is left as it was.

use std::future::Future;
use tokio::sync::RwLock;

use super::Session;
use crate::error::Result;

/// Lock-guarded slot holding the current session
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding an existing session
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(Some(session)),
        }
    }

    /// Session id of the current session, if one exists and has not expired
    pub async fn valid_sid(&self) -> Option<String> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|session| !session.is_expired())
            .map(|session| session.sid.clone())
    }

    /// Return the valid session id, logging in first if there is none
    ///
    /// `login` runs at most once per call, under the exclusive lock, and
    /// only if no valid session was found after acquiring it.
    pub async fn sid_or_login<F, Fut>(&self, login: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session>>,
    {
        if let Some(sid) = self.valid_sid().await {
            return Ok(sid);
        }

        let mut guard = self.inner.write().await;

        // Another caller may have logged in while we waited for the lock
        if let Some(session) = guard.as_ref().filter(|session| !session.is_expired()) {
            return Ok(session.sid.clone());
        }

        let session = login().await?;
        let sid = session.sid.clone();
        *guard = Some(session);
        Ok(sid)
    }

    /// Run `login` under the exclusive lock and store its session
    ///
    /// The previous session (if any) stays in place when `login` fails.
    pub async fn replace_with<F, Fut>(&self, login: F) -> Result<Session>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Session>>,
    {
        let mut guard = self.inner.write().await;
        let session = login().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Clear the store if it currently holds `sid`
    ///
    /// Returns whether a session was removed.
    pub async fn clear_if(&self, sid: &str) -> bool {
        let mut guard = self.inner.write().await;
        if guard.as_ref().is_some_and(|session| session.sid == sid) {
            *guard = None;
            true
        } else {
            false
        }
    }

    /// Copy of the current session, expired or not
    pub async fn snapshot(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }
}
