//! Session management (current API)

use pihole_core::{Dispatcher, Result, Session};

/// Sessions collaborator
///
/// Thin view over the dispatcher's session handling. Logging in here and
/// the lazy login performed by other collaborators share one session store.
#[derive(Debug, Clone, Copy)]
pub struct Sessions<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> Sessions<'a> {
    pub(crate) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Open a new session without making it the client's session
    pub async fn create(&self) -> Result<Session> {
        self.dispatcher.create_session().await
    }

    /// Log in and use the new session for subsequent calls
    pub async fn login(&self) -> Result<Session> {
        let session = self.dispatcher.login().await?;
        tracing::info!("Logged in (session valid for {}s)", session.validity_secs);
        Ok(session)
    }

    /// Delete session `sid` on the appliance
    ///
    /// # Errors
    ///
    /// Unlike entity deletes this is not idempotent: an unknown or already
    /// invalidated session is reported as `AuthFailure::NotFound`.
    pub async fn delete(&self, sid: &str) -> Result<()> {
        self.dispatcher.logout(sid).await?;
        tracing::info!("Deleted session");
        Ok(())
    }

    /// Id of the client's current session, if one is held and not expired
    pub async fn current(&self) -> Option<String> {
        self.dispatcher.session_id().await
    }
}
