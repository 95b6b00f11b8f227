use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use contributor_gateway::GatewayError;
use contributor_types::events::SessionEvent;

use crate::backend::ContributorBackend;

/// Watches session transitions and makes sure the backend has an account
/// row for every signed-in user.
#[derive(Clone)]
pub struct SessionController<B> {
    backend: B,
}

impl<B: ContributorBackend> SessionController<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Runs for the process lifetime. On start and on every transition to
    /// a signed-in session, fires `ensure_user_row` exactly once as a
    /// background task; its failure is logged and otherwise ignored.
    pub async fn run(self) {
        if self.backend.current_session().is_some() {
            self.spawn_ensure();
        }

        let mut events = self.backend.subscribe_session();
        loop {
            match events.recv().await {
                Ok(SessionEvent::SignedIn(session)) => {
                    debug!(user = %session.user.id, "signed in");
                    self.spawn_ensure();
                }
                Ok(SessionEvent::SignedOut) => debug!("signed out"),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session event stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn spawn_ensure(&self) {
        let backend = self.backend.clone();
        tokio::spawn(async move {
            if let Err(err) = backend.ensure_account_row().await {
                warn!("ensure_user_row failed: {err}");
            }
        });
    }

    /// Manual "fix account" action. Unlike the background call, the result
    /// is reported to the caller.
    pub async fn fix_account(&self) -> Result<(), GatewayError> {
        self.backend.ensure_account_row().await
    }
}
