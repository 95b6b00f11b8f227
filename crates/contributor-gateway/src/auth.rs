use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::info;

use contributor_types::events::SessionEvent;
use contributor_types::models::Session;

/// Holds the current session and fans out sign-in/sign-out events to
/// subscribers. Mutated only through the gateway.
pub(crate) struct SessionStore {
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            current: RwLock::new(None),
            events,
        }
    }

    pub(crate) fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn set(&self, session: Session) {
        info!(user = %session.user.id, "session installed");
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session.clone());
        let _ = self.events.send(SessionEvent::SignedIn(session));
    }

    pub(crate) fn clear(&self) {
        let had_session = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .is_some();
        if had_session {
            info!("session cleared");
            let _ = self.events.send(SessionEvent::SignedOut);
        }
    }
}
