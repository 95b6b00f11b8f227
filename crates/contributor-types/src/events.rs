use serde::{Deserialize, Serialize};

use crate::models::Session;

/// Session lifecycle notifications broadcast by the gateway's session
/// store. Controllers subscribe for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}
