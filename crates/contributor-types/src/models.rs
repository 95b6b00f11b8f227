use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a spark. An OPEN spark accepts a first reply from
/// anyone; a successful claim transitions it to TAKEN. CLOSED is terminal
/// and is never produced by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SparkStatus {
    Open,
    Taken,
    Closed,
}

/// A user-authored prompt seeking a contributor reply.
///
/// The backend is authoritative: this client only ever holds a read-only
/// copy per fetch cycle and mutates sparks through remote procedures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spark {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub status: SparkStatus,
    pub created_at: DateTime<Utc>,
    pub selected_contributor_id: Option<Uuid>,
    /// Like count; the backend omits it on older rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
}

impl Spark {
    /// Author or selected contributor — the only users permitted to
    /// continue an in-progress conversation.
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.author_id == user_id || self.selected_contributor_id == Some(user_id)
    }
}

/// One message in a spark's conversation, joined with the author's handle.
/// `idx` is a strict total order within the spark; messages are append-only
/// from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub spark_id: Uuid,
    pub author_id: Uuid,
    pub author_handle: String,
    pub body: String,
    pub idx: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
}

/// An authenticated session: opaque bearer token plus the user it belongs
/// to. Created on sign-in, cleared on sign-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: UserIdentity,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spark(author: Uuid, contributor: Option<Uuid>) -> Spark {
        Spark {
            id: Uuid::new_v4(),
            author_id: author,
            body: "test".into(),
            status: SparkStatus::Open,
            created_at: Utc::now(),
            selected_contributor_id: contributor,
            likes: None,
        }
    }

    #[test]
    fn status_uses_screaming_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&SparkStatus::Open).unwrap(), "\"OPEN\"");
        assert_eq!(serde_json::to_string(&SparkStatus::Taken).unwrap(), "\"TAKEN\"");
        let parsed: SparkStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(parsed, SparkStatus::Closed);
    }

    #[test]
    fn spark_row_without_likes_column_parses() {
        let author = Uuid::new_v4();
        let json = format!(
            r#"{{"id":"{}","author_id":"{}","body":"hi","status":"OPEN","created_at":"2026-01-01T00:00:00Z","selected_contributor_id":null}}"#,
            Uuid::new_v4(),
            author,
        );
        let s: Spark = serde_json::from_str(&json).unwrap();
        assert_eq!(s.likes, None);
        assert_eq!(s.status, SparkStatus::Open);
    }

    #[test]
    fn participants_are_author_and_selected_contributor() {
        let author = Uuid::new_v4();
        let contributor = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let s = spark(author, Some(contributor));
        assert!(s.is_participant(author));
        assert!(s.is_participant(contributor));
        assert!(!s.is_participant(stranger));

        let unclaimed = spark(author, None);
        assert!(!unclaimed.is_participant(stranger));
    }
}
