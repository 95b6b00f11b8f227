use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use contributor_types::models::SparkStatus;

use crate::backend::ContributorBackend;
use crate::feed::FeedController;
use crate::notify::Notifier;
use crate::overlay::ConversationOverlay;
use crate::store::Store;

/// The write path: create, claim-and-reply, post, toggle-like, follow.
///
/// Every remote failure is surfaced through one blocking notifier alert
/// plus one log entry, with no local mutation applied. The single
/// exception is the claim status flip, which happens only after remote
/// confirmation. No retries, no de-duplication of repeated submissions.
pub struct SparkActions<B, N> {
    backend: B,
    feed: Arc<FeedController<B>>,
    overlay: Arc<ConversationOverlay<B>>,
    notifier: Arc<N>,
    composer_open: Store<bool>,
}

impl<B: ContributorBackend, N: Notifier> SparkActions<B, N> {
    pub fn new(
        backend: B,
        feed: Arc<FeedController<B>>,
        overlay: Arc<ConversationOverlay<B>>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            backend,
            feed,
            overlay,
            notifier,
            composer_open: Store::new(false),
        }
    }

    pub fn open_composer(&self) {
        self.composer_open.set(true);
    }

    pub fn composer_open(&self) -> bool {
        self.composer_open.get()
    }

    /// Ensure the account row exists, then create the spark. Success
    /// reloads the feed once and closes the creation panel; failure of
    /// either step leaves the panel open and shows no partial spark.
    pub async fn create(&self, body: &str) {
        let result = async {
            self.backend.ensure_account_row().await?;
            self.backend.create_spark(body).await
        }
        .await;

        match result {
            Ok(spark) => {
                debug!(spark = %spark.id, "spark created");
                self.feed.reload().await;
                self.composer_open.set(false);
            }
            Err(err) => {
                error!("create_spark failed: {err}");
                self.notifier.alert(&err.to_string());
            }
        }
    }

    /// Claim the selected OPEN spark with its first reply. On success the
    /// returned message is appended and the cached spark flips to TAKEN in
    /// both the feed and the overlay selection.
    pub async fn claim_and_reply(&self, body: &str) {
        let Some(spark) = self.overlay.selected() else {
            return;
        };
        if spark.status != SparkStatus::Open {
            return;
        }

        match self.backend.claim_spark_and_reply(spark.id, body).await {
            Ok(message) => {
                self.overlay.append_message(message);
                self.overlay.mark_taken(spark.id);
                self.feed.mark_taken(spark.id);
            }
            Err(err) => {
                error!("claim_spark_and_reply failed: {err}");
                self.notifier.alert(&err.to_string());
            }
        }
    }

    /// Continue the selected conversation. Only participants of the spark
    /// may post; for anyone else this is a no-op (the composer is hidden).
    pub async fn post_message(&self, body: &str) {
        let Some(spark) = self.overlay.selected() else {
            return;
        };
        let is_participant = self
            .backend
            .current_session()
            .is_some_and(|session| spark.is_participant(session.user.id));
        if !is_participant {
            return;
        }

        match self.backend.post_message(spark.id, body).await {
            Ok(message) => self.overlay.append_message(message),
            Err(err) => {
                error!("post_message failed: {err}");
                self.notifier.alert(&err.to_string());
            }
        }
    }

    /// Toggle a like, then reload the feed for authoritative counts.
    /// Never optimistic: concurrent likes by other users would drift a
    /// local increment.
    pub async fn toggle_like(&self, spark_id: Uuid) {
        match self.backend.toggle_like(spark_id).await {
            Ok(liked) => {
                debug!(spark = %spark_id, liked, "like toggled");
                self.feed.reload().await;
            }
            Err(err) => {
                error!("toggle_like failed: {err}");
                self.notifier.alert(&err.to_string());
            }
        }
    }

    /// Follow a spark. No local state changes either way.
    pub async fn follow(&self, spark_id: Uuid) {
        if let Err(err) = self.backend.follow_spark(spark_id).await {
            error!("follow_spark failed: {err}");
            self.notifier.alert(&err.to_string());
        }
    }
}
