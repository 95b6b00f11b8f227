use tokio::sync::watch;
use tracing::error;
use uuid::Uuid;

use contributor_types::models::{Message, Spark, SparkStatus};

use crate::backend::ContributorBackend;
use crate::store::Store;

/// The conversation overlay: the currently selected spark and its message
/// list.
///
/// A claim or reply completing after the user has closed the overlay or
/// selected another spark is still applied to these stores; the single
/// UI-task mutation model rules out data races but not this logical one.
pub struct ConversationOverlay<B> {
    backend: B,
    selected: Store<Option<Spark>>,
    messages: Store<Vec<Message>>,
}

impl<B: ContributorBackend> ConversationOverlay<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            selected: Store::new(None),
            messages: Store::new(Vec::new()),
        }
    }

    pub fn selected(&self) -> Option<Spark> {
        self.selected.get()
    }

    pub fn subscribe_messages(&self) -> watch::Receiver<Vec<Message>> {
        self.messages.subscribe()
    }

    /// Select a spark and replace the message list wholesale with its
    /// conversation. A failed load keeps whatever was cached.
    pub async fn open(&self, spark: Spark) {
        let spark_id = spark.id;
        self.selected.set(Some(spark));
        match self.backend.load_messages(spark_id).await {
            Ok(messages) => self.messages.set(messages),
            Err(err) => error!("message load failed: {err}"),
        }
    }

    /// Clears the selection. The message cache is intentionally kept; the
    /// next open replaces it.
    pub fn close(&self) {
        self.selected.set(None);
    }

    /// Messages re-sorted by `idx` before display; fetch order is not
    /// trusted.
    pub fn sorted_messages(&self) -> Vec<Message> {
        let mut messages = self.messages.get();
        messages.sort_by_key(|m| m.idx);
        messages
    }

    /// The composer is shown for an OPEN spark to anyone (the first reply
    /// claims it), and for a TAKEN spark only to its participants.
    pub fn composer_visible(&self, user_id: Option<Uuid>) -> bool {
        match self.selected.get() {
            None => false,
            Some(spark) => match spark.status {
                SparkStatus::Open => true,
                SparkStatus::Taken => {
                    user_id.is_some_and(|user| spark.is_participant(user))
                }
                SparkStatus::Closed => false,
            },
        }
    }

    pub(crate) fn append_message(&self, message: Message) {
        self.messages.update(|messages| messages.push(message));
    }

    pub(crate) fn mark_taken(&self, spark_id: Uuid) {
        self.selected.update(|selected| {
            if let Some(spark) = selected {
                if spark.id == spark_id {
                    spark.status = SparkStatus::Taken;
                }
            }
        });
    }
}
