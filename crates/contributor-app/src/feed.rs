use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tracing::error;
use uuid::Uuid;

use contributor_types::models::{Spark, SparkStatus};

use crate::backend::ContributorBackend;
use crate::store::Store;

/// Which of the two mutually exclusive queries drives the spark list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedView {
    /// All users' sparks, newest first, capped.
    Feed,
    /// Sparks the current user authored or contributes to, newest first.
    Mine,
}

/// Owns the displayed spark list and the view toggle. Reloads on view or
/// session change; read errors leave the previous list in place.
pub struct FeedController<B> {
    backend: B,
    view: Store<FeedView>,
    sparks: Store<Vec<Spark>>,
}

impl<B: ContributorBackend> FeedController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            view: Store::new(FeedView::Feed),
            sparks: Store::new(Vec::new()),
        }
    }

    pub fn view(&self) -> FeedView {
        self.view.get()
    }

    pub fn sparks(&self) -> Vec<Spark> {
        self.sparks.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Spark>> {
        self.sparks.subscribe()
    }

    pub async fn set_view(&self, view: FeedView) {
        self.view.set(view);
        self.reload().await;
    }

    /// Re-fetch the list for the current view. Stale-on-error: a failed
    /// read is logged and the displayed set is left unchanged, except for
    /// "mine" with no user, which empties without issuing a request.
    pub async fn reload(&self) {
        match self.view.get() {
            FeedView::Feed => match self.backend.load_feed().await {
                Ok(sparks) => self.sparks.set(sparks),
                Err(err) => error!("feed load failed: {err}"),
            },
            FeedView::Mine => {
                let Some(session) = self.backend.current_session() else {
                    self.sparks.set(Vec::new());
                    return;
                };
                match self.backend.load_mine(session.user.id).await {
                    Ok(sparks) => self.sparks.set(sparks),
                    Err(err) => error!("my-conversations load failed: {err}"),
                }
            }
        }
    }

    /// Reload on every session identity change, for the task's lifetime.
    pub async fn watch_session(self: Arc<Self>) {
        let mut events = self.backend.subscribe_session();
        loop {
            match events.recv().await {
                Ok(_) => self.reload().await,
                Err(RecvError::Lagged(_)) => self.reload().await,
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Flip a cached spark to TAKEN after a confirmed claim.
    pub(crate) fn mark_taken(&self, spark_id: Uuid) {
        self.sparks.update(|sparks| {
            for spark in sparks.iter_mut() {
                if spark.id == spark_id {
                    spark.status = SparkStatus::Taken;
                }
            }
        });
    }
}
