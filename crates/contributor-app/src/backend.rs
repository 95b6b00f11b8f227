use std::future::Future;

use tokio::sync::broadcast;
use uuid::Uuid;

use contributor_gateway::{Gateway, GatewayError, Order};
use contributor_types::api::{
    ClaimSparkParams, CreateSparkParams, FollowRecord, FollowSparkParams, PostMessageParams,
    ToggleLikeParams, ToggleLikeResponse,
};
use contributor_types::events::SessionEvent;
use contributor_types::models::{Message, Session, Spark};

/// How many sparks the global feed fetches per load.
pub const FEED_LIMIT: u32 = 50;

/// The typed backend surface the controllers depend on. `Gateway` is the
/// production implementation; tests substitute an in-memory one.
///
/// Async operations are declared as `impl Future + Send` so controller
/// futures stay spawnable on the runtime.
pub trait ContributorBackend: Clone + Send + Sync + 'static {
    fn current_session(&self) -> Option<Session>;
    fn subscribe_session(&self) -> broadcast::Receiver<SessionEvent>;

    /// Idempotent "ensure account row" procedure, called on every sign-in
    /// transition and by the manual fix-account action.
    fn ensure_account_row(&self) -> impl Future<Output = Result<(), GatewayError>> + Send;

    fn create_spark(
        &self,
        body: &str,
    ) -> impl Future<Output = Result<Spark, GatewayError>> + Send;

    /// Claim an OPEN spark with its first reply. The backend transitions
    /// the spark to TAKEN and returns the new message.
    fn claim_spark_and_reply(
        &self,
        spark_id: Uuid,
        body: &str,
    ) -> impl Future<Output = Result<Message, GatewayError>> + Send;

    fn post_message(
        &self,
        spark_id: Uuid,
        body: &str,
    ) -> impl Future<Output = Result<Message, GatewayError>> + Send;

    /// Returns the toggle's direction: true when the like was added.
    fn toggle_like(
        &self,
        spark_id: Uuid,
    ) -> impl Future<Output = Result<bool, GatewayError>> + Send;

    fn follow_spark(
        &self,
        spark_id: Uuid,
    ) -> impl Future<Output = Result<FollowRecord, GatewayError>> + Send;

    /// Up to `FEED_LIMIT` sparks across all users, newest first.
    fn load_feed(&self) -> impl Future<Output = Result<Vec<Spark>, GatewayError>> + Send;

    /// Sparks where `user_id` is author or selected contributor, newest
    /// first, unbounded.
    fn load_mine(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Spark>, GatewayError>> + Send;

    /// A spark's conversation, ordered by `idx` ascending.
    fn load_messages(
        &self,
        spark_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Message>, GatewayError>> + Send;
}

impl ContributorBackend for Gateway {
    fn current_session(&self) -> Option<Session> {
        Gateway::current_session(self)
    }

    fn subscribe_session(&self) -> broadcast::Receiver<SessionEvent> {
        Gateway::subscribe_session(self)
    }

    async fn ensure_account_row(&self) -> Result<(), GatewayError> {
        self.rpc_unit("ensure_user_row", &serde_json::json!({})).await
    }

    async fn create_spark(&self, body: &str) -> Result<Spark, GatewayError> {
        self.rpc(
            "create_spark",
            &CreateSparkParams {
                p_body: body.to_string(),
            },
        )
        .await
    }

    async fn claim_spark_and_reply(
        &self,
        spark_id: Uuid,
        body: &str,
    ) -> Result<Message, GatewayError> {
        self.rpc(
            "claim_spark_and_reply",
            &ClaimSparkParams {
                p_spark_id: spark_id,
                p_body: body.to_string(),
            },
        )
        .await
    }

    async fn post_message(&self, spark_id: Uuid, body: &str) -> Result<Message, GatewayError> {
        self.rpc(
            "post_message",
            &PostMessageParams {
                p_spark_id: spark_id,
                p_body: body.to_string(),
            },
        )
        .await
    }

    async fn toggle_like(&self, spark_id: Uuid) -> Result<bool, GatewayError> {
        let response: ToggleLikeResponse = self
            .rpc(
                "toggle_like",
                &ToggleLikeParams {
                    p_spark_id: spark_id,
                },
            )
            .await?;
        Ok(response.liked)
    }

    async fn follow_spark(&self, spark_id: Uuid) -> Result<FollowRecord, GatewayError> {
        self.rpc(
            "follow_spark",
            &FollowSparkParams {
                p_spark_id: spark_id,
            },
        )
        .await
    }

    async fn load_feed(&self) -> Result<Vec<Spark>, GatewayError> {
        self.from("sparks")
            .order("created_at", Order::Descending)
            .limit(FEED_LIMIT)
            .fetch()
            .await
    }

    async fn load_mine(&self, user_id: Uuid) -> Result<Vec<Spark>, GatewayError> {
        self.from("sparks")
            .or_eq([
                ("author_id", user_id),
                ("selected_contributor_id", user_id),
            ])
            .order("created_at", Order::Descending)
            .fetch()
            .await
    }

    async fn load_messages(&self, spark_id: Uuid) -> Result<Vec<Message>, GatewayError> {
        self.from("messages_with_handles")
            .eq("spark_id", spark_id)
            .order("idx", Order::Ascending)
            .fetch()
            .await
    }
}
