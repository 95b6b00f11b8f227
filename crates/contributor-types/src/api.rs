use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- RPC parameter objects --
//
// Field names carry the backend's `p_` prefix so each struct serializes
// directly into the Postgres function's argument object.

#[derive(Debug, Clone, Serialize)]
pub struct CreateSparkParams {
    pub p_body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimSparkParams {
    pub p_spark_id: Uuid,
    pub p_body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostMessageParams {
    pub p_spark_id: Uuid,
    pub p_body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleLikeParams {
    pub p_spark_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowSparkParams {
    pub p_spark_id: Uuid,
}

// -- RPC results --

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleLikeResponse {
    pub liked: bool,
}

/// Subscription record returned by `follow_spark`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowRecord {
    pub id: Uuid,
    pub spark_id: Uuid,
    pub user_id: Uuid,
}
