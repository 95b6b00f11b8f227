use thiserror::Error;

/// Everything that can go wrong at the backend boundary.
///
/// `Remote` carries the business error reported by a Postgres function
/// (e.g. "spark already taken"); `Transport` is the network/HTTP layer.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("missing or invalid configuration: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Remote {
        code: Option<String>,
        message: String,
    },

    #[error("not authorized")]
    Unauthorized,

    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),
}
