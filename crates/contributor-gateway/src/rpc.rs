use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Error body shape reported by the backend's REST layer for failed
/// queries and remote procedures.
#[derive(Debug, Deserialize)]
pub(crate) struct RemoteErrorBody {
    #[serde(default, alias = "msg", alias = "error_description")]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Turn a completed HTTP response into a typed value or a `GatewayError`.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(decode_failure(status, &response.text().await.unwrap_or_default()))
}

/// As `decode`, for calls whose result body is ignored.
pub(crate) async fn expect_success(response: Response) -> Result<(), GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(decode_failure(status, &response.text().await.unwrap_or_default()))
}

pub(crate) fn decode_failure(status: StatusCode, body: &str) -> GatewayError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return GatewayError::Unauthorized;
    }
    match serde_json::from_str::<RemoteErrorBody>(body) {
        Ok(err) => {
            let mut message = err
                .message
                .unwrap_or_else(|| format!("remote call failed with HTTP {status}"));
            if let Some(details) = err.details {
                message = format!("{message} ({details})");
            }
            if let Some(hint) = err.hint {
                message = format!("{message} — hint: {hint}");
            }
            GatewayError::Remote {
                code: err.code,
                message,
            }
        }
        Err(_) => GatewayError::Remote {
            code: None,
            message: format!("remote call failed with HTTP {status}"),
        },
    }
}
