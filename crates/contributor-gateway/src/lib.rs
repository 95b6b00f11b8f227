mod auth;
pub mod config;
pub mod error;
pub mod query;
mod rpc;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use query::{Order, QueryBuilder};

use std::sync::Arc;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use url::Url;

use contributor_types::events::SessionEvent;
use contributor_types::models::Session;

use crate::auth::SessionStore;

/// Handle to the managed backend: session store, table-style reads, and
/// named remote-procedure invocation.
///
/// Explicitly constructed and cheap to clone (shared inner); build one per
/// process and pass it to the controllers instead of reaching for a global.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    http: reqwest::Client,
    config: GatewayConfig,
    session: SessionStore,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                http: reqwest::Client::new(),
                config,
                session: SessionStore::new(),
            }),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    // -- Session --

    pub fn current_session(&self) -> Option<Session> {
        self.inner.session.current()
    }

    pub fn subscribe_session(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.session.subscribe()
    }

    /// Install a session obtained out of band (a completed magic link).
    pub fn set_session(&self, session: Session) {
        self.inner.session.set(session);
    }

    pub fn sign_out(&self) {
        self.inner.session.clear();
    }

    /// Ask the auth service to email a sign-in link.
    pub async fn request_magic_link(&self, email: &str) -> Result<(), GatewayError> {
        let url = self.endpoint("auth/v1/otp")?;
        let response = self
            .authed(self.inner.http.post(url))
            .json(&serde_json::json!({ "email": email, "create_user": true }))
            .send()
            .await?;
        rpc::expect_success(response).await
    }

    // -- Table reads --

    /// Start a read query against a named collection.
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(self.clone(), table)
    }

    // -- Remote procedures --

    /// Invoke a named remote procedure with a typed parameter object.
    pub async fn rpc<P, R>(&self, name: &str, params: &P) -> Result<R, GatewayError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(&format!("rest/v1/rpc/{name}"))?;
        let response = self
            .authed(self.inner.http.post(url))
            .json(params)
            .send()
            .await?;
        rpc::decode(response).await
    }

    /// Invoke a remote procedure whose result body is not consulted.
    pub async fn rpc_unit<P>(&self, name: &str, params: &P) -> Result<(), GatewayError>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint(&format!("rest/v1/rpc/{name}"))?;
        let response = self
            .authed(self.inner.http.post(url))
            .json(params)
            .send()
            .await?;
        rpc::expect_success(response).await
    }

    // -- Internals shared with the query builder --

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        Ok(self.inner.config.service_url.join(path)?)
    }

    /// Attach the public API key and, when signed in, the session's bearer
    /// token (the anon key otherwise).
    pub(crate) fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .current_session()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.inner.config.anon_key.clone());
        request
            .header("apikey", &self.inner.config.anon_key)
            .bearer_auth(bearer)
    }
}
