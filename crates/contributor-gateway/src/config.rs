use url::Url;

use crate::error::GatewayError;

pub const SERVICE_URL_VAR: &str = "CONTRIBUTOR_SERVICE_URL";
pub const ANON_KEY_VAR: &str = "CONTRIBUTOR_ANON_KEY";

/// Backend endpoint and public API key. Both come from the process
/// environment at startup; absence of either is fatal.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub service_url: Url,
    pub anon_key: String,
}

impl GatewayConfig {
    pub fn new(service_url: &str, anon_key: impl Into<String>) -> Result<Self, GatewayError> {
        // A trailing slash makes Url::join treat the base as a directory.
        let normalized = if service_url.ends_with('/') {
            service_url.to_string()
        } else {
            format!("{service_url}/")
        };
        Ok(Self {
            service_url: Url::parse(&normalized)?,
            anon_key: anon_key.into(),
        })
    }

    pub fn from_env() -> Result<Self, GatewayError> {
        let url = std::env::var(SERVICE_URL_VAR)
            .map_err(|_| GatewayError::Config(format!("{SERVICE_URL_VAR} is not set")))?;
        let key = std::env::var(ANON_KEY_VAR)
            .map_err(|_| GatewayError::Config(format!("{ANON_KEY_VAR} is not set")))?;
        Self::new(&url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_a_trailing_slash() {
        let config = GatewayConfig::new("https://example.supabase.co", "anon").unwrap();
        assert_eq!(config.service_url.as_str(), "https://example.supabase.co/");
        assert_eq!(
            config.service_url.join("rest/v1/sparks").unwrap().as_str(),
            "https://example.supabase.co/rest/v1/sparks"
        );
    }

    #[test]
    fn garbage_url_is_a_config_error() {
        assert!(GatewayConfig::new("not a url", "anon").is_err());
    }

    #[test]
    fn missing_environment_is_fatal() {
        // No other test in this crate touches these variables.
        unsafe {
            std::env::remove_var(SERVICE_URL_VAR);
            std::env::remove_var(ANON_KEY_VAR);
        }
        assert!(matches!(
            GatewayConfig::from_env(),
            Err(GatewayError::Config(_))
        ));
    }
}
