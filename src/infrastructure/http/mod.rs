//! Shared HTTP client for third-party REST APIs
//!
//! One attempt per request. Failures go straight back to the command that
//! asked, which reports them to the user.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::application::errors::ApiError;
use crate::infrastructure::config::ApisConfig;

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Decode a successful body, turning any other status into an error
    /// carrying the body text.
    pub fn success_json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Service(self.body.trim().to_string()));
        }
        self.json()
    }
}

/// HTTP client with the bot's user agent and request timeout
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(config: &ApisConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET `url` with `query` parameters
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<ApiResponse, ApiError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if !(200..300).contains(&status) {
            tracing::warn!("GET {} returned {}", url, status);
        }
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Price {
        price: f64,
    }

    #[test]
    fn test_success_json() {
        let ok = ApiResponse { status: 200, body: r#"{"price": 1.5}"#.into() };
        assert_eq!(ok.success_json::<Price>().unwrap().price, 1.5);

        let missing = ApiResponse { status: 404, body: "Sorry, that currency was not found\n".into() };
        let err = missing.success_json::<Price>().unwrap_err();
        assert_eq!(err.to_string(), "Error: Sorry, that currency was not found");
    }

    #[test]
    fn test_bad_json_is_decode_error() {
        let garbled = ApiResponse { status: 200, body: "<html>".into() };
        assert!(matches!(garbled.json::<Price>(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_client_builds_from_config() {
        assert!(ApiClient::new(&ApisConfig::default()).is_ok());
    }
}
