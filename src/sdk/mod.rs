//! HTTP client for the public configuration API.
//!
//! ```no_run
//! # async fn run() -> Result<(), caas::sdk::SdkError> {
//! let client = caas::sdk::CaasClient::new("http://localhost:5000")?;
//! client.check_in("pos-12", "Register").await?;
//! if let Some(config) = client.get_config_for_client("pos-12", "Register", "tax.rate").await? {
//!     let rate: f64 = config.parse_value().unwrap_or(0.0);
//!     println!("{rate}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::SdkError;

use reqwest::{Client as ReqwestClient, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::domain::models::Config;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Typed client for a running configuration service.
#[derive(Debug, Clone)]
pub struct CaasClient {
    http_client: ReqwestClient,
    base_url: Url,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckInBody<'a, T: Serialize> {
    identifier: &'a str,
    #[serde(rename = "type")]
    client_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_data: Option<&'a T>,
}

impl CaasClient {
    /// Client for the service rooted at `endpoint`.
    pub fn new(endpoint: &str) -> Result<Self, SdkError> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Self::with_http_client(endpoint, http_client)
    }

    /// Client using a caller-configured `reqwest::Client`.
    pub fn with_http_client(endpoint: &str, http_client: ReqwestClient) -> Result<Self, SdkError> {
        let mut base_url = Url::parse(endpoint).map_err(|e| SdkError::InvalidUrl(format!("{endpoint}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(endpoint.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http_client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The shared config for `key`, or `None` if it does not exist.
    pub async fn get_config(&self, key: &str) -> Result<Option<Config>, SdkError> {
        self.get("api/config", &[("key", key)]).await
    }

    /// The config `key` as seen by one client, or `None` if not assigned.
    pub async fn get_config_for_client(
        &self,
        identifier: &str,
        client_type: &str,
        key: &str,
    ) -> Result<Option<Config>, SdkError> {
        self.get("api/config/client", &[("identifier", identifier), ("type", client_type), ("key", key)])
            .await
    }

    pub async fn get_all_configs(&self) -> Result<Vec<Config>, SdkError> {
        Ok(self.get("api/configs", &[]).await?.unwrap_or_default())
    }

    /// Every config assigned to a client, or `None` if the client is unknown.
    pub async fn get_all_configs_for_client(
        &self,
        identifier: &str,
        client_type: &str,
    ) -> Result<Option<Vec<Config>>, SdkError> {
        self.get("api/configs/client", &[("identifier", identifier), ("type", client_type)])
            .await
    }

    pub async fn check_in(&self, identifier: &str, client_type: &str) -> Result<(), SdkError> {
        self.send_check_in::<()>(identifier, client_type, None).await
    }

    /// Check in with a payload stored alongside the check-in.
    pub async fn check_in_with<T: Serialize>(
        &self,
        identifier: &str,
        client_type: &str,
        extra_data: &T,
    ) -> Result<(), SdkError> {
        self.send_check_in(identifier, client_type, Some(extra_data)).await
    }

    async fn send_check_in<T: Serialize>(
        &self,
        identifier: &str,
        client_type: &str,
        extra_data: Option<&T>,
    ) -> Result<(), SdkError> {
        let response = self
            .http_client
            .post(self.url("api/check-in")?)
            .json(&CheckInBody {
                identifier,
                client_type,
                extra_data,
            })
            .send()
            .await?;

        Self::check_status(response).await.map(drop)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<T>, SdkError> {
        let response = self.http_client.get(self.url(path)?).query(query).send().await?;
        let response = Self::check_status(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| SdkError::InvalidResponse(e.to_string()))
    }

    fn url(&self, path: &str) -> Result<Url, SdkError> {
        self.base_url.join(path).map_err(|e| SdkError::InvalidUrl(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, SdkError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "configuration service returned an error");
        Err(SdkError::from_status(status, &body))
    }
}
