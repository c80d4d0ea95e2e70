//! API-Football client

use serde_json::Value;

use super::{build_http_client, response_array, UpstreamError};
use crate::config::FootballConfig;

/// Header carrying the API-Football key
pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Client for API-Football v3
#[derive(Clone)]
pub struct FootballClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for FootballClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FootballClient")
            .field("base_url", &self.base_url)
            .field("has_key", &self.api_key.is_some())
            .finish()
    }
}

impl FootballClient {
    pub fn new(config: &FootballConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client(config.timeout())?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// `GET {base}{endpoint}?params` and return the parsed body
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, UpstreamError> {
        let key = self.api_key.as_deref().ok_or(UpstreamError::MissingKey)?;
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, key)
            .query(params)
            .send()
            .await
            .map_err(|e| UpstreamError::http(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::decode(endpoint, e))
    }

    /// Like [`get`](Self::get) but only the `response` array
    pub async fn get_response(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Value>, UpstreamError> {
        let body = self.get(endpoint, params).await?;
        Ok(response_array(&body))
    }
}
