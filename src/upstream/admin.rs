//! Public admin API endpoints used by the site server

use axum::body::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::net::IpAddr;

use super::{build_http_client, UpstreamError, DEFAULT_TIMEOUT};
use crate::models::{Envelope, PublicCategory};

/// A tracking beacon relayed from a browser
#[derive(Debug, Clone)]
pub struct ForwardedTrack {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub client_ip: Option<IpAddr>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminApi {
    http: reqwest::Client,
    base_url: String,
}

impl AdminApi {
    /// `base_url` is the admin service root, without `/api`
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/public/categories`
    pub async fn public_categories(&self) -> Result<Envelope<Vec<PublicCategory>>, UpstreamError> {
        let endpoint = "/api/public/categories";
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .send()
            .await
            .map_err(|e| UpstreamError::http(endpoint, e))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::decode(endpoint, e))
    }

    /// `POST /api/track` with the beacon body unchanged
    pub async fn forward_track(&self, track: ForwardedTrack) -> Result<(), UpstreamError> {
        let endpoint = "/api/track";
        let mut request = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .header(
                CONTENT_TYPE,
                track.content_type.as_deref().unwrap_or("application/json"),
            )
            .body(track.body);

        if let Some(ip) = track.client_ip {
            request = request.header("X-Forwarded-For", ip.to_string());
        }
        if let Some(agent) = track.user_agent {
            request = request.header(USER_AGENT, agent);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::http(endpoint, e))?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
