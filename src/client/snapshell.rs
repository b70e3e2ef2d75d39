//! SnapShell API client implementation

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use super::{CreatedSnapshot, SnapshotApi, SnapshotRequest};
use crate::error::{ApiError, Result};

/// SnapShell API client
pub struct SnapshellClient {
    http: HttpClient,
    api_url: String,
    token: Option<String>,
}

impl SnapshellClient {
    /// Create a new client for `api_url`, optionally authenticated
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Public URL of a created snapshot
    pub fn snapshot_url(&self, id: &str) -> String {
        format!("{}/snapshots/{}", self.api_url, id)
    }
}

#[async_trait]
impl SnapshotApi for SnapshellClient {
    async fn create_snapshot(&self, request: &SnapshotRequest) -> Result<CreatedSnapshot> {
        #[derive(Deserialize)]
        struct ApiResponse {
            snapshot: CreatedSnapshot,
        }

        let endpoint = format!("{}/api/snapshots", self.api_url);
        debug!("POST {endpoint} (type: {})", request.snapshot_type);

        let mut http_request = self.http.post(&endpoint).json(request);
        if let Some(token) = &self.token {
            http_request = http_request.bearer_auth(token);
        }

        let response = http_request.send().await.map_err(|e| ApiError::Network {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let status = response.status();
        match status {
            StatusCode::CREATED => {
                let body: ApiResponse = response.json().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {e}"))
                })?;
                Ok(body.snapshot)
            }
            // An anonymous 401 is just a server rejection; the re-login hint
            // only makes sense when a credential was actually sent.
            StatusCode::UNAUTHORIZED if self.token.is_some() => Err(ApiError::Unauthorized.into()),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::Status {
                    code: status.as_u16(),
                    body,
                }
                .into())
            }
        }
    }
}
