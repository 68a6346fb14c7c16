//! Client for a running import proxy.

use crate::server::ImportResponse;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use shared::source::{ImportError, ItemSource};
use shared::Item;
use std::time::Duration;
use tracing::{debug, warn};

/// `ItemSource` backed by the `/api/comick` endpoint of a proxy
pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ItemSource for ProxyClient {
    async fn fetch_items(&self, user_id: &str) -> Result<Vec<Item>, ImportError> {
        debug!(endpoint = %self.endpoint, user_id = user_id, "Requesting follows from proxy");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "userId": user_id }))
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, "Proxy request failed");
                ImportError::UpstreamUnavailable(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let body: ImportResponse = response
                .json()
                .await
                .map_err(|e| ImportError::UpstreamUnavailable(format!("Invalid proxy response: {}", e)))?;
            return Ok(body.comics);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("Proxy returned {}", status));

        warn!(status = %status, error = %message, "Proxy rejected import");
        Err(match status {
            StatusCode::BAD_REQUEST => ImportError::InvalidIdentifier,
            StatusCode::NOT_FOUND => ImportError::NoFollowsFound,
            // The proxy already prefixed its own message
            _ => match message.strip_prefix("Upstream unavailable: ") {
                Some(inner) => ImportError::UpstreamUnavailable(inner.to_string()),
                None => ImportError::UpstreamUnavailable(message),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> ProxyClient {
        ProxyClient::new(server.url("/api/comick"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_through_proxy() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/comick")
                    .json_body(json!({ "userId": "abcd" }));
                then.status(200).json_body(json!({
                    "comics": [{ "id": "1", "title": "Dorohedoro", "imageUrl": "x", "status": "Completed" }]
                }));
            })
            .await;

        let items = client_for(&server).fetch_items("abcd").await.unwrap();
        mock.assert_async().await;
        assert_eq!(items, vec![Item::new("1", "Dorohedoro", "x").with_status("Completed")]);
    }

    #[tokio::test]
    async fn test_status_codes_map_back() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).json_body(json!({ "userId": "1111" }));
                then.status(400).json_body(json!({ "error": "User ID is required" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).json_body(json!({ "userId": "2222" }));
                then.status(404).json_body(json!({ "error": "No comics found." }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).json_body(json!({ "userId": "3333" }));
                then.status(502).json_body(json!({ "error": "Upstream unavailable: boom" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).json_body(json!({ "userId": "4444" }));
                then.status(500).body("oops");
            })
            .await;

        let client = client_for(&server);
        assert_eq!(client.fetch_items("1111").await.unwrap_err(), ImportError::InvalidIdentifier);
        assert_eq!(client.fetch_items("2222").await.unwrap_err(), ImportError::NoFollowsFound);
        assert_eq!(
            client.fetch_items("3333").await.unwrap_err(),
            ImportError::UpstreamUnavailable("boom".into())
        );
        assert!(matches!(
            client.fetch_items("4444").await.unwrap_err(),
            ImportError::UpstreamUnavailable(ref m) if m.contains("500")
        ));
    }
}
