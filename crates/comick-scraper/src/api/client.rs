//! Comick client reading a user's follow list.
//!
//! The site exposes no public follows API. The list page embeds the Next.js
//! build id, which names the data route that returns the follows as JSON.

use super::types::NextData;
use crate::parse::parse_follows;
use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, StatusCode};
use shared::source::{is_valid_user_id, ImportError, ItemSource};
use shared::Item;
use std::time::Duration;
use tracing::{debug, info, warn};

static BUILD_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""buildId":"([^"]+)""#).expect("build id pattern is valid"));

/// Comick follow-list client
pub struct ComickClient {
    /// HTTP client
    client: Client,
    /// Site base URL
    base_url: String,
    /// Cover image host
    image_base_url: String,
}

impl ComickClient {
    /// Create a new Comick client
    pub fn new(base_url: &str, image_base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers(&base_url)?)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &shared::Config) -> Result<Self> {
        Self::new(
            &config.comick.base_url,
            &config.comick.image_base_url,
            config.request_timeout(),
        )
    }

    /// Fetch the build id embedded in the user's list page
    async fn fetch_build_id(&self, user_id: &str) -> Result<String, ImportError> {
        let url = format!("{}/user/{}/list", self.base_url, user_id);
        debug!(url = %url, "Fetching list page");

        let response = self.client.get(&url).send().await.map_err(upstream)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ImportError::NoFollowsFound);
        }
        if !status.is_success() {
            warn!(url = %url, status = %status, "List page request failed");
            return Err(ImportError::UpstreamUnavailable(format!(
                "Failed to fetch user page: {}",
                status
            )));
        }

        let html = response.text().await.map_err(upstream)?;
        BUILD_ID
            .captures(&html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ImportError::UpstreamUnavailable("Unable to find buildId in the list page".into()))
    }

    /// Fetch the raw follow records of `user_id`
    async fn fetch_follows(&self, user_id: &str) -> Result<Vec<serde_json::Value>, ImportError> {
        let build_id = self.fetch_build_id(user_id).await?;
        let url = format!(
            "{}/_next/data/{}/user/{}/list.json?id={}",
            self.base_url, build_id, user_id, user_id
        );
        debug!(url = %url, "Fetching follows data");

        let response = self.client.get(&url).send().await.map_err(upstream)?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Follows data request failed");
            return Err(ImportError::UpstreamUnavailable(format!(
                "Failed to fetch follows data: {}",
                status
            )));
        }

        let data: NextData = response.json().await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to parse follows data");
            ImportError::UpstreamUnavailable(format!("Failed to parse follows data: {}", e))
        })?;

        data.into_follows()
            .ok_or_else(|| ImportError::UpstreamUnavailable("Unable to find follows data in the response".into()))
    }
}

#[async_trait]
impl ItemSource for ComickClient {
    async fn fetch_items(&self, user_id: &str) -> Result<Vec<Item>, ImportError> {
        if !is_valid_user_id(user_id) {
            return Err(ImportError::InvalidIdentifier);
        }

        info!(user_id = user_id, "Fetching comick follows");
        let follows = self.fetch_follows(user_id).await?;
        let items = parse_follows(&follows, &self.image_base_url);
        info!(user_id = user_id, records = follows.len(), items = items.len(), "Parsed follows");

        if items.is_empty() {
            return Err(ImportError::NoFollowsFound);
        }
        Ok(items)
    }
}

fn upstream(err: reqwest::Error) -> ImportError {
    warn!(error = %err, "Request to comick failed");
    ImportError::UpstreamUnavailable(err.to_string())
}

/// Headers of a regular browser visit; the site rejects bare clients
fn browser_headers(base_url: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(r#""Opera GX";v="109", "Not:A-Brand";v="8", "Chromium";v="123""#),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static(r#""Windows""#));
    headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        REFERER,
        HeaderValue::from_str(&format!("{}/home", base_url)).context("Invalid comick base URL")?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const USER: &str = "0a1b2c3d-4e5f";

    fn client_for(server: &MockServer) -> ComickClient {
        ComickClient::new(&server.base_url(), "https://img.test/", Duration::from_secs(5)).unwrap()
    }

    fn list_page(build_id: &str) -> String {
        format!(
            r#"<html><script id="__NEXT_DATA__">{{"props":{{}},"buildId":"{}","isFallback":false}}</script></html>"#,
            build_id
        )
    }

    #[tokio::test]
    async fn test_fetch_items() {
        let server = MockServer::start_async().await;

        let page_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/user/{}/list", USER))
                    .header("sec-ch-ua-platform", r#""Windows""#)
                    .header("referer", format!("{}/home", server.base_url()));
                then.status(200).body(list_page("build-7"));
            })
            .await;

        let data_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(format!("/_next/data/build-7/user/{}/list.json", USER))
                    .query_param("id", USER);
                then.status(200).json_body(json!({
                    "pageProps": {
                        "follows": [
                            { "md_comics": { "id": 10, "title": "Blue Lock", "status": 1,
                                             "md_covers": [{ "b2key": "bl.jpg" }] } },
                            { "md_comics": { "id": 11, "title": "Blue Lock" } },
                            { "broken": true },
                            { "md_comics": { "id": 12, "title": "Vagabond", "status": 4 } }
                        ]
                    }
                }));
            })
            .await;

        let items = client_for(&server).fetch_items(USER).await.unwrap();

        page_mock.assert_async().await;
        data_mock.assert_async().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].image_url, "https://img.test/bl.jpg");
        assert_eq!(items[1].title, "Vagabond");
        assert_eq!(items[1].status.as_deref(), Some("Hiatus"));
    }

    #[tokio::test]
    async fn test_invalid_user_id_skips_network() {
        let server = MockServer::start_async().await;
        let any = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let err = client_for(&server).fetch_items("not/a/user").await.unwrap_err();
        assert_eq!(err, ImportError::InvalidIdentifier);
        any.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_missing_build_id_is_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/user/{}/list", USER));
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let err = client_for(&server).fetch_items(USER).await.unwrap_err();
        assert!(matches!(err, ImportError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unknown_user_and_empty_list() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/user/dead-beef/list");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/user/{}/list", USER));
                then.status(200).body(list_page("b1"));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/_next/data/b1/user/{}/list.json", USER));
                then.status(200).json_body(json!({ "pageProps": { "follows": [] } }));
            })
            .await;

        let client = client_for(&server);
        assert_eq!(client.fetch_items("dead-beef").await.unwrap_err(), ImportError::NoFollowsFound);
        assert_eq!(client.fetch_items(USER).await.unwrap_err(), ImportError::NoFollowsFound);
    }

    #[tokio::test]
    async fn test_missing_follows_and_server_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/user/{}/list", USER));
                then.status(200).body(list_page("b2"));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/_next/data/b2/user/{}/list.json", USER));
                then.status(200).json_body(json!({ "pageProps": { "user": {} } }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/user/abc/list");
                then.status(503);
            })
            .await;

        let client = client_for(&server);
        let err = client.fetch_items(USER).await.unwrap_err();
        assert!(matches!(err, ImportError::UpstreamUnavailable(ref m) if m.contains("follows data")));

        let err = client.fetch_items("abc").await.unwrap_err();
        assert!(matches!(err, ImportError::UpstreamUnavailable(ref m) if m.contains("503")));
    }
}
