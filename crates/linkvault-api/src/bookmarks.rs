use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{Bookmark, BookmarkId, BookmarkPayload, ErrorBody};

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

/// Message used when a failed response carries no usable `error` field
pub const GENERIC_FAILURE: &str = "Request failed";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    RequestFailed {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl ApiError {
    /// Message the server attached to a non-2xx response, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the remote bookmarks API.
///
/// Every call is a single request: there is no retry layer here, a failure
/// goes straight back to the caller.
pub struct BookmarksClient {
    client: reqwest::Client,
    base_url: String,
}

impl BookmarksClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Client whose requests give up after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("LinkVault/0.1.0"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url: String = base_url.into();
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /bookmarks[?tag=T]`
    pub async fn list_bookmarks(&self, tag: Option<&str>) -> Result<Vec<Bookmark>> {
        let mut request = self.client.get(self.collection_url());
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            request = request.query(&[("tag", tag)]);
        }

        let body = self.execute(request).await?;
        decode(&body)
    }

    /// `POST /bookmarks`
    pub async fn create_bookmark(&self, payload: &BookmarkPayload) -> Result<Bookmark> {
        let request = self.client.post(self.collection_url()).json(payload);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// `PUT /bookmarks/{id}`
    pub async fn update_bookmark(
        &self,
        id: &BookmarkId,
        payload: &BookmarkPayload,
    ) -> Result<Bookmark> {
        let request = self.client.put(self.item_url(id)).json(payload);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// `DELETE /bookmarks/{id}`; any body on success is ignored
    pub async fn delete_bookmark(&self, id: &BookmarkId) -> Result<()> {
        let request = self.client.delete(self.item_url(id));
        self.execute(request).await?;
        Ok(())
    }

    fn collection_url(&self) -> String {
        format!("{}/bookmarks", self.base_url)
    }

    fn item_url(&self, id: &BookmarkId) -> String {
        format!("{}/bookmarks/{}", self.base_url, urlencoding::encode(id.as_str()))
    }

    /// Send the request and hand back the body of a 2xx response
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            let message = error_message(&body);
            debug!("Bookmarks API returned {}: {}", status, message);
            return Err(ApiError::RequestFailed { status, message });
        }

        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Pull the `error` field out of a failure body, falling back to the
/// generic message when the body is missing, not JSON, or has no text.
pub fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}
