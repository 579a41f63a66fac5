// Bridges the HTTP client with the BookmarkApi trait
use async_trait::async_trait;
use linkvault_api::{ApiError, Bookmark, BookmarkId, BookmarkPayload, BookmarksClient};

use crate::{store::BookmarkApi, Error, Result};

#[async_trait]
impl BookmarkApi for BookmarksClient {
    async fn list(&self, tag: Option<String>) -> Result<Vec<Bookmark>> {
        Ok(self.list_bookmarks(tag.as_deref()).await?)
    }

    async fn create(&self, payload: &BookmarkPayload) -> Result<Bookmark> {
        Ok(self.create_bookmark(payload).await?)
    }

    async fn update(&self, id: &BookmarkId, payload: &BookmarkPayload) -> Result<Bookmark> {
        Ok(self.update_bookmark(id, payload).await?)
    }

    async fn delete(&self, id: &BookmarkId) -> Result<()> {
        Ok(self.delete_bookmark(id).await?)
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::RequestFailed { message, .. } => Error::ApiError(message),
            ApiError::NetworkError(e) => Error::NetworkError(e.to_string()),
            ApiError::ParseError(e) => Error::NetworkError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BookmarkStore, LOAD_FAILED};

    #[test]
    fn test_server_message_survives_conversion() {
        let err: Error = ApiError::RequestFailed {
            status: linkvault_api::StatusCode::UNPROCESSABLE_ENTITY,
            message: "Title too long".to_string(),
        }
        .into();
        assert_eq!(err.user_message("fallback"), "Title too long");
    }

    #[test]
    fn test_parse_failure_uses_fallback() {
        let parse = serde_json::from_str::<Bookmark>("[").unwrap_err();
        let err: Error = ApiError::ParseError(parse).into();
        assert!(matches!(err, Error::NetworkError(_)));
        assert_eq!(err.user_message(LOAD_FAILED), LOAD_FAILED);
    }

    #[test]
    fn test_network_prefix_is_not_doubled() {
        let parse = serde_json::from_str::<Bookmark>("[").unwrap_err();
        let detail = parse.to_string();
        let err: Error = ApiError::ParseError(parse).into();
        assert_eq!(err.to_string(), format!("Network error: {}", detail));
    }

    #[tokio::test]
    async fn test_unreachable_api_surfaces_fallback() {
        let client = BookmarksClient::with_timeout(
            "http://127.0.0.1:9",
            Some(std::time::Duration::from_secs(2)),
        )
        .unwrap();
        let mut store = BookmarkStore::new(client);

        let err = store.load(None).await.unwrap_err();
        assert!(!err.to_string().contains("Network error: Network error"));
        assert_eq!(store.error(), Some(LOAD_FAILED));
        assert!(store.bookmarks().is_empty());
    }
}
