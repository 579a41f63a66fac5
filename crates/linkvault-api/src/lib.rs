// Client for the remote bookmarks API
pub mod bookmarks;
pub mod models;

// Re-export common types
pub use bookmarks::{ApiError, BookmarksClient, DEFAULT_API_BASE, GENERIC_FAILURE};
pub use models::{Bookmark, BookmarkId, BookmarkPayload};
pub use reqwest::StatusCode;
