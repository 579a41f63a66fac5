// Bookmark state, validation and preferences - everything between the CLI and the API
pub mod config;
pub mod error;
pub mod filter;
pub mod local_state;
pub mod remote;
pub mod store;
pub mod theme;
pub mod validation;

pub use config::Config;
pub use error::Error;
pub use linkvault_api::{Bookmark, BookmarkId, BookmarkPayload};
pub use local_state::LocalState;
pub use store::{BookmarkApi, BookmarkStore, PendingDelete};
pub use theme::{Theme, ThemePreference};
pub use validation::{BookmarkDraft, ValidationError};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
