// Form input -> request payload. Nothing in here talks to the network.
use linkvault_api::{Bookmark, BookmarkPayload};
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_TAGS: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL and title are required.")]
    MissingRequired,

    #[error("Please enter a valid URL.")]
    InvalidUrl,

    #[error("Add up to 5 tags.")]
    TooManyTags { count: usize },
}

/// Raw bookmark form input, exactly as typed.
///
/// `tags` is the comma-separated text field, not a parsed list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkDraft {
    pub url: String,
    pub title: String,
    pub description: String,
    pub tags: String,
}

impl BookmarkDraft {
    /// Check the draft and build the payload the API expects.
    ///
    /// Checks run in a fixed order (required fields, URL, tag count) and the
    /// first failure wins. Over-long title and description are cut down
    /// rather than rejected.
    pub fn validate(&self) -> Result<BookmarkPayload, ValidationError> {
        let url = self.url.trim();
        let title = self.title.trim();

        if url.is_empty() || title.is_empty() {
            return Err(ValidationError::MissingRequired);
        }
        if !is_valid_url(url) {
            return Err(ValidationError::InvalidUrl);
        }

        let tags = parse_tags(&self.tags);
        if tags.len() > MAX_TAGS {
            return Err(ValidationError::TooManyTags { count: tags.len() });
        }

        Ok(BookmarkPayload {
            url: url.to_string(),
            title: truncate_chars(title, MAX_TITLE_CHARS),
            description: truncate_chars(self.description.trim(), MAX_DESCRIPTION_CHARS),
            tags,
        })
    }
}

impl From<&Bookmark> for BookmarkDraft {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            description: bookmark.description.clone(),
            tags: bookmark.tags.join(", "),
        }
    }
}

/// Split comma-separated tag input into lowercase tags.
///
/// Blank entries are dropped and repeats collapse onto their first
/// occurrence, so `"react, Docs, react"` gives `["react", "docs"]`.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(|t| t.trim().to_lowercase()) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Absolute URL check; relative references like `"example.com"` fail
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}
