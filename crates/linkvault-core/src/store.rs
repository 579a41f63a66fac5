use linkvault_api::{Bookmark, BookmarkId, BookmarkPayload};
use tracing::{debug, info, warn};

use crate::{filter, validation::BookmarkDraft, Result};

pub const LOAD_FAILED: &str = "Failed to load bookmarks";
pub const CREATE_FAILED: &str = "Failed to add bookmark";
pub const UPDATE_FAILED: &str = "Failed to update bookmark";
pub const DELETE_FAILED: &str = "Failed to delete bookmark";

/// The remote side of the store.
///
/// `BookmarksClient` is the real implementation; tests swap in a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookmarkApi: Send + Sync {
    async fn list(&self, tag: Option<String>) -> Result<Vec<Bookmark>>;
    async fn create(&self, payload: &BookmarkPayload) -> Result<Bookmark>;
    async fn update(&self, id: &BookmarkId, payload: &BookmarkPayload) -> Result<Bookmark>;
    async fn delete(&self, id: &BookmarkId) -> Result<()>;
}

/// A delete that has been applied locally but not yet confirmed.
///
/// Holds the whole collection as it was before the removal so a failed
/// request can put it back untouched.
#[must_use = "a pending delete must be passed to finish_delete"]
#[derive(Debug)]
pub struct PendingDelete {
    id: BookmarkId,
    snapshot: Vec<Bookmark>,
}

impl PendingDelete {
    pub fn id(&self) -> &BookmarkId {
        &self.id
    }
}

/// Owns the loaded bookmarks and is the only thing that mutates them.
///
/// Mutations take `&mut self`, so operations on one store never interleave.
/// Failed requests never leave the collection half-changed: load, create and
/// update keep what was there, delete restores its snapshot.
pub struct BookmarkStore<A> {
    api: A,
    bookmarks: Vec<Bookmark>,
    active_tag: Option<String>,
    error: Option<String>,
    loading: bool,
}

impl<A: BookmarkApi> BookmarkStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            bookmarks: Vec::new(),
            active_tag: None,
            error: None,
            loading: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn get(&self, id: &BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| &b.id == id)
    }

    /// Last user-facing error, cleared when the next operation starts
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Tag the last load was filtered by
    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    /// Fetch the collection, optionally filtered by tag on the server, and
    /// replace everything held locally with it.
    pub async fn load(&mut self, tag: Option<&str>) -> Result<()> {
        self.active_tag = tag.filter(|t| !t.is_empty()).map(str::to_string);
        self.error = None;
        self.loading = true;

        let result = self.api.list(self.active_tag.clone()).await;
        self.loading = false;

        match result {
            Ok(bookmarks) => {
                debug!("Loaded {} bookmarks (tag: {:?})", bookmarks.len(), self.active_tag);
                self.bookmarks = bookmarks;
                Ok(())
            }
            Err(err) => {
                warn!("Loading bookmarks failed: {}", err);
                self.error = Some(err.user_message(LOAD_FAILED));
                Err(err)
            }
        }
    }

    /// Reload with the current tag filter
    pub async fn reload(&mut self) -> Result<()> {
        let tag = self.active_tag.clone();
        self.load(tag.as_deref()).await
    }

    pub async fn set_active_tag(&mut self, tag: &str) -> Result<()> {
        self.load(Some(tag)).await
    }

    pub async fn clear_active_tag(&mut self) -> Result<()> {
        self.load(None).await
    }

    /// Create on the server and put the returned record at the front.
    pub async fn create(&mut self, payload: &BookmarkPayload) -> Result<Bookmark> {
        self.error = None;

        match self.api.create(payload).await {
            Ok(created) => {
                info!("Created bookmark {}", created.id);
                self.bookmarks.insert(0, created.clone());
                Ok(created)
            }
            Err(err) => {
                warn!("Creating bookmark failed: {}", err);
                self.error = Some(err.user_message(CREATE_FAILED));
                Err(err)
            }
        }
    }

    /// Validate a form draft and create it. Invalid drafts never reach the API.
    pub async fn create_from_draft(&mut self, draft: &BookmarkDraft) -> Result<Bookmark> {
        let payload = draft.validate()?;
        self.create(&payload).await
    }

    /// Send the new content and swap the record with that id in place.
    pub async fn update(&mut self, id: &BookmarkId, payload: &BookmarkPayload) -> Result<Bookmark> {
        self.error = None;

        match self.api.update(id, payload).await {
            Ok(updated) => {
                match self.bookmarks.iter_mut().find(|b| &b.id == id) {
                    Some(slot) => *slot = updated.clone(),
                    None => debug!("Updated bookmark {} is not in the loaded set", id),
                }
                info!("Updated bookmark {}", id);
                Ok(updated)
            }
            Err(err) => {
                warn!("Updating bookmark {} failed: {}", id, err);
                self.error = Some(err.user_message(UPDATE_FAILED));
                Err(err)
            }
        }
    }

    pub async fn update_from_draft(
        &mut self,
        id: &BookmarkId,
        draft: &BookmarkDraft,
    ) -> Result<Bookmark> {
        let payload = draft.validate()?;
        self.update(id, &payload).await
    }

    /// Remove locally first, then ask the server. A failure restores the
    /// collection exactly as it was before the call.
    pub async fn delete(&mut self, id: &BookmarkId) -> Result<()> {
        let pending = self.begin_delete(id);
        let outcome = self.api.delete(id).await;
        self.finish_delete(pending, outcome)
    }

    /// Optimistic half of [`delete`](Self::delete): drop the record now and
    /// keep a snapshot for rollback.
    pub fn begin_delete(&mut self, id: &BookmarkId) -> PendingDelete {
        let snapshot = self.bookmarks.clone();
        self.bookmarks.retain(|b| &b.id != id);
        PendingDelete {
            id: id.clone(),
            snapshot,
        }
    }

    /// Settle a pending delete with the server's answer.
    ///
    /// Rollback replaces the whole collection with the snapshot, so anything
    /// changed since `begin_delete` is rolled back too.
    pub fn finish_delete(&mut self, pending: PendingDelete, outcome: Result<()>) -> Result<()> {
        match outcome {
            Ok(()) => {
                info!("Deleted bookmark {}", pending.id);
                Ok(())
            }
            Err(err) => {
                warn!("Deleting bookmark {} failed, restoring: {}", pending.id, err);
                self.bookmarks = pending.snapshot;
                self.error = Some(err.user_message(DELETE_FAILED));
                Err(err)
            }
        }
    }

    /// Loaded bookmarks whose title or URL contain `query`
    pub fn filter(&self, query: &str) -> Vec<&Bookmark> {
        filter::filter_bookmarks(&self.bookmarks, query)
    }

    pub fn results_label(&self, query: &str) -> String {
        filter::results_label(self.filter(query).len(), self.bookmarks.len())
    }
}
