//! The client-side reconciliation layer: canonical collection, derived
//! view, optimistic votes, and secret-gated mutations, behind one owned
//! session object with controlled mutation entry points.

mod auth;
mod collection;
mod pipeline;
mod votes;

pub use auth::{AuthDecision, AuthGate, DenialReason, EntityKind};
pub use collection::{CollectionStore, ItemPatch};
pub use pipeline::{project, CategoryFilter, Query, SortKey};
pub use votes::{VoteCommand, VoteOutcome};

use crate::error::{BoardError, RemoteError};
use crate::models::{Comment, EditItemInput, Item, NewComment, NewItem, MAX_IMAGE_BYTES};
use crate::remote::RemoteStore;

/// Result of a gated edit or delete. Denials carry the reason so the
/// caller can tell "wrong key" apart from "record no longer exists".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Denied(DenialReason),
}

/// Read-only state handed to the rendering layer.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub ordered_items: Vec<Item>,
    pub is_loading: bool,
    pub active_sort: SortKey,
    pub active_category_filter: CategoryFilter,
    pub active_search_term: String,
}

/// Owns the canonical collection and its derived projection. All
/// operations run on the caller's thread; the only suspension points
/// are the remote-store calls. After any completed operation, success
/// or failure, canonical and derived state agree.
pub struct BoardSession<S: RemoteStore> {
    remote: S,
    collection: CollectionStore,
    derived: Vec<Item>,
    query: Query,
    is_loading: bool,
}

impl<S: RemoteStore> BoardSession<S> {
    pub fn new(remote: S) -> Self {
        Self {
            remote,
            collection: CollectionStore::new(),
            derived: Vec::new(),
            query: Query::default(),
            is_loading: false,
        }
    }

    fn recompute(&mut self) {
        self.derived = project(self.collection.items(), &self.query);
    }

    /// Fetches all items and replaces the canonical collection
    /// wholesale. On failure the collection is reset to empty and the
    /// error is returned; it is never silently swallowed.
    pub fn load(&mut self) -> Result<(), RemoteError> {
        self.is_loading = true;
        let result = self.remote.list_items();
        self.is_loading = false;
        match result {
            Ok(items) => {
                self.collection.replace_all(items);
                self.recompute();
                Ok(())
            }
            Err(err) => {
                log::error!("loading items failed: {err}");
                self.collection.clear();
                self.recompute();
                Err(err)
            }
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search_term = term.into();
        self.recompute();
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.query.category = filter;
        self.recompute();
    }

    pub fn set_sort_key(&mut self, sort: SortKey) {
        self.query.sort = sort;
        self.recompute();
    }

    /// Optimistically increments the vote count in both views, then
    /// commits remotely, rolling both back on rejection.
    pub fn apply_vote(&mut self, id: &str) -> VoteOutcome {
        votes::run_vote(
            &mut self.collection,
            &mut self.derived,
            &self.query,
            &self.remote,
            id,
        )
    }

    /// Anyone may create; the supplied secret gates future mutations.
    pub fn create_item(&mut self, input: NewItem) -> Result<Item, BoardError> {
        if input.title.trim().is_empty() {
            return Err(BoardError::InvalidInput("title may not be empty".into()));
        }
        if input.secret.trim().is_empty() {
            return Err(BoardError::InvalidInput("secret may not be empty".into()));
        }
        check_image_bound(input.image_data.as_deref())?;
        let item = self.remote.insert_item(&input)?;
        self.load()?;
        Ok(item)
    }

    /// Edits are not optimistic: nothing changes locally until the gate
    /// passes and the remote write succeeds.
    pub fn edit_item(
        &mut self,
        id: &str,
        edit: EditItemInput,
        supplied_secret: &str,
    ) -> Result<MutationOutcome, BoardError> {
        if edit.title.trim().is_empty() {
            return Err(BoardError::InvalidInput("title may not be empty".into()));
        }
        check_image_bound(edit.image_data.as_deref())?;
        match AuthGate::new(&self.remote).authorize(EntityKind::Item, id, supplied_secret)? {
            AuthDecision::Denied(reason) => Ok(MutationOutcome::Denied(reason)),
            AuthDecision::Authorized => {
                self.remote.update_item(id, &edit)?;
                self.load()?;
                Ok(MutationOutcome::Applied)
            }
        }
    }

    /// Deleting an item leaves its comments in place; comment lifecycle
    /// is independent of the item's here.
    pub fn delete_item(
        &mut self,
        id: &str,
        supplied_secret: &str,
    ) -> Result<MutationOutcome, BoardError> {
        match AuthGate::new(&self.remote).authorize(EntityKind::Item, id, supplied_secret)? {
            AuthDecision::Denied(reason) => Ok(MutationOutcome::Denied(reason)),
            AuthDecision::Authorized => {
                self.remote.delete_item(id)?;
                self.load()?;
                Ok(MutationOutcome::Applied)
            }
        }
    }

    /// Comments are fetched on demand, newest first; they are not part
    /// of the canonical collection.
    pub fn comments_for(&self, item_id: &str) -> Result<Vec<Comment>, RemoteError> {
        self.remote.list_comments(item_id)
    }

    pub fn add_comment(&mut self, input: NewComment) -> Result<Comment, BoardError> {
        if input.content.trim().is_empty() {
            return Err(BoardError::InvalidInput("comment may not be empty".into()));
        }
        if input.secret.trim().is_empty() {
            return Err(BoardError::InvalidInput("secret may not be empty".into()));
        }
        Ok(self.remote.insert_comment(&input)?)
    }

    pub fn edit_comment(
        &mut self,
        id: &str,
        content: &str,
        supplied_secret: &str,
    ) -> Result<MutationOutcome, BoardError> {
        if content.trim().is_empty() {
            return Err(BoardError::InvalidInput("comment may not be empty".into()));
        }
        match AuthGate::new(&self.remote).authorize(EntityKind::Comment, id, supplied_secret)? {
            AuthDecision::Denied(reason) => Ok(MutationOutcome::Denied(reason)),
            AuthDecision::Authorized => {
                self.remote.update_comment(id, content)?;
                Ok(MutationOutcome::Applied)
            }
        }
    }

    pub fn delete_comment(
        &mut self,
        id: &str,
        supplied_secret: &str,
    ) -> Result<MutationOutcome, BoardError> {
        match AuthGate::new(&self.remote).authorize(EntityKind::Comment, id, supplied_secret)? {
            AuthDecision::Denied(reason) => Ok(MutationOutcome::Denied(reason)),
            AuthDecision::Authorized => {
                self.remote.delete_comment(id)?;
                Ok(MutationOutcome::Applied)
            }
        }
    }

    /// `None` when the referenced item no longer exists.
    pub fn resolve_repost(&self, id: &str) -> Result<Option<Item>, RemoteError> {
        AuthGate::new(&self.remote).resolve_repost(id)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            ordered_items: self.derived.clone(),
            is_loading: self.is_loading,
            active_sort: self.query.sort,
            active_category_filter: self.query.category,
            active_search_term: self.query.search_term.clone(),
        }
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }
}

fn check_image_bound(image_data: Option<&str>) -> Result<(), BoardError> {
    match image_data {
        Some(data) if data.len() > MAX_IMAGE_BYTES => Err(BoardError::InvalidInput(
            "image is too large; use one smaller than 1MB".into(),
        )),
        _ => Ok(()),
    }
}
