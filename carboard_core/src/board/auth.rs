use crate::error::RemoteError;
use crate::models::Item;
use crate::remote::RemoteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Item,
    Comment,
}

/// Why a mutation was blocked. The two reasons warrant different user
/// guidance, so they are never collapsed into a generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    IncorrectSecret,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Authorized,
    Denied(DenialReason),
}

/// Verifies caller-supplied secrets against the value stored
/// server-side and resolves repost references. The stored secret is
/// always re-fetched; a cached copy could be stale or tampered with.
pub struct AuthGate<'a> {
    remote: &'a dyn RemoteStore,
}

impl<'a> AuthGate<'a> {
    pub fn new(remote: &'a dyn RemoteStore) -> Self {
        Self { remote }
    }

    pub fn authorize(
        &self,
        kind: EntityKind,
        id: &str,
        supplied_secret: &str,
    ) -> Result<AuthDecision, RemoteError> {
        let stored = match kind {
            EntityKind::Item => self.remote.get_item(id)?.map(|item| item.secret),
            EntityKind::Comment => self.remote.get_comment(id)?.map(|comment| comment.secret),
        };
        Ok(match stored {
            None => AuthDecision::Denied(DenialReason::NotFound),
            Some(secret) if secret == supplied_secret => AuthDecision::Authorized,
            Some(_) => AuthDecision::Denied(DenialReason::IncorrectSecret),
        })
    }

    /// Fetches the item a repost points at. `None` means the original
    /// was deleted; callers render "original post unavailable" instead
    /// of failing.
    pub fn resolve_repost(&self, id: &str) -> Result<Option<Item>, RemoteError> {
        self.remote.get_item(id)
    }
}
