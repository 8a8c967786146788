use crate::error::RemoteError;
use crate::models::Item;
use crate::remote::RemoteStore;

use super::collection::{CollectionStore, ItemPatch};
use super::pipeline::{project, Query};

/// A vote captured as a pair of replayable patches. The counts are
/// snapshotted at construction time; overlapping commands built from
/// the same snapshot are not coalesced, and the last remote response to
/// land wins.
#[derive(Debug, Clone)]
pub struct VoteCommand {
    pub item_id: String,
    pub prev: u32,
    pub next: u32,
}

impl VoteCommand {
    pub fn increment(item: &Item) -> Self {
        Self {
            item_id: item.id.clone(),
            prev: item.vote_count,
            next: item.vote_count + 1,
        }
    }

    pub fn forward_patch(&self) -> ItemPatch {
        ItemPatch::vote_count(self.next)
    }

    pub fn inverse_patch(&self) -> ItemPatch {
        ItemPatch::vote_count(self.prev)
    }
}

#[derive(Debug)]
pub enum VoteOutcome {
    /// Locally applied and remotely committed; carries the new count.
    Applied(u32),
    /// The id is not in the canonical collection; nothing to vote on.
    UnknownItem,
    /// The remote rejected the commit; both views were reverted.
    RolledBack(RemoteError),
}

/// Applies the command to canonical and derived state as one unit,
/// commits it remotely, and replays the inverse on both views if the
/// commit fails. The derived view reflects the increment before the
/// remote call is even issued.
pub(crate) fn run_vote(
    collection: &mut CollectionStore,
    derived: &mut Vec<Item>,
    query: &Query,
    remote: &dyn RemoteStore,
    id: &str,
) -> VoteOutcome {
    let Some(item) = collection.get(id) else {
        return VoteOutcome::UnknownItem;
    };
    let command = VoteCommand::increment(item);

    collection.patch_one(&command.item_id, command.forward_patch());
    *derived = project(collection.items(), query);

    match remote.update_vote_count(&command.item_id, command.next) {
        Ok(()) => VoteOutcome::Applied(command.next),
        Err(err) => {
            log::warn!("vote commit for {id} failed, rolling back: {err}");
            collection.patch_one(&command.item_id, command.inverse_patch());
            *derived = project(collection.items(), query);
            VoteOutcome::RolledBack(err)
        }
    }
}
