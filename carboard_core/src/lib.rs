//! Client-side data reconciliation for the car board: a canonical item
//! collection fetched from a remote store, a derived sorted/filtered
//! projection, optimistic vote mutations with rollback, and
//! secret-gated edits and deletes.

pub mod board;
pub mod error;
pub mod models;
pub mod remote;

pub use board::{
    AuthDecision, AuthGate, BoardSession, BoardSnapshot, CategoryFilter, CollectionStore,
    DenialReason, EntityKind, ItemPatch, MutationOutcome, Query, SortKey, VoteCommand, VoteOutcome,
};
pub use error::{BoardError, RemoteError};
pub use models::{
    Category, Comment, EditItemInput, Item, NewComment, NewItem, MAX_IMAGE_BYTES,
};
pub use remote::{MemoryStore, RemoteStore};
