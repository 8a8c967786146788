//! The boundary to the remote persistent store. Implementations provide
//! no transactional guarantees across calls and no server-side
//! authorization; every mutation that needs one goes through the
//! authorization gate first.

mod memory;

pub use memory::MemoryStore;

use crate::error::RemoteError;
use crate::models::{Comment, EditItemInput, Item, NewComment, NewItem};

pub trait RemoteStore: Send + Sync {
    fn list_items(&self) -> Result<Vec<Item>, RemoteError>;
    fn get_item(&self, id: &str) -> Result<Option<Item>, RemoteError>;
    fn insert_item(&self, input: &NewItem) -> Result<Item, RemoteError>;
    fn update_item(&self, id: &str, edit: &EditItemInput) -> Result<(), RemoteError>;
    fn update_vote_count(&self, id: &str, vote_count: u32) -> Result<(), RemoteError>;
    fn delete_item(&self, id: &str) -> Result<(), RemoteError>;

    /// Comments for one item, newest first.
    fn list_comments(&self, item_id: &str) -> Result<Vec<Comment>, RemoteError>;
    fn get_comment(&self, id: &str) -> Result<Option<Comment>, RemoteError>;
    fn insert_comment(&self, input: &NewComment) -> Result<Comment, RemoteError>;
    fn update_comment(&self, id: &str, content: &str) -> Result<(), RemoteError>;
    fn delete_comment(&self, id: &str) -> Result<(), RemoteError>;
}

impl<T: RemoteStore + ?Sized> RemoteStore for std::sync::Arc<T> {
    fn list_items(&self) -> Result<Vec<Item>, RemoteError> {
        (**self).list_items()
    }

    fn get_item(&self, id: &str) -> Result<Option<Item>, RemoteError> {
        (**self).get_item(id)
    }

    fn insert_item(&self, input: &NewItem) -> Result<Item, RemoteError> {
        (**self).insert_item(input)
    }

    fn update_item(&self, id: &str, edit: &EditItemInput) -> Result<(), RemoteError> {
        (**self).update_item(id, edit)
    }

    fn update_vote_count(&self, id: &str, vote_count: u32) -> Result<(), RemoteError> {
        (**self).update_vote_count(id, vote_count)
    }

    fn delete_item(&self, id: &str) -> Result<(), RemoteError> {
        (**self).delete_item(id)
    }

    fn list_comments(&self, item_id: &str) -> Result<Vec<Comment>, RemoteError> {
        (**self).list_comments(item_id)
    }

    fn get_comment(&self, id: &str) -> Result<Option<Comment>, RemoteError> {
        (**self).get_comment(id)
    }

    fn insert_comment(&self, input: &NewComment) -> Result<Comment, RemoteError> {
        (**self).insert_comment(input)
    }

    fn update_comment(&self, id: &str, content: &str) -> Result<(), RemoteError> {
        (**self).update_comment(id, content)
    }

    fn delete_comment(&self, id: &str) -> Result<(), RemoteError> {
        (**self).delete_comment(id)
    }
}
