use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::models::{Comment, EditItemInput, Item, NewComment, NewItem};

use super::RemoteStore;

/// In-memory `RemoteStore`. Assigns ids and timestamps the way the real
/// server would, and can be told to fail reads or writes so callers can
/// exercise their failure paths.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[derive(Default)]
struct Tables {
    items: HashMap<String, Item>,
    comments: HashMap<String, Comment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail until turned off again.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent write fail until turned off again.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), RemoteError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(RemoteError::Fetch("memory store reads disabled".into()))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<(), RemoteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(RemoteError::Write("memory store writes disabled".into()))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        // A poisoned lock means a panic mid-mutation in another test
        // thread; the tables are plain maps, so continuing is safe.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RemoteStore for MemoryStore {
    fn list_items(&self) -> Result<Vec<Item>, RemoteError> {
        self.check_read()?;
        Ok(self.lock().items.values().cloned().collect())
    }

    fn get_item(&self, id: &str) -> Result<Option<Item>, RemoteError> {
        self.check_read()?;
        Ok(self.lock().items.get(id).cloned())
    }

    fn insert_item(&self, input: &NewItem) -> Result<Item, RemoteError> {
        self.check_write()?;
        let item = Item {
            id: Uuid::new_v4().to_string(),
            title: input.title.clone(),
            description: input.description.clone(),
            image_data: input.image_data.clone(),
            category: input.category,
            vote_count: 0,
            secret: input.secret.clone(),
            repost_of: input.repost_of.clone(),
            created_at: Utc::now(),
        };
        self.lock().items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn update_item(&self, id: &str, edit: &EditItemInput) -> Result<(), RemoteError> {
        self.check_write()?;
        let mut tables = self.lock();
        let item = tables
            .items
            .get_mut(id)
            .ok_or_else(|| RemoteError::Write(format!("item {id} not found")))?;
        item.title = edit.title.clone();
        item.description = edit.description.clone();
        item.image_data = edit.image_data.clone();
        item.category = edit.category;
        Ok(())
    }

    fn update_vote_count(&self, id: &str, vote_count: u32) -> Result<(), RemoteError> {
        self.check_write()?;
        let mut tables = self.lock();
        let item = tables
            .items
            .get_mut(id)
            .ok_or_else(|| RemoteError::Write(format!("item {id} not found")))?;
        item.vote_count = vote_count;
        Ok(())
    }

    fn delete_item(&self, id: &str) -> Result<(), RemoteError> {
        self.check_write()?;
        // No cascade to comments; they outlive their item, like the
        // production schema does.
        self.lock().items.remove(id);
        Ok(())
    }

    fn list_comments(&self, item_id: &str) -> Result<Vec<Comment>, RemoteError> {
        self.check_read()?;
        let mut comments: Vec<Comment> = self
            .lock()
            .comments
            .values()
            .filter(|comment| comment.item_id == item_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    fn get_comment(&self, id: &str) -> Result<Option<Comment>, RemoteError> {
        self.check_read()?;
        Ok(self.lock().comments.get(id).cloned())
    }

    fn insert_comment(&self, input: &NewComment) -> Result<Comment, RemoteError> {
        self.check_write()?;
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            item_id: input.item_id.clone(),
            content: input.content.clone(),
            secret: input.secret.clone(),
            created_at: Utc::now(),
        };
        self.lock()
            .comments
            .insert(comment.id.clone(), comment.clone());
        Ok(comment)
    }

    fn update_comment(&self, id: &str, content: &str) -> Result<(), RemoteError> {
        self.check_write()?;
        let mut tables = self.lock();
        let comment = tables
            .comments
            .get_mut(id)
            .ok_or_else(|| RemoteError::Write(format!("comment {id} not found")))?;
        comment.content = content.to_string();
        Ok(())
    }

    fn delete_comment(&self, id: &str) -> Result<(), RemoteError> {
        self.check_write()?;
        self.lock().comments.remove(id);
        Ok(())
    }
}
