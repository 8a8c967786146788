use std::collections::HashMap;

use crate::models::{Category, Item};

/// A field-level patch against one item in the canonical collection.
/// `image_data` is doubly optional: the outer level says whether to
/// touch the field at all, the inner one is the new value.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_data: Option<Option<String>>,
    pub category: Option<Category>,
    pub vote_count: Option<u32>,
}

impl ItemPatch {
    pub fn vote_count(count: u32) -> Self {
        Self {
            vote_count: Some(count),
            ..Self::default()
        }
    }
}

/// The single authoritative in-memory copy of all items. Mutated only
/// through `replace_all`, `clear`, and `patch_one`; never rebuilt from
/// the derived view.
#[derive(Debug, Default)]
pub struct CollectionStore {
    items: HashMap<String, Item>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection. The swap happens behind `&mut
    /// self`, so no reader ever observes a partially built collection.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Overwrites exactly the patched fields on the identified item.
    /// Returns false (and logs) when the id is absent.
    pub fn patch_one(&mut self, id: &str, patch: ItemPatch) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            log::warn!("patch_one: no item with id {id}");
            return false;
        };
        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(image_data) = patch.image_data {
            item.image_data = image_data;
        }
        if let Some(category) = patch.category {
            item.category = category;
        }
        if let Some(vote_count) = patch.vote_count {
            item.vote_count = vote_count;
        }
        true
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn items(&self) -> &HashMap<String, Item> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
