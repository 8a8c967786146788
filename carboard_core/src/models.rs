use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inline image payloads are capped at 1 MiB, matching the upload form.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// The fixed set of post flags. Rows without one fall back to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    General,
    Question,
    Build,
    News,
    Discussion,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Question,
        Category::Build,
        Category::News,
        Category::Discussion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Question => "Question",
            Category::Build => "Build",
            Category::News => "News",
            Category::Discussion => "Discussion",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single forum post. `secret` gates later edits and deletes and is
/// never shown to other users; `repost_of` may point at an item that has
/// since been deleted, so resolution is always fallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub repost_of: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub item_id: String,
    pub content: String,
    #[serde(default)]
    pub secret: String,
    pub created_at: DateTime<Utc>,
}

/// Creation payload; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub secret: String,
    #[serde(default)]
    pub repost_of: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComment {
    pub item_id: String,
    pub content: String,
    pub secret: String,
}

/// The full edit payload for an item. Vote counts and secrets are not
/// editable through this path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditItemInput {
    pub title: String,
    pub description: String,
    pub image_data: Option<String>,
    pub category: Category,
}
