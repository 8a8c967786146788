use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Category, Item};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    MostVoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

/// The three user-driven inputs of the derived view.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub search_term: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

/// Derives the display-ordered subset from the canonical collection.
/// Pure: no I/O, and identical inputs always reproduce identical
/// output order. Rows are put in id order before the stable sort, so
/// tie order does not depend on map iteration order.
pub fn project(collection: &HashMap<String, Item>, query: &Query) -> Vec<Item> {
    let mut rows: Vec<&Item> = collection.values().collect();
    rows.sort_unstable_by(|a, b| a.id.cmp(&b.id));

    let needle = query.search_term.trim().to_lowercase();
    rows.retain(|item| {
        let title_matches =
            needle.is_empty() || item.title.to_lowercase().contains(needle.as_str());
        title_matches && query.category.matches(item.category)
    });

    match query.sort {
        SortKey::Newest => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::MostVoted => rows.sort_by(|a, b| b.vote_count.cmp(&a.vote_count)),
    }

    rows.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn item(id: &str, title: &str, category: Category, votes: u32, minute: u32) -> Item {
        Item {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image_data: None,
            category,
            vote_count: votes,
            secret: "s".into(),
            repost_of: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap(),
        }
    }

    fn fixture() -> HashMap<String, Item> {
        [
            item("item1", "Civic Type R", Category::Build, 5, 1),
            item("item2", "Old Civic shell", Category::General, 1, 2),
            item("item3", "GT86 swap", Category::Build, 9, 3),
        ]
        .into_iter()
        .map(|i| (i.id.clone(), i))
        .collect()
    }

    fn ids(rows: &[Item]) -> Vec<&str> {
        rows.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn projection_is_pure() {
        let collection = fixture();
        let query = Query {
            search_term: "c".into(),
            category: CategoryFilter::All,
            sort: SortKey::MostVoted,
        };
        let first = project(&collection, &query);
        let second = project(&collection, &query);
        assert_eq!(first, second);
    }

    #[test]
    fn sort_keys_order_as_expected() {
        let collection = fixture();
        let mut query = Query::default();

        query.sort = SortKey::MostVoted;
        assert_eq!(ids(&project(&collection, &query)), ["item3", "item1", "item2"]);

        query.sort = SortKey::Newest;
        assert_eq!(ids(&project(&collection, &query)), ["item3", "item2", "item1"]);

        query.sort = SortKey::Oldest;
        assert_eq!(ids(&project(&collection, &query)), ["item1", "item2", "item3"]);
    }

    #[test]
    fn tie_break_is_reproducible_in_id_order() {
        let mut collection = fixture();
        for item in collection.values_mut() {
            item.vote_count = 4;
        }
        let query = Query {
            sort: SortKey::MostVoted,
            ..Query::default()
        };
        assert_eq!(ids(&project(&collection, &query)), ["item1", "item2", "item3"]);
    }

    #[test]
    fn search_and_category_filters_compose() {
        let collection = fixture();
        let query = Query {
            search_term: "civic".into(),
            category: CategoryFilter::Only(Category::Build),
            sort: SortKey::Newest,
        };
        let rows = project(&collection, &query);
        assert_eq!(ids(&rows), ["item1"]);
    }

    #[test]
    fn empty_search_term_matches_everything() {
        let collection = fixture();
        let rows = project(&collection, &Query::default());
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn empty_collection_projects_to_empty() {
        let collection = HashMap::new();
        assert!(project(&collection, &Query::default()).is_empty());
    }
}
