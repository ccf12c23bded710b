use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::{category::Category, chapter::Chapter, user::User};

#[derive(Debug, Clone)]
pub struct Manga {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub cover: String,
    pub meta: HashMap<String, serde_json::Value>,
    pub is_completed: bool,
    pub views: i64,
    pub category_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Default for Manga {
    fn default() -> Self {
        Self {
            id: 0,
            title: "".to_string(),
            slug: "".to_string(),
            cover: "".to_string(),
            meta: HashMap::new(),
            is_completed: false,
            views: 0,
            category_id: None,
            user_id: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }
}

/// Publication status derived from `is_completed`. The two variants are
/// exhaustive, there is no third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MangaStatus {
    Completed,
    Ongoing,
}

impl Manga {
    pub fn status(&self) -> MangaStatus {
        if self.is_completed {
            MangaStatus::Completed
        } else {
            MangaStatus::Ongoing
        }
    }
}

/// A manga with its display relations attached. Produced by catalog
/// listings in a bounded number of queries, so consumers never go back
/// to the database per row.
#[derive(Debug, Clone, Default)]
pub struct CatalogueEntry {
    pub manga: Manga,
    pub category: Option<Category>,
    pub uploader: Option<User>,
    /// Ordered by chapter number descending.
    pub chapters: Vec<Chapter>,
}
