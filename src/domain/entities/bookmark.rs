use chrono::NaiveDateTime;

/// Status code the original site exposed when a manga is not on the
/// user's bookmark list. Absence is modeled as `None` in the domain
/// API, this constant only survives for flat integer consumers.
pub const NOT_BOOKMARKED: i64 = -1;

#[derive(Debug, Clone)]
pub struct Bookmark {
    pub id: i64,
    pub manga_id: i64,
    pub user_id: i64,
    pub status: i64,
    pub created_at: NaiveDateTime,
}

impl Default for Bookmark {
    fn default() -> Self {
        Self {
            id: 0,
            manga_id: 0,
            user_id: 0,
            status: 0,
            created_at: NaiveDateTime::default(),
        }
    }
}
