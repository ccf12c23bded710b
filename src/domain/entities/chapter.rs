use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct Chapter {
    pub id: i64,
    pub manga_id: i64,
    pub number: f64,
    pub title: String,
    /// Pages are counted at fetch time, not modeled individually.
    pub page_count: i64,
    pub created_at: NaiveDateTime,
}

impl Default for Chapter {
    fn default() -> Self {
        Self {
            id: 0,
            manga_id: 0,
            number: 0.0,
            title: "".to_string(),
            page_count: 0,
            created_at: NaiveDateTime::default(),
        }
    }
}
