#[derive(Debug, Clone, Default)]
pub struct Rating {
    pub id: i64,
    pub manga_id: i64,
    pub user_id: i64,
    pub rating: i64,
}
