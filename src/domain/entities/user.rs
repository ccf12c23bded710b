#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: i64,
    pub username: String,
}
