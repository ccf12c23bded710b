#[derive(Debug, Clone, Default)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
