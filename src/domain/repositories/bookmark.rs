use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::bookmark::Bookmark;

#[derive(Debug, Error)]
pub enum BookmarkRepositoryError {
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// The bookmark row for a (manga, user) pair, `None` when the user
    /// has not bookmarked the manga. At most one row is expected per
    /// pair; implementations take the first when more exist.
    async fn get_bookmark(
        &self,
        manga_id: i64,
        user_id: i64,
    ) -> Result<Option<Bookmark>, BookmarkRepositoryError>;
}
