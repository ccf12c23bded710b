use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::rating::Rating;

#[derive(Debug, Error)]
pub enum RatingRepositoryError {
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
}

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn get_ratings_by_manga_id(
        &self,
        manga_id: i64,
    ) -> Result<Vec<Rating>, RatingRepositoryError>;
}
