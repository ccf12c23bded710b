use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    category::Category,
    chapter::Chapter,
    manga::{CatalogueEntry, Manga},
    user::User,
};

#[derive(Debug, Error)]
pub enum MangaRepositoryError {
    #[error("database return error: {0}")]
    DbError(#[from] sqlx::Error),
}

impl MangaRepositoryError {
    /// Missing rows are an expected state for the optional display
    /// relations, callers turn them into absent values.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DbError(sqlx::Error::RowNotFound))
    }
}

/// Named orderings for catalog listings. These configure the fetch
/// rather than sort already loaded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogueOrder {
    /// View counter descending.
    MostViewed,
    /// Whatever order the storage returns.
    Popular,
    /// Creation time descending.
    Recent,
    /// A pseudo-random permutation, no reproducibility guarantee.
    Random,
}

#[async_trait]
pub trait MangaRepository: Send + Sync {
    async fn get_manga_by_id(&self, id: i64) -> Result<Manga, MangaRepositoryError>;
    async fn get_manga_by_slug(&self, slug: &str) -> Result<Manga, MangaRepositoryError>;
    /// Chapters of a manga with their page counts, ordered by chapter
    /// number descending.
    async fn get_chapters_by_manga_id(
        &self,
        manga_id: i64,
    ) -> Result<Vec<Chapter>, MangaRepositoryError>;
    async fn get_category_by_id(&self, id: i64) -> Result<Category, MangaRepositoryError>;
    async fn get_user_by_id(&self, id: i64) -> Result<User, MangaRepositoryError>;
    /// Catalog page with category, uploader and ordered chapters
    /// attached in a bounded number of queries.
    async fn list_manga(
        &self,
        order: CatalogueOrder,
        limit: i64,
    ) -> Result<Vec<CatalogueEntry>, MangaRepositoryError>;
}
