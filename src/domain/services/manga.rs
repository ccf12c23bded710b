use thiserror::Error;

use crate::domain::{
    entities::{
        bookmark::NOT_BOOKMARKED,
        chapter::Chapter,
        manga::{CatalogueEntry, Manga},
    },
    repositories::{
        bookmark::{BookmarkRepository, BookmarkRepositoryError},
        manga::{CatalogueOrder, MangaRepository, MangaRepositoryError},
        rating::{RatingRepository, RatingRepositoryError},
    },
};

#[derive(Debug, Error)]
pub enum MangaError {
    #[error("repository error: {0}")]
    RepositoryError(#[from] MangaRepositoryError),
    #[error("rating repository error: {0}")]
    RatingRepositoryError(#[from] RatingRepositoryError),
    #[error("bookmark repository error: {0}")]
    BookmarkRepositoryError(#[from] BookmarkRepositoryError),
}

/// Read side of the manga catalog. Every method recomputes its view
/// from the repositories, nothing is cached across calls.
pub struct MangaService<M, R, B>
where
    M: MangaRepository,
    R: RatingRepository,
    B: BookmarkRepository,
{
    manga_repo: M,
    rating_repo: R,
    bookmark_repo: B,
}

impl<M, R, B> MangaService<M, R, B>
where
    M: MangaRepository,
    R: RatingRepository,
    B: BookmarkRepository,
{
    pub fn new(manga_repo: M, rating_repo: R, bookmark_repo: B) -> Self {
        Self {
            manga_repo,
            rating_repo,
            bookmark_repo,
        }
    }

    pub async fn get_manga_by_id(&self, id: i64) -> Result<Manga, MangaError> {
        let manga = self.manga_repo.get_manga_by_id(id).await?;

        Ok(manga)
    }

    pub async fn get_manga_by_slug(&self, slug: &str) -> Result<Manga, MangaError> {
        let manga = self.manga_repo.get_manga_by_slug(slug).await?;

        Ok(manga)
    }

    /// Total pages over all chapters of a manga. Zero when the manga
    /// has no chapters, each chapter counted exactly once.
    pub async fn total_page_count(&self, manga_id: i64) -> Result<i64, MangaError> {
        let chapters = self.manga_repo.get_chapters_by_manga_id(manga_id).await?;

        Ok(chapters.iter().map(|chapter| chapter.page_count).sum())
    }

    /// The `take` highest-numbered chapters, descending. Catalog cards
    /// show three.
    pub async fn latest_chapters(
        &self,
        manga_id: i64,
        take: usize,
    ) -> Result<Vec<Chapter>, MangaError> {
        let mut chapters = self.manga_repo.get_chapters_by_manga_id(manga_id).await?;
        chapters.truncate(take);

        Ok(chapters)
    }

    /// Arithmetic mean of all ratings, exactly 0.0 with no ratings.
    pub async fn average_rating(&self, manga_id: i64) -> Result<f64, MangaError> {
        let ratings = self.rating_repo.get_ratings_by_manga_id(manga_id).await?;
        if ratings.is_empty() {
            return Ok(0.0);
        }

        let total: i64 = ratings.iter().map(|r| r.rating).sum();

        Ok(total as f64 / ratings.len() as f64)
    }

    pub async fn rating_count(&self, manga_id: i64) -> Result<i64, MangaError> {
        let ratings = self.rating_repo.get_ratings_by_manga_id(manga_id).await?;

        Ok(ratings.len() as i64)
    }

    /// Status of the user's bookmark for this manga, `None` when the
    /// manga is not bookmarked.
    pub async fn bookmark_status(
        &self,
        manga_id: i64,
        user_id: i64,
    ) -> Result<Option<i64>, MangaError> {
        let bookmark = self.bookmark_repo.get_bookmark(manga_id, user_id).await?;

        Ok(bookmark.map(|b| b.status))
    }

    /// Flat integer form of [`bookmark_status`], `NOT_BOOKMARKED` (-1)
    /// when absent. Kept for consumers of the original status codes.
    ///
    /// [`bookmark_status`]: MangaService::bookmark_status
    pub async fn bookmark_status_code(
        &self,
        manga_id: i64,
        user_id: i64,
    ) -> Result<i64, MangaError> {
        let status = self.bookmark_status(manga_id, user_id).await?;

        Ok(status.unwrap_or(NOT_BOOKMARKED))
    }

    /// Display name of the linked category. A manga without one, or
    /// with a dangling reference, yields `None` rather than an error.
    pub async fn category_name(&self, manga: &Manga) -> Result<Option<String>, MangaError> {
        let Some(category_id) = manga.category_id else {
            return Ok(None);
        };

        match self.manga_repo.get_category_by_id(category_id).await {
            Ok(category) => Ok(Some(category.name)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Display name of the uploading user, same absence contract as
    /// [`category_name`].
    ///
    /// [`category_name`]: MangaService::category_name
    pub async fn uploader_name(&self, manga: &Manga) -> Result<Option<String>, MangaError> {
        let Some(user_id) = manga.user_id else {
            return Ok(None);
        };

        match self.manga_repo.get_user_by_id(user_id).await {
            Ok(user) => Ok(Some(user.username)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn most_viewed(&self, take: i64) -> Result<Vec<CatalogueEntry>, MangaError> {
        let entries = self
            .manga_repo
            .list_manga(CatalogueOrder::MostViewed, take)
            .await?;

        Ok(entries)
    }

    pub async fn popular(&self, take: i64) -> Result<Vec<CatalogueEntry>, MangaError> {
        let entries = self
            .manga_repo
            .list_manga(CatalogueOrder::Popular, take)
            .await?;

        Ok(entries)
    }

    pub async fn recent(&self, take: i64) -> Result<Vec<CatalogueEntry>, MangaError> {
        let entries = self
            .manga_repo
            .list_manga(CatalogueOrder::Recent, take)
            .await?;

        Ok(entries)
    }

    pub async fn random(&self, take: i64) -> Result<Vec<CatalogueEntry>, MangaError> {
        let entries = self
            .manga_repo
            .list_manga(CatalogueOrder::Random, take)
            .await?;

        Ok(entries)
    }
}
