use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::{
    domain::{
        entities::bookmark::Bookmark,
        repositories::bookmark::{BookmarkRepository, BookmarkRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct BookmarkRepositoryImpl {
    pool: Pool,
}

impl BookmarkRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

#[async_trait]
impl BookmarkRepository for BookmarkRepositoryImpl {
    async fn get_bookmark(
        &self,
        manga_id: i64,
        user_id: i64,
    ) -> Result<Option<Bookmark>, BookmarkRepositoryError> {
        let rows = sqlx::query(
            r#"SELECT
                id,
                manga_id,
                user_id,
                status,
                created_at
            FROM bookmark
            WHERE manga_id = ? AND user_id = ?
            ORDER BY id"#,
        )
        .bind(manga_id)
        .bind(user_id)
        .fetch_all(&self.pool as &SqlitePool)
        .await?;

        if rows.len() > 1 {
            warn!(
                "{} bookmark rows for manga {manga_id} user {user_id}, taking the first",
                rows.len()
            );
        }

        Ok(rows.first().map(|row| Bookmark {
            id: row.get(0),
            manga_id: row.get(1),
            user_id: row.get(2),
            status: row.get(3),
            created_at: row.get(4),
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::database::establish_in_memory_connection;

    async fn seed(pool: &Pool) {
        sqlx::query(r#"INSERT INTO user (id, username) VALUES (9, 'reader')"#)
            .execute(pool as &SqlitePool)
            .await
            .unwrap();
        sqlx::query(r#"INSERT INTO manga (id, title, slug) VALUES (3, 'Three', 'three')"#)
            .execute(pool as &SqlitePool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_absent_bookmark_is_none() {
        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        let repo = BookmarkRepositoryImpl::new(pool);

        assert!(repo.get_bookmark(3, 9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_existing_bookmark_returns_status() {
        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        sqlx::query(r#"INSERT INTO bookmark (manga_id, user_id, status) VALUES (3, 9, 2)"#)
            .execute(&pool as &SqlitePool)
            .await
            .unwrap();
        let repo = BookmarkRepositoryImpl::new(pool);

        let bookmark = repo.get_bookmark(3, 9).await.unwrap().unwrap();
        assert_eq!(bookmark.status, 2);
    }

    #[tokio::test]
    async fn test_duplicate_rows_take_the_first() {
        let _ = env_logger::builder().is_test(true).try_init();

        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        sqlx::query(
            r#"INSERT INTO bookmark (id, manga_id, user_id, status)
            VALUES (1, 3, 9, 2), (2, 3, 9, 5)"#,
        )
        .execute(&pool as &SqlitePool)
        .await
        .unwrap();
        let repo = BookmarkRepositoryImpl::new(pool);

        let bookmark = repo.get_bookmark(3, 9).await.unwrap().unwrap();
        assert_eq!(bookmark.id, 1);
        assert_eq!(bookmark.status, 2);
    }
}
