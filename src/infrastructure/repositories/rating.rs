use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::{
    domain::{
        entities::rating::Rating,
        repositories::rating::{RatingRepository, RatingRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct RatingRepositoryImpl {
    pool: Pool,
}

impl RatingRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

#[async_trait]
impl RatingRepository for RatingRepositoryImpl {
    async fn get_ratings_by_manga_id(
        &self,
        manga_id: i64,
    ) -> Result<Vec<Rating>, RatingRepositoryError> {
        let ratings = sqlx::query(
            r#"SELECT
                id,
                manga_id,
                user_id,
                rating
            FROM rating
            WHERE manga_id = ?"#,
        )
        .bind(manga_id)
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .iter()
        .map(|row| Rating {
            id: row.get(0),
            manga_id: row.get(1),
            user_id: row.get(2),
            rating: row.get(3),
        })
        .collect();

        Ok(ratings)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::database::establish_in_memory_connection;

    async fn seed(pool: &Pool) {
        sqlx::query(r#"INSERT INTO user (id, username) VALUES (1, 'a'), (2, 'b')"#)
            .execute(pool as &SqlitePool)
            .await
            .unwrap();
        sqlx::query(
            r#"INSERT INTO manga (id, title, slug) VALUES (3, 'Three', 'three'), (4, 'Four', 'four')"#,
        )
        .execute(pool as &SqlitePool)
        .await
        .unwrap();
        sqlx::query(
            r#"INSERT INTO rating (manga_id, user_id, rating) VALUES (3, 1, 4), (3, 2, 5), (4, 1, 2)"#,
        )
        .execute(pool as &SqlitePool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_ratings_filtered_by_manga() {
        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        let repo = RatingRepositoryImpl::new(pool);

        let ratings = repo.get_ratings_by_manga_id(3).await.unwrap();
        assert_eq!(ratings.len(), 2);
        let scores: Vec<i64> = ratings.iter().map(|r| r.rating).collect();
        assert_eq!(scores, vec![4, 5]);

        let ratings = repo.get_ratings_by_manga_id(99).await.unwrap();
        assert!(ratings.is_empty());
    }
}
