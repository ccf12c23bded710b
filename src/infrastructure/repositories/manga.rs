use std::collections::HashMap;

use async_trait::async_trait;
use itertools::Itertools;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::{
    domain::{
        entities::{
            category::Category,
            chapter::Chapter,
            manga::{CatalogueEntry, Manga},
            user::User,
        },
        repositories::manga::{CatalogueOrder, MangaRepository, MangaRepositoryError},
    },
    infrastructure::database::Pool,
};

#[derive(Clone)]
pub struct MangaRepositoryImpl {
    pool: Pool,
}

impl MangaRepositoryImpl {
    pub fn new<P: Into<Pool>>(pool: P) -> Self {
        Self { pool: pool.into() }
    }
}

fn manga_from_row(row: &SqliteRow) -> Manga {
    Manga {
        id: row.get(0),
        title: row.get(1),
        slug: row.get(2),
        cover: row.get(3),
        meta: serde_json::from_str(row.get::<String, _>(4).as_str()).unwrap_or_default(),
        is_completed: row.get(5),
        views: row.get(6),
        category_id: row.get(7),
        user_id: row.get(8),
        created_at: row.get(9),
        updated_at: row.get(10),
    }
}

fn chapter_from_row(row: &SqliteRow) -> Chapter {
    Chapter {
        id: row.get(0),
        manga_id: row.get(1),
        number: row.get(2),
        title: row.get(3),
        page_count: row.get(4),
        created_at: row.get(5),
    }
}

#[async_trait]
impl MangaRepository for MangaRepositoryImpl {
    async fn get_manga_by_id(&self, id: i64) -> Result<Manga, MangaRepositoryError> {
        let row = sqlx::query(
            r#"SELECT
                id,
                title,
                slug,
                cover,
                meta,
                is_completed,
                views,
                category_id,
                user_id,
                created_at,
                updated_at
            FROM manga WHERE id = ?"#,
        )
        .bind(id)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(manga_from_row(&row))
    }

    async fn get_manga_by_slug(&self, slug: &str) -> Result<Manga, MangaRepositoryError> {
        let row = sqlx::query(
            r#"SELECT
                id,
                title,
                slug,
                cover,
                meta,
                is_completed,
                views,
                category_id,
                user_id,
                created_at,
                updated_at
            FROM manga WHERE slug = ?"#,
        )
        .bind(slug)
        .fetch_one(&self.pool as &SqlitePool)
        .await?;

        Ok(manga_from_row(&row))
    }

    async fn get_chapters_by_manga_id(
        &self,
        manga_id: i64,
    ) -> Result<Vec<Chapter>, MangaRepositoryError> {
        let chapters = sqlx::query(
            r#"SELECT
                chapter.id,
                chapter.manga_id,
                chapter.number,
                chapter.title,
                COUNT(page.id),
                chapter.created_at
            FROM chapter
            LEFT JOIN page ON page.chapter_id = chapter.id
            WHERE chapter.manga_id = ?
            GROUP BY chapter.id
            ORDER BY chapter.number DESC"#,
        )
        .bind(manga_id)
        .fetch_all(&self.pool as &SqlitePool)
        .await?
        .iter()
        .map(chapter_from_row)
        .collect();

        Ok(chapters)
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Category, MangaRepositoryError> {
        let row = sqlx::query(r#"SELECT id, name FROM category WHERE id = ?"#)
            .bind(id)
            .fetch_one(&self.pool as &SqlitePool)
            .await?;

        Ok(Category {
            id: row.get(0),
            name: row.get(1),
        })
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, MangaRepositoryError> {
        let row = sqlx::query(r#"SELECT id, username FROM user WHERE id = ?"#)
            .bind(id)
            .fetch_one(&self.pool as &SqlitePool)
            .await?;

        Ok(User {
            id: row.get(0),
            username: row.get(1),
        })
    }

    async fn list_manga(
        &self,
        order: CatalogueOrder,
        limit: i64,
    ) -> Result<Vec<CatalogueEntry>, MangaRepositoryError> {
        let order_clause = match order {
            CatalogueOrder::MostViewed => "ORDER BY manga.views DESC",
            CatalogueOrder::Popular => "",
            CatalogueOrder::Recent => "ORDER BY manga.created_at DESC",
            CatalogueOrder::Random => "ORDER BY RANDOM()",
        };
        let query_str = format!(
            r#"SELECT
                manga.id,
                manga.title,
                manga.slug,
                manga.cover,
                manga.meta,
                manga.is_completed,
                manga.views,
                manga.category_id,
                manga.user_id,
                manga.created_at,
                manga.updated_at,
                category.name,
                user.username
            FROM manga
            LEFT JOIN category ON category.id = manga.category_id
            LEFT JOIN user ON user.id = manga.user_id
            {order_clause}
            LIMIT ?"#
        );

        let mut entries: Vec<CatalogueEntry> = sqlx::query(&query_str)
            .bind(limit)
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .iter()
            .map(|row| {
                let manga = manga_from_row(row);
                let category = manga.category_id.and_then(|id| {
                    row.get::<Option<String>, _>(11)
                        .map(|name| Category { id, name })
                });
                let uploader = manga.user_id.and_then(|id| {
                    row.get::<Option<String>, _>(12)
                        .map(|username| User { id, username })
                });
                CatalogueEntry {
                    manga,
                    category,
                    uploader,
                    chapters: vec![],
                }
            })
            .collect();

        if entries.is_empty() {
            return Ok(entries);
        }

        // one batched query for all chapters of the page, grouped per
        // manga, instead of a lookup per row
        let ids: Vec<i64> = entries.iter().map(|e| e.manga.id).collect();
        let query_str = format!(
            r#"SELECT
                chapter.id,
                chapter.manga_id,
                chapter.number,
                chapter.title,
                COUNT(page.id),
                chapter.created_at
            FROM chapter
            LEFT JOIN page ON page.chapter_id = chapter.id
            WHERE chapter.manga_id IN ({})
            GROUP BY chapter.id
            ORDER BY chapter.number DESC"#,
            vec!["?"; ids.len()].join(",")
        );
        let mut query = sqlx::query(&query_str);
        for id in &ids {
            query = query.bind(id);
        }
        let mut chapters: HashMap<i64, Vec<Chapter>> = query
            .fetch_all(&self.pool as &SqlitePool)
            .await?
            .iter()
            .map(|row| {
                let chapter = chapter_from_row(row);
                (chapter.manga_id, chapter)
            })
            .into_group_map();

        for entry in entries.iter_mut() {
            entry.chapters = chapters.remove(&entry.manga.id).unwrap_or_default();
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::infrastructure::database::establish_in_memory_connection;

    async fn seed(pool: &Pool) {
        sqlx::query(r#"INSERT INTO user (id, username) VALUES (1, 'admin')"#)
            .execute(pool as &SqlitePool)
            .await
            .unwrap();
        sqlx::query(r#"INSERT INTO category (id, name) VALUES (1, 'Action')"#)
            .execute(pool as &SqlitePool)
            .await
            .unwrap();
        sqlx::query(
            r#"INSERT INTO manga (id, title, slug, meta, is_completed, views, category_id, user_id, created_at)
            VALUES
                (1, 'One', 'one', '{"author":"a"}', false, 300, 1, 1, '2024-01-01 00:00:00'),
                (2, 'Two', 'two', '{}', true, 100, NULL, NULL, '2024-03-01 00:00:00'),
                (3, 'Three', 'three', '{}', false, 200, 1, NULL, '2024-02-01 00:00:00')"#,
        )
        .execute(pool as &SqlitePool)
        .await
        .unwrap();
        sqlx::query(
            r#"INSERT INTO chapter (id, manga_id, number, title)
            VALUES (1, 1, 1, 'ch 1'), (2, 1, 2, 'ch 2'), (3, 2, 1, 'ch 1')"#,
        )
        .execute(pool as &SqlitePool)
        .await
        .unwrap();
        // chapter 1 has five pages, chapter 2 has three
        for (chapter_id, count) in [(1, 5), (2, 3)] {
            for rank in 0..count {
                sqlx::query(r#"INSERT INTO page (chapter_id, rank) VALUES (?, ?)"#)
                    .bind(chapter_id)
                    .bind(rank)
                    .execute(pool as &SqlitePool)
                    .await
                    .unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_get_manga_by_id_and_slug() {
        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        let repo = MangaRepositoryImpl::new(pool);

        let manga = repo.get_manga_by_id(1).await.unwrap();
        assert_eq!(manga.title, "One");
        assert_eq!(manga.category_id, Some(1));
        assert_eq!(
            manga.meta.get("author"),
            Some(&serde_json::Value::String("a".to_string()))
        );

        let manga = repo.get_manga_by_slug("two").await.unwrap();
        assert_eq!(manga.id, 2);
        assert!(manga.is_completed);
        assert_eq!(manga.category_id, None);

        let err = repo.get_manga_by_slug("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_chapters_come_with_page_counts_descending() {
        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        let repo = MangaRepositoryImpl::new(pool);

        let chapters = repo.get_chapters_by_manga_id(1).await.unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].number, 2.0);
        assert_eq!(chapters[0].page_count, 3);
        assert_eq!(chapters[1].number, 1.0);
        assert_eq!(chapters[1].page_count, 5);

        let chapters = repo.get_chapters_by_manga_id(99).await.unwrap();
        assert!(chapters.is_empty());
    }

    #[tokio::test]
    async fn test_list_manga_most_viewed_attaches_relations() {
        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        let repo = MangaRepositoryImpl::new(pool);

        let entries = repo
            .list_manga(CatalogueOrder::MostViewed, 2)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);

        let views: Vec<i64> = entries.iter().map(|e| e.manga.views).collect();
        assert_eq!(views, vec![300, 200]);

        let first = &entries[0];
        assert_eq!(first.category.as_ref().map(|c| c.name.as_str()), Some("Action"));
        assert_eq!(
            first.uploader.as_ref().map(|u| u.username.as_str()),
            Some("admin")
        );
        assert_eq!(first.chapters.len(), 2);
        assert_eq!(first.chapters[0].number, 2.0);

        let second = &entries[1];
        assert!(second.uploader.is_none());
        assert!(second.chapters.is_empty());
    }

    #[tokio::test]
    async fn test_list_manga_recent_and_random() {
        let pool = establish_in_memory_connection().await.unwrap();
        seed(&pool).await;
        let repo = MangaRepositoryImpl::new(pool);

        let entries = repo.list_manga(CatalogueOrder::Recent, 10).await.unwrap();
        let ids: Vec<i64> = entries.iter().map(|e| e.manga.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        // random order is only required to be a valid subset
        let entries = repo.list_manga(CatalogueOrder::Random, 2).await.unwrap();
        assert_eq!(entries.len(), 2);
        for entry in &entries {
            assert!([1, 2, 3].contains(&entry.manga.id));
        }

        let entries = repo.list_manga(CatalogueOrder::Popular, 10).await.unwrap();
        assert_eq!(entries.len(), 3);
    }
}
