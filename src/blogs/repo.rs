use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::blogs::repo_types::{Blog, NewBlog};
use crate::error::StoreResult;

const BLOG_COLUMNS: &str = "id, title, description, image, date, user_id";

#[async_trait]
pub trait BlogRepo: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<Blog>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Blog>>;
    /// Inserts the blog and appends its id to the owner's `blogs` as one unit.
    /// `None` means the owner vanished and nothing was written.
    async fn create_linked(&self, blog: NewBlog) -> StoreResult<Option<Blog>>;
    /// `None` values leave the column untouched.
    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<Option<Blog>>;
    /// Deletes the blog and pulls its id from the owner's `blogs` as one unit.
    async fn delete_linked(&self, id: Uuid) -> StoreResult<Option<Blog>>;
    /// Blogs for the given ids in the same order; unknown ids are skipped.
    async fn list_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Blog>>;
}

#[derive(Clone)]
pub struct PgBlogRepo {
    db: PgPool,
}

impl PgBlogRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogRepo for PgBlogRepo {
    async fn list(&self) -> StoreResult<Vec<Blog>> {
        let rows = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY date ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        let row = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create_linked(&self, new: NewBlog) -> StoreResult<Option<Blog>> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let blog = sqlx::query_as::<_, Blog>(&format!(
            r#"
            INSERT INTO blogs (title, description, image, date, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.image)
        .bind(new.date)
        .bind(new.user)
        .fetch_one(&mut *tx)
        .await?;

        let linked = sqlx::query("UPDATE users SET blogs = array_append(blogs, $1) WHERE id = $2")
            .bind(blog.id)
            .bind(new.user)
            .execute(&mut *tx)
            .await?;

        if linked.rows_affected() == 0 {
            tx.rollback().await.context("rollback tx")?;
            return Ok(None);
        }

        tx.commit().await.context("commit tx")?;
        Ok(Some(blog))
    }

    async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<Option<Blog>> {
        let row = sqlx::query_as::<_, Blog>(&format!(
            r#"
            UPDATE blogs
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description)
             WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_linked(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let deleted = sqlx::query_as::<_, Blog>(&format!(
            "DELETE FROM blogs WHERE id = $1 RETURNING {BLOG_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(blog) = deleted else {
            tx.rollback().await.context("rollback tx")?;
            return Ok(None);
        };

        // The owner may already be gone; that leaves nothing to unlink.
        sqlx::query("UPDATE users SET blogs = array_remove(blogs, $1) WHERE id = $2")
            .bind(blog.id)
            .bind(blog.user)
            .execute(&mut *tx)
            .await?;

        tx.commit().await.context("commit tx")?;
        Ok(Some(blog))
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Blog>> {
        let rows = sqlx::query_as::<_, Blog>(
            r#"
            SELECT b.id, b.title, b.description, b.image, b.date, b.user_id
              FROM unnest($1::uuid[]) WITH ORDINALITY AS refs(id, ord)
              JOIN blogs b ON b.id = refs.id
             ORDER BY refs.ord
            "#,
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
