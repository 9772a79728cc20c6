use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    entities::wardrobe::{WardrobeItem, WardrobeItemInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxWardrobeRepo,
};

#[automock]
#[async_trait]
pub trait WardrobeRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    /// Items for one user, newest first.
    async fn list_items(&self, user_id: &str) -> Result<Vec<WardrobeItem>, AppError>;
    async fn create_item(&self, item: &WardrobeItemInsert) -> Result<WardrobeItem, AppError>;
    /// Returns the number of rows removed.
    async fn delete_item(&self, id: &Uuid) -> Result<u64, AppError>;
}

impl SqlxWardrobeRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxWardrobeRepo { pool }
    }
}

#[async_trait]
impl WardrobeRepository for SqlxWardrobeRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_items(&self, user_id: &str) -> Result<Vec<WardrobeItem>, AppError> {
        let items = sqlx::query_as::<_, WardrobeItem>(
            r#"
            SELECT id, user_id, item_type, color, description, created_at
            FROM wardrobe_items
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn create_item(&self, item: &WardrobeItemInsert) -> Result<WardrobeItem, AppError> {
        let created = sqlx::query_as::<_, WardrobeItem>(
            r#"
            INSERT INTO wardrobe_items (user_id, item_type, color, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, item_type, color, description, created_at
            "#,
        )
        .bind(&item.user_id)
        .bind(&item.item_type)
        .bind(&item.color)
        .bind(&item.description)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn delete_item(&self, id: &Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(r#"DELETE FROM wardrobe_items WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
