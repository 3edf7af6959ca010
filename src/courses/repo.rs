use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Course record in the database. `user_id` is the owning user and is
/// required; only the owner may update or delete the record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Course {
    pub async fn find_all(db: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, user_id, title, description, estimated_time, materials_needed, created_at
            FROM courses
            ORDER BY created_at
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, user_id, title, description, estimated_time, materials_needed, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        description: &str,
        estimated_time: Option<&str>,
        materials_needed: Option<&str>,
    ) -> Result<Course, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (user_id, title, description, estimated_time, materials_needed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, estimated_time, materials_needed, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(estimated_time)
        .bind(materials_needed)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        &self,
        db: &PgPool,
        title: &str,
        description: &str,
        estimated_time: Option<&str>,
        materials_needed: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE courses
            SET title = $2, description = $3, estimated_time = $4, materials_needed = $5
            WHERE id = $1
            "#,
        )
        .bind(self.id)
        .bind(title)
        .bind(description)
        .bind(estimated_time)
        .bind(materials_needed)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, db: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(self.id)
            .execute(db)
            .await?;
        Ok(())
    }
}
