use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{Course, CourseFields};

#[derive(Clone)]
pub struct CourseStore {
    db: SqlitePool,
}

impl CourseStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Newest first. The public catalog passes `include_hidden = false`.
    pub async fn list(&self, include_hidden: bool) -> Result<Vec<Course>, sqlx::Error> {
        if include_hidden {
            sqlx::query_as::<_, Course>(
                "SELECT id, title, description, price, status, created_at, updated_at FROM courses ORDER BY created_at DESC, id DESC"
            )
            .fetch_all(&self.db)
            .await
        } else {
            sqlx::query_as::<_, Course>(
                "SELECT id, title, description, price, status, created_at, updated_at FROM courses WHERE status = ? ORDER BY created_at DESC, id DESC"
            )
            .bind("visible")
            .fetch_all(&self.db)
            .await
        }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            "SELECT id, title, description, price, status, created_at, updated_at FROM courses WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn create(&self, fields: CourseFields) -> Result<Course, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO courses (title, description, price, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(&fields.status)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        info!("course created: {}", id);

        // Re-fetch so the caller sees the stored row, not the request echo.
        self.get(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Full replace of the editable fields. An unknown id affects zero rows
    /// and comes back as `None`.
    pub async fn update(&self, id: i64, fields: CourseFields) -> Result<Option<Course>, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let affected = sqlx::query(
            "UPDATE courses SET title = ?, description = ?, price = ?, status = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(&fields.status)
        .bind(&now)
        .bind(id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if affected == 0 {
            return Ok(None);
        }

        info!("course updated: {}", id);
        self.get(id).await
    }

    /// Deleting an unknown id is a success; the row is gone either way.
    pub async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        info!("course deleted: {}", id);
        Ok(())
    }

    /// Flips visible/hidden in a single conditional UPDATE, so concurrent
    /// toggles on the same row serialize at the database and each flip lands.
    pub async fn toggle_visibility(&self, id: i64) -> Result<Option<Course>, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let affected = sqlx::query(
            "UPDATE courses SET status = CASE status WHEN 'visible' THEN 'hidden' ELSE 'visible' END, updated_at = ? WHERE id = ?"
        )
        .bind(&now)
        .bind(id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if affected == 0 {
            return Ok(None);
        }

        let course = self.get(id).await?;
        if let Some(course) = &course {
            info!("course {} is now {}", id, course.status);
        }
        Ok(course)
    }
}
