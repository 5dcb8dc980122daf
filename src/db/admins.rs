use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::AdminUser;

#[derive(Clone)]
pub struct AdminStore {
    db: SqlitePool,
}

impl AdminStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, sqlx::Error> {
        sqlx::query_as::<_, AdminUser>(
            "SELECT id, username, password_hash, created_at, last_login FROM admin_users WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
    }

    pub async fn create(&self, username: &str, password_hash: &str) -> Result<i64, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO admin_users (username, password_hash, created_at, last_login) VALUES (?, ?, ?, NULL)"
        )
        .bind(username)
        .bind(password_hash)
        .bind(&now)
        .execute(&self.db)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE admin_users SET last_login = ? WHERE id = ?")
            .bind(&now)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
