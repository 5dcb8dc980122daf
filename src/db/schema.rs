use sqlx::SqlitePool;
use tracing::{debug, info};

// Ordered, idempotent DDL. Applied on every start; tests run it against
// fresh in-memory databases.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "create_courses_table",
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            price REAL,
            status TEXT NOT NULL DEFAULT 'visible' CHECK (status IN ('visible', 'hidden')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "create_admin_users_table",
        r#"
        CREATE TABLE IF NOT EXISTS admin_users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_login TEXT
        )
        "#,
    ),
    (
        "index_courses_status",
        "CREATE INDEX IF NOT EXISTS idx_courses_status ON courses (status)",
    ),
    (
        "index_courses_created_at",
        "CREATE INDEX IF NOT EXISTS idx_courses_created_at ON courses (created_at)",
    ),
    (
        "index_admin_users_username",
        "CREATE INDEX IF NOT EXISTS idx_admin_users_username ON admin_users (username)",
    ),
];

pub async fn bootstrap(db: &SqlitePool) -> Result<(), sqlx::Error> {
    for &(name, sql) in MIGRATIONS {
        debug!("applying migration: {}", name);
        sqlx::query(sql).execute(db).await?;
    }
    info!("database schema ready");
    Ok(())
}
