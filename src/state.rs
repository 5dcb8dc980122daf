use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenSigner;
use crate::db::{AdminStore, CourseStore};
use crate::services::FormRelay;
use crate::sheets::SheetsClient;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub courses: CourseStore,
    pub admins: AdminStore,
    pub relay: FormRelay,
    pub tokens: TokenSigner,
}

impl AppState {
    pub fn new(db: SqlitePool, sheets: Arc<dyn SheetsClient>, jwt_secret: &str) -> Self {
        Self {
            courses: CourseStore::new(db.clone()),
            admins: AdminStore::new(db.clone()),
            relay: FormRelay::new(sheets),
            tokens: TokenSigner::new(jwt_secret),
            db,
        }
    }
}
