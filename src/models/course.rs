use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Create/update body as the dashboard sends it. Everything is optional at
/// this level; validation decides what is actually required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseUpsertRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<PriceInput>,
    pub status: Option<String>,
}

/// The dashboard submits price as a JSON number; older clients send a
/// numeric string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

/// Validated course fields, ready for the store.
#[derive(Debug, Clone)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub status: String,
}
