use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored short-link record. `id` and `created_at` never change after
/// creation; `clicks` is only touched by the resolve path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: String,
    pub original_link: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub original_link: String,
    pub id: Option<String>,
    /// "modify" resolves a collision by overwriting the existing target.
    /// Any other value is ignored and a collision stays a conflict.
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    pub original_link: String,
    pub id: String,
}
