use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub applicant_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Inbound résumé body. Any `applicant_id` the client sends is ignored; the
/// owner always comes from the path or the enclosing applicant.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumePayload {
    pub content: String,
}
