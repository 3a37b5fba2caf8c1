use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: i64,
    pub applicant_id: i64,
    pub status: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationPayload {
    /// Set only when re-saving an application the applicant already owns.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

/// Column values for inserting or updating an application row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewApplication {
    pub status: Option<String>,
    pub position: Option<String>,
}

impl From<ApplicationPayload> for NewApplication {
    fn from(payload: ApplicationPayload) -> Self {
        NewApplication {
            status: payload.status,
            position: payload.position,
        }
    }
}
