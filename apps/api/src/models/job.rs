use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A job row tagged with the applicant it was loaded for (one row per join entry).
#[derive(Debug, Clone, FromRow)]
pub struct LinkedJobRow {
    pub applicant_id: i64,
    #[sqlx(flatten)]
    pub job: JobRow,
}

/// Inbound job body, used both for `createJob` and for jobs embedded in an
/// applicant payload. An embedded job with an `id` refers to an existing row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "tittle")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub description: Option<String>,
}

impl JobPayload {
    /// Validates a job body that has no id yet. Blank titles are rejected.
    pub fn into_new_job(self) -> Result<NewJob, AppError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("job title cannot be empty".to_string()))?;
        Ok(NewJob {
            title,
            description: self.description,
        })
    }
}
