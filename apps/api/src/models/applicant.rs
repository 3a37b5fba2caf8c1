use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::application::{ApplicationPayload, ApplicationRow, NewApplication};
use crate::models::job::{JobPayload, JobRow, NewJob};
use crate::models::resume::{ResumePayload, ResumeRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/applicants/addApplicant`.
///
/// Carries the whole graph: an optional résumé, applications and jobs. A payload
/// with an `id` re-saves that applicant instead of creating a new one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicantPayload {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub resume: Option<ResumePayload>,
    #[serde(default)]
    pub applications: Option<Vec<ApplicationPayload>>,
    #[serde(default)]
    pub jobs: Option<Vec<JobPayload>>,
}

/// Scalar columns of an applicant row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicantFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDraft {
    /// Existing application to overwrite; `None` inserts a new row.
    pub id: Option<i64>,
    pub values: NewApplication,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobLink {
    Existing(i64),
    New(NewJob),
}

/// Fully wired write plan for one applicant save. Every nested row is written
/// with the applicant's id as its owner, inside a single transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantGraph {
    pub id: Option<i64>,
    pub fields: ApplicantFields,
    pub resume: Option<String>,
    pub applications: Vec<ApplicationDraft>,
    pub jobs: Vec<JobLink>,
}

/// Applicant as returned by the API, with its related rows attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicantView {
    #[serde(flatten)]
    pub applicant: ApplicantRow,
    pub resume: Option<ResumeRow>,
    pub applications: Vec<ApplicationRow>,
    pub jobs: Vec<JobRow>,
}
