//! Persistence gateway.
//!
//! `Store` is the only seam between the services and storage. `PgStore` is the
//! production backend; `MemoryStore` keeps everything in process and backs the
//! test suite and `STORAGE_BACKEND=memory`.
//!
//! `AppState` holds an `Arc<dyn Store>`, chosen at startup via config.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::applicant::{ApplicantGraph, ApplicantRow};
use crate::models::application::{ApplicationRow, NewApplication};
use crate::models::job::{JobRow, LinkedJobRow, NewJob};
use crate::models::resume::ResumeRow;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // ── Applicants ──────────────────────────────────────────────────────────

    /// Writes the whole graph atomically and returns the applicant id.
    /// Fails with `NotFound` if the graph refers to an applicant, application or
    /// job that does not exist; nothing is persisted in that case.
    /// On a re-save (`graph.id` set) the graph's jobs replace the stored links.
    async fn save_applicant_graph(&self, graph: &ApplicantGraph) -> Result<i64, AppError>;

    async fn find_applicant(&self, id: i64) -> Result<Option<ApplicantRow>, AppError>;

    /// All applicants ordered by id.
    async fn list_applicants(&self) -> Result<Vec<ApplicantRow>, AppError>;

    /// Exact status match, ordered by name then id.
    async fn list_applicants_by_status(&self, status: &str)
        -> Result<Vec<ApplicantRow>, AppError>;

    /// Literal, case-sensitive substring match on name, ordered by id.
    async fn search_applicants_by_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<ApplicantRow>, AppError>;

    async fn page_applicants(&self, offset: i64, limit: i64)
        -> Result<Vec<ApplicantRow>, AppError>;

    async fn count_applicants(&self) -> Result<i64, AppError>;

    // ── Related rows, batched by owner ──────────────────────────────────────

    async fn resumes_for(&self, applicant_ids: &[i64]) -> Result<Vec<ResumeRow>, AppError>;

    async fn applications_for(&self, applicant_ids: &[i64])
        -> Result<Vec<ApplicationRow>, AppError>;

    async fn jobs_for(&self, applicant_ids: &[i64]) -> Result<Vec<LinkedJobRow>, AppError>;

    // ── Résumés ─────────────────────────────────────────────────────────────

    /// Fails with `Conflict` if the applicant already has a résumé.
    async fn insert_resume(&self, applicant_id: i64, content: &str)
        -> Result<ResumeRow, AppError>;

    /// Inserts, or overwrites the content of the existing résumé (keeping its id).
    async fn upsert_resume(&self, applicant_id: i64, content: &str)
        -> Result<ResumeRow, AppError>;

    // ── Applications ────────────────────────────────────────────────────────

    async fn insert_application(
        &self,
        applicant_id: i64,
        application: &NewApplication,
    ) -> Result<ApplicationRow, AppError>;

    // ── Jobs ────────────────────────────────────────────────────────────────

    async fn insert_job(&self, job: &NewJob) -> Result<JobRow, AppError>;

    async fn find_job(&self, id: i64) -> Result<Option<JobRow>, AppError>;

    /// All jobs ordered by id.
    async fn list_jobs(&self) -> Result<Vec<JobRow>, AppError>;

    /// Add-if-absent link between an applicant and a job. Returns `true` when a
    /// new join row was written.
    async fn link_job(&self, applicant_id: i64, job_id: i64) -> Result<bool, AppError>;

    /// Applicants linked to a job, ordered by id.
    async fn applicants_for_job(&self, job_id: i64) -> Result<Vec<ApplicantRow>, AppError>;
}
