use tracing::info;

use crate::applicants::service::get_applicant;
use crate::errors::AppError;
use crate::models::applicant::{ApplicantRow, ApplicantView};
use crate::models::job::{JobPayload, JobRow};
use crate::store::Store;

pub async fn create_job(store: &dyn Store, payload: JobPayload) -> Result<JobRow, AppError> {
    let job = store.insert_job(&payload.into_new_job()?).await?;
    info!("Created job {}", job.id);
    Ok(job)
}

pub async fn get_all_jobs(store: &dyn Store) -> Result<Vec<JobRow>, AppError> {
    store.list_jobs().await
}

pub async fn get_job_by_id(store: &dyn Store, id: i64) -> Result<JobRow, AppError> {
    store
        .find_job(id)
        .await?
        .ok_or_else(|| AppError::job_not_found(id))
}

/// Links an existing job to an existing applicant. Both must resolve before
/// anything is written. Repeating the call leaves a single link.
pub async fn add_job_to_applicant(
    store: &dyn Store,
    applicant_id: i64,
    job_id: i64,
) -> Result<ApplicantView, AppError> {
    store
        .find_applicant(applicant_id)
        .await?
        .ok_or_else(|| AppError::applicant_not_found(applicant_id))?;
    get_job_by_id(store, job_id).await?;

    let created = store.link_job(applicant_id, job_id).await?;
    if created {
        info!("Linked job {job_id} to applicant {applicant_id}");
    } else {
        info!("Job {job_id} already linked to applicant {applicant_id}");
    }

    get_applicant(store, applicant_id).await
}

/// Reverse side of the applicant/job relation.
pub async fn get_applicants_for_job(
    store: &dyn Store,
    job_id: i64,
) -> Result<Vec<ApplicantRow>, AppError> {
    get_job_by_id(store, job_id).await?;
    store.applicants_for_job(job_id).await
}
