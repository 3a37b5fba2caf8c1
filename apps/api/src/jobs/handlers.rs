use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::jobs::service;
use crate::models::applicant::{ApplicantRow, ApplicantView};
use crate::models::job::{JobPayload, JobRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignQuery {
    pub applicant_id: i64,
    pub job_id: i64,
}

/// POST /api/job/createJob
pub async fn handle_create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<JobPayload>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(service::create_job(state.store.as_ref(), payload).await?))
}

/// GET /api/job/getAllJobs
pub async fn handle_get_all(State(state): State<AppState>) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(service::get_all_jobs(state.store.as_ref()).await?))
}

/// GET /api/job/:id
pub async fn handle_get_one(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<JobRow>, AppError> {
    Ok(Json(service::get_job_by_id(state.store.as_ref(), id).await?))
}

/// GET /api/job/:id/applicants
pub async fn handle_get_applicants(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Vec<ApplicantRow>>, AppError> {
    Ok(Json(
        service::get_applicants_for_job(state.store.as_ref(), id).await?,
    ))
}

/// POST /api/job/add-job-to-applicant?applicantId=&jobId=
pub async fn handle_add_to_applicant(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AssignQuery>,
) -> Result<Json<ApplicantView>, AppError> {
    let view =
        service::add_job_to_applicant(state.store.as_ref(), params.applicant_id, params.job_id)
            .await?;
    Ok(Json(view))
}
