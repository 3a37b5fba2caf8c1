use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::resume::{ResumePayload, ResumeRow};
use crate::resumes::service;
use crate::state::AppState;

/// POST /api/resume/:applicant_id/addResume
pub async fn handle_add(
    State(state): State<AppState>,
    AppPath(applicant_id): AppPath<i64>,
    AppJson(payload): AppJson<ResumePayload>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = service::add_resume(
        state.store.as_ref(),
        state.config.resume_policy,
        applicant_id,
        payload,
    )
    .await?;
    Ok(Json(resume))
}
