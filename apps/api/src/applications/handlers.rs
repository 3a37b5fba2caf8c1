use axum::{extract::State, Json};

use crate::applications::service;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::application::{ApplicationPayload, ApplicationRow};
use crate::state::AppState;

/// POST /api/application/:applicant_id/saveApplication
pub async fn handle_save(
    State(state): State<AppState>,
    AppPath(applicant_id): AppPath<i64>,
    AppJson(payload): AppJson<ApplicationPayload>,
) -> Result<Json<ApplicationRow>, AppError> {
    Ok(Json(
        service::save_application(state.store.as_ref(), applicant_id, payload).await?,
    ))
}
