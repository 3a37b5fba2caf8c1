use axum::{extract::State, Json};
use serde::Deserialize;

use crate::applicants::service;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::applicant::{ApplicantPayload, ApplicantView};
use crate::models::page::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

/// GET /api/applicants/getAllApplicant
pub async fn handle_get_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicantView>>, AppError> {
    Ok(Json(service::get_all_applicants(state.store.as_ref()).await?))
}

/// POST /api/applicants/addApplicant
pub async fn handle_add(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ApplicantPayload>,
) -> Result<Json<ApplicantView>, AppError> {
    Ok(Json(service::save_applicant(state.store.as_ref(), payload).await?))
}

/// GET /api/applicants/page?page=&size=
pub async fn handle_page(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageQuery>,
) -> Result<Json<Page<ApplicantView>>, AppError> {
    let page = service::get_applicants_page(
        state.store.as_ref(),
        params.page,
        params.size,
        state.config.max_page_size,
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/applicants/getByStatus?status=
pub async fn handle_get_by_status(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<StatusQuery>,
) -> Result<Json<Vec<ApplicantView>>, AppError> {
    Ok(Json(
        service::get_applicants_by_status(state.store.as_ref(), &params.status).await?,
    ))
}

/// GET /api/applicants/getByName?name=
pub async fn handle_get_by_name(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<NameQuery>,
) -> Result<Json<Vec<ApplicantView>>, AppError> {
    Ok(Json(
        service::get_applicants_by_partial_name(state.store.as_ref(), &params.name).await?,
    ))
}

/// GET /api/applicants/:id
pub async fn handle_get_one(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApplicantView>, AppError> {
    Ok(Json(service::get_applicant(state.store.as_ref(), id).await?))
}
