use std::collections::HashMap;

use tracing::info;

use crate::applicants::wiring::wire_applicant_graph;
use crate::errors::AppError;
use crate::models::applicant::{ApplicantPayload, ApplicantRow, ApplicantView};
use crate::models::application::ApplicationRow;
use crate::models::job::JobRow;
use crate::models::page::Page;
use crate::models::resume::ResumeRow;
use crate::store::Store;

/// Wires the payload into a write plan, persists it in one store call and
/// returns the stored graph.
pub async fn save_applicant(
    store: &dyn Store,
    payload: ApplicantPayload,
) -> Result<ApplicantView, AppError> {
    let graph = wire_applicant_graph(payload)?;
    let applicant_id = store.save_applicant_graph(&graph).await?;

    info!(
        "Saved applicant {applicant_id} (resume: {}, applications: {}, job links: {})",
        graph.resume.is_some(),
        graph.applications.len(),
        graph.jobs.len()
    );

    get_applicant(store, applicant_id).await
}

pub async fn get_applicant(store: &dyn Store, id: i64) -> Result<ApplicantView, AppError> {
    let row = store
        .find_applicant(id)
        .await?
        .ok_or_else(|| AppError::applicant_not_found(id))?;
    let mut views = load_views(store, vec![row]).await?;
    views
        .pop()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("view for applicant {id} vanished")))
}

pub async fn get_all_applicants(store: &dyn Store) -> Result<Vec<ApplicantView>, AppError> {
    let rows = store.list_applicants().await?;
    load_views(store, rows).await
}

pub async fn get_applicants_by_status(
    store: &dyn Store,
    status: &str,
) -> Result<Vec<ApplicantView>, AppError> {
    let rows = store.list_applicants_by_status(status).await?;
    load_views(store, rows).await
}

pub async fn get_applicants_by_partial_name(
    store: &dyn Store,
    name: &str,
) -> Result<Vec<ApplicantView>, AppError> {
    let rows = store.search_applicants_by_name(name).await?;
    load_views(store, rows).await
}

/// Zero-based page of applicants ordered by id. `size` must be within
/// `1..=max_page_size`.
pub async fn get_applicants_page(
    store: &dyn Store,
    page: u32,
    size: u32,
    max_page_size: u32,
) -> Result<Page<ApplicantView>, AppError> {
    if size == 0 || size > max_page_size {
        return Err(AppError::Validation(format!(
            "page size must be between 1 and {max_page_size}, got {size}"
        )));
    }

    let offset = i64::from(page) * i64::from(size);
    let rows = store.page_applicants(offset, i64::from(size)).await?;
    let total = store.count_applicants().await?;
    let content = load_views(store, rows).await?;

    Ok(Page::new(content, page, size, total))
}

/// Attaches résumé, applications and jobs to each row, with one batched store
/// call per relation. Preserves the order of `rows`.
pub(crate) async fn load_views(
    store: &dyn Store,
    rows: Vec<ApplicantRow>,
) -> Result<Vec<ApplicantView>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

    let mut resumes: HashMap<i64, ResumeRow> = store
        .resumes_for(&ids)
        .await?
        .into_iter()
        .map(|r| (r.applicant_id, r))
        .collect();

    let mut applications: HashMap<i64, Vec<ApplicationRow>> = HashMap::new();
    for app in store.applications_for(&ids).await? {
        applications.entry(app.applicant_id).or_default().push(app);
    }

    let mut jobs: HashMap<i64, Vec<JobRow>> = HashMap::new();
    for linked in store.jobs_for(&ids).await? {
        jobs.entry(linked.applicant_id).or_default().push(linked.job);
    }

    Ok(rows
        .into_iter()
        .map(|applicant| ApplicantView {
            resume: resumes.remove(&applicant.id),
            applications: applications.remove(&applicant.id).unwrap_or_default(),
            jobs: jobs.remove(&applicant.id).unwrap_or_default(),
            applicant,
        })
        .collect())
}
