use tracing::info;

use crate::config::ResumePolicy;
use crate::errors::AppError;
use crate::models::resume::{ResumePayload, ResumeRow};
use crate::store::Store;

/// Attaches a résumé to an existing applicant. A second résumé is rejected
/// or replaces the first, depending on `policy`.
pub async fn add_resume(
    store: &dyn Store,
    policy: ResumePolicy,
    applicant_id: i64,
    payload: ResumePayload,
) -> Result<ResumeRow, AppError> {
    store
        .find_applicant(applicant_id)
        .await?
        .ok_or_else(|| AppError::applicant_not_found(applicant_id))?;

    let resume = match policy {
        ResumePolicy::Reject => store.insert_resume(applicant_id, &payload.content).await?,
        ResumePolicy::Replace => store.upsert_resume(applicant_id, &payload.content).await?,
    };

    info!("Stored resume {} for applicant {applicant_id}", resume.id);
    Ok(resume)
}
