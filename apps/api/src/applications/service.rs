use tracing::info;

use crate::errors::AppError;
use crate::models::application::{ApplicationPayload, ApplicationRow, NewApplication};
use crate::store::Store;

/// Files a new application for an existing applicant. Applicants may hold any
/// number of applications. An `id` in the payload is ignored; this path always inserts.
pub async fn save_application(
    store: &dyn Store,
    applicant_id: i64,
    payload: ApplicationPayload,
) -> Result<ApplicationRow, AppError> {
    store
        .find_applicant(applicant_id)
        .await?
        .ok_or_else(|| AppError::applicant_not_found(applicant_id))?;

    let application = store
        .insert_application(applicant_id, &NewApplication::from(payload))
        .await?;

    info!(
        "Saved application {} for applicant {applicant_id}",
        application.id
    );
    Ok(application)
}
