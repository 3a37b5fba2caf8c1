use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::errors::AppError;
use crate::models::applicant::{
    ApplicantFields, ApplicantGraph, ApplicantRow, ApplicationDraft, JobLink,
};
use crate::models::application::{ApplicationRow, NewApplication};
use crate::models::job::{JobRow, LinkedJobRow, NewJob};
use crate::models::resume::ResumeRow;
use crate::store::Store;

const APPLICANT_COLUMNS: &str = "id, name, email, phone, status, created_at";

/// PostgreSQL-backed store. Referential rules live in the schema
/// (`migrations/`); this type maps their violations onto `AppError`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

/// Maps a foreign-key violation to a client-facing error; everything else
/// stays a database error.
fn on_foreign_key(err: sqlx::Error, missing: impl FnOnce() -> AppError) -> AppError {
    let foreign_key = err
        .as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation());
    if foreign_key {
        missing()
    } else {
        AppError::Database(err)
    }
}

/// Like [`on_foreign_key`], for inserts that can also trip a UNIQUE constraint.
fn on_constraint(
    err: sqlx::Error,
    duplicate: impl FnOnce() -> AppError,
    missing: impl FnOnce() -> AppError,
) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if unique {
        duplicate()
    } else {
        on_foreign_key(err, missing)
    }
}

async fn write_applicant(
    conn: &mut PgConnection,
    id: Option<i64>,
    fields: &ApplicantFields,
) -> Result<i64, AppError> {
    match id {
        Some(id) => sqlx::query_scalar::<_, i64>(
            "UPDATE applicants SET name = $2, email = $3, phone = $4, status = $5 \
             WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.status)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::applicant_not_found(id)),
        None => Ok(sqlx::query_scalar::<_, i64>(
            "INSERT INTO applicants (name, email, phone, status) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.status)
        .fetch_one(&mut *conn)
        .await?),
    }
}

async fn write_application(
    conn: &mut PgConnection,
    applicant_id: i64,
    draft: &ApplicationDraft,
) -> Result<(), AppError> {
    match draft.id {
        Some(id) => {
            let result = sqlx::query(
                "UPDATE applications SET status = $3, position = $4 \
                 WHERE id = $1 AND applicant_id = $2",
            )
            .bind(id)
            .bind(applicant_id)
            .bind(&draft.values.status)
            .bind(&draft.values.position)
            .execute(&mut *conn)
            .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::NotFound(format!(
                    "Application {id} not found for applicant {applicant_id}"
                )));
            }
        }
        None => {
            sqlx::query(
                "INSERT INTO applications (applicant_id, status, position) VALUES ($1, $2, $3)",
            )
            .bind(applicant_id)
            .bind(&draft.values.status)
            .bind(&draft.values.position)
            .execute(&mut *conn)
            .await?;
        }
    }
    Ok(())
}

async fn write_job_link(
    conn: &mut PgConnection,
    applicant_id: i64,
    link: &JobLink,
) -> Result<(), AppError> {
    let job_id = match link {
        JobLink::Existing(id) => sqlx::query_scalar::<_, i64>("SELECT id FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::job_not_found(*id))?,
        JobLink::New(job) => {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO jobs (title, description) VALUES ($1, $2) RETURNING id",
            )
            .bind(&job.title)
            .bind(&job.description)
            .fetch_one(&mut *conn)
            .await?
        }
    };

    sqlx::query(
        "INSERT INTO applicant_job (applicant_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(applicant_id)
    .bind(job_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn save_applicant_graph(&self, graph: &ApplicantGraph) -> Result<i64, AppError> {
        // Dropping the transaction on any early return rolls it back.
        let mut tx = self.pool.begin().await?;

        let applicant_id = write_applicant(&mut *tx, graph.id, &graph.fields).await?;

        if let Some(content) = &graph.resume {
            sqlx::query(
                "INSERT INTO resumes (applicant_id, content) VALUES ($1, $2) \
                 ON CONFLICT (applicant_id) DO UPDATE SET content = EXCLUDED.content",
            )
            .bind(applicant_id)
            .bind(content)
            .execute(&mut *tx)
            .await?;
        }

        for draft in &graph.applications {
            write_application(&mut *tx, applicant_id, draft).await?;
        }

        // The graph is authoritative for an existing applicant's job links.
        if graph.id.is_some() {
            sqlx::query("DELETE FROM applicant_job WHERE applicant_id = $1")
                .bind(applicant_id)
                .execute(&mut *tx)
                .await?;
        }
        for link in &graph.jobs {
            write_job_link(&mut *tx, applicant_id, link).await?;
        }

        tx.commit().await?;
        Ok(applicant_id)
    }

    async fn find_applicant(&self, id: i64) -> Result<Option<ApplicantRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicantRow>(&format!(
            "SELECT {APPLICANT_COLUMNS} FROM applicants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_applicants(&self) -> Result<Vec<ApplicantRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicantRow>(&format!(
            "SELECT {APPLICANT_COLUMNS} FROM applicants ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_applicants_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<ApplicantRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicantRow>(&format!(
            "SELECT {APPLICANT_COLUMNS} FROM applicants WHERE status = $1 ORDER BY name ASC, id ASC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn search_applicants_by_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<ApplicantRow>, AppError> {
        // strpos treats the fragment literally, so no LIKE escaping is needed.
        Ok(sqlx::query_as::<_, ApplicantRow>(&format!(
            "SELECT {APPLICANT_COLUMNS} FROM applicants WHERE strpos(name, $1) > 0 ORDER BY id"
        ))
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn page_applicants(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ApplicantRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicantRow>(&format!(
            "SELECT {APPLICANT_COLUMNS} FROM applicants ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count_applicants(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applicants")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn resumes_for(&self, applicant_ids: &[i64]) -> Result<Vec<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT id, applicant_id, content, created_at FROM resumes \
             WHERE applicant_id = ANY($1)",
        )
        .bind(applicant_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn applications_for(
        &self,
        applicant_ids: &[i64],
    ) -> Result<Vec<ApplicationRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicationRow>(
            "SELECT id, applicant_id, status, position, created_at FROM applications \
             WHERE applicant_id = ANY($1) ORDER BY id",
        )
        .bind(applicant_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn jobs_for(&self, applicant_ids: &[i64]) -> Result<Vec<LinkedJobRow>, AppError> {
        Ok(sqlx::query_as::<_, LinkedJobRow>(
            r#"
            SELECT aj.applicant_id, j.id, j.title, j.description, j.created_at
            FROM applicant_job aj
            JOIN jobs j ON j.id = aj.job_id
            WHERE aj.applicant_id = ANY($1)
            ORDER BY aj.applicant_id, j.id
            "#,
        )
        .bind(applicant_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_resume(&self, applicant_id: i64, content: &str) -> Result<ResumeRow, AppError> {
        sqlx::query_as::<_, ResumeRow>(
            "INSERT INTO resumes (applicant_id, content) VALUES ($1, $2) \
             RETURNING id, applicant_id, content, created_at",
        )
        .bind(applicant_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_constraint(
                e,
                || AppError::Conflict(format!("Applicant {applicant_id} already has a resume")),
                || AppError::applicant_not_found(applicant_id),
            )
        })
    }

    async fn upsert_resume(&self, applicant_id: i64, content: &str) -> Result<ResumeRow, AppError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (applicant_id, content) VALUES ($1, $2)
            ON CONFLICT (applicant_id) DO UPDATE SET content = EXCLUDED.content
            RETURNING id, applicant_id, content, created_at
            "#,
        )
        .bind(applicant_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_foreign_key(e, || AppError::applicant_not_found(applicant_id)))
    }

    async fn insert_application(
        &self,
        applicant_id: i64,
        application: &NewApplication,
    ) -> Result<ApplicationRow, AppError> {
        sqlx::query_as::<_, ApplicationRow>(
            "INSERT INTO applications (applicant_id, status, position) VALUES ($1, $2, $3) \
             RETURNING id, applicant_id, status, position, created_at",
        )
        .bind(applicant_id)
        .bind(&application.status)
        .bind(&application.position)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_foreign_key(e, || AppError::applicant_not_found(applicant_id)))
    }

    async fn insert_job(&self, job: &NewJob) -> Result<JobRow, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "INSERT INTO jobs (title, description) VALUES ($1, $2) \
             RETURNING id, title, description, created_at",
        )
        .bind(&job.title)
        .bind(&job.description)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_job(&self, id: i64) -> Result<Option<JobRow>, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT id, title, description, created_at FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT id, title, description, created_at FROM jobs ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn link_job(&self, applicant_id: i64, job_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO applicant_job (applicant_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(applicant_id)
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            on_foreign_key(e, || {
                AppError::NotFound("Applicant or Job not found".to_string())
            })
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn applicants_for_job(&self, job_id: i64) -> Result<Vec<ApplicantRow>, AppError> {
        Ok(sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT a.id, a.name, a.email, a.phone, a.status, a.created_at
            FROM applicant_job aj
            JOIN applicants a ON a.id = aj.applicant_id
            WHERE aj.job_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
