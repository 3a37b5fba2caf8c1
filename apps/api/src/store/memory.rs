use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::applicant::{ApplicantGraph, ApplicantRow, JobLink};
use crate::models::application::{ApplicationRow, NewApplication};
use crate::models::job::{JobRow, LinkedJobRow, NewJob};
use crate::models::resume::ResumeRow;
use crate::store::Store;

#[derive(Default)]
struct Tables {
    next_id: i64,
    applicants: BTreeMap<i64, ApplicantRow>,
    jobs: BTreeMap<i64, JobRow>,
    /// Keyed by applicant id: one résumé per applicant.
    resumes: BTreeMap<i64, ResumeRow>,
    applications: BTreeMap<i64, ApplicationRow>,
    /// (applicant_id, job_id)
    applicant_job: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_job(&mut self, job: &NewJob) -> JobRow {
        let row = JobRow {
            id: self.allocate_id(),
            title: job.title.clone(),
            description: job.description.clone(),
            created_at: Utc::now(),
        };
        self.jobs.insert(row.id, row.clone());
        row
    }

    fn upsert_resume(&mut self, applicant_id: i64, content: &str) -> ResumeRow {
        if let Some(existing) = self.resumes.get_mut(&applicant_id) {
            existing.content = content.to_string();
            return existing.clone();
        }
        let row = ResumeRow {
            id: self.allocate_id(),
            applicant_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.resumes.insert(applicant_id, row.clone());
        row
    }

    fn insert_application(&mut self, applicant_id: i64, values: &NewApplication) -> ApplicationRow {
        let row = ApplicationRow {
            id: self.allocate_id(),
            applicant_id,
            status: values.status.clone(),
            position: values.position.clone(),
            created_at: Utc::now(),
        };
        self.applications.insert(row.id, row.clone());
        row
    }

    /// Checks every reference in the graph before anything is written, which
    /// gives the same all-or-nothing outcome as the Postgres transaction.
    fn validate_graph(&self, graph: &ApplicantGraph) -> Result<(), AppError> {
        if let Some(id) = graph.id {
            if !self.applicants.contains_key(&id) {
                return Err(AppError::applicant_not_found(id));
            }
        }
        for draft in &graph.applications {
            if let Some(app_id) = draft.id {
                let owned = match (graph.id, self.applications.get(&app_id)) {
                    (Some(owner), Some(row)) => row.applicant_id == owner,
                    _ => false,
                };
                if !owned {
                    return Err(AppError::NotFound(format!(
                        "Application {app_id} not found for applicant {}",
                        graph.id.unwrap_or_default()
                    )));
                }
            }
        }
        for link in &graph.jobs {
            if let JobLink::Existing(job_id) = link {
                if !self.jobs.contains_key(job_id) {
                    return Err(AppError::job_not_found(*job_id));
                }
            }
        }
        Ok(())
    }
}

/// In-process store. All operations serialise on one lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn save_applicant_graph(&self, graph: &ApplicantGraph) -> Result<i64, AppError> {
        let mut tables = self.tables.lock().await;
        tables.validate_graph(graph)?;

        let applicant_id = match graph.id {
            Some(id) => id,
            None => tables.allocate_id(),
        };
        let created_at = tables
            .applicants
            .get(&applicant_id)
            .map(|row| row.created_at)
            .unwrap_or_else(Utc::now);
        tables.applicants.insert(
            applicant_id,
            ApplicantRow {
                id: applicant_id,
                name: graph.fields.name.clone(),
                email: graph.fields.email.clone(),
                phone: graph.fields.phone.clone(),
                status: graph.fields.status.clone(),
                created_at,
            },
        );

        if let Some(content) = &graph.resume {
            tables.upsert_resume(applicant_id, content);
        }

        for draft in &graph.applications {
            match draft.id.and_then(|id| tables.applications.get_mut(&id)) {
                Some(row) => {
                    row.status = draft.values.status.clone();
                    row.position = draft.values.position.clone();
                }
                None => {
                    tables.insert_application(applicant_id, &draft.values);
                }
            }
        }

        if graph.id.is_some() {
            tables.applicant_job.retain(|(owner, _)| *owner != applicant_id);
        }
        for link in &graph.jobs {
            let job_id = match link {
                JobLink::Existing(id) => *id,
                JobLink::New(job) => tables.insert_job(job).id,
            };
            tables.applicant_job.insert((applicant_id, job_id));
        }

        Ok(applicant_id)
    }

    async fn find_applicant(&self, id: i64) -> Result<Option<ApplicantRow>, AppError> {
        Ok(self.tables.lock().await.applicants.get(&id).cloned())
    }

    async fn list_applicants(&self) -> Result<Vec<ApplicantRow>, AppError> {
        Ok(self.tables.lock().await.applicants.values().cloned().collect())
    }

    async fn list_applicants_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<ApplicantRow>, AppError> {
        let tables = self.tables.lock().await;
        let mut rows: Vec<ApplicantRow> = tables
            .applicants
            .values()
            .filter(|a| a.status.as_deref() == Some(status))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn search_applicants_by_name(
        &self,
        fragment: &str,
    ) -> Result<Vec<ApplicantRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applicants
            .values()
            .filter(|a| a.name.contains(fragment))
            .cloned()
            .collect())
    }

    async fn page_applicants(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ApplicantRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applicants
            .values()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count_applicants(&self) -> Result<i64, AppError> {
        let count = self.tables.lock().await.applicants.len();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn resumes_for(&self, applicant_ids: &[i64]) -> Result<Vec<ResumeRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(applicant_ids
            .iter()
            .filter_map(|id| tables.resumes.get(id).cloned())
            .collect())
    }

    async fn applications_for(
        &self,
        applicant_ids: &[i64],
    ) -> Result<Vec<ApplicationRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applications
            .values()
            .filter(|a| applicant_ids.contains(&a.applicant_id))
            .cloned()
            .collect())
    }

    async fn jobs_for(&self, applicant_ids: &[i64]) -> Result<Vec<LinkedJobRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applicant_job
            .iter()
            .filter(|(applicant_id, _)| applicant_ids.contains(applicant_id))
            .filter_map(|(applicant_id, job_id)| {
                tables.jobs.get(job_id).map(|job| LinkedJobRow {
                    applicant_id: *applicant_id,
                    job: job.clone(),
                })
            })
            .collect())
    }

    async fn insert_resume(&self, applicant_id: i64, content: &str) -> Result<ResumeRow, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.applicants.contains_key(&applicant_id) {
            return Err(AppError::applicant_not_found(applicant_id));
        }
        if tables.resumes.contains_key(&applicant_id) {
            return Err(AppError::Conflict(format!(
                "Applicant {applicant_id} already has a resume"
            )));
        }
        Ok(tables.upsert_resume(applicant_id, content))
    }

    async fn upsert_resume(&self, applicant_id: i64, content: &str) -> Result<ResumeRow, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.applicants.contains_key(&applicant_id) {
            return Err(AppError::applicant_not_found(applicant_id));
        }
        Ok(tables.upsert_resume(applicant_id, content))
    }

    async fn insert_application(
        &self,
        applicant_id: i64,
        application: &NewApplication,
    ) -> Result<ApplicationRow, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.applicants.contains_key(&applicant_id) {
            return Err(AppError::applicant_not_found(applicant_id));
        }
        Ok(tables.insert_application(applicant_id, application))
    }

    async fn insert_job(&self, job: &NewJob) -> Result<JobRow, AppError> {
        Ok(self.tables.lock().await.insert_job(job))
    }

    async fn find_job(&self, id: i64) -> Result<Option<JobRow>, AppError> {
        Ok(self.tables.lock().await.jobs.get(&id).cloned())
    }

    async fn list_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        Ok(self.tables.lock().await.jobs.values().cloned().collect())
    }

    async fn link_job(&self, applicant_id: i64, job_id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.applicants.contains_key(&applicant_id) || !tables.jobs.contains_key(&job_id) {
            return Err(AppError::NotFound("Applicant or Job not found".to_string()));
        }
        Ok(tables.applicant_job.insert((applicant_id, job_id)))
    }

    async fn applicants_for_job(&self, job_id: i64) -> Result<Vec<ApplicantRow>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .applicant_job
            .iter()
            .filter(|(_, linked_job)| *linked_job == job_id)
            .filter_map(|(applicant_id, _)| tables.applicants.get(applicant_id).cloned())
            .collect())
    }
}
