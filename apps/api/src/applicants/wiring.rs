//! Turns an inbound applicant payload into an explicit write plan.
//!
//! Résumés and applications carry the applicant's id as a foreign key and jobs
//! are linked through the join table, so nothing here mirrors back-references in
//! memory. The plan only normalises the payload:
//! - missing lists become empty
//! - every application is owned by the applicant being saved
//! - duplicate job ids collapse to one link; on a re-save the listed jobs
//!   replace the applicant's previous links

use crate::errors::AppError;
use crate::models::applicant::{
    ApplicantFields, ApplicantGraph, ApplicantPayload, ApplicationDraft, JobLink,
};
use crate::models::job::JobPayload;

pub fn wire_applicant_graph(payload: ApplicantPayload) -> Result<ApplicantGraph, AppError> {
    let ApplicantPayload {
        id,
        name,
        email,
        phone,
        status,
        resume,
        applications,
        jobs,
    } = payload;

    let applications = applications
        .unwrap_or_default()
        .into_iter()
        .map(|app| ApplicationDraft {
            id: app.id,
            values: app.into(),
        })
        .collect();

    let mut links: Vec<JobLink> = Vec::new();
    for job in jobs.unwrap_or_default() {
        let link = job_link(job)?;
        if !links.contains(&link) || matches!(link, JobLink::New(_)) {
            links.push(link);
        }
    }

    Ok(ApplicantGraph {
        id,
        fields: ApplicantFields {
            name,
            email,
            phone,
            status,
        },
        resume: resume.map(|r| r.content),
        applications,
        jobs: links,
    })
}

fn job_link(job: JobPayload) -> Result<JobLink, AppError> {
    match job.id {
        Some(id) => Ok(JobLink::Existing(id)),
        None => Ok(JobLink::New(job.into_new_job()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::ApplicationPayload;
    use crate::models::resume::ResumePayload;

    fn payload() -> ApplicantPayload {
        ApplicantPayload {
            name: "Alice Smith".to_string(),
            status: Some("new".to_string()),
            ..Default::default()
        }
    }

    fn existing_job(id: i64) -> JobPayload {
        JobPayload {
            id: Some(id),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_lists_become_empty() {
        let graph = wire_applicant_graph(payload()).unwrap();
        assert!(graph.applications.is_empty());
        assert!(graph.jobs.is_empty());
        assert!(graph.resume.is_none());
        assert_eq!(graph.fields.name, "Alice Smith");
    }

    #[test]
    fn test_resume_and_applications_are_carried() {
        let mut p = payload();
        p.resume = Some(ResumePayload {
            content: "ten years of Rust".to_string(),
        });
        p.applications = Some(vec![
            ApplicationPayload {
                position: Some("backend".to_string()),
                ..Default::default()
            },
            ApplicationPayload {
                id: Some(9),
                status: Some("interview".to_string()),
                ..Default::default()
            },
        ]);

        let graph = wire_applicant_graph(p).unwrap();
        assert_eq!(graph.resume.as_deref(), Some("ten years of Rust"));
        assert_eq!(graph.applications.len(), 2);
        assert_eq!(graph.applications[0].id, None);
        assert_eq!(graph.applications[1].id, Some(9));
        assert_eq!(
            graph.applications[1].values.status.as_deref(),
            Some("interview")
        );
    }

    #[test]
    fn test_duplicate_job_ids_collapse_to_one_link() {
        let mut p = payload();
        p.jobs = Some(vec![existing_job(3), existing_job(4), existing_job(3)]);

        let graph = wire_applicant_graph(p).unwrap();
        assert_eq!(graph.jobs, vec![JobLink::Existing(3), JobLink::Existing(4)]);
    }

    #[test]
    fn test_new_jobs_are_created_even_with_equal_titles() {
        let mut p = payload();
        let job = JobPayload {
            title: Some("Engineer".to_string()),
            ..Default::default()
        };
        p.jobs = Some(vec![job.clone(), job]);

        let graph = wire_applicant_graph(p).unwrap();
        assert_eq!(graph.jobs.len(), 2);
    }

    #[test]
    fn test_new_job_without_title_is_rejected() {
        let mut p = payload();
        p.jobs = Some(vec![JobPayload {
            title: Some("   ".to_string()),
            ..Default::default()
        }]);

        let err = wire_applicant_graph(p).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
