pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::middleware::logging::log_requests;
use crate::state::AppState;
use crate::{applicants, applications, jobs, resumes};

pub fn build_router(state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        // Applicants
        .route(
            "/api/applicants/getAllApplicant",
            get(applicants::handlers::handle_get_all),
        )
        .route(
            "/api/applicants/addApplicant",
            post(applicants::handlers::handle_add),
        )
        .route("/api/applicants/page", get(applicants::handlers::handle_page))
        .route(
            "/api/applicants/getByStatus",
            get(applicants::handlers::handle_get_by_status),
        )
        .route(
            "/api/applicants/getByName",
            get(applicants::handlers::handle_get_by_name),
        )
        .route("/api/applicants/:id", get(applicants::handlers::handle_get_one))
        // Applications
        .route(
            "/api/application/:applicant_id/saveApplication",
            post(applications::handlers::handle_save),
        )
        // Jobs
        .route("/api/job/createJob", post(jobs::handlers::handle_create))
        .route("/api/job/getAllJobs", get(jobs::handlers::handle_get_all))
        .route(
            "/api/job/add-job-to-applicant",
            post(jobs::handlers::handle_add_to_applicant),
        )
        .route("/api/job/:id", get(jobs::handlers::handle_get_one))
        .route(
            "/api/job/:id/applicants",
            get(jobs::handlers::handle_get_applicants),
        )
        // Résumés
        .route(
            "/api/resume/:applicant_id/addResume",
            post(resumes::handlers::handle_add),
        )
        .layer(middleware::from_fn(log_requests));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(api)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, ResumePolicy};
    use crate::store::MemoryStore;

    fn app_with(config: Config) -> Router {
        build_router(AppState {
            store: Arc::new(MemoryStore::new()),
            config,
        })
    }

    fn app() -> Router {
        app_with(Config::default())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_add_applicant_with_nested_graph() {
        let app = app();
        let (status, job) = send(
            &app,
            "POST",
            "/api/job/createJob",
            Some(json!({"title": "Engineer", "description": "Rust"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "POST",
            "/api/applicants/addApplicant",
            Some(json!({
                "name": "Alice Smith",
                "email": "alice@example.com",
                "status": "new",
                "resume": {"content": "cv"},
                "applications": [{"status": "submitted", "position": "backend"}],
                "jobs": [{"id": job["id"]}, {"tittle": "SRE"}]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(body["name"], "Alice Smith");
        assert_eq!(body["resume"]["applicant_id"], id);
        assert_eq!(body["applications"][0]["applicant_id"], id);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 2);

        let (status, applicants) =
            send(&app, "GET", &format!("/api/job/{}/applicants", job["id"]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(applicants[0]["id"], id);
    }

    #[tokio::test]
    async fn test_queries_and_pagination() {
        let app = app();
        for (name, status) in [("Zoe Park", "new"), ("Bob Alison", "hired"), ("Alice Smith", "new")] {
            let (code, _) = send(
                &app,
                "POST",
                "/api/applicants/addApplicant",
                Some(json!({"name": name, "status": status})),
            )
            .await;
            assert_eq!(code, StatusCode::OK);
        }

        let (_, all) = send(&app, "GET", "/api/applicants/getAllApplicant", None).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, by_status) = send(&app, "GET", "/api/applicants/getByStatus?status=new", None).await;
        let names: Vec<&str> = by_status
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Alice Smith", "Zoe Park"]);

        let (_, by_name) = send(&app, "GET", "/api/applicants/getByName?name=Ali", None).await;
        assert_eq!(by_name.as_array().unwrap().len(), 2);

        let (status, page) = send(&app, "GET", "/api/applicants/page?page=1&size=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["content"].as_array().unwrap().len(), 1);
        assert_eq!(page["total_elements"], 3);
        assert_eq!(page["total_pages"], 2);

        let (status, body) = send(&app, "GET", "/api/applicants/page?page=0&size=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_ids_map_to_404() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/job/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (status, _) = send(
            &app,
            "POST",
            "/api/application/99/saveApplication",
            Some(json!({"status": "submitted", "position": "backend"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/api/resume/99/addResume",
            Some(json!({"content": "cv"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/api/job/add-job-to-applicant?applicantId=1&jobId=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, all) = send(&app, "GET", "/api/applicants/getAllApplicant", None).await;
        assert!(all.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assignment_application_and_resume_flow() {
        let app = app();
        let (_, applicant) = send(
            &app,
            "POST",
            "/api/applicants/addApplicant",
            Some(json!({"name": "Alice Smith"})),
        )
        .await;
        let applicant_id = applicant["id"].as_i64().unwrap();
        let (_, job) = send(
            &app,
            "POST",
            "/api/job/createJob",
            Some(json!({"title": "Engineer"})),
        )
        .await;
        let job_id = job["id"].as_i64().unwrap();

        let uri = format!("/api/job/add-job-to-applicant?applicantId={applicant_id}&jobId={job_id}");
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, updated) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["jobs"].as_array().unwrap().len(), 1);

        let (status, application) = send(
            &app,
            "POST",
            &format!("/api/application/{applicant_id}/saveApplication"),
            Some(json!({"status": "submitted", "position": "backend"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(application["applicant_id"], applicant_id);

        let resume_uri = format!("/api/resume/{applicant_id}/addResume");
        let (status, _) = send(&app, "POST", &resume_uri, Some(json!({"content": "v1"}))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, "POST", &resume_uri, Some(json!({"content": "v2"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (_, view) = send(&app, "GET", &format!("/api/applicants/{applicant_id}"), None).await;
        assert_eq!(view["resume"]["content"], "v1");
        assert_eq!(view["applications"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_policy_over_http() {
        let app = app_with(Config {
            resume_policy: ResumePolicy::Replace,
            ..Config::default()
        });
        let (_, applicant) = send(
            &app,
            "POST",
            "/api/applicants/addApplicant",
            Some(json!({"name": "Alice Smith", "resume": {"content": "v1"}})),
        )
        .await;
        let applicant_id = applicant["id"].as_i64().unwrap();

        let (status, resume) = send(
            &app,
            "POST",
            &format!("/api/resume/{applicant_id}/addResume"),
            Some(json!({"content": "v2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resume["id"], applicant["resume"]["id"]);
        assert_eq!(resume["content"], "v2");
    }

    #[tokio::test]
    async fn test_extractor_rejections_use_error_envelope() {
        let app = app();

        let (status, body) = send(&app, "GET", "/api/job/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, "GET", "/api/applicants/page?page=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(
            &app,
            "POST",
            "/api/job/add-job-to-applicant?applicantId=one&jobId=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let request = Request::builder()
            .method("POST")
            .uri("/api/job/createJob")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_applicant_without_name_is_validation_error() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/applicants/addApplicant",
            Some(json!({"email": "nobody@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("name"));

        let (_, all) = send(&app, "GET", "/api/applicants/getAllApplicant", None).await;
        assert!(all.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_job_title_is_bad_request() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/job/createJob",
            Some(json!({"title": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
