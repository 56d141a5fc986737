//! Integration tests for the REST client against an in-process backend.

mod common;

use std::time::Duration;

use client::{ClientError, RecruxClient};
use common::{ISSUED_TOKEN, MISSING_JOB_ID, spawn_backend};
use reqwest::{Method, StatusCode};
use shared::models::{
    CandidateStatus, JobDraft, LoginRequest, TalentSearchRequest, UploadOutcome,
};
use tempfile::TempDir;

async fn authorized_client() -> (RecruxClient, common::MockBackend) {
    let (base, backend) = spawn_backend().await;
    let client = RecruxClient::new(base, Duration::from_secs(5)).unwrap();
    client.set_token(Some(ISSUED_TOKEN.to_string()));
    (client, backend)
}

#[tokio::test]
async fn test_login_posts_credentials_without_bearer() {
    let (base, backend) = spawn_backend().await;
    let client = RecruxClient::new(base, Duration::from_secs(5)).unwrap();

    let response = client
        .login(&LoginRequest {
            email: "a@b.com".to_string(),
            password: common::VALID_PASSWORD.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.access_token, ISSUED_TOKEN);
    assert_eq!(response.user.email, "a@b.com");

    let request = backend.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/auth/login");
    assert_eq!(request.authorization, None);
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["email"], "a@b.com");
}

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let (client, backend) = authorized_client().await;

    let stats = client.dashboard_stats().await.unwrap();
    assert_eq!(stats.active_jobs, 2);
    assert_eq!(stats.total_candidates, 15);
    assert_eq!(stats.shortlisted, 4);

    let request = backend.last_request();
    assert_eq!(request.path, "/api/dashboard/stats");
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {ISSUED_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_missing_token_maps_to_unauthorized() {
    let (base, _backend) = spawn_backend().await;
    let client = RecruxClient::new(base, Duration::from_secs(5)).unwrap();

    let err = client.list_jobs().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn test_jobs_crud() {
    let (client, backend) = authorized_client().await;

    let jobs = client.list_jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].title, "Backend Engineer");
    assert_eq!(jobs[1].min_experience, 0);

    let draft = JobDraft {
        title: "Platform Engineer".to_string(),
        description: "Own the platform".to_string(),
        must_have_skills: vec!["Rust".to_string()],
        min_experience: 4,
        ..JobDraft::default()
    };
    let created = client.create_job(&draft).await.unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(created.title, "Platform Engineer");
    assert_eq!(created.must_have_skills, vec!["Rust"]);

    let job = client.get_job(9).await.unwrap();
    assert_eq!(job.id, 9);
    assert_eq!(job.to_draft().must_have_skills, vec!["Rust"]);

    client.delete_job(9).await.unwrap();
    let request = backend.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/api/jobs/9");
}

#[tokio::test]
async fn test_server_detail_becomes_message() {
    let (client, _backend) = authorized_client().await;

    let err = client.get_job(MISSING_JOB_ID).await.unwrap_err();
    match &err {
        ClientError::Server { status, message } => {
            assert_eq!(*status, StatusCode::NOT_FOUND);
            assert_eq!(message, "Job not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Job not found");
}

#[tokio::test]
async fn test_validation_detail_list_is_flattened() {
    let (client, _backend) = authorized_client().await;

    let err = client.extract_requirements("short").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(err.user_message(), "description too short");

    let extracted = client
        .extract_requirements("Senior data engineer with Python and SQL")
        .await
        .unwrap();
    assert_eq!(extracted.must_have_skills, vec!["Python", "SQL"]);
    assert_eq!(extracted.min_experience, 3);
}

#[tokio::test]
async fn test_candidates_and_status_update() {
    let (client, backend) = authorized_client().await;

    let list = client.list_candidates(1).await.unwrap();
    assert_eq!(list.total, 2);
    let counts = list.status_counts();
    assert_eq!(counts.shortlisted, 1);
    assert_eq!(counts.pending, 1);

    client
        .update_candidate_status(12, CandidateStatus::Rejected)
        .await
        .unwrap();
    let request = backend.last_request();
    assert_eq!(request.method, Method::PATCH);
    assert_eq!(request.path, "/api/candidates/12/status");
    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["status"], "rejected");
}

#[tokio::test]
async fn test_upload_sends_one_resumes_part_per_file() {
    let (client, backend) = authorized_client().await;
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("cv.pdf");
    let docx = dir.path().join("other.docx");
    std::fs::write(&pdf, b"%PDF-1.4 resume").unwrap();
    std::fs::write(&docx, b"docx bytes").unwrap();

    let response = client.upload_resumes(5, &[pdf, docx]).await.unwrap();
    assert_eq!(response.summary.total, 2);
    assert_eq!(response.results[0].status, UploadOutcome::Success);

    let request = backend.last_request();
    assert_eq!(request.path, "/api/candidates/jobs/5/upload-resumes");
    assert!(
        request
            .content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("multipart/form-data"))
    );
    assert_eq!(request.body.matches("name=\"resumes\"").count(), 2);
    assert!(request.body.contains("filename=\"cv.pdf\""));
    assert!(request.body.contains("application/pdf"));
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let (client, backend) = authorized_client().await;
    let dir = TempDir::new().unwrap();

    let err = client
        .upload_resumes(5, &[dir.path().join("absent.pdf")])
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Io { .. }));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_talent_search_trims_query() {
    let (client, backend) = authorized_client().await;

    let response = client
        .search_talent_pool(&TalentSearchRequest::new("  rust backend  "))
        .await
        .unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].similarity_score, Some(0.82));

    let body: serde_json::Value = serde_json::from_str(&backend.last_request().body).unwrap();
    assert_eq!(body["query"], "rust backend");
    assert_eq!(body["top_k"], 20);
}
