//! In-process stand-in for the Recrux backend.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use client::{CredentialStore, RecruxClient, SessionManager, credentials::KeyValueStorage};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const VALID_PASSWORD: &str = "secret";
/// Token issued to `a@b.com`. Every other account gets `t-<email>`.
pub const ISSUED_TOKEN: &str = "t-abc";
pub const TAKEN_EMAIL: &str = "taken@b.com";
/// Login attempts for this address are refused without a `detail`.
pub const SILENT_REJECT_EMAIL: &str = "quiet@b.com";
pub const MISSING_JOB_ID: i64 = 404;

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

/// Starts the backend on an ephemeral port and returns its `/api` base URL.
pub async fn spawn_backend() -> (Url, MockBackend) {
    let backend = MockBackend::default();
    let app = Router::new().fallback(handle).with_state(backend.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = Url::parse(&format!("http://{addr}/api/")).unwrap();
    (base, backend)
}

pub fn session_for(base: &Url) -> (SessionManager, CredentialStore) {
    session_with_credentials(base, CredentialStore::memory())
}

/// A session persisting through `storage`.
pub fn session_with_storage(
    base: &Url,
    storage: impl KeyValueStorage + 'static,
) -> (SessionManager, CredentialStore) {
    session_with_credentials(base, CredentialStore::new(storage))
}

fn session_with_credentials(
    base: &Url,
    credentials: CredentialStore,
) -> (SessionManager, CredentialStore) {
    let api = RecruxClient::new(base.clone(), Duration::from_secs(5)).unwrap();
    (SessionManager::new(api, credentials.clone()), credentials)
}

/// The token the backend issues on login or registration for `email`.
pub fn token_issued_to(email: &str) -> String {
    if email == "a@b.com" {
        ISSUED_TOKEN.to_string()
    } else {
        format!("t-{email}")
    }
}

pub fn user_json(email: &str) -> Value {
    json!({
        "id": 7,
        "email": email,
        "role": "recruiter",
        "company_name": "TechFlow Inc."
    })
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn token_for(email: &str) -> Response {
    Json(json!({
        "access_token": token_issued_to(email),
        "token_type": "bearer",
        "user": user_json(email)
    }))
    .into_response()
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header_value(header::AUTHORIZATION);
    let body = String::from_utf8_lossy(&body).into_owned();
    backend.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: authorization.clone(),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.clone(),
    });

    let Some(path) = uri.path().strip_prefix("/api/") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let json_body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    let segments: Vec<&str> = path.split('/').collect();

    match (method, segments.as_slice()) {
        (Method::POST, ["auth", "login"]) => {
            let email = json_body["email"].as_str().unwrap_or_default();
            if email == SILENT_REJECT_EMAIL {
                StatusCode::UNAUTHORIZED.into_response()
            } else if json_body["password"] == VALID_PASSWORD {
                token_for(email)
            } else {
                detail(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
        }
        (Method::POST, ["auth", "register"]) => {
            let email = json_body["email"].as_str().unwrap_or_default();
            if email == TAKEN_EMAIL {
                detail(StatusCode::BAD_REQUEST, "Email already registered")
            } else {
                token_for(email)
            }
        }
        _ if !authorization
            .as_deref()
            .is_some_and(|value| value.starts_with("Bearer t-")) =>
        {
            detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
        }
        (Method::GET, ["dashboard", "stats"]) => Json(json!({
            "active_jobs": 2,
            "total_candidates": 15,
            "shortlisted": 4
        }))
        .into_response(),
        (Method::GET, ["jobs"]) => Json(json!([
            {"id": 1, "title": "Backend Engineer", "status": "active", "min_experience": 3},
            {"id": 2, "title": "Data Scientist", "status": "active"}
        ]))
        .into_response(),
        (Method::POST, ["jobs", "extract-requirements"]) => {
            if json_body["description"].as_str().is_some_and(|d| d.len() < 10) {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": [
                        {"loc": ["body", "description"], "msg": "description too short", "type": "value_error"}
                    ]})),
                )
                    .into_response();
            }
            Json(json!({
                "must_have_skills": ["Python", "SQL"],
                "nice_to_have_skills": ["Docker"],
                "min_experience": 3
            }))
            .into_response()
        }
        (Method::POST, ["jobs"]) => {
            let mut created = json_body.clone();
            created["id"] = json!(3);
            created["status"] = json!("active");
            Json(created).into_response()
        }
        (Method::GET, ["jobs", id]) if id.parse::<i64>().ok() == Some(MISSING_JOB_ID) => {
            detail(StatusCode::NOT_FOUND, "Job not found")
        }
        (Method::GET, ["jobs", id]) => Json(json!({
            "id": id.parse::<i64>().unwrap_or_default(),
            "title": "Backend Engineer",
            "description": "Build APIs",
            "must_have_skills": ["Rust"],
            "min_experience": 2,
            "status": "active"
        }))
        .into_response(),
        (Method::DELETE, ["jobs", _]) => StatusCode::NO_CONTENT.into_response(),
        (Method::GET, ["candidates", "jobs", id, "candidates"]) => Json(json!({
            "job_id": id,
            "job_title": "Backend Engineer",
            "total": 2,
            "candidates": [
                {"id": 11, "name": "Ana", "match_score": 91.5, "status": "shortlisted"},
                {"id": 12, "name": "Bo", "match_score": 40.0, "status": "pending"}
            ]
        }))
        .into_response(),
        (Method::PATCH, ["candidates", _, "status"]) => {
            Json(json!({"message": "Status updated"})).into_response()
        }
        (Method::POST, ["candidates", "jobs", _, "upload-resumes"]) => {
            let parts = body.matches("name=\"resumes\"").count();
            Json(json!({
                "message": "Processed",
                "summary": {"total": parts, "success": parts, "failed": 0},
                "results": [{"filename": "cv.pdf", "status": "success", "candidate_id": 20, "score": 77.0}]
            }))
            .into_response()
        }
        (Method::POST, ["talent-pool", "search"]) => Json(json!({
            "query": json_body["query"],
            "total": 1,
            "results": [{"id": 11, "name": "Ana", "similarity_score": 0.82, "job_title": "Backend Engineer"}]
        }))
        .into_response(),
        _ => detail(StatusCode::NOT_FOUND, "Not Found"),
    }
}
