//! Typed client for the Recrux REST API.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use shared::{
    config::Config,
    models::{
        CandidateList, CandidateStatus, DashboardStats, ErrorBody, ExtractRequirementsRequest,
        ExtractedRequirements, JobDraft, JobRecord, LoginRequest, RegisterRequest,
        StatusUpdateRequest, TalentSearchRequest, TalentSearchResponse, TokenResponse,
        UploadResponse,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::error::{
    ClientError, ClientResult, LOGIN_FAILED_MESSAGE, REGISTRATION_FAILED_MESSAGE,
};

const USER_AGENT: &str = concat!("recrux-cli/", env!("CARGO_PKG_VERSION"));

/// Extensions the backend accepts for resume uploads.
pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Typed client for the Recrux REST API.
///
/// Clones share the HTTP connection pool and the bearer token slot.
#[derive(Clone, Debug)]
pub struct RecruxClient {
    base_url: Url,
    client: Client,
    token: Arc<RwLock<Option<String>>>,
}

impl RecruxClient {
    /// Create a new API client rooted at `base_url`.
    ///
    /// # Errors
    /// Returns an error when the HTTP client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: with_trailing_slash(base_url),
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client from the resolved configuration.
    ///
    /// # Errors
    /// Returns an error when the configured URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let base_url = config.base_url()?;
        Self::new(base_url, Duration::from_secs(config.request_timeout_secs))
    }

    /// Root that endpoint paths are joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the bearer token sent with authenticated requests.
    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = token;
    }

    /// The bearer token currently sent, if any.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::Validation(format!("invalid endpoint '{path}': {err}")))
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!(method = %method, path = %url.path(), "sending request");

        let builder = self.client.request(method, url);
        Ok(match self.current_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn send_unit(&self, builder: RequestBuilder) -> ClientResult<()> {
        check(builder.send().await?).await.map(|_| ())
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    /// [`ClientError::Authentication`] when the server rejects the credentials.
    pub async fn login(&self, payload: &LoginRequest) -> ClientResult<TokenResponse> {
        let response = self
            .client
            .post(self.endpoint("auth/login")?)
            .json(payload)
            .send()
            .await?;
        let response =
            check_auth(response, ClientError::Authentication, LOGIN_FAILED_MESSAGE).await?;
        Ok(response.json().await?)
    }

    /// Create a company and its first user.
    ///
    /// # Errors
    /// [`ClientError::Registration`] when the server rejects the registration.
    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<TokenResponse> {
        let response = self
            .client
            .post(self.endpoint("auth/register")?)
            .json(payload)
            .send()
            .await?;
        let response =
            check_auth(response, ClientError::Registration, REGISTRATION_FAILED_MESSAGE).await?;
        Ok(response.json().await?)
    }

    /// Tenant-wide dashboard counters.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
        self.send(self.request(Method::GET, "dashboard/stats")?)
            .await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn list_jobs(&self) -> ClientResult<Vec<JobRecord>> {
        self.send(self.request(Method::GET, "jobs")?).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn create_job(&self, draft: &JobDraft) -> ClientResult<JobRecord> {
        self.send(self.request(Method::POST, "jobs")?.json(draft))
            .await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn get_job(&self, job_id: i64) -> ClientResult<JobRecord> {
        self.send(self.request(Method::GET, &format!("jobs/{job_id}"))?)
            .await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update_job(&self, job_id: i64, draft: &JobDraft) -> ClientResult<JobRecord> {
        self.send(
            self.request(Method::PUT, &format!("jobs/{job_id}"))?
                .json(draft),
        )
        .await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn delete_job(&self, job_id: i64) -> ClientResult<()> {
        self.send_unit(self.request(Method::DELETE, &format!("jobs/{job_id}"))?)
            .await
    }

    /// Ask the backend to pull skills and experience out of a job description.
    ///
    /// # Errors
    /// [`ClientError::Validation`] for a blank description, otherwise any
    /// request failure.
    pub async fn extract_requirements(
        &self,
        description: &str,
    ) -> ClientResult<ExtractedRequirements> {
        if description.trim().is_empty() {
            return Err(ClientError::Validation(
                "Please enter job description first".to_string(),
            ));
        }
        let payload = ExtractRequirementsRequest {
            description: description.to_string(),
        };
        self.send(
            self.request(Method::POST, "jobs/extract-requirements")?
                .json(&payload),
        )
        .await
    }

    /// Candidates for a job, ordered by match score.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn list_candidates(&self, job_id: i64) -> ClientResult<CandidateList> {
        self.send(self.request(Method::GET, &format!("candidates/jobs/{job_id}/candidates"))?)
            .await
    }

    /// Move a candidate to `status`.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn update_candidate_status(
        &self,
        candidate_id: i64,
        status: CandidateStatus,
    ) -> ClientResult<()> {
        let payload = StatusUpdateRequest { status };
        self.send_unit(
            self.request(Method::PATCH, &format!("candidates/{candidate_id}/status"))?
                .json(&payload),
        )
        .await
    }

    /// Upload resumes for parsing and scoring against a job.
    ///
    /// Every file goes out as a `resumes` part. Files with an extension the
    /// backend does not accept are still sent; the server reports them as
    /// failed in the per-file results.
    ///
    /// # Errors
    /// [`ClientError::Validation`] when `paths` is empty, [`ClientError::Io`]
    /// when a file cannot be read, otherwise any request failure.
    pub async fn upload_resumes(&self, job_id: i64, paths: &[PathBuf]) -> ClientResult<UploadResponse> {
        if paths.is_empty() {
            return Err(ClientError::Validation(
                "Please select at least one resume".to_string(),
            ));
        }

        let mut form = Form::new();
        for path in paths {
            if !is_supported_resume(path) {
                warn!(file = %path.display(), "unsupported resume type; the server will reject it");
            }
            let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("resume")
                .to_string();
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(mime_type(path))?;
            form = form.part("resumes", part);
        }

        self.send(
            self.request(
                Method::POST,
                &format!("candidates/jobs/{job_id}/upload-resumes"),
            )?
            .multipart(form),
        )
        .await
    }

    /// Semantic search across every candidate the tenant has screened.
    ///
    /// # Errors
    /// [`ClientError::Validation`] for a blank query, otherwise any request
    /// failure.
    pub async fn search_talent_pool(
        &self,
        request: &TalentSearchRequest,
    ) -> ClientResult<TalentSearchResponse> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(ClientError::Validation(
                "Please enter a search query".to_string(),
            ));
        }
        let payload = TalentSearchRequest {
            query: query.to_string(),
            ..request.clone()
        };
        self.send(
            self.request(Method::POST, "talent-pool/search")?
                .json(&payload),
        )
        .await
    }
}

/// Whether the backend accepts this file as a resume, judged by extension.
#[must_use]
pub fn is_supported_resume(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            RESUME_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ErrorBody::parse(&body)
        .and_then(|body| body.message())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| status.to_string(), str::to_string)
        })
}

/// Maps non-success responses on authenticated endpoints to errors.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    let message = error_message(response).await;
    debug!(status = %status, message = %message, "request failed");
    Err(ClientError::Server { status, message })
}

/// Like [`check`], but client errors from the auth endpoints become the
/// caller-supplied rejection with the server's `detail` or `fallback`.
async fn check_auth(
    response: Response,
    rejected: fn(String) -> ClientError,
    fallback: &str,
) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        let message = ErrorBody::parse(&body)
            .and_then(|body| body.message())
            .unwrap_or_else(|| fallback.to_string());
        return Err(rejected(message));
    }
    let message = error_message(response).await;
    Err(ClientError::Server { status, message })
}
