//! Wire models for every Recrux endpoint the client calls.

/// Login, registration and the signed-in user.
pub mod auth;
/// Candidates, status changes and resume uploads.
pub mod candidates;
/// Dashboard counters.
pub mod dashboard;
/// Backend error payloads.
pub mod errors;
/// Job postings and requirement extraction.
pub mod jobs;
/// Cross-job semantic talent search.
pub mod talent_pool;

pub use auth::{LoginRequest, RegisterRequest, TokenResponse, UserRecord};
pub use candidates::{
    CandidateList, CandidateRecord, CandidateStatus, StatusCounts, StatusUpdateRequest,
    UploadOutcome, UploadResponse, UploadResult, UploadSummary,
};
pub use dashboard::DashboardStats;
pub use errors::ErrorBody;
pub use jobs::{ExtractRequirementsRequest, ExtractedRequirements, JobDraft, JobRecord};
pub use talent_pool::{DEFAULT_TOP_K, TalentSearchRequest, TalentSearchResponse};
