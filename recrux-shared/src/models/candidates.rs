use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Screening state of a candidate for a job.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CandidateStatus {
    /// Parsed and scored, awaiting a recruiter decision.
    #[default]
    #[serde(alias = "pending")]
    #[strum(to_string = "screened", serialize = "pending")]
    Screened,
    /// Moved forward by a recruiter.
    Shortlisted,
    /// Turned down by a recruiter.
    Rejected,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl CandidateStatus {
    /// Whether a recruiter may set this status.
    #[must_use]
    pub fn is_assignable(self) -> bool {
        self != Self::Unknown
    }
}

/// A screened applicant, as listed per job or returned from talent search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateRecord {
    /// Server-assigned candidate id.
    pub id: i64,
    /// Name parsed from the resume, `Unknown` when the parser found none.
    #[serde(default = "unknown_name")]
    pub name: String,
    /// Contact email, when present on the resume.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Location as written on the resume.
    #[serde(default)]
    pub location: Option<String>,
    /// Overall AI score out of 100.
    #[serde(default)]
    pub match_score: Option<f64>,
    /// Years of relevant experience estimated by the screener.
    #[serde(default)]
    pub experience_years: Option<f64>,
    /// Required skills the candidate has.
    #[serde(default)]
    pub skills_matched: Vec<String>,
    /// Required skills the candidate lacks.
    #[serde(default)]
    pub skills_missing: Vec<String>,
    /// Screener highlights.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Screener reservations.
    #[serde(default)]
    pub concerns: Vec<String>,
    /// One-line hiring recommendation.
    #[serde(default)]
    pub recommendation: Option<String>,
    /// Current screening state.
    #[serde(default)]
    pub status: CandidateStatus,
    /// Present only on talent-pool search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    /// Title of the job the candidate applied to (talent-pool search only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// Response of `GET /candidates/jobs/{job_id}/candidates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CandidateList {
    /// Job the candidates applied to.
    #[serde(default)]
    pub job_id: Option<String>,
    /// Title of that job.
    #[serde(default)]
    pub job_title: Option<String>,
    /// The candidates, in server order until sorted.
    #[serde(default)]
    pub candidates: Vec<CandidateRecord>,
    /// Total reported by the server.
    #[serde(default)]
    pub total: usize,
}

/// Per-status tallies shown on the candidate list tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Candidates in the `shortlisted` state.
    pub shortlisted: usize,
    /// Candidates still in the `screened` state.
    pub pending: usize,
    /// Candidates in the `rejected` state.
    pub rejected: usize,
}

impl CandidateList {
    /// Candidates with the given status, in list order.
    pub fn with_status(&self, status: CandidateStatus) -> impl Iterator<Item = &CandidateRecord> {
        self.candidates.iter().filter(move |c| c.status == status)
    }

    /// Tallies the list per known status.
    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        self.candidates
            .iter()
            .fold(StatusCounts::default(), |mut counts, candidate| {
                match candidate.status {
                    CandidateStatus::Shortlisted => counts.shortlisted += 1,
                    CandidateStatus::Screened => counts.pending += 1,
                    CandidateStatus::Rejected => counts.rejected += 1,
                    CandidateStatus::Unknown => {}
                }
                counts
            })
    }

    /// Applies a status change locally after the server accepted it.
    /// Returns `false` when the candidate is not in this list.
    pub fn set_status(&mut self, candidate_id: i64, status: CandidateStatus) -> bool {
        match self.candidates.iter_mut().find(|c| c.id == candidate_id) {
            Some(candidate) => {
                candidate.status = status;
                true
            }
            None => false,
        }
    }

    /// Orders the list best match first. Unscored candidates sort last and
    /// ties keep their server order.
    pub fn sort_by_match_score(&mut self) {
        self.candidates.sort_by(|a, b| match (a.match_score, b.match_score) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
}

/// Body for `PATCH /candidates/{id}/status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusUpdateRequest {
    /// The new status.
    pub status: CandidateStatus,
}

/// Aggregate counts for a resume upload batch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadSummary {
    /// Files received.
    pub total: usize,
    /// Files parsed and scored.
    pub success: usize,
    /// Files the server could not process.
    pub failed: usize,
}

/// Per-file upload outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UploadOutcome {
    /// The resume was parsed and a candidate created.
    Success,
    /// The file was rejected; see [`UploadResult::error`].
    Error,
}

/// Outcome for a single uploaded resume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResult {
    /// Name of the uploaded file.
    pub filename: String,
    /// Whether the file was processed.
    pub status: UploadOutcome,
    /// Id of the created candidate.
    #[serde(default)]
    pub candidate_id: Option<i64>,
    /// Parsed candidate name.
    #[serde(default)]
    pub name: Option<String>,
    /// Match score out of 100.
    #[serde(default)]
    pub score: Option<f64>,
    /// Screener recommendation.
    #[serde(default)]
    pub recommendation: Option<String>,
    /// Why the file failed.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /candidates/jobs/{job_id}/upload-resumes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    /// Server summary line.
    #[serde(default)]
    pub message: Option<String>,
    /// Batch counts.
    pub summary: UploadSummary,
    /// One entry per file, in upload order.
    #[serde(default)]
    pub results: Vec<UploadResult>,
}
