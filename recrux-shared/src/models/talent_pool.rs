use serde::{Deserialize, Serialize};

use super::CandidateRecord;

/// Number of matches requested when the caller does not say otherwise.
pub const DEFAULT_TOP_K: u32 = 20;

/// Body for `POST /talent-pool/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TalentSearchRequest {
    /// Natural-language description of the wanted profile.
    pub query: String,
    /// Lower bound on years of experience.
    pub min_experience: u32,
    /// Maximum number of matches.
    pub top_k: u32,
}

impl TalentSearchRequest {
    /// A search for `query` with no experience floor and [`DEFAULT_TOP_K`] results.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            min_experience: 0,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Semantic search results across every job's candidates, best match first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TalentSearchResponse {
    /// The query as the server received it.
    #[serde(default)]
    pub query: Option<String>,
    /// Number of matches.
    #[serde(default)]
    pub total: usize,
    /// Matches, each carrying a `similarity_score`.
    #[serde(default)]
    pub results: Vec<CandidateRecord>,
}
