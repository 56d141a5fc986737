use serde::{Deserialize, Serialize};

/// A job posting as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    /// Server-assigned job id.
    pub id: i64,
    /// Owning tenant.
    #[serde(default)]
    pub tenant_id: Option<i64>,
    /// Job title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Skills a candidate must have.
    #[serde(default)]
    pub must_have_skills: Vec<String>,
    /// Skills that count in a candidate's favour.
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    /// Minimum years of experience.
    #[serde(default)]
    pub min_experience: u32,
    /// Posting state, e.g. `active`.
    #[serde(default)]
    pub status: String,
    /// ISO-8601 creation time, passed through as sent.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl JobRecord {
    /// Builds an editable draft seeded from this record.
    #[must_use]
    pub fn to_draft(&self) -> JobDraft {
        JobDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            requirements: None,
            must_have_skills: self.must_have_skills.clone(),
            nice_to_have_skills: self.nice_to_have_skills.clone(),
            min_experience: self.min_experience,
        }
    }
}

/// Body for `POST /jobs` and `PUT /jobs/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobDraft {
    /// Job title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Structured requirements, passed through to the backend untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<serde_json::Value>,
    /// Skills a candidate must have.
    pub must_have_skills: Vec<String>,
    /// Skills that count in a candidate's favour.
    pub nice_to_have_skills: Vec<String>,
    /// Minimum years of experience.
    pub min_experience: u32,
}

impl JobDraft {
    /// Fills skill lists and experience from an AI extraction, keeping any
    /// values the caller already supplied.
    pub fn merge_extracted(&mut self, extracted: &ExtractedRequirements) {
        if self.must_have_skills.is_empty() {
            self.must_have_skills = extracted.must_have_skills.clone();
        }
        if self.nice_to_have_skills.is_empty() {
            self.nice_to_have_skills = extracted.nice_to_have_skills.clone();
        }
        if self.min_experience == 0 {
            self.min_experience = extracted.min_experience;
        }
    }
}

/// Body for `POST /jobs/extract-requirements`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractRequirementsRequest {
    /// The job description to analyse.
    pub description: String,
}

/// Requirements the backend extracted from a free-text job description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedRequirements {
    /// Required skills found in the description.
    #[serde(default)]
    pub must_have_skills: Vec<String>,
    /// Optional skills found in the description.
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    /// Minimum experience found in the description.
    #[serde(default)]
    pub min_experience: u32,
    /// Short summary of the role.
    #[serde(default)]
    pub summary: Option<String>,
}
