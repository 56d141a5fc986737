use serde::{Deserialize, Serialize};

/// Tenant-wide counters shown on the dashboard.
///
/// Defaults to all zeros, which is also what the dashboard shows when the
/// stats request fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    /// Open job postings.
    #[serde(default)]
    pub active_jobs: u64,
    /// Candidates across every job.
    #[serde(default)]
    pub total_candidates: u64,
    /// Candidates currently shortlisted.
    #[serde(default)]
    pub shortlisted: u64,
}
