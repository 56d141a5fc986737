use anyhow::{Result, bail};
use clap::Subcommand;
use client::Route;
use shared::models::{CandidateList, CandidateRecord, CandidateStatus, StatusCounts};

use crate::app::App;

const STATUS_CHOICES: &str = "status must be one of: screened, shortlisted, rejected";

#[derive(Subcommand, Debug)]
pub enum CandidatesCommand {
    /// List a job's candidates, best match first
    List {
        job_id: i64,

        /// Only show candidates in this state (screened, shortlisted, rejected)
        #[arg(long, short, value_parser = parse_status)]
        status: Option<CandidateStatus>,
    },
    /// Move a candidate of a job to the shortlist
    Shortlist { job_id: i64, id: i64 },
    /// Reject a candidate of a job
    Reject { job_id: i64, id: i64 },
    /// Set the status of a candidate of a job
    Status {
        job_id: i64,
        id: i64,
        #[arg(value_parser = parse_status)]
        status: CandidateStatus,
    },
}

fn parse_status(value: &str) -> Result<CandidateStatus, String> {
    value
        .trim()
        .parse::<CandidateStatus>()
        .ok()
        .filter(|status| status.is_assignable())
        .ok_or_else(|| STATUS_CHOICES.to_string())
}

pub async fn run(app: &App, command: CandidatesCommand) -> Result<()> {
    match command {
        CandidatesCommand::List { job_id, status } => list(app, job_id, status).await,
        CandidatesCommand::Shortlist { job_id, id } => {
            set_status(app, job_id, id, CandidateStatus::Shortlisted).await
        }
        CandidatesCommand::Reject { job_id, id } => {
            set_status(app, job_id, id, CandidateStatus::Rejected).await
        }
        CandidatesCommand::Status { job_id, id, status } => {
            set_status(app, job_id, id, status).await
        }
    }
}

async fn list(app: &App, job_id: i64, status: Option<CandidateStatus>) -> Result<()> {
    app.enter(Route::Candidates { job_id })?;

    let mut list =
        app.check_or(app.api().list_candidates(job_id).await, CandidateList::default())?;
    list.sort_by_match_score();
    if let Some(title) = &list.job_title {
        println!("{title}");
    }
    print_counts(list.status_counts());

    let shown: Vec<&CandidateRecord> = match status {
        Some(status) => list.with_status(status).collect(),
        None => list.candidates.iter().collect(),
    };
    if shown.is_empty() {
        println!("No candidates.");
    }
    for candidate in shown {
        print_candidate(candidate);
    }
    Ok(())
}

async fn set_status(app: &App, job_id: i64, id: i64, status: CandidateStatus) -> Result<()> {
    app.enter(Route::Candidates { job_id })?;

    let mut list = app.check(app.api().list_candidates(job_id).await)?;
    if !list.candidates.iter().any(|candidate| candidate.id == id) {
        bail!("candidate {id} is not listed for job {job_id}");
    }

    app.check(app.api().update_candidate_status(id, status).await)?;
    list.set_status(id, status);
    println!("Candidate {id} is now {status}");
    print_counts(list.status_counts());
    Ok(())
}

fn print_counts(counts: StatusCounts) {
    println!(
        "Shortlisted: {}  Pending: {}  Rejected: {}",
        counts.shortlisted, counts.pending, counts.rejected
    );
}

pub(crate) fn print_candidate(candidate: &CandidateRecord) {
    let score = candidate
        .match_score
        .map_or_else(|| "-".to_string(), |score| format!("{score:.0}%"));
    println!(
        "{:>5}  {:<24}  {:>5}  {:<11}  {}",
        candidate.id,
        candidate.name,
        score,
        candidate.status.as_ref(),
        candidate.recommendation.as_deref().unwrap_or_default()
    );
    if !candidate.skills_matched.is_empty() {
        println!("       matched: {}", candidate.skills_matched.join(", "));
    }
    if !candidate.skills_missing.is_empty() {
        println!("       missing: {}", candidate.skills_missing.join(", "));
    }
}
