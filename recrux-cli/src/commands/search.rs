use anyhow::Result;
use clap::Args;
use client::Route;
use shared::models::{DEFAULT_TOP_K, TalentSearchRequest};

use crate::app::App;

/// Semantic search across every screened candidate
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// What to look for, in plain language (e.g. "python backend with AWS")
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Minimum years of experience
    #[arg(long, default_value_t = 0)]
    pub min_experience: u32,

    /// Maximum number of results
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: u32,
}

pub async fn search(app: &App, args: &SearchArgs) -> Result<()> {
    app.enter(Route::TalentPool)?;

    let request = TalentSearchRequest {
        min_experience: args.min_experience,
        top_k: args.top_k,
        ..TalentSearchRequest::new(args.query.join(" "))
    };
    let response = app.check(app.api().search_talent_pool(&request).await)?;

    if response.results.is_empty() {
        println!("No matching candidates.");
        return Ok(());
    }
    println!("{} match(es)", response.total.max(response.results.len()));
    for candidate in &response.results {
        let similarity = candidate
            .similarity_score
            .map_or_else(|| "-".to_string(), |score| format!("{:.0}%", score * 100.0));
        println!(
            "{:>5}  {:<24}  {:>5}  {}",
            candidate.id,
            candidate.name,
            similarity,
            candidate.job_title.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}
