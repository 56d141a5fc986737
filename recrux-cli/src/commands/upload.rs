use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use client::{Route, api::is_supported_resume};
use shared::models::UploadOutcome;

use crate::app::App;

/// Upload resumes for parsing and scoring against a job
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Job the resumes are scored against
    pub job_id: i64,

    /// Resume files (.pdf, .doc, .docx)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub async fn upload(app: &App, args: &UploadArgs) -> Result<()> {
    app.enter(Route::UploadResumes {
        job_id: args.job_id,
    })?;

    for file in args.files.iter().filter(|file| !is_supported_resume(file)) {
        eprintln!(
            "warning: {} is not a PDF or Word document; the server will reject it",
            file.display()
        );
    }

    let response = app.check(app.api().upload_resumes(args.job_id, &args.files).await)?;
    if let Some(message) = &response.message {
        println!("{message}");
    }
    println!(
        "{} uploaded, {} processed, {} failed",
        response.summary.total, response.summary.success, response.summary.failed
    );
    for result in &response.results {
        match result.status {
            UploadOutcome::Success => {
                let score = result
                    .score
                    .map_or_else(String::new, |score| format!(" score {score:.0}%"));
                println!(
                    "  ok     {} -> {}{score}",
                    result.filename,
                    result.name.as_deref().unwrap_or("candidate")
                );
            }
            UploadOutcome::Error => println!(
                "  failed {}: {}",
                result.filename,
                result.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    Ok(())
}
