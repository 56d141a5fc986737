use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use client::Route;
use shared::models::{JobDraft, JobRecord};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum JobsCommand {
    /// List every job posting
    List,
    /// Show one job posting
    Show { id: i64 },
    /// Create a job posting
    Create(CreateArgs),
    /// Edit a job posting; omitted fields keep their current values
    Update(UpdateArgs),
    /// Delete a job posting
    Delete { id: i64 },
    /// Extract skills and experience from a job description
    Extract(DescriptionArgs),
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
pub struct DescriptionArgs {
    #[arg(long, short)]
    pub description: Option<String>,

    /// Read the description from a file
    #[arg(long)]
    pub description_file: Option<PathBuf>,
}

impl DescriptionArgs {
    fn resolve(&self) -> Result<Option<String>> {
        match (&self.description, &self.description_file) {
            (Some(text), _) => Ok(Some(text.clone())),
            (None, Some(path)) => fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("failed to read description from {}", path.display())),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Args, Debug)]
pub struct FieldArgs {
    #[arg(long, short)]
    pub title: Option<String>,

    #[command(flatten)]
    pub description: DescriptionArgs,

    /// Required skill (repeatable, or comma-separated)
    #[arg(long = "must-have", value_delimiter = ',')]
    pub must_have_skills: Vec<String>,

    /// Preferred skill (repeatable, or comma-separated)
    #[arg(long = "nice-to-have", value_delimiter = ',')]
    pub nice_to_have_skills: Vec<String>,

    /// Minimum years of experience
    #[arg(long)]
    pub min_experience: Option<u32>,

    /// Fill missing skills and experience from the description before saving
    #[arg(long)]
    pub extract: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: i64,

    #[command(flatten)]
    pub fields: FieldArgs,
}

pub async fn run(app: &App, command: JobsCommand) -> Result<()> {
    match command {
        JobsCommand::List => list(app).await,
        JobsCommand::Show { id } => show(app, id).await,
        JobsCommand::Create(args) => create(app, args).await,
        JobsCommand::Update(args) => update(app, args).await,
        JobsCommand::Delete { id } => delete(app, id).await,
        JobsCommand::Extract(args) => extract(app, &args).await,
    }
}

async fn list(app: &App) -> Result<()> {
    app.enter(Route::Jobs)?;

    let jobs = app.check_or(app.api().list_jobs().await, Vec::new())?;
    if jobs.is_empty() {
        println!("No jobs yet. Create one with `recrux jobs create`.");
        return Ok(());
    }
    for job in &jobs {
        println!(
            "{:>5}  {:<32}  {:<8}  {}+ yrs",
            job.id, job.title, job.status, job.min_experience
        );
    }
    Ok(())
}

async fn show(app: &App, id: i64) -> Result<()> {
    app.enter(Route::JobDetail { job_id: id })?;

    let job = app.check(app.api().get_job(id).await)?;
    print_job(&job);
    Ok(())
}

async fn create(app: &App, args: CreateArgs) -> Result<()> {
    app.enter(Route::CreateJob)?;

    let fields = args.fields;
    let Some(title) = fields.title.clone() else {
        bail!("--title is required");
    };
    let Some(description) = fields.description.resolve()? else {
        bail!("--description or --description-file is required");
    };

    let mut draft = JobDraft {
        title,
        description,
        must_have_skills: fields.must_have_skills.clone(),
        nice_to_have_skills: fields.nice_to_have_skills.clone(),
        min_experience: fields.min_experience.unwrap_or_default(),
        ..JobDraft::default()
    };
    if fields.extract {
        let extracted = app.check(app.api().extract_requirements(&draft.description).await)?;
        draft.merge_extracted(&extracted);
    }
    validate(&draft)?;

    let job = app.check(app.api().create_job(&draft).await)?;
    println!("Created job {}", job.id);
    print_job(&job);
    Ok(())
}

async fn update(app: &App, args: UpdateArgs) -> Result<()> {
    app.enter(Route::EditJob { job_id: args.id })?;

    let current = app.check(app.api().get_job(args.id).await)?;
    let fields = args.fields;
    let mut draft = current.to_draft();
    if let Some(title) = fields.title {
        draft.title = title;
    }
    if let Some(description) = fields.description.resolve()? {
        draft.description = description;
    }
    if !fields.must_have_skills.is_empty() {
        draft.must_have_skills = fields.must_have_skills;
    }
    if !fields.nice_to_have_skills.is_empty() {
        draft.nice_to_have_skills = fields.nice_to_have_skills;
    }
    if let Some(years) = fields.min_experience {
        draft.min_experience = years;
    }
    if fields.extract {
        let extracted = app.check(app.api().extract_requirements(&draft.description).await)?;
        draft.merge_extracted(&extracted);
    }
    validate(&draft)?;

    let job = app.check(app.api().update_job(args.id, &draft).await)?;
    println!("Updated job {}", job.id);
    print_job(&job);
    Ok(())
}

async fn delete(app: &App, id: i64) -> Result<()> {
    app.enter(Route::JobDetail { job_id: id })?;

    app.check(app.api().delete_job(id).await)?;
    println!("Deleted job {id}");
    Ok(())
}

async fn extract(app: &App, args: &DescriptionArgs) -> Result<()> {
    app.enter(Route::CreateJob)?;

    let description = args.resolve()?.unwrap_or_default();
    let extracted = app.check(app.api().extract_requirements(&description).await)?;
    println!("Must have:     {}", extracted.must_have_skills.join(", "));
    println!("Nice to have:  {}", extracted.nice_to_have_skills.join(", "));
    println!("Experience:    {}+ yrs", extracted.min_experience);
    if let Some(summary) = &extracted.summary {
        println!("Summary:       {summary}");
    }
    Ok(())
}

fn validate(draft: &JobDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        bail!("job title must not be empty");
    }
    if draft.description.trim().is_empty() {
        bail!("job description must not be empty");
    }
    Ok(())
}

fn print_job(job: &JobRecord) {
    println!("#{} {} [{}]", job.id, job.title, job.status);
    if let Some(created_at) = &job.created_at {
        println!("created: {created_at}");
    }
    println!("min experience: {} yrs", job.min_experience);
    println!("must have: {}", job.must_have_skills.join(", "));
    println!("nice to have: {}", job.nice_to_have_skills.join(", "));
    if !job.description.is_empty() {
        println!();
        println!("{}", job.description.trim_end());
    }
}
