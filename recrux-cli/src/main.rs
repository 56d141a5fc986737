//! Main entry point for the Recrux command-line client.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dotenv::dotenv;
use shared::config::Config;

mod app;
mod commands;
mod logging;

use app::App;
use commands::{
    candidates::CandidatesCommand,
    jobs::JobsCommand,
    search::SearchArgs,
    session::{LoginArgs, RegisterArgs},
    upload::UploadArgs,
};

/// Recrux CLI
#[derive(Parser)]
#[command(name = "recrux", version)]
#[command(about = "Command-line client for the Recrux recruitment platform", long_about = None)]
struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., config.yaml or config.json). If not provided, defaults and RECRUX_* variables are used."
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Recrux CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session credential
    Login(LoginArgs),
    /// Register a company and sign in as its first user
    Register(RegisterArgs),
    /// Sign out and remove the stored credential
    Logout,
    /// Show who is signed in, without contacting the server
    Whoami,
    /// Show active jobs, screened candidates and shortlisted counts
    Dashboard,
    /// Create, inspect, edit and delete job postings
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Review and screen the candidates of a job
    #[command(subcommand)]
    Candidates(CandidatesCommand),
    /// Upload resumes for parsing and scoring against a job
    Upload(UploadArgs),
    /// Semantic search across every screened candidate
    Search(SearchArgs),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
        }
        Commands::Config { format } => {
            let format = format.unwrap_or_else(|| "yaml".to_string());
            commands::config::generate_config(&format)?;
        }
        command => {
            let config = Config::load_config(cli.config)?;
            logging::initialize_tracing(&config.logging)?;
            let app = App::from_config(&config)?;
            run(&app, command).await?;
        }
    }

    Ok(())
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => commands::session::login(app, args).await,
        Commands::Register(args) => commands::session::register(app, &args).await,
        Commands::Logout => {
            commands::session::logout(app);
            Ok(())
        }
        Commands::Whoami => commands::session::whoami(app),
        Commands::Dashboard => commands::dashboard::show(app).await,
        Commands::Jobs(command) => commands::jobs::run(app, command).await,
        Commands::Candidates(command) => commands::candidates::run(app, command).await,
        Commands::Upload(args) => commands::upload::upload(app, &args).await,
        Commands::Search(args) => commands::search::search(app, &args).await,
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}
