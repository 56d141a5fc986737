use std::io::{self, Write};

use anyhow::{Result, bail};
use clap::Args;
use client::Route;
use rpassword::prompt_password;
use shared::models::UserRecord;

use crate::app::App;

/// Sign in and store the session credential
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub email: Option<String>,
}

/// Register a company and sign in as its first user
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Name of the company to create
    #[arg(long)]
    pub company: String,

    /// Email of the company's first user
    #[arg(long, short)]
    pub email: String,

    /// Display name of that user
    #[arg(long)]
    pub full_name: Option<String>,
}

pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    app.enter(Route::Login)?;

    let email = match args.email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("password must not be empty");
    }

    let user = app
        .session()
        .login(email.trim(), &password)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;
    println!("Logged in as {}", user.email);
    print_user(&user);
    Ok(())
}

pub async fn register(app: &App, args: &RegisterArgs) -> Result<()> {
    app.enter(Route::SignUp)?;

    let password = prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("password must not be empty");
    }
    let confirmation = prompt_password("Confirm password: ")?;
    if confirmation != password {
        bail!("passwords do not match");
    }

    let user = app
        .session()
        .register(
            args.company.trim(),
            args.email.trim(),
            &password,
            args.full_name.as_deref(),
        )
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;
    println!("Registered {} and logged in as {}", args.company.trim(), user.email);
    print_user(&user);
    Ok(())
}

pub fn logout(app: &App) {
    let was_signed_in = app.session().snapshot().is_authenticated();
    app.session().logout();
    if was_signed_in {
        println!("Logged out");
    } else {
        println!("No active session");
    }
}

pub fn whoami(app: &App) -> Result<()> {
    let Some(user) = app.session().current_user() else {
        bail!("not signed in; run `recrux login` first");
    };
    println!("Logged in as {}", user.email);
    print_user(&user);
    Ok(())
}

fn print_user(user: &UserRecord) {
    if user.is_admin() {
        println!("role: {} (company administrator)", user.role);
    } else {
        println!("role: {}", user.role);
    }
    if let Some(company) = &user.company_name {
        println!("company: {company}");
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}
