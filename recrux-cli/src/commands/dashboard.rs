use anyhow::Result;
use client::Route;
use shared::models::DashboardStats;

use crate::app::App;

/// Shows the tenant's headline counts. A failed fetch shows zeros.
pub async fn show(app: &App) -> Result<()> {
    app.enter(Route::Dashboard)?;

    let stats = app.check_or(app.api().dashboard_stats().await, DashboardStats::default())?;
    if let Some(user) = app.session().current_user() {
        match &user.company_name {
            Some(company) => println!("{company} ({})", user.email),
            None => println!("{}", user.email),
        }
    }
    println!("Active jobs:       {}", stats.active_jobs);
    println!("Total candidates:  {}", stats.total_candidates);
    println!("Shortlisted:       {}", stats.shortlisted);
    Ok(())
}
