//! The views a client can show and the guard that decides whether one may
//! render for the current session.

use std::fmt;

use crate::session::Session;

/// Every view the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Public landing page.
    Landing,
    /// Sign-in form.
    Login,
    /// Company registration form.
    SignUp,
    /// Tenant counters.
    Dashboard,
    /// Job postings list.
    Jobs,
    /// New job form.
    CreateJob,
    /// One job posting.
    JobDetail {
        /// The job shown.
        job_id: i64,
    },
    /// Edit form of one job posting.
    EditJob {
        /// The job edited.
        job_id: i64,
    },
    /// Resume upload for one job.
    UploadResumes {
        /// The job the resumes are scored against.
        job_id: i64,
    },
    /// Candidate review for one job.
    Candidates {
        /// The job whose candidates are shown.
        job_id: i64,
    },
    /// Cross-job talent search.
    TalentPool,
}

impl Route {
    /// Routes reachable without signing in.
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Route::Landing | Route::Login | Route::SignUp)
    }

    /// Routes that need a signed-in user.
    #[must_use]
    pub fn is_protected(self) -> bool {
        !self.is_public()
    }

    /// Path of the view, as the web client addresses it.
    #[must_use]
    pub fn path(self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::SignUp => "/signup".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::CreateJob => "/jobs/new".to_string(),
            Route::JobDetail { job_id } => format!("/jobs/{job_id}"),
            Route::EditJob { job_id } => format!("/jobs/{job_id}/edit"),
            Route::UploadResumes { job_id } => format!("/jobs/{job_id}/upload"),
            Route::Candidates { job_id } => format!("/jobs/{job_id}/candidates"),
            Route::TalentPool => "/talent-pool".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What a view should do given the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The session is still being restored; show only a loading indicator.
    Loading,
    /// Navigate here instead. The requested route is not remembered.
    Redirect(Route),
    /// Show the requested view.
    Render(Route),
}

/// True once the session has loaded and nobody is signed in.
#[must_use]
pub fn should_redirect_unauth(session: &Session) -> bool {
    !session.is_loading && session.user.is_none()
}

/// Decides whether `requested` may render for `session`.
#[must_use]
pub fn guard(session: &Session, requested: Route) -> GuardOutcome {
    if session.is_loading {
        return GuardOutcome::Loading;
    }
    if requested.is_protected() && should_redirect_unauth(session) {
        return GuardOutcome::Redirect(Route::Login);
    }
    GuardOutcome::Render(requested)
}
