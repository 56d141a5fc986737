use anyhow::{Result, anyhow, bail};
use client::{
    ClientError, ClientResult, CredentialStore, GuardOutcome, RecruxClient, Route, SessionManager,
    guard,
};
use shared::config::Config;
use tracing::debug;

/// Everything a command needs: the restored session and its API client.
#[derive(Debug)]
pub struct App {
    session: SessionManager,
}

impl App {
    /// Builds the session from configuration and restores any stored credential.
    ///
    /// # Errors
    /// Returns an error when the configured API URL is unusable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = RecruxClient::from_config(config)?;
        let credential_dir = config.credential_dir();
        debug!(dir = %credential_dir.display(), "using credential directory");

        let session = SessionManager::new(api, CredentialStore::file(credential_dir));
        session.restore();
        Ok(Self { session })
    }

    /// The shared session.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// The API client carrying the session's token.
    pub fn api(&self) -> &RecruxClient {
        self.session.api()
    }

    /// Runs the route guard for the view a command renders.
    ///
    /// # Errors
    /// Fails when the guard redirects away from `route`.
    pub fn enter(&self, route: Route) -> Result<()> {
        match guard(&self.session.snapshot(), route) {
            GuardOutcome::Render(_) => Ok(()),
            GuardOutcome::Redirect(Route::Login) => {
                bail!("not signed in; run `recrux login` first")
            }
            GuardOutcome::Redirect(target) => bail!("{route} is not available; go to {target}"),
            GuardOutcome::Loading => bail!("session is still loading"),
        }
    }

    /// Converts a client result for display, expiring the session on a 401.
    ///
    /// # Errors
    /// Returns the user-facing message of any client error.
    pub fn check<T>(&self, result: ClientResult<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(ClientError::Unauthorized) => {
                self.session.expire();
                bail!("session expired; run `recrux login` to sign in again")
            }
            Err(err) => Err(anyhow!(describe(&err))),
        }
    }

    /// Like [`App::check`], but a failure other than an expired session is
    /// shown as a warning and replaced by `fallback`.
    ///
    /// # Errors
    /// Fails only when the session has expired.
    pub fn check_or<T>(&self, result: ClientResult<T>, fallback: T) -> Result<T> {
        match result {
            Err(ClientError::Unauthorized) => self.check(Err(ClientError::Unauthorized)),
            Err(err) => {
                eprintln!("warning: {}", describe(&err));
                Ok(fallback)
            }
            Ok(value) => Ok(value),
        }
    }
}

/// The user-facing message, tagged with the HTTP status when the server sent one.
fn describe(err: &ClientError) -> String {
    match err.status() {
        Some(status) => format!("{} (HTTP {})", err.user_message(), status.as_u16()),
        None => err.user_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_describe_tags_server_errors_with_status() {
        let err = ClientError::Server {
            status: StatusCode::NOT_FOUND,
            message: "Job not found".to_string(),
        };
        assert_eq!(describe(&err), "Job not found (HTTP 404)");
    }

    #[test]
    fn test_describe_leaves_local_errors_untagged() {
        let err = ClientError::Validation("Please enter job description first".to_string());
        assert_eq!(describe(&err), "Please enter job description first");
    }
}
