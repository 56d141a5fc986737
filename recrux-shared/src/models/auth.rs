use serde::{Deserialize, Serialize};

/// Identity of the signed-in user as returned by the authentication API.
///
/// The record is an immutable snapshot: a new login replaces it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    /// Server-side identifier, when the API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// The user's email address.
    pub email: String,

    /// Role string assigned by the server (e.g. `admin`, `recruiter`).
    pub role: String,

    /// Name of the company (tenant) the user belongs to.
    #[serde(default)]
    pub company_name: Option<String>,
}

impl UserRecord {
    /// Whether the server granted this user the `admin` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plain-text password, sent over the API's transport.
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Name of the company (tenant) to create.
    pub company_name: String,
    /// Email of the company's first user.
    pub email: String,
    /// Password of that user.
    pub password: String,
    /// Display name of that user.
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Successful response from both login and registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Opaque bearer token.
    pub access_token: String,

    /// Token scheme, always `bearer` in practice.
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// The authenticated user.
    pub user: UserRecord,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
