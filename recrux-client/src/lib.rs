#![cfg_attr(not(test), forbid(unsafe_code))]

//! Client-side plumbing for Recrux: the typed REST client, the persisted
//! credential, the session every view shares, and the route guard that
//! decides whether a view may render.

pub mod api;
pub mod credentials;
pub mod error;
pub mod routes;
pub mod session;

pub use api::RecruxClient;
pub use credentials::{CredentialError, CredentialStore, PersistedCredential};
pub use error::{ClientError, ClientResult};
pub use routes::{GuardOutcome, Route, guard, should_redirect_unauth};
pub use session::{Session, SessionManager};
