pub mod candidates;
pub mod completion;
pub mod config;
pub mod dashboard;
pub mod jobs;
pub mod search;
pub mod session;
pub mod upload;
