//! git CLI publish path.

pub mod push;
pub mod runner;

pub use push::{commit_message, PushDriver, PushError, PushOutcome};
pub use runner::SystemGit;
