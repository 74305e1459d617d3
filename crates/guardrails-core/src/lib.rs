pub mod config;
pub mod error;
pub mod git;
pub mod handoff;
pub mod io;
pub mod jql;
pub mod journal;
pub mod package;
pub mod paths;
pub mod task;

pub use error::{GuardrailsError, Result};
