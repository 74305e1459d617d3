pub mod config;
pub mod jql;
pub mod journal;
pub mod package;
