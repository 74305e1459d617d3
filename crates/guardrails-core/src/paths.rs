use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const JOURNAL_DIR: &str = "docs/ai_journal";
pub const ARCHIVE_DIR: &str = "docs/ai_journal/archive";
pub const PATCHES_DIR: &str = "docs/ai_journal/patches";
pub const DIST_DIR: &str = "dist";

pub const CURRENT_TASK_FILE: &str = "docs/current_task.md";
pub const JOURNAL_FILE: &str = "docs/ai_journal/changes.jsonl";

pub const CONFIG_FILE: &str = ".guardrails/config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn current_task_path(root: &Path) -> PathBuf {
    root.join(CURRENT_TASK_FILE)
}

pub fn journal_path(root: &Path) -> PathBuf {
    root.join(JOURNAL_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn task_archive_path(root: &Path, stamp: &str) -> PathBuf {
    root.join(ARCHIVE_DIR).join(format!("current_task_{stamp}.md"))
}

pub fn handoff_path(root: &Path, stamp: &str) -> PathBuf {
    root.join(JOURNAL_DIR).join(format!("handoff_{stamp}.md"))
}

/// Repo-relative POSIX path for a patch snapshot.
pub fn patch_rel_path(stamp: &str, nonce: &str) -> String {
    format!("{PATCHES_DIR}/{stamp}_{nonce}.patch")
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// `2026-10-17T08:30:00Z`: second precision, `Z` suffix.
pub fn iso_z(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Compact stamp used in file names, e.g. `20261017-083000Z`.
pub fn file_stamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%d-%H%M%SZ").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
