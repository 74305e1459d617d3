//! Handoff notes: a markdown snapshot of repo state for whoever picks up next.

use crate::error::Result;
use crate::git::{self, GitMeta};
use crate::journal::clean_list;
use crate::{io, paths};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Repo state captured at handoff time.
#[derive(Debug, Clone, Default)]
pub struct RepoSnapshot {
    pub git: Option<GitMeta>,
    pub changed: Vec<String>,
    pub status: Vec<String>,
}

impl RepoSnapshot {
    pub fn capture(root: &Path) -> Self {
        Self {
            git: git::meta(root),
            changed: git::changed_files(root, false).unwrap_or_default(),
            status: git::status_lines(root),
        }
    }
}

pub fn render(ts: &str, notes: &[String], repo: &RepoSnapshot, status_limit: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# Handoff ({ts})"));
    lines.push(String::new());

    lines.push("## Notes".to_string());
    if notes.is_empty() {
        lines.push("- <next steps / blockers / how to verify>".to_string());
    } else {
        lines.extend(notes.iter().map(|n| format!("- {n}")));
    }
    lines.push(String::new());

    lines.push("## Repo state".to_string());
    match &repo.git {
        Some(meta) => {
            let head: String = meta
                .head
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(12)
                .collect();
            lines.push(format!(
                "- branch: `{}`",
                meta.branch.as_deref().unwrap_or("unknown")
            ));
            lines.push(format!("- head: `{head}`"));
            lines.push(format!("- dirty: `{}`", meta.dirty));
        }
        None => lines.push("- git: (unavailable)".to_string()),
    }
    lines.push(String::new());

    lines.push("## Changed files (working tree)".to_string());
    if repo.changed.is_empty() {
        lines.push("- (none detected via git diff)".to_string());
    } else {
        lines.extend(repo.changed.iter().map(|f| format!("- `{f}`")));
    }
    lines.push(String::new());

    lines.push("## git status --porcelain".to_string());
    if repo.status.is_empty() {
        lines.push("- (empty)".to_string());
    } else {
        lines.extend(
            repo.status
                .iter()
                .take(status_limit)
                .map(|l| format!("- `{l}`")),
        );
        if repo.status.len() > status_limit {
            lines.push(format!("- ... ({} more)", repo.status.len() - status_limit));
        }
    }
    lines.push(String::new());

    lines.push("## Pointers".to_string());
    lines.push(format!("- `{}` (primary tracker)", paths::CURRENT_TASK_FILE));
    lines.push(format!(
        "- `{}` (machine-readable change log)",
        paths::JOURNAL_FILE
    ));
    lines.push(format!("- `{}/` (patch snapshots)", paths::PATCHES_DIR));
    lines.push(String::new());

    lines.join("\n")
}

/// Capture repo state and write `docs/ai_journal/handoff_<stamp>.md`.
pub fn write_handoff(
    root: &Path,
    notes: &[String],
    status_limit: usize,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let repo = RepoSnapshot::capture(root);
    let doc = render(&paths::iso_z(now), &clean_list(notes), &repo, status_limit);
    let path = paths::handoff_path(root, &paths::file_stamp(now));
    io::atomic_write(&path, doc.as_bytes())?;
    tracing::info!(handoff = %path.display(), git = repo.git.is_some(), "wrote handoff");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
