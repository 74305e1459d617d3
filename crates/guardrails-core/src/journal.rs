//! Machine-readable change log at `docs/ai_journal/changes.jsonl`.
//!
//! One compact JSON object per line, appended after each AI-assisted change.
//! Entries capture what changed, why, how it was verified, and the repo state
//! at the time, with an optional patch snapshot of the diff.

use crate::error::{GuardrailsError, Result};
use crate::git::{self, GitMeta};
use crate::{io, paths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ChangeEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub ts: String,
    pub summary: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub verify: Vec<String>,
    /// Repo-relative path of the patch snapshot.
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub git: Option<GitMeta>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    pub summary: String,
    pub why: String,
    pub verify: Vec<String>,
    /// Explicit file list; when empty, files come from `git diff --name-only`.
    pub files: Vec<String>,
    /// Use the index (`--cached`) instead of the working tree.
    pub staged: bool,
    pub snapshot_patch: bool,
}

/// Trim each value and drop the blank ones.
pub fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Append a change entry and return the journal path.
pub fn record(root: &Path, opts: &RecordOptions, now: DateTime<Utc>) -> Result<PathBuf> {
    let summary = opts.summary.trim();
    if summary.is_empty() {
        return Err(GuardrailsError::MissingSummary);
    }

    let mut files = clean_list(&opts.files);
    if files.is_empty() {
        if let Some(changed) = git::changed_files(root, opts.staged) {
            files = changed;
        }
    }

    let patch = if opts.snapshot_patch {
        write_patch_snapshot(root, opts.staged, now)?
    } else {
        None
    };

    let entry = ChangeEntry {
        ts: paths::iso_z(now),
        summary: summary.to_string(),
        why: opts.why.trim().to_string(),
        files,
        verify: clean_list(&opts.verify),
        patch,
        git: git::meta(root),
    };

    let journal = paths::journal_path(root);
    let mut line = serde_json::to_string(&entry)?;
    line.push('\n');
    io::append_text(&journal, &line)?;
    tracing::info!(journal = %journal.display(), files = entry.files.len(), "recorded change");
    Ok(journal)
}

fn write_patch_snapshot(root: &Path, staged: bool, now: DateTime<Utc>) -> Result<Option<String>> {
    let Some(text) = git::patch_text(root, staged).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let nonce = format!("{:08x}", rand::random::<u32>());
    let rel = paths::patch_rel_path(&paths::file_stamp(now), &nonce);
    io::atomic_write(&root.join(&rel), text.as_bytes())?;
    tracing::debug!(patch = %rel, "wrote patch snapshot");
    Ok(Some(rel))
}

/// Read every entry back. A missing journal has no entries.
pub fn list_entries(root: &Path) -> Result<Vec<ChangeEntry>> {
    let path = paths::journal_path(root);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(&path)?;
    data.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(GuardrailsError::from))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn clean_list_trims_and_drops_blanks() {
        let raw = vec![" a ".to_string(), "".to_string(), "  ".to_string(), "b".to_string()];
        assert_eq!(clean_list(&raw), vec!["a", "b"]);
    }

    #[test]
    fn blank_summary_is_rejected() {
        let dir = TempDir::new().unwrap();
        let opts = RecordOptions {
            summary: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            record(dir.path(), &opts, now()),
            Err(GuardrailsError::MissingSummary)
        ));
        assert!(!paths::journal_path(dir.path()).exists());
    }

    #[test]
    fn record_outside_git_writes_plain_entry() {
        let dir = TempDir::new().unwrap();
        let opts = RecordOptions {
            summary: "  Add JQL builder ".to_string(),
            why: "status reports".to_string(),
            verify: vec!["cargo test".to_string(), " ".to_string()],
            files: vec!["src/jql.rs".to_string()],
            staged: false,
            snapshot_patch: true,
        };
        let journal = record(dir.path(), &opts, now()).unwrap();
        assert_eq!(journal, paths::journal_path(dir.path()));

        let content = std::fs::read_to_string(&journal).unwrap();
        assert!(content.ends_with('\n'));
        assert!(content.contains("\"git\":null"));
        assert!(content.contains("\"patch\":null"));

        let entries = list_entries(dir.path()).unwrap();
        assert_eq!(
            entries,
            vec![ChangeEntry {
                ts: "2026-10-17T09:30:00Z".to_string(),
                summary: "Add JQL builder".to_string(),
                why: "status reports".to_string(),
                files: vec!["src/jql.rs".to_string()],
                verify: vec!["cargo test".to_string()],
                patch: None,
                git: None,
            }]
        );
    }

    fn git_ok(dir: &Path, args: &[&str]) {
        let out = git::run("git", args, Some(dir));
        assert!(out.success(), "git {args:?} failed: {}", out.stderr);
    }

    /// Repo with one commit of `f.txt`, then `f.txt` modified in the work tree.
    fn repo_with_edit(dir: &Path, before: &str, after: &str) {
        git_ok(dir, &["init", "-q"]);
        std::fs::write(dir.join("f.txt"), before).unwrap();
        git_ok(dir, &["add", "f.txt"]);
        git_ok(
            dir,
            &[
                "-c",
                "user.name=t",
                "-c",
                "user.email=t@example.com",
                "commit",
                "-q",
                "-m",
                "init",
            ],
        );
        std::fs::write(dir.join("f.txt"), after).unwrap();
    }

    #[test]
    fn record_in_repo_captures_files_patch_and_meta() {
        if which::which("git").is_err() {
            return;
        }
        let dir = TempDir::new().unwrap();
        repo_with_edit(dir.path(), "old\n", "new\n");

        let opts = RecordOptions {
            summary: "edit f".to_string(),
            snapshot_patch: true,
            ..Default::default()
        };
        record(dir.path(), &opts, now()).unwrap();

        let entries = list_entries(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.files, vec!["f.txt".to_string()]);

        let rel = entry.patch.as_deref().expect("patch snapshot");
        let name = rel
            .strip_prefix("docs/ai_journal/patches/20261017-093000Z_")
            .and_then(|n| n.strip_suffix(".patch"))
            .expect("patch name layout");
        assert_eq!(name.len(), 8);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
        let text = std::fs::read_to_string(dir.path().join(rel)).unwrap();
        assert!(text.contains("-old\n+new\n"));

        let meta = entry.git.as_ref().expect("git meta");
        assert!(meta.branch.is_some());
        assert_eq!(meta.head.as_deref().map(str::len), Some(40));
        assert!(meta.dirty);
    }

    #[test]
    fn patch_snapshot_keeps_trailing_blank_context() {
        if which::which("git").is_err() {
            return;
        }
        let dir = TempDir::new().unwrap();
        repo_with_edit(dir.path(), "x\n\n\n\n", "y\n\n\n\n");

        let opts = RecordOptions {
            summary: "blank tail".to_string(),
            snapshot_patch: true,
            ..Default::default()
        };
        record(dir.path(), &opts, now()).unwrap();
        let rel = list_entries(dir.path()).unwrap()[0].patch.clone().unwrap();

        let snapshot = std::fs::read_to_string(dir.path().join(&rel)).unwrap();
        let diff = git::patch_text(dir.path(), false).unwrap();
        assert_eq!(snapshot, diff);
        assert!(snapshot.ends_with("+y\n \n \n \n"));

        // Back to the committed state, then the snapshot must apply cleanly.
        git_ok(dir.path(), &["checkout", "--", "f.txt"]);
        git_ok(dir.path(), &["apply", "--check", rel.as_str()]);
    }

    #[test]
    fn entries_append_in_order() {
        let dir = TempDir::new().unwrap();
        for summary in ["first", "second"] {
            let opts = RecordOptions {
                summary: summary.to_string(),
                ..Default::default()
            };
            record(dir.path(), &opts, now()).unwrap();
        }
        let summaries: Vec<_> = list_entries(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.summary)
            .collect();
        assert_eq!(summaries, ["first", "second"]);
    }

    #[test]
    fn serialized_field_order_is_stable() {
        let entry = ChangeEntry {
            ts: "t".to_string(),
            summary: "s".to_string(),
            why: String::new(),
            files: vec![],
            verify: vec![],
            patch: None,
            git: None,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"ts":"t","summary":"s","why":"","files":[],"verify":[],"patch":null,"git":null}"#
        );
    }

    #[test]
    fn missing_journal_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(list_entries(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn malformed_line_is_an_error() {
        let dir = TempDir::new().unwrap();
        io::append_text(&paths::journal_path(dir.path()), "not json\n").unwrap();
        assert!(matches!(
            list_entries(dir.path()),
            Err(GuardrailsError::Json(_))
        ));
    }
}
