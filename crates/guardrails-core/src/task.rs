//! The working document for the task in progress: `docs/current_task.md`.

use crate::error::{GuardrailsError, Result};
use crate::journal::clean_list;
use crate::{io, paths};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct StartTask {
    pub title: String,
    pub objectives: Vec<String>,
    pub plan: Vec<String>,
    /// Overwrite an existing task document.
    pub force: bool,
    /// With `force`, copy the existing document into the journal archive first.
    pub backup: bool,
}

/// Render the markdown for a fresh task document.
pub fn render(title: &str, objectives: &[String], plan: &[String], ts: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("# Current Task: {title}").trim_end().to_string());
    lines.push(String::new());

    lines.push("## Objective".to_string());
    if objectives.is_empty() {
        lines.push("- <verifiable goal 1>".to_string());
    } else {
        lines.extend(objectives.iter().map(|o| format!("- {o}")));
    }
    lines.push(String::new());

    lines.push("## Plan".to_string());
    if plan.is_empty() {
        lines.push("- [ ] <step 1: checkable>".to_string());
    } else {
        lines.extend(plan.iter().map(|p| format!("- [ ] {p}")));
    }
    lines.push(String::new());

    lines.push("## Context & Thoughts".to_string());
    lines.push(format!("- init_at: {ts}"));
    lines.push("- <key background, assumptions, constraints>".to_string());
    lines.push(String::new());

    lines.push("## Output".to_string());
    lines.push(
        "- <expected deliverables: file paths, features, acceptance commands>".to_string(),
    );
    lines.push(String::new());

    lines.push("## Handoff Note".to_string());
    lines.push(
        "- <what the next agent does first, which commands to run, current blockers>"
            .to_string(),
    );
    lines.push(String::new());

    lines.join("\n")
}

/// Write `docs/current_task.md` and return its path.
pub fn start_task(root: &Path, opts: &StartTask, now: DateTime<Utc>) -> Result<PathBuf> {
    let path = paths::current_task_path(root);

    if path.exists() {
        if !opts.force {
            return Err(GuardrailsError::TaskExists(path));
        }
        if opts.backup {
            let archive = paths::task_archive_path(root, &paths::file_stamp(now));
            let previous = std::fs::read(&path)?;
            io::atomic_write(&archive, &previous)?;
            tracing::info!(archive = %archive.display(), "archived previous task");
        }
    }

    let doc = render(
        &opts.title,
        &clean_list(&opts.objectives),
        &clean_list(&opts.plan),
        &paths::iso_z(now),
    );
    io::atomic_write(&path, doc.as_bytes())?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
