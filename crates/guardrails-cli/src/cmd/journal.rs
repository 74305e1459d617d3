use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use guardrails_core::{
    config::Config,
    handoff,
    journal::{self, RecordOptions},
    task::{self, StartTask},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum JournalSubcommand {
    /// Initialize docs/current_task.md
    StartTask {
        #[arg(long)]
        title: String,
        /// Acceptance goal (repeatable)
        #[arg(long = "objective", value_name = "TEXT")]
        objectives: Vec<String>,
        /// Plan step (repeatable)
        #[arg(long = "plan", value_name = "TEXT")]
        plan: Vec<String>,
        /// Overwrite docs/current_task.md if it exists
        #[arg(long)]
        force: bool,
        /// Back up the existing docs/current_task.md into docs/ai_journal/archive/
        #[arg(long)]
        backup: bool,
    },
    /// Append a change entry to docs/ai_journal/changes.jsonl
    Record {
        #[arg(long)]
        summary: String,
        #[arg(long, default_value = "")]
        why: String,
        /// Command that verifies the change (repeatable)
        #[arg(long = "verify", value_name = "CMD")]
        verify: Vec<String>,
        /// Changed file (repeatable); defaults to git diff --name-only
        #[arg(long = "files", value_name = "PATH")]
        files: Vec<String>,
        /// Use staged diff/paths (git diff --cached)
        #[arg(long)]
        staged: bool,
        /// Do not create a patch snapshot
        #[arg(long)]
        no_patch: bool,
    },
    /// Create a handoff markdown under docs/ai_journal/
    Handoff {
        /// Note for the next agent (repeatable)
        #[arg(long = "note", value_name = "TEXT")]
        notes: Vec<String>,
    },
    /// List recorded change entries
    List,
}

pub fn run(root: &Path, subcmd: JournalSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        JournalSubcommand::StartTask {
            title,
            objectives,
            plan,
            force,
            backup,
        } => {
            let opts = StartTask {
                title,
                objectives,
                plan,
                force,
                backup,
            };
            let path = task::start_task(root, &opts, Utc::now())?;
            print_path("task", &path, json)
        }
        JournalSubcommand::Record {
            summary,
            why,
            verify,
            files,
            staged,
            no_patch,
        } => {
            let config = Config::load(root).context("failed to load config")?;
            let opts = RecordOptions {
                summary,
                why,
                verify,
                files,
                staged,
                snapshot_patch: config.journal.snapshot_patches && !no_patch,
            };
            let path = journal::record(root, &opts, Utc::now())?;
            print_path("journal", &path, json)
        }
        JournalSubcommand::Handoff { notes } => {
            let config = Config::load(root).context("failed to load config")?;
            let path =
                handoff::write_handoff(root, &notes, config.journal.status_limit, Utc::now())
                    .context("failed to write handoff")?;
            print_path("handoff", &path, json)
        }
        JournalSubcommand::List => list(root, json),
    }
}

fn print_path(kind: &str, path: &Path, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({ kind: path }))
    } else {
        println!("{}", path.display());
        Ok(())
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let entries = journal::list_entries(root).context("failed to read change journal")?;

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No journal entries.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.ts.clone(),
                e.summary.clone(),
                e.files.len().to_string(),
                e.patch.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["TS", "SUMMARY", "FILES", "PATCH"], rows);
    Ok(())
}
