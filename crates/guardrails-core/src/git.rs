//! Read-only git introspection for the journal.
//!
//! Every helper degrades instead of failing: a missing `git` binary or a
//! directory that is not a repository yields `None` or an empty list, and the
//! caller renders "unavailable".

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Exit code reported when the program cannot be found, as a shell would.
pub const COMMAND_NOT_FOUND: i32 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    fn not_found(program: &str) -> Self {
        Self {
            code: COMMAND_NOT_FOUND,
            stdout: String::new(),
            stderr: format!("command not found: {program}"),
        }
    }
}

/// Run `program args..` in `cwd` and capture stdout verbatim, stderr trimmed.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> CommandOutput {
    if which::which(program).is_err() {
        return CommandOutput::not_found(program);
    }

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    tracing::debug!(program, ?args, cwd = ?cwd, "running command");
    match cmd.output() {
        Ok(out) => CommandOutput {
            code: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CommandOutput::not_found(program),
        Err(e) => {
            tracing::warn!(program, error = %e, "failed to spawn command");
            CommandOutput {
                code: -1,
                stdout: String::new(),
                stderr: e.to_string(),
            }
        }
    }
}

fn git(root: &Path, args: &[&str]) -> CommandOutput {
    run("git", args, Some(root))
}

/// Locate the repository root for `start`.
///
/// Priority:
/// 1. `git rev-parse --show-toplevel`
/// 2. Walk upward from `start` looking for `.git`
/// 3. Fall back to `start`
pub fn find_repo_root(start: &Path) -> PathBuf {
    let out = git(start, &["rev-parse", "--show-toplevel"]);
    let top = out.stdout.trim();
    if out.success() && !top.is_empty() {
        return PathBuf::from(top);
    }

    let cur = start
        .canonicalize()
        .unwrap_or_else(|_| start.to_path_buf());
    cur.ancestors()
        .find(|p| p.join(".git").exists())
        .map(Path::to_path_buf)
        .unwrap_or(cur)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitMeta {
    pub branch: Option<String>,
    pub head: Option<String>,
    pub dirty: bool,
}

fn single_value(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Branch, HEAD, and dirty flag, or `None` when `root` is not a usable repo.
pub fn meta(root: &Path) -> Option<GitMeta> {
    let branch = git(root, &["rev-parse", "--abbrev-ref", "HEAD"]);
    if !branch.success() {
        return None;
    }
    let head = git(root, &["rev-parse", "HEAD"]);
    let status = git(root, &["status", "--porcelain"]);
    Some(GitMeta {
        branch: single_value(&branch.stdout),
        head: single_value(&head.stdout),
        dirty: status.success() && !status.stdout.trim().is_empty(),
    })
}

fn non_blank_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Paths touched by the working tree (or the index when `staged`).
pub fn changed_files(root: &Path, staged: bool) -> Option<Vec<String>> {
    let mut args = vec!["diff", "--name-only"];
    if staged {
        args.push("--cached");
    }
    let out = git(root, &args);
    out.success().then(|| non_blank_lines(&out.stdout))
}

/// Unified diff of the working tree (or the index when `staged`), byte-for-byte.
pub fn patch_text(root: &Path, staged: bool) -> Option<String> {
    let mut args = vec!["diff"];
    if staged {
        args.push("--cached");
    }
    let out = git(root, &args);
    out.success().then_some(out.stdout)
}

/// Non-blank lines of `git status --porcelain`; empty when git is unavailable.
pub fn status_lines(root: &Path) -> Vec<String> {
    let out = git(root, &["status", "--porcelain"]);
    if !out.success() {
        return Vec::new();
    }
    out.stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
