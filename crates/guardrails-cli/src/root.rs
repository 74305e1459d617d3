use guardrails_core::git;
use std::path::{Path, PathBuf};

/// Resolve the repository root.
///
/// Starts from `--root` / `GUARDRAILS_ROOT` when given, else from `cwd`, then:
/// 1. `git rev-parse --show-toplevel`
/// 2. Walk upward looking for `.git`
/// 3. Fall back to the starting directory
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let start = match explicit {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    git::find_repo_root(&start)
}
