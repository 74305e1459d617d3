//! Zip configured directories into distributable bundles.

use crate::config::Bundle;
use crate::error::{GuardrailsError, Result};
use serde::Serialize;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const SKIP_DIR: &str = "__pycache__";
const SKIP_EXT: &str = "pyc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltBundle {
    pub name: String,
    pub archive: PathBuf,
    pub files: usize,
}

fn is_skipped(rel: &Path) -> bool {
    rel.extension().is_some_and(|e| e == SKIP_EXT)
        || rel
            .components()
            .any(|c| matches!(c, Component::Normal(n) if n == SKIP_DIR))
}

/// Every regular file under `dir`, as paths relative to `base`.
fn collect_files(dir: &Path, base: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, base, out)?;
        } else if path.is_file() {
            if let Ok(rel) = path.strip_prefix(base) {
                out.push(rel.to_path_buf());
            }
        }
    }
    Ok(())
}

fn posix_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Zip every file under `src` into `zip_path`, naming entries `prefix + rel`.
///
/// Entries are written in path order. Directories get no entries of their
/// own, and compiled Python artifacts are left out. Returns the number of
/// files written.
pub fn zip_dir(src: &Path, zip_path: &Path, prefix: &str) -> Result<usize> {
    let mut files = Vec::new();
    collect_files(src, src, &mut files)?;
    files.retain(|rel| !is_skipped(rel));
    files.sort();

    let dir = zip_path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut zip = ZipWriter::new(NamedTempFile::new_in(dir)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for rel in &files {
        zip.start_file(format!("{prefix}{}", posix_name(rel)), options)?;
        let mut input = File::open(src.join(rel))?;
        std::io::copy(&mut input, &mut zip)?;
    }
    let tmp = zip.finish()?;
    tmp.persist(zip_path).map_err(|e| e.error)?;

    tracing::debug!(
        src = %src.display(),
        archive = %zip_path.display(),
        files = files.len(),
        "zipped directory"
    );
    Ok(files.len())
}

/// Build every bundle into `out_dir`.
///
/// All sources are checked before anything is written, so a missing source
/// never leaves a partial set of archives behind.
pub fn build_packages(
    skill_root: &Path,
    out_dir: &Path,
    bundles: &[Bundle],
) -> Result<Vec<BuiltBundle>> {
    for bundle in bundles {
        let src = skill_root.join(&bundle.source);
        if !src.is_dir() {
            return Err(GuardrailsError::MissingSource(src));
        }
    }

    bundles
        .iter()
        .map(|bundle| {
            let archive = out_dir.join(&bundle.archive);
            let files = zip_dir(&skill_root.join(&bundle.source), &archive, &bundle.prefix)?;
            tracing::info!(bundle = %bundle.name, files, "built bundle");
            Ok(BuiltBundle {
                name: bundle.name.clone(),
                archive,
                files,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
