use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// JournalConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Write a patch snapshot alongside each recorded entry.
    #[serde(default = "default_snapshot_patches")]
    pub snapshot_patches: bool,
    /// Max `git status --porcelain` lines rendered into a handoff.
    #[serde(default = "default_status_limit")]
    pub status_limit: usize,
}

fn default_snapshot_patches() -> bool {
    true
}

fn default_status_limit() -> usize {
    200
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            snapshot_patches: default_snapshot_patches(),
            status_limit: default_status_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// PackageConfig
// ---------------------------------------------------------------------------

/// A directory zipped into one distributable archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub name: String,
    /// Source directory, relative to the skill root.
    pub source: String,
    /// Archive file name inside the output directory.
    pub archive: String,
    /// Prepended to every entry name, e.g. `ai-dev-guardrails/`.
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    #[serde(default = "default_bundles")]
    pub bundles: Vec<Bundle>,
}

fn default_out_dir() -> String {
    paths::DIST_DIR.to_string()
}

fn default_bundles() -> Vec<Bundle> {
    vec![
        Bundle {
            name: "gemini-cli-extension".to_string(),
            source: "exports/gemini-cli/ai-dev-guardrails".to_string(),
            archive: "ai-dev-guardrails.gemini-cli-extension.zip".to_string(),
            prefix: "ai-dev-guardrails/".to_string(),
        },
        Bundle {
            name: "antigravity-pack".to_string(),
            source: "exports/antigravity".to_string(),
            archive: "ai-dev-guardrails.antigravity-pack.zip".to_string(),
            prefix: String::new(),
        },
    ]
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            bundles: default_bundles(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub package: PackageConfig,
}

impl Config {
    /// Load `.guardrails/config.yaml`, or defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.journal.status_limit == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "journal.status_limit is 0; handoffs will list no status lines"
                    .to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (i, bundle) in self.package.bundles.iter().enumerate() {
            if bundle.name.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("package.bundles[{i}] has an empty name"),
                });
            }
            if bundle.archive.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("bundle '{}' has an empty archive name", bundle.name),
                });
                continue;
            }
            if !bundle.archive.ends_with(".zip") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "bundle '{}' archive '{}' does not end in .zip",
                        bundle.name, bundle.archive
                    ),
                });
            }
            if !seen.insert(bundle.archive.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "archive '{}' is produced by more than one bundle",
                        bundle.archive
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
