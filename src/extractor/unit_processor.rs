use crate::config::{LayoutConfig, OutputConfig};
use crate::error::{AssetSplitError, Result, UserFriendlyError};
use crate::extractor::fragment::FRAGMENT_SEPARATOR;
use crate::extractor::rewrite::{self, Rewrite};
use crate::scanner::Unit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// What happened to one unit during separation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    Separated {
        stylesheet_bytes: Option<u64>,
        script_bytes: Option<u64>,
        recovery_copy_created: bool,
    },
    Planned {
        stylesheet_bytes: Option<u64>,
        script_bytes: Option<u64>,
    },
    AlreadyExternal,
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

impl UnitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            UnitOutcome::Separated { .. }
                | UnitOutcome::Planned { .. }
                | UnitOutcome::AlreadyExternal
        )
    }
}

#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub units_processed: usize,
    pub total_units: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub current_unit: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl BatchProgress {
    pub fn new(total_units: usize) -> Self {
        Self {
            units_processed: 0,
            total_units,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            current_unit: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, unit: &str, outcome: &UnitOutcome) {
        self.units_processed += 1;
        self.current_unit = Some(unit.to_string());

        match outcome {
            UnitOutcome::Skipped { .. } => self.skipped += 1,
            UnitOutcome::Failed { error } => {
                self.failed += 1;
                self.errors.push(format!("{}: {}", unit, error));
            }
            _ => self.succeeded += 1,
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total_units == 0 {
            0.0
        } else {
            (self.units_processed as f64 / self.total_units as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Applies a [`Rewrite`] to disk in crash-safe order.
pub struct UnitProcessor {
    layout: LayoutConfig,
    preserve_backup_mtime: bool,
    dry_run: bool,
}

impl UnitProcessor {
    pub fn new(layout: &LayoutConfig, output: &OutputConfig) -> Self {
        Self {
            layout: layout.clone(),
            preserve_backup_mtime: output.preserve_backup_mtime,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process one unit, mapping per-unit errors into the outcome.
    pub fn process_unit(&self, unit: &Unit) -> UnitOutcome {
        if !unit.exists() {
            return UnitOutcome::Skipped {
                reason: "directory does not exist".to_string(),
            };
        }

        match self.separate(unit) {
            Ok(outcome) => outcome,
            Err(AssetSplitError::MissingDocument { .. }) => UnitOutcome::Failed {
                error: format!("{} does not exist", self.layout.document),
            },
            Err(e) => UnitOutcome::Failed {
                error: e.user_message(),
            },
        }
    }

    /// Separate inline styles and scripts of one unit.
    ///
    /// Disk effects happen in this order: asset files, recovery copy (only when
    /// none exists yet), document. An interruption at any point leaves the
    /// original text recoverable.
    pub fn separate(&self, unit: &Unit) -> Result<UnitOutcome> {
        if !unit.document.is_file() {
            return Err(AssetSplitError::MissingDocument {
                path: unit.document.display().to_string(),
            });
        }

        let html = fs::read_to_string(&unit.document).map_err(|source| AssetSplitError::Read {
            path: unit.document.display().to_string(),
            source,
        })?;

        let rewrite = match rewrite::plan(&html, &self.layout) {
            Ok(Some(rewrite)) => rewrite,
            Ok(None) => {
                debug!(unit = %unit.name, "no inline style or script, nothing to do");
                return Ok(UnitOutcome::AlreadyExternal);
            }
            Err(rewrite::MissingMarker(marker)) => {
                return Err(AssetSplitError::MissingMarker {
                    path: unit.document.display().to_string(),
                    marker,
                })
            }
        };

        if self.dry_run {
            return Ok(UnitOutcome::Planned {
                stylesheet_bytes: rewrite.stylesheet.as_ref().map(|s| s.len() as u64),
                script_bytes: rewrite.script.as_ref().map(|s| s.len() as u64),
            });
        }

        self.commit(unit, &rewrite)
    }

    fn commit(&self, unit: &Unit, rewrite: &Rewrite) -> Result<UnitOutcome> {
        let stylesheet_bytes = match rewrite.stylesheet {
            Some(ref body) => Some(write_asset(&unit.stylesheet, body, rewrite.stylesheet_linked)?),
            None => None,
        };
        let script_bytes = match rewrite.script {
            Some(ref body) => Some(write_asset(&unit.script, body, rewrite.script_linked)?),
            None => None,
        };

        let recovery_copy_created = if unit.recovery_copy.exists() {
            debug!(unit = %unit.name, "recovery copy already present, keeping it");
            false
        } else {
            write_file(&unit.recovery_copy, &rewrite.original)?;
            if self.preserve_backup_mtime {
                copy_mtime(&unit.document, &unit.recovery_copy);
            }
            true
        };

        write_file(&unit.document, &rewrite.rewritten)?;

        info!(
            unit = %unit.name,
            stylesheet_bytes = ?stylesheet_bytes,
            script_bytes = ?script_bytes,
            recovery_copy_created,
            "document separated"
        );

        Ok(UnitOutcome::Separated {
            stylesheet_bytes,
            script_bytes,
            recovery_copy_created,
        })
    }
}

/// Write an asset body, appending to the existing file when the document was
/// already linked to it.
///
/// An existing file that already ends with `body` is left as it is, so a run
/// interrupted before the document was rewritten can be repeated.
fn write_asset(path: &Path, body: &str, already_linked: bool) -> Result<u64> {
    let existing = if already_linked {
        fs::read_to_string(path).ok()
    } else {
        None
    };

    let content = match existing {
        Some(existing) if existing.trim_end().ends_with(body) => {
            debug!(path = %path.display(), "asset already holds these fragments");
            return Ok(existing.len() as u64);
        }
        Some(existing) if !existing.trim().is_empty() => {
            format!("{}{}{}", existing.trim_end(), FRAGMENT_SEPARATOR, body)
        }
        _ => body.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| AssetSplitError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }

    write_file(path, &content)?;
    debug!(path = %path.display(), bytes = content.len(), "asset written");
    Ok(content.len() as u64)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|source| AssetSplitError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn copy_mtime(source: &Path, dest: &Path) {
    if let Ok(metadata) = fs::metadata(source) {
        let mtime = filetime::FileTime::from_last_modification_time(&metadata);
        let _ = filetime::set_file_mtime(dest, mtime);
    }
}
