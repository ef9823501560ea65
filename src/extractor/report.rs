use crate::extractor::unit_processor::{BatchProgress, UnitOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitEntry {
    pub unit: String,
    #[serde(flatten)]
    pub outcome: UnitOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparationSummary {
    pub total_units: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub separated: usize,
    pub already_external: usize,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparationReport {
    pub games_dir: PathBuf,
    pub dry_run: bool,
    pub units: Vec<UnitEntry>,
    pub summary: SeparationSummary,
    pub finished_at: DateTime<Utc>,
    pub errors: Vec<String>,
}

impl SeparationReport {
    pub fn new(
        games_dir: PathBuf,
        dry_run: bool,
        units: Vec<UnitEntry>,
        progress: &BatchProgress,
    ) -> Self {
        let separated = units
            .iter()
            .filter(|e| {
                matches!(
                    e.outcome,
                    UnitOutcome::Separated { .. } | UnitOutcome::Planned { .. }
                )
            })
            .count();
        let already_external = units
            .iter()
            .filter(|e| e.outcome == UnitOutcome::AlreadyExternal)
            .count();

        let summary = SeparationSummary {
            total_units: units.len(),
            succeeded: progress.succeeded,
            skipped: progress.skipped,
            failed: progress.failed,
            separated,
            already_external,
            duration: progress.elapsed(),
        };

        Self {
            games_dir,
            dry_run,
            units,
            summary,
            finished_at: Utc::now(),
            errors: progress.errors.clone(),
        }
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}
