use crate::error::{AssetSplitError, Result};
use crate::scanner::Unit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// Source of the operator's answer before a destructive step.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Prompts on a writer and accepts only `yes` (any case) from a reader.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirm<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Answer from stdin, prompt on stderr.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "{} (type 'yes' to confirm): ", prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;

        Ok(answer.trim().eq_ignore_ascii_case("yes"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub games_dir: PathBuf,
    pub confirmed: bool,
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

impl CleanupReport {
    pub fn cancelled(games_dir: PathBuf) -> Self {
        Self {
            games_dir,
            confirmed: false,
            deleted: Vec::new(),
            failed: Vec::new(),
            finished_at: Utc::now(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

pub struct BackupCleaner {
    backup_name: String,
}

impl BackupCleaner {
    pub fn new<S: Into<String>>(backup_name: S) -> Self {
        Self {
            backup_name: backup_name.into(),
        }
    }

    /// Delete the recovery copy of every unit that has one.
    pub fn remove_recovery_copies(&self, games_dir: PathBuf, units: &[Unit]) -> CleanupReport {
        let mut report = CleanupReport::cancelled(games_dir);
        report.confirmed = true;

        for unit in units.iter().filter(|u| u.recovery_copy.is_file()) {
            let label = format!("{}/{}", unit.name, self.backup_name);

            match self.remove(unit) {
                Ok(()) => {
                    info!(unit = %unit.name, "recovery copy deleted");
                    report.deleted.push(label);
                }
                Err(e) => {
                    warn!(unit = %unit.name, error = %e, "failed to delete recovery copy");
                    report.failed.push(format!("{} - {}", label, e));
                }
            }
        }

        report.finished_at = Utc::now();
        report
    }

    fn remove(&self, unit: &Unit) -> Result<()> {
        fs::remove_file(&unit.recovery_copy).map_err(|source| AssetSplitError::Write {
            path: unit.recovery_copy.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_prompt_accepts_only_yes() {
        let answers = [
            ("yes\n", true),
            ("YES\n", true),
            ("y\n", false),
            ("\n", false),
            ("", false),
        ];
        for (answer, expected) in answers {
            let mut output = Vec::new();
            let mut confirm = PromptConfirm::new(Cursor::new(answer), &mut output);
            assert_eq!(confirm.confirm("Delete?").unwrap(), expected, "answer {:?}", answer);
        }
    }

    #[test]
    fn test_prompt_is_written() {
        let mut output = Vec::new();
        PromptConfirm::new(Cursor::new("no\n"), &mut output)
            .confirm("Delete all backups?")
            .unwrap();

        let prompt = String::from_utf8(output).unwrap();
        assert!(prompt.starts_with("Delete all backups?"));
    }

    #[test]
    fn test_removes_existing_recovery_copies() {
        let temp_dir = TempDir::new().unwrap();
        let layout = LayoutConfig::default();

        let with_backup = temp_dir.path().join("pacman");
        fs::create_dir(&with_backup).unwrap();
        fs::write(with_backup.join("index.html"), "<html></html>").unwrap();
        fs::write(with_backup.join("index.html.backup"), "<html></html>").unwrap();

        let without_backup = temp_dir.path().join("tetris");
        fs::create_dir(&without_backup).unwrap();

        let units = vec![
            Unit::new(with_backup.clone(), &layout),
            Unit::new(without_backup, &layout),
        ];
        let report = BackupCleaner::new(layout.backup_name())
            .remove_recovery_copies(temp_dir.path().to_path_buf(), &units);

        assert!(report.confirmed);
        assert_eq!(report.deleted, vec!["pacman/index.html.backup".to_string()]);
        assert!(!report.has_failures());
        assert!(!with_backup.join("index.html.backup").exists());
        assert!(with_backup.join("index.html").exists());
    }
}
