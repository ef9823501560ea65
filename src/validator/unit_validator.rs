use crate::config::LayoutConfig;
use crate::extractor::fragment::{self, FragmentKind};
use crate::extractor::rewrite;
use crate::scanner::Unit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ok => write!(f, "ok"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub reason: String,
}

impl Finding {
    fn warning<S: Into<String>>(reason: S) -> Self {
        Self {
            severity: Severity::Warning,
            reason: reason.into(),
        }
    }

    fn error<S: Into<String>>(reason: S) -> Self {
        Self {
            severity: Severity::Error,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCheck {
    pub unit: String,
    pub severity: Severity,
    pub findings: Vec<Finding>,
    pub stylesheet_bytes: u64,
    pub script_bytes: u64,
}

impl UnitCheck {
    fn from_findings(
        unit: &str,
        findings: Vec<Finding>,
        stylesheet_bytes: u64,
        script_bytes: u64,
    ) -> Self {
        let severity = findings
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::Ok);

        Self {
            unit: unit.to_string(),
            severity,
            findings,
            stylesheet_bytes,
            script_bytes,
        }
    }

    pub fn reasons(&self) -> String {
        self.findings
            .iter()
            .map(|f| f.reason.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct UnitValidator {
    layout: LayoutConfig,
}

impl UnitValidator {
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    pub fn check(&self, unit: &Unit) -> UnitCheck {
        if !unit.exists() {
            return UnitCheck::from_findings(
                &unit.name,
                vec![Finding::error("directory does not exist")],
                0,
                0,
            );
        }

        if !unit.document.is_file() {
            return UnitCheck::from_findings(
                &unit.name,
                vec![Finding::error(format!("{} missing", self.layout.document))],
                0,
                0,
            );
        }

        let html = match fs::read_to_string(&unit.document) {
            Ok(html) => html,
            Err(e) => {
                return UnitCheck::from_findings(
                    &unit.name,
                    vec![Finding::error(format!("cannot read {}: {}", self.layout.document, e))],
                    0,
                    0,
                )
            }
        };

        let mut findings = Vec::new();

        if !unit.recovery_copy.exists() {
            findings.push(Finding::warning("no recovery copy"));
        }

        if fragment::has_inline(&html, FragmentKind::Style) {
            findings.push(Finding::warning("inline style remains"));
        }

        if fragment::has_inline(&html, FragmentKind::Script) {
            findings.push(Finding::warning("inline script remains"));
        }

        if rewrite::references_stylesheet(&html, &self.layout.stylesheet) {
            if let Some(finding) = check_asset(&unit.stylesheet, &self.layout.stylesheet) {
                findings.push(finding);
            }
        }

        if rewrite::references_script(&html, &self.layout.script) {
            if let Some(finding) = check_asset(&unit.script, &self.layout.script) {
                findings.push(finding);
            }
        }

        let check = UnitCheck::from_findings(
            &unit.name,
            findings,
            file_size(&unit.stylesheet),
            file_size(&unit.script),
        );
        debug!(unit = %check.unit, severity = %check.severity, "unit checked");
        check
    }
}

fn check_asset(path: &Path, relative: &str) -> Option<Finding> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.len() == 0 => {
            Some(Finding::error(format!("referenced {} is empty", relative)))
        }
        Ok(_) => None,
        Err(_) => Some(Finding::error(format!(
            "referenced {} does not exist",
            relative
        ))),
    }
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub games_dir: PathBuf,
    pub units: Vec<UnitCheck>,
    pub ok: usize,
    pub warnings: usize,
    pub errors: usize,
    pub finished_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new(games_dir: PathBuf, units: Vec<UnitCheck>) -> Self {
        let count = |severity| units.iter().filter(|c| c.severity == severity).count();
        let ok = count(Severity::Ok);
        let warnings = count(Severity::Warning);
        let errors = count(Severity::Error);

        Self {
            games_dir,
            units,
            ok,
            warnings,
            errors,
            finished_at: Utc::now(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use crate::extractor::UnitProcessor;
    use tempfile::TempDir;

    const PAGE: &str = "<html><head><style>body{color:red}</style></head><body><script>alert(1)</script></body></html>";

    fn create_unit(root: &Path, name: &str, html: &str) -> Unit {
        let path = root.join(name);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("index.html"), html).unwrap();
        Unit::new(path, &LayoutConfig::default())
    }

    fn validator() -> UnitValidator {
        UnitValidator::new(&LayoutConfig::default())
    }

    #[test]
    fn test_processed_unit_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let unit = create_unit(temp_dir.path(), "snake-game", PAGE);
        UnitProcessor::new(&LayoutConfig::default(), &OutputConfig::default())
            .separate(&unit)
            .unwrap();

        let check = validator().check(&unit);

        assert_eq!(check.severity, Severity::Ok);
        assert!(check.findings.is_empty());
        assert_eq!(check.stylesheet_bytes, 15);
        assert_eq!(check.script_bytes, 8);
    }

    #[test]
    fn test_unprocessed_unit_warns() {
        let temp_dir = TempDir::new().unwrap();
        let unit = create_unit(temp_dir.path(), "pacman", PAGE);

        let check = validator().check(&unit);

        assert_eq!(check.severity, Severity::Warning);
        let reasons = check.reasons();
        assert!(reasons.contains("no recovery copy"));
        assert!(reasons.contains("inline style remains"));
        assert!(reasons.contains("inline script remains"));
    }

    #[test]
    fn test_broken_stylesheet_reference_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let html = "<html><head>    <link rel=\"stylesheet\" href=\"css/style.css\">\n</head><body></body></html>";
        let unit = create_unit(temp_dir.path(), "tetris", html);
        fs::write(&unit.recovery_copy, html).unwrap();

        let check = validator().check(&unit);

        assert_eq!(check.severity, Severity::Error);
        assert!(check.reasons().contains("css/style.css does not exist"));
    }

    #[test]
    fn test_empty_script_asset_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let html = "<html><head></head><body>    <script src=\"js/game.js\"></script>\n</body></html>";
        let unit = create_unit(temp_dir.path(), "breakout", html);
        fs::write(&unit.recovery_copy, html).unwrap();
        fs::create_dir_all(unit.path.join("js")).unwrap();
        fs::write(&unit.script, "").unwrap();

        let check = validator().check(&unit);

        assert_eq!(check.severity, Severity::Error);
        assert!(check.reasons().contains("js/game.js is empty"));
    }

    #[test]
    fn test_external_script_does_not_count_as_inline() {
        let temp_dir = TempDir::new().unwrap();
        let external = "<html><head></head><body><script src=\"cdn/phaser.js\"></script></body></html>";
        let unit = create_unit(temp_dir.path(), "space-invaders", external);
        fs::write(&unit.recovery_copy, external).unwrap();

        let check = validator().check(&unit);
        assert_eq!(check.severity, Severity::Ok);
        assert!(check.findings.is_empty());

        let mixed = "<html><head></head><body><script src=\"cdn/phaser.js\"></script>\
                     <script>boot()</script></body></html>";
        fs::write(&unit.document, mixed).unwrap();

        let check = validator().check(&unit);
        assert_eq!(check.severity, Severity::Warning);
        assert_eq!(check.findings.len(), 1);
        assert_eq!(check.findings[0].reason, "inline script remains");
    }

    #[test]
    fn test_missing_document_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("empty")).unwrap();
        let empty = Unit::new(temp_dir.path().join("empty"), &LayoutConfig::default());
        let ghost = Unit::new(temp_dir.path().join("ghost"), &LayoutConfig::default());

        let empty_check = validator().check(&empty);
        assert_eq!(empty_check.severity, Severity::Error);
        assert!(empty_check.reasons().contains("missing"));

        assert_eq!(validator().check(&ghost).severity, Severity::Error);
    }

    #[test]
    fn test_report_counts() {
        let checks = vec![
            UnitCheck::from_findings("a", vec![], 1, 1),
            UnitCheck::from_findings("b", vec![Finding::warning("no recovery copy")], 0, 0),
            UnitCheck::from_findings(
                "c",
                vec![Finding::warning("inline style remains"), Finding::error("missing")],
                0,
                0,
            ),
        ];

        let report = ValidationReport::new(PathBuf::from("games"), checks);

        assert_eq!(report.ok, 1);
        assert_eq!(report.warnings, 1);
        assert_eq!(report.errors, 1);
        assert!(report.has_errors());
        assert_eq!(report.units[2].severity, Severity::Error);
    }
}
