use crate::cleanup::CleanupReport;
use crate::cli::OutputFormat;
use crate::error::{AssetSplitError, UserFriendlyError};
use crate::extractor::{SeparationReport, UnitOutcome};
use crate::ui::progress::format_duration;
use crate::validator::{Severity, UnitCheck, ValidationReport};
use console::{style, Emoji};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");
static SKIP: Emoji = Emoji("⚪ ", "- ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => {
                console::Term::stdout().features().colors_supported() && !quiet
            }
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &AssetSplitError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    /// One line per processed game, printed as the batch runs.
    pub fn print_unit_outcome(&self, unit: &str, outcome: &UnitOutcome) {
        if self.mode == OutputMode::Json {
            return;
        }

        match outcome {
            UnitOutcome::Separated {
                stylesheet_bytes,
                script_bytes,
                recovery_copy_created,
            } => {
                self.success(&format!(
                    "{}: separated ({})",
                    unit,
                    assets_summary(*stylesheet_bytes, *script_bytes)
                ));
                if !recovery_copy_created {
                    self.info(&format!("{}: existing recovery copy kept", unit));
                }
            }
            UnitOutcome::Planned {
                stylesheet_bytes,
                script_bytes,
            } => {
                self.success(&format!(
                    "{}: would separate ({})",
                    unit,
                    assets_summary(*stylesheet_bytes, *script_bytes)
                ));
            }
            UnitOutcome::AlreadyExternal => {
                self.print_skip(&format!("{}: no extraction needed, already external", unit));
            }
            UnitOutcome::Skipped { reason } => {
                self.warning(&format!("{}: {}, skipped", unit, reason));
            }
            UnitOutcome::Failed { error } => {
                self.error(&format!("{}: {}", unit, error));
            }
        }
    }

    pub fn print_unit_check(&self, check: &UnitCheck) {
        if self.mode == OutputMode::Json {
            return;
        }

        match check.severity {
            Severity::Ok => self.success(&format!(
                "{}: CSS({}) JS({})",
                check.unit,
                format_bytes(check.stylesheet_bytes),
                format_bytes(check.script_bytes)
            )),
            Severity::Warning => self.warning(&format!("{}: {}", check.unit, check.reasons())),
            Severity::Error => self.error(&format!("{}: {}", check.unit, check.reasons())),
        }
    }

    pub fn print_separation_report(&self, report: &SeparationReport) {
        match self.mode {
            OutputMode::Json => self.print_json_report(report),
            OutputMode::Plain => {
                println!("REPORT: Separation completed");
                println!("Succeeded: {}", report.summary.succeeded);
                println!("Skipped: {}", report.summary.skipped);
                println!("Failed: {}", report.summary.failed);
                println!("Total: {}", report.summary.total_units);
            }
            OutputMode::Human => {
                if self.quiet {
                    return;
                }
                let title = if report.dry_run {
                    "Separation Plan"
                } else {
                    "Separation Report"
                };
                self.print_header(title);
                println!("  Separated:        {}", self.emphasize(report.summary.separated));
                println!("  Already external: {}", self.emphasize(report.summary.already_external));
                println!("  Skipped:          {}", self.emphasize(report.summary.skipped));
                println!("  Failed:           {}", self.emphasize(report.summary.failed));
                println!("  Total:            {}", self.emphasize(report.summary.total_units));
                println!("  Time taken:       {}", format_duration(report.summary.duration));
                self.print_separator();
            }
        }
    }

    pub fn print_validation_report(&self, report: &ValidationReport) {
        match self.mode {
            OutputMode::Json => self.print_json_report(report),
            OutputMode::Plain => {
                println!("REPORT: Validation completed");
                println!("Ok: {}", report.ok);
                println!("Warnings: {}", report.warnings);
                println!("Errors: {}", report.errors);
                println!("Total: {}", report.units.len());
            }
            OutputMode::Human => {
                if self.quiet {
                    return;
                }
                self.print_header("Validation Report");
                println!("  Ok:       {}", self.emphasize(report.ok));
                println!("  Warnings: {}", self.emphasize(report.warnings));
                println!("  Errors:   {}", self.emphasize(report.errors));
                println!("  Total:    {}", self.emphasize(report.units.len()));
                self.print_separator();

                if report.errors > 0 {
                    self.warning(&format!(
                        "{} games have problems that need attention",
                        report.errors
                    ));
                } else if report.warnings > 0 {
                    self.success(&format!(
                        "Mostly done, {} games have minor issues",
                        report.warnings
                    ));
                } else {
                    self.success("All games are fully separated");
                }
            }
        }
    }

    pub fn print_cleanup_report(&self, report: &CleanupReport) {
        match self.mode {
            OutputMode::Json => self.print_json_report(report),
            OutputMode::Plain => {
                println!("REPORT: Cleanup completed");
                println!("Deleted: {}", report.deleted.len());
                println!("Failed: {}", report.failed.len());
            }
            OutputMode::Human => {
                if !report.confirmed {
                    self.warning("Cleanup cancelled, nothing was deleted");
                    return;
                }
                for label in &report.deleted {
                    self.success(&format!("Deleted {}", label));
                }
                for failure in &report.failed {
                    self.error(&format!("Failed to delete {}", failure));
                }
                self.success(&format!(
                    "Cleanup finished, {} recovery copies deleted",
                    report.deleted.len()
                ));
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => println!("=== {} ===", title),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emphasize(&self, value: usize) -> String {
        if self.use_colors {
            style(value).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }

    fn print_skip(&self, message: &str) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}{}", SKIP, style(message).dim());
                } else {
                    println!("- {}", message);
                }
            }
            OutputMode::Json => self.print_json_message("skip", message),
            OutputMode::Plain => println!("SKIP: {}", message),
        }
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        let emoji = match msg_type {
            MessageType::Success => &CHECKMARK,
            MessageType::Error => &CROSS,
            MessageType::Warning => &WARNING,
            MessageType::Info => &INFO,
        };

        let line = if self.use_colors {
            let styled = match msg_type {
                MessageType::Success => style(message).green(),
                MessageType::Error => style(message).red().bold(),
                MessageType::Warning => style(message).yellow(),
                MessageType::Info => style(message).cyan(),
            };
            format!("{}{}", emoji, styled)
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };
            format!("{} {}", prefix, message)
        };

        match msg_type {
            MessageType::Error => eprintln!("{}", line),
            _ => println!("{}", line),
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_json_report<T: Serialize>(&self, report: &T) {
        let json_output =
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
        println!("{}", json_output);
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn assets_summary(stylesheet_bytes: Option<u64>, script_bytes: Option<u64>) -> String {
    let mut parts = Vec::new();
    if let Some(bytes) = stylesheet_bytes {
        parts.push(format!("CSS {}", format_bytes(bytes)));
    }
    if let Some(bytes) = script_bytes {
        parts.push(format!("JS {}", format_bytes(bytes)));
    }
    parts.join(", ")
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
