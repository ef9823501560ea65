pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;
pub mod validator;

// Public API re-exports
pub use cli::{Cli, Command, OutputFormat};
pub use config::{CliOverrides, Config, LayoutConfig, OutputConfig, UnitsConfig};
pub use error::{AssetSplitError, Result, UserFriendlyError};

// Core functionality re-exports
pub use cleanup::{BackupCleaner, CleanupReport, Confirm, PromptConfirm};
pub use extractor::{
    BatchProgress, Fragment, FragmentKind, SeparationReport, UnitEntry, UnitOutcome, UnitProcessor,
};
pub use scanner::{Unit, UnitScanner};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};
pub use validator::{Severity, UnitCheck, UnitValidator, ValidationReport};

use std::path::Path;
use tracing::{info, warn};

/// Main library interface for AssetSplit functionality
pub struct AssetSplit {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl AssetSplit {
    /// Create a new AssetSplit instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, output_mode, verbose, quiet, shutdown))
    }

    /// Create an instance that does not install a Ctrl+C handler
    pub fn detached(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self::with_shutdown(config, output_mode, verbose, quiet, GracefulShutdown::detached())
    }

    fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create AssetSplit instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = OutputMode::from(cli_args.output_format);

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Separate inline CSS/JS of every game under `games_dir`
    pub fn separate(&self, games_dir: &Path, dry_run: bool) -> Result<SeparationReport> {
        let units = self.scan_units(games_dir)?;

        let operation = if dry_run {
            "Planning CSS/JS separation (dry run)"
        } else {
            "Separating inline CSS/JS"
        };
        self.output_formatter.start_operation(operation);
        self.output_formatter.info(&format!(
            "Games directory: {} ({} games)",
            games_dir.display(),
            units.len()
        ));

        let processor = UnitProcessor::new(&self.config.layout, &self.config.output)
            .with_dry_run(dry_run);

        let pb = self.progress_manager.create_unit_progress(units.len() as u64);
        let mut progress = BatchProgress::new(units.len());
        let mut entries = Vec::with_capacity(units.len());

        for unit in &units {
            self.shutdown.check_shutdown()?;

            let outcome = processor.process_unit(unit);
            if let UnitOutcome::Failed { ref error } = outcome {
                warn!(unit = %unit.name, %error, "separation failed");
            }

            progress.record(&unit.name, &outcome);
            ui::progress::update_unit_progress(&pb, &progress);
            self.progress_manager
                .suspend(|| self.output_formatter.print_unit_outcome(&unit.name, &outcome));

            entries.push(UnitEntry {
                unit: unit.name.clone(),
                outcome,
            });
        }

        ui::progress::finish_progress_with_summary(
            &pb,
            &format!("Processed {} games", progress.units_processed),
            progress.elapsed(),
        );

        info!(
            succeeded = progress.succeeded,
            skipped = progress.skipped,
            failed = progress.failed,
            "separation finished"
        );

        Ok(SeparationReport::new(
            games_dir.to_path_buf(),
            dry_run,
            entries,
            &progress,
        ))
    }

    /// Validate every game under `games_dir`
    pub fn validate(&self, games_dir: &Path) -> Result<ValidationReport> {
        let units = self.scan_units(games_dir)?;

        self.output_formatter.start_operation("Validating separated games");

        let validator = UnitValidator::new(&self.config.layout);
        let mut checks = Vec::with_capacity(units.len());

        for unit in &units {
            self.shutdown.check_shutdown()?;

            let check = validator.check(unit);
            self.output_formatter.print_unit_check(&check);
            checks.push(check);
        }

        let report = ValidationReport::new(games_dir.to_path_buf(), checks);
        info!(
            ok = report.ok,
            warnings = report.warnings,
            errors = report.errors,
            "validation finished"
        );

        Ok(report)
    }

    /// Delete every recovery copy under `games_dir` once `confirm` agrees
    pub fn cleanup<C: Confirm>(&self, games_dir: &Path, confirm: &mut C) -> Result<CleanupReport> {
        let units = self.scan_all_units(games_dir)?;

        self.output_formatter.warning(
            "About to delete every recovery copy. They are the only way to restore the original pages.",
        );

        if !confirm.confirm("Continue?")? {
            info!("cleanup cancelled by operator");
            return Ok(CleanupReport::cancelled(games_dir.to_path_buf()));
        }

        let cleaner = BackupCleaner::new(self.config.layout.backup_name());
        Ok(cleaner.remove_recovery_copies(games_dir.to_path_buf(), &units))
    }

    fn scan_units(&self, games_dir: &Path) -> Result<Vec<Unit>> {
        UnitScanner::new(&self.config.layout, &self.config.units).scan(games_dir)
    }

    // Cleanup ignores the configured list: every game directory is visited.
    fn scan_all_units(&self, games_dir: &Path) -> Result<Vec<Unit>> {
        let units = UnitsConfig {
            names: Vec::new(),
            ..self.config.units.clone()
        };
        UnitScanner::new(&self.config.layout, &units).scan(games_dir)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &AssetSplitError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
