use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "assetsplit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Separate inline CSS/JS from static HTML game pages")]
#[command(
    long_about = "AssetSplit moves the inline <style> and <script> blocks of every game's \
                  index.html into css/style.css and js/game.js, links them back into the page \
                  and keeps the original as index.html.backup."
)]
#[command(after_help = "EXAMPLES:\n  \
    assetsplit separate ./games\n  \
    assetsplit separate ./games --dry-run --units snake-game,pacman\n  \
    assetsplit validate ./games --output-format json\n  \
    assetsplit cleanup ./games\n  \
    assetsplit generate-config assetsplit.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Games to process (comma-separated directory names)
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub units: Option<Vec<String>>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract inline CSS/JS into external files
    Separate(SeparateArgs),
    /// Check that every game was separated correctly
    Validate(GamesDirArgs),
    /// Delete the recovery copies (asks for confirmation)
    Cleanup(GamesDirArgs),
    /// Write a sample configuration file
    GenerateConfig {
        /// Destination file
        #[arg(default_value = "assetsplit.toml")]
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct GamesDirArgs {
    /// Directory containing one sub-directory per game
    pub games_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct SeparateArgs {
    /// Directory containing one sub-directory per game
    pub games_dir: PathBuf,

    /// Show what would be separated without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new().with_units(self.units.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default `tracing` filter directive for the chosen verbosity.
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity_level() {
            0 if self.quiet => "assetsplit=error",
            0 => "assetsplit=warn",
            1 => "assetsplit=info",
            _ => "assetsplit=debug",
        }
    }
}
