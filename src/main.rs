use assetsplit::{
    AssetSplit, AssetSplitError, Cli, Command, OutputFormatter, PromptConfirm, UserFriendlyError,
};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(&cli);

    if let Command::GenerateConfig { ref path } = cli.command {
        return handle_generate_config(path);
    }

    let assetsplit = match AssetSplit::from_cli(&cli) {
        Ok(assetsplit) => assetsplit,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    let result = match cli.command {
        Command::Separate(ref args) => assetsplit
            .separate(&args.games_dir, args.dry_run)
            .map(|report| {
                assetsplit.output_formatter().print_separation_report(&report);
                if report.has_failures() {
                    2 // Finished, some games failed
                } else {
                    0
                }
            }),
        Command::Validate(ref args) => assetsplit.validate(&args.games_dir).map(|report| {
            assetsplit.output_formatter().print_validation_report(&report);
            if report.has_errors() {
                1
            } else {
                0
            }
        }),
        Command::Cleanup(ref args) => {
            let mut confirm = PromptConfirm::stdio();
            assetsplit.cleanup(&args.games_dir, &mut confirm).map(|report| {
                assetsplit.output_formatter().print_cleanup_report(&report);
                if report.has_failures() {
                    2
                } else {
                    0
                }
            })
        }
        Command::GenerateConfig { .. } => Ok(0),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            assetsplit.handle_error(&e);

            match e {
                AssetSplitError::Cancelled => 130, // Interrupted (SIGINT)
                _ => 1,
            }
        }
    }
}

fn handle_generate_config(path: &std::path::Path) -> i32 {
    match AssetSplit::generate_sample_config(path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", path.display());
            println!("\nTo use this configuration:");
            println!("  assetsplit --config {} separate <games-dir>", path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(cli: &Cli, error: &AssetSplitError) {
    let formatter = OutputFormatter::new(cli.output_format.into(), cli.verbose, cli.quiet);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
