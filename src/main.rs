use accessiscan::cli::{self, AppContext};
use accessiscan::config;
use accessiscan::errors::AccessiscanError;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let result = run(cli).await;

    if let Err(e) = result {
        let classification = e.classify();
        error!(error_type = classification.error_type, "Command failed");
        if !matches!(e, AccessiscanError::Reported { .. }) {
            eprintln!("Error: {}", e);
        }
        std::process::exit(classification.exit_code);
    }
}

async fn run(cli: cli::Cli) -> Result<(), AccessiscanError> {
    if let cli::Commands::Validate(args) = &cli.command {
        return handle_validate(args).await;
    }

    let ctx = AppContext::from_cli(&cli).await?;
    match cli.command {
        cli::Commands::Health(args) => cli::health::handle_health(args, &ctx).await,
        cli::Commands::Scan(args) => cli::scan::handle_scan(args, &ctx).await,
        cli::Commands::Jobs(args) => cli::jobs::handle_jobs(args, &ctx).await,
        cli::Commands::Emails(args) => cli::emails::handle_emails(args, &ctx).await,
        cli::Commands::Doctor(args) => cli::doctor::handle_doctor(args, &ctx).await,
        cli::Commands::Validate(_) => Ok(()),
    }
}

async fn handle_validate(args: &cli::commands::ValidateArgs) -> Result<(), AccessiscanError> {
    let path = std::path::PathBuf::from(&args.config);
    let _config = config::parse_config(&path).await?;
    println!("Configuration is valid: {}", args.config);
    Ok(())
}
