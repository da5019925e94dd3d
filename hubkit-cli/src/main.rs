//! Hubkit CLI - Command line interface for the hubkit GitHub client

mod commands;

use std::time::Duration;

use clap::{Parser, Subcommand};
use hubkit_core::{Config, Secrets};
use hubkit_github::GitHubClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{AuthArgs, FollowsArgs, MemberArgs, RunsArgs, SearchArgs, StarredArgs};

/// hubkit: a typed client for the GitHub REST API
#[derive(Parser, Debug)]
#[command(name = "hubkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API root URL (overrides config and env)
    #[arg(long, global = true, env = "HUBKIT_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout, e.g. "10s" (overrides config and env)
    #[arg(long, global = true, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Show current configuration
    Config,

    /// Create a secrets template to fill in
    Init,

    /// GitHub Actions workflow runs
    Runs(RunsArgs),

    /// Search users and repositories
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// Followers and followed users
    Follows(FollowsArgs),

    /// Organization membership
    Member(MemberArgs),

    /// Starred repositories
    Starred(StarredArgs),

    /// OAuth authorizations
    Auth(AuthArgs),
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    hubkit_core::config::parse_timeout(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.base_url.clone(), cli.timeout)?;

    if cli.verbose {
        tracing::info!(
            base_url = %config.api.base_url,
            user_agent = %config.api.user_agent,
            timeout = ?config.api.timeout,
            "Configuration loaded"
        );
    }

    let command = match cli.command {
        Some(Commands::Version) => {
            println!("hubkit {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(Commands::Config) => {
            print_config(&config);
            return Ok(());
        }
        Some(Commands::Init) => {
            let path = Secrets::create_template()?;
            println!("Created {}", path.display());
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("hubkit - a typed client for the GitHub REST API");
            println!();
            println!("Use --help for usage information");
            return Ok(());
        }
    };

    let credentials = Secrets::load()?.credentials();
    let client = GitHubClient::new(&config, credentials)?;

    match command {
        Commands::Runs(args) => args.execute(&client, cli.verbose).await?,
        Commands::Search(args) => args.execute(&client, cli.verbose).await?,
        Commands::Follows(args) => args.execute(&client).await?,
        Commands::Member(args) => args.execute(&client).await?,
        Commands::Starred(args) => args.execute(&client).await?,
        Commands::Auth(args) => args.execute(&client).await?,
        Commands::Version | Commands::Config | Commands::Init => {}
    }

    Ok(())
}

fn print_config(config: &Config) {
    println!("Hubkit Configuration");
    println!("====================");
    println!();
    println!("API Settings:");
    println!("  base_url: {}", config.api.base_url);
    println!("  user_agent: {}", config.api.user_agent);
    println!(
        "  timeout: {}",
        hubkit_core::config::format_timeout(config.api.timeout)
    );
    println!();
    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
    if let Some(path) = Secrets::default_secrets_path() {
        println!("Secrets file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found)");
        }
    }
}
