//! Reporta CLI
//!
//! Command-line client for area operators and admins.
//!
//! # Usage
//!
//! ```bash
//! reporta login admin --password admin123
//! reporta areas list
//! reporta areas form 1
//! reporta reports list --status pending --search "Torres"
//! reporta reports status 42 in_progress --eta "2 horas"
//! reporta dashboard --format json
//! ```

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "reporta")]
#[command(version)]
#[command(about = "Reporta Command Line Interface", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "REPORTA_API_URL")]
    api_url: Option<String>,

    /// Session token, overrides the one saved by `reporta login`
    #[arg(long, env = "REPORTA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and save the session token to the profile
    Login {
        username: String,
        #[arg(long, env = "REPORTA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the saved session
    Logout,
    /// Browse areas and their forms
    Areas {
        #[command(subcommand)]
        action: AreaCommands,
    },
    /// Triage reports
    Reports {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Show the dashboard for the signed-in role
    Dashboard,
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum AreaCommands {
    /// List all areas
    List,
    /// Show the report form of an area
    Form { id: i64 },
}

#[derive(Subcommand)]
pub(crate) enum ReportCommands {
    /// List reports, newest first
    List {
        #[arg(long)]
        area: Option<i64>,
        #[arg(long)]
        status: Option<String>,
        /// Student name, DNI or code
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Move a report to another status, then list the reports again
    Status {
        id: i64,
        status: String,
        /// Estimated time, e.g. "2 horas"
        #[arg(long)]
        eta: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    let config = match config::Config::load(profile) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {e}; using defaults");
            config::Config::default()
        }
    };
    let api_url = cli.api_url.or_else(|| config.api_url.clone()).unwrap_or_else(|| config::DEFAULT_API_URL.into());
    let token = cli.token.or_else(|| config.token.clone());
    let format = cli.format.or_else(|| config.format()).unwrap_or(output::OutputFormat::Table);

    let client = match commands::ApiClient::new(&api_url, token.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&client, config, profile, &username, &password).await
        }
        Commands::Logout => commands::auth::logout(&client, config, profile).await,
        Commands::Areas { action } => commands::areas::handle(action, &client, format).await,
        Commands::Reports { action } => commands::reports::handle(action, &client, format).await,
        Commands::Dashboard => commands::dashboard::handle(&client, format).await,
        Commands::Config { action } => commands::config::handle(action, config, profile),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
