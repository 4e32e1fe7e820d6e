use clap::{Parser, Subcommand};
use commands::config::ConfigCommand;
use commands::switch::SwitchCommand;
use porttrace_domain::CliOverrides;
use std::net::IpAddr;

mod bootstrap;
mod commands;
mod di;

#[derive(Parser)]
#[command(name = "porttrace")]
#[command(version)]
#[command(about = "Find the switch port an IP address is plugged into")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Database path
    #[arg(long, global = true)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Locate the switch port for an IP address
    Resolve {
        target: String,
        #[arg(long)]
        json: bool,
    },
    /// Manage the switch inventory
    Switch {
        #[command(subcommand)]
        action: SwitchCommand,
    },
    /// Show recent lookups
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        #[arg(long)]
        ip: Option<IpAddr>,
        #[arg(long)]
        json: bool,
    },
    /// Show cached port locations for a MAC address
    Cache {
        mac: String,
        #[arg(long)]
        json: bool,
    },
    /// Run one reachability check against every enabled switch
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Run the background status and retention jobs until Ctrl-C
    Monitor,
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Writing a config file needs neither a loaded config nor the database.
    let command = match cli.command {
        Command::Config { action } => return commands::config::run(action),
        command => command,
    };

    let cli_overrides = CliOverrides {
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone(),
        log_json: cli.log_json.then_some(true),
    };
    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    let pool = bootstrap::init_database(&config.database).await?;
    let repos = di::Repositories::new(pool, &config)?;
    let use_cases = di::UseCases::new(&repos, &config);

    match command {
        Command::Resolve { target, json } => commands::resolve::run(&use_cases, &target, json).await,
        Command::Switch { action } => commands::switch::run(&use_cases, action).await,
        Command::History { limit, ip, json } => {
            commands::history::run(&use_cases, limit, ip, json).await
        }
        Command::Cache { mac, json } => commands::history::run_cache(&use_cases, &mac, json).await,
        Command::Status { json } => commands::status::run(&use_cases, json).await,
        Command::Monitor => commands::monitor::run(&use_cases, &config).await,
        // Handled before bootstrap.
        Command::Config { .. } => Ok(()),
    }
}
