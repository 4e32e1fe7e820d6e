use super::{or_dash, print_json};
use crate::di::UseCases;
use clap::{Args, Subcommand};
use porttrace_domain::switch::{DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_PRIORITY, DEFAULT_SSH_PORT};
use porttrace_domain::{
    DiscoveryCredential, NewSwitch, Switch, SwitchCredential, SwitchRole, Vendor,
};
use std::net::IpAddr;
use std::time::Duration;

#[derive(Subcommand)]
pub enum SwitchCommand {
    /// Register a switch
    Add(AddSwitchArgs),
    /// List all switches
    List {
        #[arg(long)]
        json: bool,
    },
    /// Remove a switch (its history rows are kept)
    Remove { id: i64 },
    /// Include a switch in lookups
    Enable { id: i64 },
    /// Exclude a switch from lookups
    Disable { id: i64 },
    /// Log in and run the vendor's test command
    Test {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Sweep an address range for switches and optionally register them
    Discover(DiscoverArgs),
}

#[derive(Args)]
pub struct DiscoverArgs {
    /// CIDR block, dash range or single address (10.0.0.0/24, 10.0.0.1-50)
    pub range: String,

    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub password: String,

    #[arg(long)]
    pub enable_password: Option<String>,

    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    pub ssh_port: u16,

    /// Per-address login timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Addresses swept at once
    #[arg(long, default_value_t = 20)]
    pub concurrency: usize,

    /// Register every discovered switch not already in the inventory
    #[arg(long)]
    pub add: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct AddSwitchArgs {
    pub name: String,
    pub ip: IpAddr,

    /// cisco, dell or alcatel
    #[arg(long)]
    pub vendor: Vendor,

    /// core, aggregation or access
    #[arg(long, default_value = "access")]
    pub role: SwitchRole,

    /// 1 (searched first) to 100
    #[arg(long, default_value_t = DEFAULT_PRIORITY)]
    pub priority: i32,

    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    pub ssh_port: u16,

    #[arg(short, long)]
    pub username: String,

    #[arg(short, long)]
    pub password: String,

    #[arg(long)]
    pub enable_password: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Connection timeout in seconds
    #[arg(long, default_value_t = DEFAULT_CONNECTION_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Register the switch without including it in lookups
    #[arg(long)]
    pub disabled: bool,
}

pub async fn run(use_cases: &UseCases, command: SwitchCommand) -> anyhow::Result<()> {
    match command {
        SwitchCommand::Add(args) => {
            let mut switch = NewSwitch::new(args.name, args.ip, args.vendor);
            switch.role = args.role;
            switch.priority = args.priority;
            switch.ssh_port = args.ssh_port;
            switch.username = args.username;
            switch.model = args.model;
            switch.connection_timeout = args.timeout;
            switch.enabled = !args.disabled;

            let mut credential = SwitchCredential::new(args.password);
            if let Some(enable) = args.enable_password {
                credential = credential.with_enable_password(enable);
            }

            let created = use_cases.create_switch.execute(switch, credential).await?;
            println!("Added switch {} ({}) with id {}", created.name, created.ip_address, created.id);
        }
        SwitchCommand::List { json } => {
            let switches = use_cases.get_switches.get_all().await?;
            if json {
                return print_json(&switches);
            }
            print_switches(&switches);
        }
        SwitchCommand::Remove { id } => {
            use_cases.delete_switch.execute(id).await?;
            println!("Removed switch {}", id);
        }
        SwitchCommand::Enable { id } => {
            let switch = use_cases.set_switch_enabled.execute(id, true).await?;
            println!("Enabled switch {} ({})", switch.name, switch.id);
        }
        SwitchCommand::Disable { id } => {
            let switch = use_cases.set_switch_enabled.execute(id, false).await?;
            println!("Disabled switch {} ({})", switch.name, switch.id);
        }
        SwitchCommand::Test { id, json } => {
            let report = use_cases.test_connection.execute(id).await?;
            if json {
                return print_json(&report);
            }
            let verdict = if report.success { "OK" } else { "FAILED" };
            println!("{}: {} ({} ms)", verdict, report.message, report.elapsed_ms);
        }
        SwitchCommand::Discover(args) => return discover(use_cases, args).await,
    }
    Ok(())
}

async fn discover(use_cases: &UseCases, args: DiscoverArgs) -> anyhow::Result<()> {
    let credential = DiscoveryCredential {
        username: args.username,
        password: args.password,
        enable_password: args.enable_password,
        ssh_port: args.ssh_port,
    };
    let report = use_cases
        .discover_switches
        .as_ref()
        .clone()
        .with_connect_timeout(Duration::from_secs(args.timeout.max(1)))
        .with_concurrency(args.concurrency)
        .execute(&args.range, &[credential], args.add)
        .await?;

    if args.json {
        return print_json(&report);
    }

    println!(
        "Scanned {} addresses, found {} switches",
        report.total_scanned,
        report.discovered.len()
    );
    if !report.discovered.is_empty() {
        println!(
            "{:<16} {:<20} {:<8} {:<12} {:>4}  {}",
            "IP", "NAME", "VENDOR", "ROLE", "PRIO", "MODEL"
        );
        for s in &report.discovered {
            println!(
                "{:<16} {:<20} {:<8} {:<12} {:>4}  {}",
                s.ip_address,
                s.name,
                s.vendor,
                s.role,
                s.priority,
                or_dash(s.model.as_deref()),
            );
        }
    }
    if args.add {
        println!(
            "Added {}, skipped {} already registered",
            report.added.len(),
            report.already_known.len()
        );
    }
    Ok(())
}

fn print_switches(switches: &[Switch]) {
    if switches.is_empty() {
        println!("No switches configured");
        return;
    }
    println!(
        "{:>4}  {:<20} {:<16} {:<8} {:<12} {:>4}  {:<8} {:<10}",
        "ID", "NAME", "IP", "VENDOR", "ROLE", "PRIO", "ENABLED", "REACHABLE"
    );
    for s in switches {
        println!(
            "{:>4}  {:<20} {:<16} {:<8} {:<12} {:>4}  {:<8} {:<10}",
            s.id,
            s.name,
            s.ip_address,
            s.vendor,
            s.role,
            s.priority,
            if s.enabled { "yes" } else { "no" },
            or_dash(s.is_reachable.map(|r| if r { "yes" } else { "no" })),
        );
    }
}
