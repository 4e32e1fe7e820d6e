use clap::Subcommand;
use porttrace_domain::Config;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a configuration file filled with the defaults
    Init {
        #[arg(default_value = "porttrace.toml")]
        path: String,

        /// Replace the file if it exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Init { path, force } => {
            Config::default().save(&path, force)?;
            println!("Wrote default configuration to {}", path);
        }
    }
    Ok(())
}
