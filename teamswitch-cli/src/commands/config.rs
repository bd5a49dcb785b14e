use crate::config::ConfigLoader;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use teamswitch_core::TeamSwitchConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (merged)
    Show {
        /// Config file layered over user and project config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a single configuration file
    Check {
        /// File to validate
        file: PathBuf,
    },
    /// Show configuration file paths
    Path,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show { config } => show_config(config),
        ConfigCommands::Check { file } => check_config(file),
        ConfigCommands::Path => show_paths(),
    }
}

fn show_config(explicit: Option<PathBuf>) -> Result<()> {
    let config = ConfigLoader::load(explicit.as_deref())?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{}", toml_str);
    Ok(())
}

fn check_config(file: PathBuf) -> Result<()> {
    TeamSwitchConfig::load(&file).with_context(|| format!("{} is invalid", file.display()))?;
    println!("{} is valid", file.display());
    Ok(())
}

fn show_paths() -> Result<()> {
    println!("User config:    {:?}", ConfigLoader::user_config_path());
    println!("Project config: {:?}", ConfigLoader::project_config_path());
    Ok(())
}
