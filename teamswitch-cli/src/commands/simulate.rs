use crate::config::ConfigLoader;
use crate::scenario::{Scenario, ScenarioReport, ScenarioRunner};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SimulateArgs {
    /// Scenario file (JSON)
    #[arg(short, long)]
    pub scenario: PathBuf,

    /// Config file layered over user and project config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SimulateArgs) -> Result<()> {
    let config = ConfigLoader::load(args.config.as_deref())?;
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?;

    let report = ScenarioRunner::new(config)?.run(scenario).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ScenarioReport) {
    if let Some(name) = &report.name {
        println!("Scenario: {}", name);
    }
    for step in &report.steps {
        println!("  [{:>3}] {}", step.index, step.outcome);
    }

    println!();
    println!(
        "{:<8} {:<8} {:<9} {:<10} {:<15} {:<10} {:<6}",
        "PLAYER", "TEAM", "DEPLOYED", "CONNECTED", "INTERACT POINT", "OPTED OUT", "DIALOG"
    );
    for player in &report.players {
        let point = player
            .interact_point
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<8} {:<9} {:<10} {:<15} {:<10} {:<6}",
            player.player,
            player.team.to_string(),
            player.deployed,
            player.connected,
            point,
            player.opted_out,
            player.dialog_open
        );
    }

    println!();
    println!(
        "{} object(s) alive, {} world call(s)",
        report.objects_alive, report.world_calls
    );
}
