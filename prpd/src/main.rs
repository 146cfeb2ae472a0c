mod output;
mod simulate;

use clap::{Parser, Subcommand};
use prpd_config::ChartDefinition;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "prpd", version, about = "Phase-resolved partial discharge density tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream synthetic PD cycles through the density engine
    Simulate {
        #[arg(long, default_value_t = 500)]
        cycles: usize,
        /// Chart definition (.json or .toml); defaults are used when omitted
        #[arg(long)]
        definition: Option<PathBuf>,
        /// Write the resulting render batches as JSON
        #[arg(long)]
        export: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Delay between produced cycles, in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
    },
    /// Write the default chart definition
    Init { path: PathBuf },
    /// Load, validate and print a chart definition
    Show { path: PathBuf },
}

fn load_definition(path: Option<&PathBuf>) -> Result<ChartDefinition, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ChartDefinition::load_from_file(path)?),
        None => Ok(ChartDefinition::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            cycles,
            definition,
            export,
            seed,
            interval_ms,
        } => {
            let definition = match load_definition(definition.as_ref()) {
                Ok(definition) => definition,
                Err(err) => {
                    output::print_error(&format!("Failed to load definition: {err}"));
                    return Ok(());
                }
            };
            let mut outcome = simulate::run_simulation(
                &definition,
                cycles,
                seed,
                Duration::from_millis(interval_ms),
            )?;
            output::print_summary(&mut outcome.engine, &outcome.report, outcome.produced);
            if let Some(path) = export {
                let chart = output::collect_export(&definition.name, &mut outcome.engine);
                output::write_export(&chart, &path)?;
                output::print_info(&format!("Batches written to {}", path.display()));
            }
        }
        Commands::Init { path } => {
            ChartDefinition::default().save_to_file(&path)?;
            output::print_info(&format!("Default definition written to {}", path.display()));
        }
        Commands::Show { path } => match ChartDefinition::load_from_file(&path) {
            Ok(definition) => output::print_definition(&definition),
            Err(err) => output::print_error(&format!("Failed to load definition: {err}")),
        },
    }
    Ok(())
}
