//! ringsolve command-line interface.
//!
//! Run jobs from TOML files:
//! ```sh
//! ringsolve sweep ring.toml
//! ringsolve response ric.toml -o results/
//! ringsolve validate job.toml
//! ringsolve topologies
//! ```

mod config;
mod runner;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ringsolve_symbolic::{catalog, ParameterKind, Topology};

#[derive(Parser)]
#[command(name = "ringsolve")]
#[command(about = "Frequency-domain and symbolic solver for ring-resonator photonic circuits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the fields of a device circuit over a frequency sweep.
    Sweep {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Evaluate the symbolic transfer functions of a topology.
    Response {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without solving.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// List the symbolic topologies and their parameters.
    Topologies,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Sweep { config, output } => {
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());
            let result = runner::run_sweep(&job)?;
            if !result.failed_samples.is_empty() {
                eprintln!(
                    "Warning: {} samples failed to solve (written as NaN)",
                    result.failed_samples.len()
                );
            }

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            if job.output.save_csv {
                runner::write_csv(&result.columns, &out_dir.join("sweep.csv"), &result.circuit)?;
            }
            if job.output.save_json {
                runner::write_json(&result, &out_dir.join("sweep.json"))?;
            }
            println!("Sweep complete.");
            Ok(())
        }
        Commands::Response { config, output } => {
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());
            let result = runner::run_response(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            if job.output.save_csv {
                runner::write_csv(
                    &result.columns,
                    &out_dir.join("response.csv"),
                    &result.topology,
                )?;
            }
            if job.output.save_json {
                runner::write_json(&result, &out_dir.join("response.json"))?;
            }
            println!("Response complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            runner::validate_job(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Topologies => {
            println!("Available topologies:");
            for topology in catalog() {
                println!();
                println!("  {} ({} pins)", topology.name(), topology.num_pins());
                for symbol in topology.parameter_symbols() {
                    let kind = match symbol.kind {
                        ParameterKind::Length => "integer path length",
                        ParameterKind::Coefficient => "coefficient",
                    };
                    println!("    {:<26} {kind}", symbol.name);
                }
                println!("    main cavity: {}", topology.main_cavity_lengths().join(" + "));
            }
            Ok(())
        }
    }
}
