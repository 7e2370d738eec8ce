use anyhow::Context;
use clap::{Parser, ValueEnum};
use fuzzy_arrival::ops::AndOp;
use fuzzy_arrival::{run_calibration, CalibrationConfig, GeneBinding};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Binding {
    /// Score every candidate against the fixed model
    Detached,
    /// Let the genes place the predicted arrival breakpoints
    Breakpoints,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Conjunction {
    Min,
    Prod,
}

/// Calibrate the fuzzy arrival forecaster with a genetic algorithm.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 10)]
    population: usize,

    #[arg(long, default_value_t = 10)]
    generations: usize,

    #[arg(long, value_enum, default_value = "detached")]
    binding: Binding,

    /// AND operator used when firing rules
    #[arg(long, value_enum, default_value = "min")]
    and_op: Conjunction,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = CalibrationConfig {
        population_size: args.population,
        generations: args.generations,
        binding: match args.binding {
            Binding::Detached => GeneBinding::Detached,
            Binding::Breakpoints => GeneBinding::Breakpoints,
        },
        and_op: match args.and_op {
            Conjunction::Min => AndOp::Min,
            Conjunction::Prod => AndOp::Prod,
        },
        seed: args.seed,
        ..Default::default()
    };

    let report = run_calibration(&config).context("calibration run failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}
