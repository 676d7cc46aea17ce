// simulator/src/main.rs
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uap_simulator::{SimConfig, Simulator};

#[derive(Parser)]
#[command(name = "uap-sim")]
#[command(about = "UAP Token Supply-Flow Scenario Model", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "./uap-sim.toml")]
        output: String,
    },

    /// Generate and integrate the supply scenario
    Scenario {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<String>,

        /// Override the number of sample points
        #[arg(short, long)]
        points: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the static token allocation table
    Allocation {
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Show the breeding cost schedule
    Breeding {
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Render the supply chart to SVG
    Render {
        #[arg(short, long)]
        config: Option<String>,

        /// Output path
        #[arg(short, long, default_value = "./supply.svg")]
        output: String,

        /// Hover position in [0, 1]
        #[arg(long)]
        hover: Option<f64>,
    },

    /// Replay the scenario step by step
    Play {
        #[arg(short, long)]
        config: Option<String>,

        /// Override the step interval
        #[arg(short, long)]
        interval_ms: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "uap_sim={lvl},uap_simulator={lvl},tokenomics={lvl},charts={lvl}",
                    lvl = log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { output } => {
            init_config(&output)?;
        }
        Commands::Scenario {
            config,
            points,
            format,
        } => {
            let mut config = SimConfig::load(config.as_deref())?;
            if let Some(points) = points {
                config.points = points;
            }
            let sim = Simulator::new(config)?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&sim.report())?);
                }
                OutputFormat::Table => print!("{}", sim.scenario_table()),
            }
        }
        Commands::Allocation { config } => {
            let sim = Simulator::new(SimConfig::load(config.as_deref())?)?;
            print!("{}", sim.allocation_table());
        }
        Commands::Breeding { config } => {
            let sim = Simulator::new(SimConfig::load(config.as_deref())?)?;
            print!("{}", sim.breeding_table());
        }
        Commands::Render {
            config,
            output,
            hover,
        } => {
            let sim = Simulator::new(SimConfig::load(config.as_deref())?)?;
            let document = sim.render_svg(hover).await?;
            std::fs::write(&output, document)?;
            tracing::info!("Chart written to {}", output);
        }
        Commands::Play {
            config,
            interval_ms,
        } => {
            let sim = Simulator::new(SimConfig::load(config.as_deref())?)?;
            sim.play(interval_ms.map(Duration::from_millis)).await?;
        }
    }

    Ok(())
}

fn init_config(output: &str) -> anyhow::Result<()> {
    tracing::info!("Writing default configuration to {}", output);

    if let Some(parent) = std::path::Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    SimConfig::default().to_file(output)?;

    tracing::info!("Edit {} to adjust supply parameters", output);
    Ok(())
}
