//! snowdag simulator binary.
//!
//! Drives the consensus engine from the command line: generates
//! transactions (with deliberate double-spends), runs voting rounds to
//! quiescence, and audits the single-acceptance safety property.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use snowdag_sim::config::SimConfig;
use snowdag_sim::{dot, driver};

/// snowdag simulator CLI
#[derive(Parser)]
#[command(name = "snowdag-sim")]
#[command(version = "0.1.0")]
#[command(about = "Avalanche-style DAG consensus simulator", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "snowdag.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run(RunArgs),
    /// Write a default configuration file
    Init,
    /// Validate a configuration file
    Validate,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Transactions to generate
    #[arg(long)]
    transactions: Option<usize>,

    /// Probability of reusing an earlier data value
    #[arg(long)]
    double_spend_ratio: Option<f64>,

    /// Number of nodes
    #[arg(long)]
    nodes: Option<usize>,

    /// Peers sampled per query (k)
    #[arg(long)]
    sample_size: Option<usize>,

    /// Quorum threshold as a fraction of the sample
    #[arg(long)]
    alpha: Option<f64>,

    /// Confidence threshold for the uncontested acceptance path
    #[arg(long)]
    beta1: Option<u64>,

    /// Stability threshold for the contested acceptance path
    #[arg(long)]
    beta2: Option<u64>,

    /// Master RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Emit one DOT file per node after the run
    #[arg(long)]
    dump_graphs: bool,

    /// Directory for DOT output
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    match command {
        Commands::Init => {
            let config = SimConfig::default();
            config.save(&cli.config)?;
            info!("configuration written to {:?}", cli.config);
        }
        Commands::Validate => {
            info!("validating configuration at {:?}", cli.config);
            match SimConfig::load(&cli.config) {
                Ok(config) => {
                    if let Err(e) = config.validate() {
                        error!("configuration invalid: {e}");
                        std::process::exit(1);
                    }
                    info!("configuration is valid");
                    info!("nodes: {}", config.nodes);
                    info!("transactions: {}", config.transactions);
                    info!("seed: {}", config.seed);
                }
                Err(e) => {
                    error!("failed to load configuration: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Run(args) => {
            let mut config = if cli.config.exists() {
                SimConfig::load(&cli.config)?
            } else {
                info!("no config file found, using defaults");
                SimConfig::default()
            };
            apply_overrides(&mut config, &args);
            config.validate()?;

            info!(
                nodes = config.nodes,
                transactions = config.transactions,
                double_spend_ratio = config.double_spend_ratio,
                k = config.sample_size,
                alpha = config.alpha,
                beta1 = config.beta1,
                beta2 = config.beta2,
                seed = config.seed,
                "starting simulation"
            );

            let outcome = driver::run_simulation(&config)?;

            if config.dump_graphs {
                let paths = dot::dump_network(&outcome.network, &config.dump_dir)?;
                info!("wrote {} DOT files to {:?}", paths.len(), config.dump_dir);
            }

            let report = &outcome.report;
            info!(
                generated = report.generated,
                double_spends = report.double_spend_data.len(),
                rounds = report.rounds,
                "run complete"
            );
            for (node, accepted) in report.accepted_per_node.iter().enumerate() {
                info!(node, accepted, "node acceptance");
            }
            if !report.is_safe() {
                for (data, ids) in &report.violations {
                    error!(
                        data,
                        accepted = ids.len(),
                        "conflicting transactions accepted"
                    );
                }
                std::process::exit(1);
            }
            info!("safety held: at most one accepted spend per conflict set");
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut SimConfig, args: &RunArgs) {
    if let Some(transactions) = args.transactions {
        config.transactions = transactions;
    }
    if let Some(ratio) = args.double_spend_ratio {
        config.double_spend_ratio = ratio;
    }
    if let Some(nodes) = args.nodes {
        config.nodes = nodes;
    }
    if let Some(sample_size) = args.sample_size {
        config.sample_size = sample_size;
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    if let Some(beta1) = args.beta1 {
        config.beta1 = beta1;
    }
    if let Some(beta2) = args.beta2 {
        config.beta2 = beta2;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.dump_graphs {
        config.dump_graphs = true;
    }
    if let Some(dump_dir) = args.dump_dir.clone() {
        config.dump_dir = dump_dir;
    }
}
