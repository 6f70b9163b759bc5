//! treetalk CLI: create, check, trace and play dialog graphs headlessly.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "treetalk", version, about = "Branching dialog trees")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample dialog graph and a treetalk.toml next to it
    New {
        /// Output file (e.g. greeting.json)
        path: PathBuf,
    },
    /// Import a dialog file and report dropped edges and invariant violations
    Check {
        /// Dialog file
        file: PathBuf,
    },
    /// Walk a dialog at random and print every node visited
    Trace {
        /// Dialog file
        file: PathBuf,
        /// RNG seed for the first run
        #[arg(long)]
        seed: Option<u64>,
        /// Number of walks (seeds increase by one per run)
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Stop a walk after this many nodes
        #[arg(long, default_value_t = 256)]
        max_steps: usize,
    },
    /// Play a dialog on a simulated clock and print what the player sees
    Play {
        /// Dialog file
        file: PathBuf,
        /// Choice indices to pick at each answer, in order (e.g. 0,1)
        #[arg(long, value_delimiter = ',')]
        choose: Vec<usize>,
        /// RNG seed (overrides treetalk.toml)
        #[arg(long)]
        seed: Option<u64>,
        /// Playback config file (default: nearest treetalk.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::New { path } => commands::new::run(&path),
        Commands::Check { file } => commands::check::run(&file),
        Commands::Trace {
            file,
            seed,
            runs,
            max_steps,
        } => commands::trace::run(&file, seed, runs, max_steps),
        Commands::Play {
            file,
            choose,
            seed,
            config,
            json,
        } => commands::play::run(&file, &choose, seed, config.as_deref(), json),
    }
}
