use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "queryeval-cmd")]
#[command(about = "Command-line utility for evaluating and inspecting boolean query trees")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a query over random bit vectors, with and without fusion
    Eval {
        #[command(flatten)]
        query: commands::QueryArgs,

        /// Skip the optimizer and evaluate the tree as built
        #[arg(long)]
        no_optimize: bool,

        /// Number of evaluation rounds
        #[arg(long, default_value_t = 1)]
        iterations: u32,
    },

    /// Print the query tree before and after optimization
    Explain {
        #[command(flatten)]
        query: commands::QueryArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", level)).init();

    match cli.command {
        Commands::Eval {
            query,
            no_optimize,
            iterations,
        } => commands::eval::run(&query, no_optimize, iterations),
        Commands::Explain { query } => commands::explain::run(&query),
    }
}
