use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ListArgs;

mod commands;
mod utils;

#[derive(Parser)]
#[command(name = "iterlist-cmd")]
#[command(about = "Command-line utility for building and querying iteration lists")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a list and display its runs and elements
    Show {
        #[command(flatten)]
        args: ListArgs,

        /// Maximum number of elements to print
        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// List expressions, applied in order (e.g. "(1-5, 9+2-15)" "(ADD 40)")
        lists: Vec<String>,
    },

    /// Report whether values are members of a list
    Test {
        #[command(flatten)]
        args: ListArgs,

        /// List expression
        list: String,

        /// Values to test
        #[arg(required = true)]
        values: Vec<u64>,
    },

    /// Count the elements of a list below a value
    Count {
        #[command(flatten)]
        args: ListArgs,

        /// List expression
        list: String,

        value: u64,
    },

    /// Print the packed run words of a list
    Pack {
        #[command(flatten)]
        args: ListArgs,

        /// List expression
        list: String,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Show { args, limit, lists } => {
            commands::show::run(&args, &lists, limit, cli.json)
        }
        Commands::Test { args, list, values } => {
            commands::test::run(&args, &list, &values, cli.json)
        }
        Commands::Count { args, list, value } => {
            commands::count::run(&args, &list, value, cli.json)
        }
        Commands::Pack { args, list } => commands::pack::run(&args, &list, cli.json),
    }
}
