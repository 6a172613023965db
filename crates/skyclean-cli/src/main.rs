//! skyclean CLI - airline loyalty data cleaning.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command.unwrap_or_else(|| Commands::Clean(Default::default())) {
        Commands::Clean(args) => commands::clean::run(args, cli.verbose),
        Commands::Plan(sources) => commands::plan::run(sources, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
