// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use speck_cli::extract;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Extract(extract::ExtractArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Extract(extract_args)) => extract::extract(extract_args),
        None => {}
    }
}
