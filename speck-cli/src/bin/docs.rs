#![allow(clippy::all)]
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
    clap_markdown::print_help_markdown::<Cli>();
}
