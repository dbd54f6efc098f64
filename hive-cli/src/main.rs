//! Hive CLI - play Hive in the terminal
//!
//! Two players take turns typing plays such as `wS1` (opening placement) or
//! `bA1*|wS1` (black ant to the east of wS1). See `notation` for the
//! contact tokens and `:` commands.
//!
//! Logging goes to stderr; set `RUST_LOG=hive_core=debug` to see why a play
//! was rejected.

mod notation;
mod shell;
mod view;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hive")]
#[command(about = "Hive board game for two players on one terminal")]
struct Cli {
    #[command(flatten)]
    shell: shell::ShellArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    shell::run(cli.shell)
}
