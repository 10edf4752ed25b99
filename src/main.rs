// CLI binary entry point for opustags
//
// Lists the comments of an Ogg Opus file, or writes a copy with edited comments.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = cli::Config::parse();
    init_logging(config.verbose);

    if let Err(e) = cli::commands::run(&config) {
        eprintln!("opustags: {:#}", e);
        process::exit(1);
    }
}

/// Log to stderr; RUST_LOG overrides the level picked by -v
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,opustags={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
