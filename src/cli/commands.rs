// CLI command implementations
use anyhow::Context;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::input::read_comments;
use crate::cli::{Config, Destination, OutputFormatter};
use opustags::{edit_stream, read_tags, EditPlan, Summary};

/// Run the tool as configured
pub fn run(config: &Config) -> anyhow::Result<()> {
    let destination = config.destination()?;

    let replacement = if config.set_all {
        read_comments(io::stdin().lock()).context("failed to read comments from standard input")?
    } else {
        Vec::new()
    };
    let plan = config.edit_plan(replacement);
    plan.validate()?;

    match destination {
        Destination::List => command_list(config),
        Destination::Stdout => {
            let input = open_input(&config.input)?;
            let output = BufWriter::new(io::stdout().lock());
            edit_stream(input, output, &plan)?;
            Ok(())
        }
        Destination::File { path, overwrite } => {
            let summary = write_to(&config.input, &path, overwrite, &plan)?;
            info!(pages = summary.pages, "wrote {}", path.display());
            Ok(())
        }
        Destination::InPlace { temporary, overwrite } => {
            let summary = write_to(&config.input, &temporary, overwrite, &plan)?;
            if let Err(e) = fs::rename(&temporary, &config.input) {
                discard(&temporary);
                return Err(e).with_context(|| {
                    format!("failed to move {} to {}", temporary.display(), config.input)
                });
            }
            info!(pages = summary.pages, "updated {}", config.input);
            Ok(())
        }
    }
}

/// Print the comments of the input
fn command_list(config: &Config) -> anyhow::Result<()> {
    let input = open_input(&config.input)?;
    let tags = read_tags(input).with_context(|| format!("failed to read tags from {}", config.input))?;
    let formatter = OutputFormatter::new(config.format);
    formatter.print_tags(&tags, &mut io::stdout().lock())
}

fn open_input(path: &str) -> anyhow::Result<Box<dyn Read>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Write the edited stream to a new file, removing it if anything fails
fn write_to(input: &str, path: &Path, overwrite: bool, plan: &EditPlan) -> anyhow::Result<Summary> {
    let reader = open_input(input)?;

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let file = options
        .open(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    match edit_stream(reader, BufWriter::new(file), plan) {
        Ok(summary) => Ok(summary),
        Err(e) => {
            discard(path);
            Err(e).with_context(|| format!("failed to edit {}", input))
        }
    }
}

/// Best-effort removal of a partial output
fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove {}: {}", path.display(), e);
    }
}
