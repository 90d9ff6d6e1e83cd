//! Family tree command line tool
//!
//! Reads a genealogy (indented text or CSV) and writes a Graphviz DOT file:
//! - descending tree from an ancestor (`-a`)
//! - ascending tree from one or more descendants (`-d`)
//! - both at once when both are given
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for terminals (default: pretty)
//! - `FAMILY_TREE_STYLE`: Path of a JSON render style (same as `--style`)
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin family_tree --features cli -- -a 'Louis XIV' LouisXIVfamily.txt
//! dot -Tpng LouisXIVfamily_a.dot -o LouisXIVfamily.png
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use family_tree_kernel::{
    load_path, output_tree, Family, FamilyError, LayoutError, LoadError, RenderStyle, StyleError,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no ancestor given and every person has recorded parents")]
    NoAncestor,
    #[error("cannot load render style: {0}")]
    Style(#[from] StyleError),
    #[error("cannot fingerprint render style: {0}")]
    Fingerprint(#[from] serde_json::Error),
    #[error("cannot load genealogy: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    Family(#[from] FamilyError),
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "family_tree",
    version,
    about = "Generates a family tree graph from a genealogy file"
)]
struct Cli {
    /// Build the tree down from this ancestor (name or id). Without `-a` and
    /// `-d`, the first person without parents is used.
    #[arg(short = 'a', long)]
    ancestor: Option<String>,

    /// Build the tree up from this descendant id. Repeatable; a value may
    /// also hold several ids separated by spaces.
    #[arg(short = 'd', long = "descendant")]
    descendants: Vec<String>,

    /// Output file (default: INPUT without extension, plus `_a.dot`,
    /// `_d.dot` or `_ad.dot`).
    #[arg(short = 'o', long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the DOT document instead of writing a file.
    #[arg(long)]
    stdout: bool,

    /// JSON render style.
    #[arg(long, env = "FAMILY_TREE_STYLE")]
    style: Option<PathBuf>,

    /// Genealogy file; `.csv` is read as a table, anything else as indented text.
    input: PathBuf,
}

/// Initialize the tracing subscriber with JSON or pretty format.
///
/// Logs go to stderr so that `--stdout` output stays a clean DOT document.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "family_tree=info,family_tree_kernel=info".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// `a` for a descending tree, `d` for an ascending one, `ad` for both.
fn tree_marker(has_ancestor: bool, has_descendants: bool) -> &'static str {
    match (has_ancestor, has_descendants) {
        (_, false) => "a",
        (false, true) => "d",
        (true, true) => "ad",
    }
}

/// `family.txt` becomes `family_<marker>.dot`, next to the input.
fn default_output_path(input: &Path, marker: &str) -> PathBuf {
    let mut path = input.with_extension("").into_os_string();
    path.push(format!("_{marker}.dot"));
    PathBuf::from(path)
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let style = match &cli.style {
        Some(path) => RenderStyle::from_path(path)?,
        None => RenderStyle::default(),
    };
    info!(
        version = %style.version,
        params_hash = %style.params_hash()?,
        "Render style ready"
    );

    let mut family = Family::new();
    load_path(&mut family, &cli.input)?;
    info!(
        input = %cli.input.display(),
        persons = family.num_persons(),
        households = family.num_households(),
        "Genealogy loaded"
    );

    let descendant_ids: Vec<&str> = cli
        .descendants
        .iter()
        .flat_map(|d| d.split_whitespace())
        .collect();

    let ancestor = match &cli.ancestor {
        Some(name) => Some(family.find_person(name)?),
        None if descendant_ids.is_empty() => {
            let key = family.find_first_ancestor().ok_or(CliError::NoAncestor)?;
            warn!(
                ancestor = %family.person(key).id,
                "No ancestor given, using the first person without parents"
            );
            Some(key)
        }
        None => None,
    };
    let descendants = descendant_ids
        .iter()
        .map(|id| family.find_person(id))
        .collect::<Result<Vec<_>, _>>()?;

    let document = output_tree(&family, ancestor, &descendants, &style)?;
    let marker = tree_marker(cli.ancestor.is_some(), !descendants.is_empty());

    if cli.stdout {
        std::io::stdout()
            .lock()
            .write_all(document.to_string().as_bytes())?;
    } else {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&cli.input, marker));
        std::fs::write(&path, document.to_string())?;
        info!(
            output = %path.display(),
            tree = marker,
            drawn = document.drawn().len(),
            "DOT file written"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "family_tree failed");
            ExitCode::FAILURE
        }
    }
}
