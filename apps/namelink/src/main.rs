//! namelink - record linkage for person datasets
//!
//! Matches a door-to-door survey against a registry list village by village
//! and ranks candidate pairs by how confidently they describe the same child.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use namelink_core::MatchCategory;
use namelink_io::DEFAULT_EXPORT_FILE;
use tracing_subscriber::prelude::*;

/// Fuzzy record linkage on transliterated names
#[derive(Parser, Debug)]
#[command(name = "namelink", version)]
#[command(about = "Match person records across datasets by village and fuzzy names")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join two datasets on the village key and rank every pair
    Match(MatchArgs),

    /// Print the transliteration-normalized form of each name
    Normalize {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print the phonetic code of each name
    Soundex {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print the fuzzy similarity (0-100) of two strings
    Similarity { a: String, b: String },

    /// Print the default configuration for a category as TOML
    Config {
        #[arg(long, short = 'c', default_value = "d2d-vs-enrolment")]
        category: MatchCategory,
    },
}

#[derive(clap::Args, Debug)]
struct MatchArgs {
    /// First (old) dataset: .csv or .tsv
    left: PathBuf,

    /// Second (new) dataset: .csv or .tsv
    right: PathBuf,

    /// Matching category (d2d-vs-enrolment, d2d-vs-cioosg, d2d-vs-gkp)
    #[arg(long, short = 'c')]
    category: Option<MatchCategory>,

    /// Configuration file (.toml or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the field the datasets are joined on
    #[arg(long)]
    join_field: Option<String>,

    /// Number of top pairs to display
    #[arg(long, short = 'n', default_value_t = 50)]
    top: usize,

    /// File the full ranked results are written to
    #[arg(long, short = 'o', default_value = DEFAULT_EXPORT_FILE)]
    output: PathBuf,

    /// Skip writing the results file
    #[arg(long)]
    no_export: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Match(args) => commands::run_match(&args),
        Command::Normalize { names } => {
            for name in &names {
                println!("{}\t{}", name, namelink_core::normalize(name));
            }
            Ok(())
        }
        Command::Soundex { names } => {
            for name in &names {
                let code = namelink_core::encode(name);
                let code = code.as_ref().map(|c| c.as_str()).unwrap_or("-");
                println!("{}\t{}", name, code);
            }
            Ok(())
        }
        Command::Similarity { a, b } => {
            println!("{}", namelink_core::similarity(&a, &b));
            Ok(())
        }
        Command::Config { category } => {
            print!("{}", namelink_core::MatchConfig::for_category(category).to_toml()?);
            Ok(())
        }
    }
}
