// PartialCTL: Checking CTL Properties on Partially Explored State Spaces
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use partialctl::ts::{self, loader::DEFAULT_LABEL_PREFIX, loader::DEFAULT_SINK, FormatError};
use partialctl::validation::{ValidationManager, ValidationResults};
use partialctl::StateSet;

use clap::Parser;
use itertools::Itertools;
use log::*;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

mod config;
use config::*;
mod parser;
use parser::*;

fn main() {
    // run clap
    let args = CommandLineArguments::parse();

    // initialize the env logger
    if args.verbose && std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "debug");
    }
    pretty_env_logger::init();

    match run(args) {
        Ok(results) => {
            for (name, result) in results.iter() {
                println!(
                    "{}: lower = {}, upper = {}",
                    name,
                    fmt_states(result.lower()),
                    fmt_states(result.upper())
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", cause_chain(&e));
            process::exit(1);
        }
    }
}

fn run(args: CommandLineArguments) -> Result<ValidationResults, MainError> {
    if args.num_threads == Some(0) {
        return Err(ConfigError::NoThreads.into());
    }
    if args.timeout == 0 {
        return Err(ConfigError::NoTimeout.into());
    }

    let options =
        loader_options(args.sink, &args.prefix, args.translation.as_deref(), args.delete)?;

    // parse the formulas first, the loader may delete its input files
    let formula_file = args.formulas.display().to_string();
    let src = fs::read_to_string(&args.formulas)
        .map_err(|source| MainError::FormulaFile { file: formula_file.clone(), source })?;
    let formulas = parse_formula_file(&src)?;
    info!("Parsed {} formulas from {}", formulas.len(), formula_file);

    let system = ts::load(&args.transitions, &args.labels, &options)?;
    for (name, formula) in formulas.iter() {
        for p in formula.atomic_propositions() {
            if system.index_of(p).is_none() {
                warn!("Formula {} uses the unknown proposition {}", name, p);
            }
        }
    }

    let mut manager = ValidationManager::new(system, formulas)?;
    if args.parallel {
        if let Some(n) = args.num_threads {
            manager.set_num_threads(n);
        }
        Ok(manager.validate_parallel(Duration::from_secs(args.timeout))?)
    } else {
        Ok(manager.validate_sequentially())
    }
}

fn fmt_states(states: &StateSet) -> String {
    format!("[{}]", states.iter().sorted().join(", "))
}

fn cause_chain(e: &dyn Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(&format!("\n    caused by: {}", cause));
        source = cause.source();
    }
    msg
}

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
    #[error("Cannot read the formula file {file}")]
    FormulaFile { file: String, source: std::io::Error },
    #[error("Cannot parse the formula file")]
    Parse(#[from] ParseError),
    #[error("Cannot load the transition system")]
    Load(#[from] FormatError),
    #[error("Validation failed")]
    Validation(#[from] partialctl::Error),
}

#[derive(Parser, Debug)]
#[command(name = "PartialCTL (Binary)", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// File containing the transitions of the explored state space
    transitions: PathBuf,
    /// File containing the labels of the explored state space
    labels: PathBuf,
    /// File containing the named formulas, one `name: formula` per line
    formulas: PathBuf,
    /// Evaluate the formulas using a pool of worker threads
    #[arg(short, long)]
    parallel: bool,
    /// Show debug messages (unless RUST_LOG is set)
    #[arg(short, long)]
    verbose: bool,
    /// Timeout of the parallel validation, in seconds
    #[arg(short, long, default_value_t = 3600)]
    timeout: u64,
    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    num_threads: Option<usize>,
    /// File translating the proposition names, one `raw = pretty` per line
    #[arg(long)]
    translation: Option<PathBuf>,
    /// Target value of a transition to an unknown continuation
    #[arg(long, default_value_t = DEFAULT_SINK, allow_negative_numbers = true)]
    sink: i64,
    /// Prefix of every proposition name in the label file
    #[arg(long, default_value = DEFAULT_LABEL_PREFIX)]
    prefix: String,
    /// Delete the transition and the label file after loading them
    #[arg(long)]
    delete: bool,
}
