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

//! # Loader
//!
//! Parses the two files produced by the state space exploration into a [`TransitionSystem`].
//!
//! ## Transition File
//!
//! ```text
//! -1 -> 0
//! 0 -> 1
//! 1 -> 2
//! 2 -> -2
//! 2
//! 3
//! ```
//!
//! Every line except for the last two describes a transition `source -> target`. A source of `-1`
//! marks the initial transition, which is discarded. A target equal to the
//! [sink](LoaderOptions::sink) denotes a transition to an unknown continuation, and makes the
//! source a partial state. The second to last line lists the partially explored states (space
//! separated, possibly empty), and the last line contains the total number of states.
//!
//! ## Label File
//!
//! ```text
//! 0=prop_p 1=prop_q
//! 0: 0
//! 2: 0 1
//! ```
//!
//! The first line binds proposition indices to names. Every name carries the
//! [prefix](LoaderOptions::label_prefix), which is removed. Afterwards, the name is translated
//! using the [translation table](LoaderOptions::translation), if it contains the name. Every other
//! line lists the propositions that hold in a state. State `-1` is ignored.

use super::{State, StateSet, TransitionSystem};

use log::*;
use std::collections::HashMap;
use std::fs::{read_to_string, remove_file};
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Source index marking the initial transition
pub const START_MARKER: i64 = -1;

/// Default value of the target denoting an unknown continuation
pub const DEFAULT_SINK: i64 = -2;

/// Default prefix of every proposition name in the label file
pub const DEFAULT_LABEL_PREFIX: &str = "prop_";

/// Options for loading the transition system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Target value of a transition to an unknown continuation
    pub sink: i64,
    /// Prefix that every proposition name carries in the label file
    pub label_prefix: String,
    /// Translation of the (stripped) proposition names
    pub translation: HashMap<String, String>,
    /// Delete both files after they were loaded successfully
    pub delete_sources: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            sink: DEFAULT_SINK,
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            translation: HashMap::new(),
            delete_sources: false,
        }
    }
}

/// Load the transition system from the transition file and the label file.
pub fn load(
    transitions: impl AsRef<Path>,
    labels: impl AsRef<Path>,
    options: &LoaderOptions,
) -> Result<TransitionSystem, FormatError> {
    let transitions = transitions.as_ref();
    let labels = labels.as_ref();
    let t_file = transitions.display().to_string();
    let l_file = labels.display().to_string();

    let t_src = read_to_string(transitions)
        .map_err(|source| FormatError::Io { file: t_file.clone(), source })?;
    let l_src =
        read_to_string(labels).map_err(|source| FormatError::Io { file: l_file.clone(), source })?;

    let system = parse_files(&t_src, &t_file, &l_src, &l_file, options)?;

    info!(
        "Loaded system with {} states, {} transitions and {} partial states",
        system.state_count(),
        system.edge_count(),
        system.partial_states().len()
    );

    if options.delete_sources {
        debug!("Removing {} and {}", t_file, l_file);
        remove_file(transitions).map_err(|source| FormatError::Io { file: t_file, source })?;
        remove_file(labels).map_err(|source| FormatError::Io { file: l_file, source })?;
    }

    Ok(system)
}

/// Parse the transition system from the content of the transition file and the label file.
pub fn parse(
    transitions: &str,
    labels: &str,
    options: &LoaderOptions,
) -> Result<TransitionSystem, FormatError> {
    parse_files(transitions, "<transitions>", labels, "<labels>", options)
}

fn parse_files(
    t_src: &str,
    t_file: &str,
    l_src: &str,
    l_file: &str,
    options: &LoaderOptions,
) -> Result<TransitionSystem, FormatError> {
    let (num_states, successors, partial) = parse_transitions(t_src, t_file, options.sink)?;
    let (labelling, name_to_index) = parse_labels(l_src, l_file, num_states, options)?;
    Ok(TransitionSystem::from_parts(num_states, successors, labelling, name_to_index, partial))
}

type Transitions = (usize, HashMap<State, StateSet>, StateSet);

fn parse_transitions(src: &str, file: &str, sink: i64) -> Result<Transitions, FormatError> {
    let lines = content_lines(src);
    let n_lines = lines.len();
    if n_lines < 2 {
        return Err(FormatError::MissingFooter { file: file.to_string(), line: n_lines });
    }

    let num_states: usize = parse_num(lines[n_lines - 1], file, n_lines)?;

    let mut partial = StateSet::new();
    for token in lines[n_lines - 2].split_whitespace() {
        let s = parse_state(token, file, n_lines - 1, num_states)?;
        partial.insert(s);
    }

    let mut successors: HashMap<State, StateSet> = HashMap::new();
    for (i, line) in lines[..n_lines - 2].iter().enumerate() {
        let line_no = i + 1;
        let (source, target) = line.split_once("->").ok_or_else(|| FormatError::UnexpectedToken {
            file: file.to_string(),
            line: line_no,
            content: line.to_string(),
        })?;
        let source = source.trim();
        let target = target.trim();

        if parse_num::<i64>(source, file, line_no)? == START_MARKER {
            continue;
        }
        let source = parse_state(source, file, line_no, num_states)?;

        if parse_num::<i64>(target, file, line_no)? == sink {
            successors.entry(source).or_default();
            partial.insert(source);
        } else {
            let target = parse_state(target, file, line_no, num_states)?;
            successors.entry(source).or_default().insert(target);
        }
    }

    Ok((num_states, successors, partial))
}

type Labels = (HashMap<usize, StateSet>, HashMap<String, usize>);

fn parse_labels(
    src: &str,
    file: &str,
    num_states: usize,
    options: &LoaderOptions,
) -> Result<Labels, FormatError> {
    let lines = content_lines(src);
    // an empty file declares no propositions
    let header = lines.first().copied().unwrap_or("");

    let mut name_to_index: HashMap<String, usize> = HashMap::new();
    for token in header.split_whitespace() {
        let unexpected = || FormatError::UnexpectedToken {
            file: file.to_string(),
            line: 1,
            content: token.to_string(),
        };
        let (index, raw_name) = token.split_once('=').ok_or_else(unexpected)?;
        let index: usize = parse_num(index, file, 1)?;
        let name = raw_name
            .strip_prefix(options.label_prefix.as_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(unexpected)?;
        let name = options.translation.get(name).map(String::as_str).unwrap_or(name);
        if name_to_index.values().any(|i| *i == index) {
            return Err(unexpected());
        }
        if name_to_index.insert(name.to_string(), index).is_some() {
            return Err(FormatError::DuplicateProposition {
                file: file.to_string(),
                line: 1,
                name: name.to_string(),
            });
        }
    }

    let mut labelling: HashMap<usize, StateSet> = HashMap::new();
    for (i, line) in lines.iter().enumerate().skip(1) {
        let line_no = i + 1;
        let (state, props) = line.split_once(':').ok_or_else(|| FormatError::UnexpectedToken {
            file: file.to_string(),
            line: line_no,
            content: line.to_string(),
        })?;
        let state = state.trim();
        if parse_num::<i64>(state, file, line_no)? == START_MARKER {
            continue;
        }
        let state = parse_state(state, file, line_no, num_states)?;
        for token in props.split_whitespace() {
            let index: usize = parse_num(token, file, line_no)?;
            if !name_to_index.values().any(|i| *i == index) {
                return Err(FormatError::UnknownProposition {
                    file: file.to_string(),
                    line: line_no,
                    index,
                });
            }
            labelling.entry(index).or_default().insert(state);
        }
    }

    Ok((labelling, name_to_index))
}

/// All lines of the file, without trailing blank lines.
fn content_lines(src: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = src.lines().collect();
    while lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        lines.pop();
    }
    lines
}

fn parse_num<T>(token: &str, file: &str, line: usize) -> Result<T, FormatError>
where
    T: FromStr<Err = ParseIntError>,
{
    token.trim().parse().map_err(|source| FormatError::InvalidNumber {
        file: file.to_string(),
        line,
        content: token.to_string(),
        source,
    })
}

fn parse_state(
    token: &str,
    file: &str,
    line: usize,
    num_states: usize,
) -> Result<State, FormatError> {
    let s: i64 = parse_num(token, file, line)?;
    if s < 0 || s as u64 >= num_states as u64 {
        Err(FormatError::StateOutOfRange { file: file.to_string(), line, state: s, num_states })
    } else {
        Ok(s as State)
    }
}

/// Error while loading the transition or the label file. Line numbers start at 1.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Io Error
    #[error("Cannot read {file}: {source}")]
    Io {
        /// File that caused the error
        file: String,
        /// Cause
        source: std::io::Error,
    },
    /// Unexpected Token
    #[error("{file}:{line}: Unexpected token: {content:?}")]
    UnexpectedToken {
        /// File that caused the error
        file: String,
        /// Offending line
        line: usize,
        /// Offending content
        content: String,
    },
    /// ParseIntError
    #[error("{file}:{line}: Cannot parse an integer from {content:?}")]
    InvalidNumber {
        /// File that caused the error
        file: String,
        /// Offending line
        line: usize,
        /// Offending content
        content: String,
        /// Cause
        source: ParseIntError,
    },
    /// State outside of `0..num_states`
    #[error("{file}:{line}: State {state} is out of range for a system with {num_states} states")]
    StateOutOfRange {
        /// File that caused the error
        file: String,
        /// Offending line
        line: usize,
        /// Offending state
        state: i64,
        /// Number of states in the system
        num_states: usize,
    },
    /// Proposition index is not declared in the header of the label file
    #[error("{file}:{line}: Proposition index {index} was not declared")]
    UnknownProposition {
        /// File that caused the error
        file: String,
        /// Offending line
        line: usize,
        /// Offending index
        index: usize,
    },
    /// The same proposition name is declared twice
    #[error("{file}:{line}: Proposition {name} is declared twice")]
    DuplicateProposition {
        /// File that caused the error
        file: String,
        /// Offending line
        line: usize,
        /// Offending name
        name: String,
    },
    /// The partial states and the number of states are missing
    #[error("{file}:{line}: File ends before the partial states and the state count")]
    MissingFooter {
        /// File that caused the error
        file: String,
        /// Last line of the file
        line: usize,
    },
}

impl FormatError {
    /// Returns the line on which the error occurred. For IO errors, this is `None`.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::UnexpectedToken { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::StateOutOfRange { line, .. }
            | Self::UnknownProposition { line, .. }
            | Self::DuplicateProposition { line, .. }
            | Self::MissingFooter { line, .. } => Some(*line),
        }
    }

    /// Returns the file in which the error occurred.
    pub fn file(&self) -> &str {
        match self {
            Self::Io { file, .. }
            | Self::UnexpectedToken { file, .. }
            | Self::InvalidNumber { file, .. }
            | Self::StateOutOfRange { file, .. }
            | Self::UnknownProposition { file, .. }
            | Self::DuplicateProposition { file, .. }
            | Self::MissingFooter { file, .. } => file,
        }
    }
}
