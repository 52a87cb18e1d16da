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

//! Module containing all error types

use crate::ts::{FormatError, State};
use std::time::Duration;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// The transition or label file is malformed
    #[error("Format Error: {0}")]
    FormatError(#[from] FormatError),
    /// A state index is outside of the state range of the system
    #[error("State {0} is out of range for a system with {1} states")]
    StateOutOfRange(State, usize),
    /// A proposition index is used in the labelling, but has no name
    #[error("Proposition index {0} is not bound to any name")]
    UnknownPropositionIndex(usize),
    /// Two formulas with the same name were given to the validation manager
    #[error("Formula name is not unique: {0}")]
    DuplicateFormula(String),
    /// The parallel validation did not finish in the given time
    #[error("Validation did not finish within {0:?}")]
    Timeout(Duration),
    /// The evaluation of a single formula failed during parallel validation
    #[error("Evaluation of formula {name} failed: {reason}")]
    ExecutionError {
        /// Name of the failing formula
        name: String,
        /// Description of the failure
        reason: String,
    },
}
