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

#![deny(missing_docs)]

//! # PartialCTL: Checking CTL Properties on Partially Explored State Spaces
//! This is a library for evaluating Computation Tree Logic (CTL) formulas on the state space of a
//! program, even if this state space was only explored partially.
//!
//! ## Problem Statement
//! Given
//! - a transition system, where some states are flagged as *partial* (their outgoing transitions
//!   are not completely known), and
//! - a set of named CTL formulas,
//!
//! compute, for every formula, the set of states in which the formula provably holds (the *lower*
//! bound), and the set of states in which it cannot yet be ruled out (the *upper* bound). On a
//! fully explored system, both bounds are equal.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`TransitionSystem`](ts)**: The partial Kripke structure, together with a
//!   [builder](ts::TransitionSystemBuilder), the [loader](ts::load) for the two-file text format
//!   produced by the state space exploration, and the matching writer.
//!
//! - **[`Formula`](formula)**: The CTL formula algebra. Every formula can be
//!   [simplified](formula::Formula::simplify) into an equivalent formula that only uses a small
//!   set of basis operators.
//!
//! - **[`CTLModelChecker`](checker)**: The three-valued fixpoint evaluator. It caches the result of
//!   every (simplified) subformula it has evaluated.
//!
//! - **[`ValidationManager`](validation)**: Evaluates many named formulas against the same system,
//!   either sequentially or using a pool of worker threads that share one checker.
//!
//! - **[`ExampleSystems`](example_systems)**: Collection of prepared transition systems, used for
//!   testing and documentation.
//!
//! ## Usage
//!
//! ```
//! use partialctl::example_systems::*;
//! use partialctl::formula::Formula;
//! use partialctl::validation::ValidationManager;
//! use partialctl::Error;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Error> {
//!     // prepare the system
//!     // let system = partialctl::ts::load(...)?;
//! # let system = Chain::system();
//!
//!     // prepare the formulas
//!     let formulas = vec![
//!         ("reach".to_string(), Formula::exists_eventually(Formula::atomic("q"))),
//!         ("never".to_string(), Formula::for_all_always(!Formula::atomic("q"))),
//!     ];
//!
//!     // check all formulas
//!     let manager = ValidationManager::new(system, formulas)?;
//!     let results = manager.validate_parallel(Duration::from_secs(60))?;
//!
//!     // Do something with the result
//!     println!("{:#?}", results);
//!
//!     Ok(())
//! }
//! ```

pub mod checker;
mod error;
pub mod example_systems;
pub mod formula;
mod test;
pub mod ts;
pub mod validation;

pub use checker::{CTLModelChecker, CheckResult, Verdict};
pub use error::Error;
pub use formula::Formula;
pub use ts::{State, StateSet, TransitionSystem};
