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

//! # Transition System
//!
//! This module contains the partial Kripke structure on which formulas are evaluated. A state is
//! just an index in `0..state_count()`. For each state, the system either knows its successors, or
//! it does not. Not knowing the successors (`None`) is different from knowing that the state is a
//! dead end (`Some(∅)`). Additionally, states can be flagged as *partial*, which means that the
//! exploration stopped before all outgoing transitions of the state were discovered.
//!
//! A system is either built in memory using the [`TransitionSystemBuilder`], or loaded from the
//! two-file text format using [`load`] (see the [`loader`] module for the format).

use crate::Error;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

pub mod loader;
pub use loader::{load, parse, FormatError, LoaderOptions};
mod writer;

/// A state of the transition system
pub type State = usize;

/// A set of states
pub type StateSet = HashSet<State>;

/// # Transition System
///
/// Immutable partial Kripke structure. Once created, the structure cannot be changed anymore, and
/// it can be shared between threads without locking.
///
/// The system counts how often the successors of a state are requested (see
/// [`successor_lookups`](TransitionSystem::successor_lookups)). This counter is not part of the
/// equality of two systems.
#[derive(Debug)]
pub struct TransitionSystem {
    num_states: usize,
    successors: HashMap<State, StateSet>,
    labelling: HashMap<usize, StateSet>,
    name_to_index: HashMap<String, usize>,
    partial: StateSet,
    lookups: AtomicUsize,
}

impl TransitionSystem {
    /// Create a new transition system from its raw parts. Every state referenced in `successors`,
    /// `labelling` and `partial` must be smaller than `num_states`, and every proposition index in
    /// `labelling` must be bound to a name in `name_to_index`.
    pub fn new(
        num_states: usize,
        successors: HashMap<State, StateSet>,
        labelling: HashMap<usize, StateSet>,
        name_to_index: HashMap<String, usize>,
        partial: StateSet,
    ) -> Result<Self, Error> {
        let check = |s: State| {
            if s < num_states {
                Ok(())
            } else {
                Err(Error::StateOutOfRange(s, num_states))
            }
        };

        for (source, targets) in successors.iter() {
            check(*source)?;
            targets.iter().try_for_each(|t| check(*t))?;
        }
        for (prop, states) in labelling.iter() {
            if !name_to_index.values().any(|i| i == prop) {
                return Err(Error::UnknownPropositionIndex(*prop));
            }
            states.iter().try_for_each(|s| check(*s))?;
        }
        partial.iter().try_for_each(|s| check(*s))?;

        Ok(Self::from_parts(num_states, successors, labelling, name_to_index, partial))
    }

    /// Create the system without checking the indices. The caller must have validated them.
    pub(crate) fn from_parts(
        num_states: usize,
        successors: HashMap<State, StateSet>,
        labelling: HashMap<usize, StateSet>,
        name_to_index: HashMap<String, usize>,
        partial: StateSet,
    ) -> Self {
        Self {
            num_states,
            successors,
            labelling,
            name_to_index,
            partial,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Returns the number of states in the system.
    pub fn state_count(&self) -> usize {
        self.num_states
    }

    /// Returns the known successors of a state. `None` means that the successors are unknown, while
    /// `Some` of an empty set means that the state is known to be a dead end.
    pub fn successors_of(&self, state: State) -> Option<&StateSet> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.successors.get(&state)
    }

    /// Returns true if the state was not explored completely
    pub fn is_partial(&self, state: State) -> bool {
        self.partial.contains(&state)
    }

    /// Returns the set of all partial states
    pub fn partial_states(&self) -> &StateSet {
        &self.partial
    }

    /// Returns true if there is no partial state in the system
    pub fn is_fully_explored(&self) -> bool {
        self.partial.is_empty()
    }

    /// Returns the proposition index bound to the given name
    pub fn index_of(&self, name: impl AsRef<str>) -> Option<usize> {
        self.name_to_index.get(name.as_ref()).copied()
    }

    /// Returns a copy of the set of states that are labelled with the proposition. If the index is
    /// unknown, the set is empty.
    pub fn states_labelled(&self, index: usize) -> StateSet {
        self.labelling.get(&index).cloned().unwrap_or_default()
    }

    /// Returns an iterator over all named propositions and their index
    pub fn propositions(&self) -> impl Iterator<Item = (&str, usize)> {
        self.name_to_index.iter().map(|(n, i)| (n.as_str(), *i))
    }

    /// Returns the number of edges with a known target
    pub fn edge_count(&self) -> usize {
        self.successors.values().map(|s| s.len()).sum()
    }

    /// Returns an iterator over all states
    pub fn states(&self) -> std::ops::Range<State> {
        0..self.num_states
    }

    /// Returns how many times [`successors_of`](TransitionSystem::successors_of) was called.
    pub fn successor_lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Returns the complement of the state set, with respect to all states in the system.
    pub fn complement(&self, set: &StateSet) -> StateSet {
        self.states().filter(|s| !set.contains(s)).collect()
    }

    pub(crate) fn all_states(&self) -> StateSet {
        self.states().collect()
    }
}

impl Clone for TransitionSystem {
    fn clone(&self) -> Self {
        Self::from_parts(
            self.num_states,
            self.successors.clone(),
            self.labelling.clone(),
            self.name_to_index.clone(),
            self.partial.clone(),
        )
    }
}

impl PartialEq for TransitionSystem {
    fn eq(&self, other: &Self) -> bool {
        self.num_states == other.num_states
            && self.successors == other.successors
            && self.labelling == other.labelling
            && self.name_to_index == other.name_to_index
            && self.partial == other.partial
    }
}

impl Eq for TransitionSystem {}

/// # Transition System Builder
///
/// Helper to construct a [`TransitionSystem`] in memory.
///
/// ```
/// use partialctl::ts::TransitionSystemBuilder;
///
/// # fn main() -> Result<(), partialctl::Error> {
/// let mut b = TransitionSystemBuilder::new(3);
/// b.add_edge(0, 1);
/// b.add_edge(1, 2);
/// b.add_unknown_edge(2);
/// b.add_label("q", 2);
/// let system = b.build()?;
///
/// assert!(system.is_partial(2));
/// assert_eq!(system.successors_of(2).map(|s| s.len()), Some(0));
/// assert_eq!(system.successors_of(0).map(|s| s.len()), Some(1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransitionSystemBuilder {
    num_states: usize,
    successors: HashMap<State, StateSet>,
    labelling: HashMap<usize, StateSet>,
    name_to_index: HashMap<String, usize>,
    partial: StateSet,
}

impl TransitionSystemBuilder {
    /// Create a new builder for a system with `num_states` states.
    pub fn new(num_states: usize) -> Self {
        Self { num_states, ..Default::default() }
    }

    /// Add a transition from `source` to `target`.
    pub fn add_edge(&mut self, source: State, target: State) -> &mut Self {
        self.successors.entry(source).or_default().insert(target);
        self
    }

    /// Add a transition from `source` to an unknown continuation. This marks `source` as partial.
    pub fn add_unknown_edge(&mut self, source: State) -> &mut Self {
        self.successors.entry(source).or_default();
        self.partial.insert(source);
        self
    }

    /// Declare that the successors of `state` are known. If no edge is added from `state`, then it
    /// is a known dead end.
    pub fn set_dead_end(&mut self, state: State) -> &mut Self {
        self.successors.entry(state).or_default();
        self
    }

    /// Flag the state as partially explored.
    pub fn mark_partial(&mut self, state: State) -> &mut Self {
        self.partial.insert(state);
        self
    }

    /// Declare a proposition without labelling any state. Returns its index. If the proposition
    /// already exists, its index is returned.
    pub fn add_proposition(&mut self, name: impl Into<String>) -> usize {
        let next = self.name_to_index.len();
        *self.name_to_index.entry(name.into()).or_insert(next)
    }

    /// Label the state with the proposition. The proposition is created if it does not exist yet.
    pub fn add_label(&mut self, name: impl Into<String>, state: State) -> &mut Self {
        let idx = self.add_proposition(name);
        self.labelling.entry(idx).or_default().insert(state);
        self
    }

    /// Build the transition system, checking that all indices are valid.
    pub fn build(self) -> Result<TransitionSystem, Error> {
        TransitionSystem::new(
            self.num_states,
            self.successors,
            self.labelling,
            self.name_to_index,
            self.partial,
        )
    }
}
