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

//! # CTL Model Checker
//!
//! Three-valued evaluation of [formulas](crate::formula::Formula) on a possibly partial
//! [transition system](crate::ts::TransitionSystem). The result of every evaluation is a
//! [`CheckResult`], which consists of two sets of states:
//!
//! - The *lower* bound contains all states in which the formula provably holds.
//! - The *upper* bound contains all states in which the formula cannot be ruled out yet.
//!
//! The lower bound is always a subset of the upper bound, and if the system contains no partial
//! states, then both bounds are equal.
//!
//! ## Evaluation
//!
//! Every formula is [simplified](crate::formula::Formula::simplify) first, such that only the
//! basis operators remain. Then, the simplified formula is evaluated recursively. The result of
//! every (sub-) formula is stored in a cache, such that it is computed at most once per checker.
//! The cache is shared between threads, and every access to it is a single, short critical
//! section. Results leaving the cache are always copies.
//!
//! - $\mathbf{EX}\ \phi$: A state is in the upper bound if it is partial, or if one of its known
//!   successors is in the upper bound of $\phi$. It is in the lower bound if one of its known
//!   successors is in the lower bound of $\phi$. $\mathbf{EX}\ \top$ holds in every partial state,
//!   and in every state with at least one known successor.
//! - $\mathbf{AX}\ \phi$: A partial state is only in the upper bound. A complete state is in the
//!   lower (upper) bound if all its known successors are in the lower (upper) bound of $\phi$. A
//!   complete state without successors satisfies $\mathbf{AX}\ \phi$ vacuously.
//! - $\mathbf{EG}\ \phi$: Greatest fixpoint, starting from all states. A state in the bound of
//!   $\phi$ is kept if one of its known successors is still in the iterate, or if it is a dead end.
//!   For the lower bound, the dead end must be complete. For the upper bound, partial states are
//!   always kept.
//! - $\mathbf{E}[\phi\ \mathbf{U}\ \psi]$: Least fixpoint, starting from the empty set. Every
//!   iteration adds the bound of $\psi$, and all states in the bound of $\phi$ with a known
//!   successor in the iterate. For the upper bound, all partial states in the bound of $\phi$ are
//!   added as well.

use crate::formula::Formula;
use crate::ts::{State, StateSet, TransitionSystem};

use log::*;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Three-valued result of a formula in a single state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The formula provably holds in the state
    True,
    /// The formula provably does not hold in the state
    False,
    /// The state space is not explored enough to decide
    Unknown,
}

/// Lower and upper bound of the set of states satisfying a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    lower: StateSet,
    upper: StateSet,
}

impl CheckResult {
    /// Create a new result. The lower bound must be a subset of the upper bound.
    pub fn new(lower: StateSet, upper: StateSet) -> Self {
        debug_assert!(lower.is_subset(&upper), "lower bound must be a subset of the upper bound");
        Self { lower, upper }
    }

    /// Create a result, where the lower and upper bound are the same.
    pub fn exact(states: StateSet) -> Self {
        Self { upper: states.clone(), lower: states }
    }

    /// Set of states in which the formula provably holds
    pub fn lower(&self) -> &StateSet {
        &self.lower
    }

    /// Set of states in which the formula was not ruled out
    pub fn upper(&self) -> &StateSet {
        &self.upper
    }

    /// Split the result into the lower and the upper bound.
    pub fn into_bounds(self) -> (StateSet, StateSet) {
        (self.lower, self.upper)
    }

    /// Returns true if the lower and the upper bound are equal.
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }

    /// Set of states where it is unknown whether the formula holds.
    pub fn undecided(&self) -> StateSet {
        self.upper.difference(&self.lower).copied().collect()
    }

    /// Three-valued result of the formula in the given state.
    pub fn verdict(&self, state: State) -> Verdict {
        if self.lower.contains(&state) {
            Verdict::True
        } else if self.upper.contains(&state) {
            Verdict::Unknown
        } else {
            Verdict::False
        }
    }
}

/// # CTL Model Checker
///
/// Evaluates formulas on a single transition system, caching the result of every subformula.
/// The checker can be shared between threads (e.g., using an `Arc`).
///
/// ```
/// use partialctl::example_systems::*;
/// use partialctl::{CTLModelChecker, Formula};
/// use maplit::hashset;
///
/// let checker = CTLModelChecker::new(TwoStates::system());
/// let result = checker.check(&Formula::exists_next(Formula::atomic("p")));
/// assert_eq!(result.lower(), &hashset! {0});
/// assert!(result.is_exact());
/// ```
#[derive(Debug)]
pub struct CTLModelChecker {
    system: Arc<TransitionSystem>,
    cache: RwLock<HashMap<Formula, CheckResult>>,
    simplified: RwLock<HashMap<Formula, Formula>>,
}

impl CTLModelChecker {
    /// Create a new checker for the transition system.
    pub fn new(system: TransitionSystem) -> Self {
        Self::from_shared(Arc::new(system))
    }

    /// Create a new checker for a transition system that is shared with others.
    pub fn from_shared(system: Arc<TransitionSystem>) -> Self {
        Self { system, cache: RwLock::default(), simplified: RwLock::default() }
    }

    /// Returns the transition system of the checker
    pub fn system(&self) -> &TransitionSystem {
        &self.system
    }

    /// Returns the number of (simplified) formulas whose result is cached.
    pub fn cached_formulas(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Evaluate the formula on the system. The formula is simplified first; the result of the
    /// simplified formula, and of all its subformulas, is cached.
    pub fn check(&self, formula: &Formula) -> CheckResult {
        let simplified = self.simplify(formula);
        self.eval(&simplified)
    }

    /// Simplify the formula, memoizing the result.
    fn simplify(&self, formula: &Formula) -> Formula {
        if let Some(s) =
            self.simplified.read().unwrap_or_else(PoisonError::into_inner).get(formula)
        {
            return s.clone();
        }
        let s = formula.simplify();
        self.simplified
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(formula.clone(), s.clone());
        s
    }

    /// Evaluate an already simplified formula, using the cache.
    fn eval(&self, formula: &Formula) -> CheckResult {
        if let Some(r) = self.cache.read().unwrap_or_else(PoisonError::into_inner).get(formula) {
            trace!("cache hit for {}", formula);
            return r.clone();
        }

        let result = self.compute(formula);
        debug!(
            "{}: {} states satisfied, {} undecided",
            formula,
            result.lower.len(),
            result.upper.len() - result.lower.len()
        );

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(formula.clone(), result.clone());
        result
    }

    /// Evaluate a single operator of an already simplified formula, using the cache for its
    /// operands.
    pub(crate) fn compute(&self, formula: &Formula) -> CheckResult {
        match formula {
            Formula::True => CheckResult::exact(self.system.all_states()),
            Formula::False => CheckResult::exact(StateSet::new()),
            Formula::AtomicProposition(p) => match self.system.index_of(p) {
                Some(idx) => CheckResult::exact(self.system.states_labelled(idx)),
                None => {
                    warn!("Unknown atomic proposition: {}", p);
                    CheckResult::exact(StateSet::new())
                }
            },
            Formula::Not(f) => {
                let r = self.eval(f);
                CheckResult::new(self.system.complement(&r.upper), self.system.complement(&r.lower))
            }
            Formula::And(a, b) => {
                let (a, b) = (self.eval(a), self.eval(b));
                CheckResult::new(
                    a.lower.intersection(&b.lower).copied().collect(),
                    a.upper.intersection(&b.upper).copied().collect(),
                )
            }
            Formula::ExistsNext(f) => self.exists_next(f),
            Formula::ForAllNext(f) => self.for_all_next(f),
            Formula::ExistsAlways(f) => self.exists_always(f),
            Formula::ExistsUntil(a, b) => self.exists_until(a, b),
            Formula::Or(_, _)
            | Formula::Implies(_, _)
            | Formula::Iff(_, _)
            | Formula::ForAllAlways(_)
            | Formula::ExistsEventually(_)
            | Formula::ForAllEventually(_)
            | Formula::ForAllUntil(_, _) => {
                panic!("Evaluator Error: formula {} reached the evaluator unsimplified", formula)
            }
        }
    }

    fn exists_next(&self, f: &Formula) -> CheckResult {
        let mut lower = StateSet::new();
        let mut upper = StateSet::new();

        if *f == Formula::True {
            for s in self.system.states() {
                let has_successor = self.system.successors_of(s).map_or(false, |x| !x.is_empty());
                if has_successor || self.system.is_partial(s) {
                    lower.insert(s);
                    upper.insert(s);
                }
            }
            return CheckResult::new(lower, upper);
        }

        let r = self.eval(f);
        for s in self.system.states() {
            if let Some(succ) = self.system.successors_of(s) {
                if !succ.is_disjoint(&r.lower) {
                    lower.insert(s);
                }
                if !succ.is_disjoint(&r.upper) {
                    upper.insert(s);
                }
            }
            if self.system.is_partial(s) {
                upper.insert(s);
            }
        }
        CheckResult::new(lower, upper)
    }

    fn for_all_next(&self, f: &Formula) -> CheckResult {
        let r = self.eval(f);
        let mut lower = StateSet::new();
        let mut upper = StateSet::new();

        for s in self.system.states() {
            let succ = self.system.successors_of(s);
            if self.system.is_partial(s) {
                // an undiscovered successor may violate f
                upper.insert(s);
                continue;
            }
            match succ {
                Some(succ) => {
                    if succ.is_subset(&r.lower) {
                        lower.insert(s);
                    }
                    if succ.is_subset(&r.upper) {
                        upper.insert(s);
                    }
                }
                None => {
                    lower.insert(s);
                    upper.insert(s);
                }
            }
        }
        CheckResult::new(lower, upper)
    }

    fn exists_always(&self, f: &Formula) -> CheckResult {
        let r = self.eval(f);
        let system = &self.system;

        let lower = self.greatest_fixpoint(&r.lower, |s, succ, current| match succ {
            Some(succ) if !succ.is_empty() => !succ.is_disjoint(current),
            _ => !system.is_partial(s),
        });
        let upper = self.greatest_fixpoint(&r.upper, |s, succ, current| match succ {
            Some(succ) if !succ.is_empty() => {
                !succ.is_disjoint(current) || system.is_partial(s)
            }
            _ => true,
        });
        CheckResult::new(lower, upper)
    }

    fn exists_until(&self, a: &Formula, b: &Formula) -> CheckResult {
        let (a, b) = (self.eval(a), self.eval(b));
        let system = &self.system;

        let lower = self.least_fixpoint(&b.lower, &a.lower, |_, succ, current| {
            succ.map_or(false, |succ| !succ.is_disjoint(current))
        });
        let upper = self.least_fixpoint(&b.upper, &a.upper, |s, succ, current| {
            system.is_partial(s) || succ.map_or(false, |succ| !succ.is_disjoint(current))
        });
        CheckResult::new(lower, upper)
    }

    /// Compute the greatest fixpoint, starting with all states. In every iteration, a state of the
    /// current iterate is kept if it is in `candidates`, and `retain` returns true for it (given
    /// its known successors and the previous iterate).
    fn greatest_fixpoint<F>(&self, candidates: &StateSet, retain: F) -> StateSet
    where
        F: Fn(State, Option<&StateSet>, &StateSet) -> bool,
    {
        let mut current = self.system.all_states();
        let mut iterations: usize = 0;
        loop {
            iterations += 1;
            let next: StateSet = current
                .iter()
                .copied()
                .filter(|s| candidates.contains(s))
                .filter(|s| retain(*s, self.system.successors_of(*s), &current))
                .collect();
            if next == current {
                trace!("greatest fixpoint reached after {} iterations", iterations);
                return current;
            }
            current = next;
        }
    }

    /// Compute the least fixpoint, starting with the empty set. In every iteration, the new
    /// iterate contains `base`, and all states of `candidates` for which `add` returns true (given
    /// its known successors and the previous iterate).
    fn least_fixpoint<F>(&self, base: &StateSet, candidates: &StateSet, add: F) -> StateSet
    where
        F: Fn(State, Option<&StateSet>, &StateSet) -> bool,
    {
        let mut current = StateSet::new();
        let mut iterations: usize = 0;
        loop {
            iterations += 1;
            let mut next = base.clone();
            next.extend(
                candidates
                    .iter()
                    .copied()
                    .filter(|s| add(*s, self.system.successors_of(*s), &current)),
            );
            if next == current {
                trace!("least fixpoint reached after {} iterations", iterations);
                return current;
            }
            current = next;
        }
    }
}
