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

//! # Computation Tree Logic
//!
//! This module contains the closed formula algebra of CTL. A formula is an immutable tree, which
//! compares and hashes structurally (it is used as the key of the result cache in the
//! [checker](crate::checker)).
//!
//! ## Operators
//!
//! - $\top$, $\bot$ (True, False)
//! - $p$ (Atomic proposition, resolved by name through the labelling of the system)
//! - $\neg \phi$, $\phi \land \psi$, $\phi \lor \psi$, $\phi \Rightarrow \psi$, $\phi \iff \psi$
//! - $\mathbf{EX}\ \phi$, $\mathbf{AX}\ \phi$: $\phi$ holds in some (every) successor
//! - $\mathbf{EG}\ \phi$, $\mathbf{AG}\ \phi$: $\phi$ holds globally on some (every) path
//! - $\mathbf{EF}\ \phi$, $\mathbf{AF}\ \phi$: $\phi$ holds eventually on some (every) path
//! - $\mathbf{E}[\phi\ \mathbf{U}\ \psi]$, $\mathbf{A}[\phi\ \mathbf{U}\ \psi]$: $\phi$ holds until
//!   $\psi$ holds on some (every) path
//!
//! ## Simplification
//!
//! Before evaluation, every formula is rewritten such that it only uses the basis operators
//! $\top$, $\bot$, $p$, $\neg$, $\land$, $\mathbf{EX}$, $\mathbf{AX}$, $\mathbf{EG}$ and
//! $\mathbf{EU}$, using the following equivalences:
//!
//! - $\phi \lor \psi \equiv \neg (\neg \phi \land \neg \psi)$
//! - $\phi \Rightarrow \psi \equiv \neg \phi \lor \psi$
//! - $\phi \iff \psi \equiv (\phi \Rightarrow \psi) \land (\psi \Rightarrow \phi)$
//! - $\mathbf{AG}\ \phi \equiv \neg \mathbf{E}[\top\ \mathbf{U}\ \neg \phi]$
//! - $\mathbf{EF}\ \phi \equiv \mathbf{E}[\top\ \mathbf{U}\ \phi]$
//! - $\mathbf{AF}\ \phi \equiv \neg \mathbf{EG}\ \neg \phi$
//! - $\mathbf{A}[\phi\ \mathbf{U}\ \psi] \equiv \neg \mathbf{E}[\neg \psi\ \mathbf{U}\ (\neg \phi
//!   \land \neg \psi)] \land \neg \mathbf{EG}\ \neg \psi$

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

/// # CTL Formula
///
/// Formulas can be built with the constructors, the operators `!`, `&` and `|`, or with the `ctl!`
/// macro of the `partialctl_macro` crate:
///
/// ```
/// use partialctl::Formula;
/// use partialctl_macro::ctl;
///
/// let p = Formula::atomic("p");
/// let q = Formula::atomic("q");
/// let response = Formula::for_all_always(Formula::implies(p, Formula::for_all_eventually(q)));
/// assert_eq!(ctl!(AG(p > AF(q))), response);
/// assert_eq!(ctl!(EU(p, !q)).to_string(), "E[p U !q]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// $\top$
    True,
    /// $\bot$
    False,
    /// Atomic proposition, identified by its name
    AtomicProposition(String),
    /// $\neg \phi$
    Not(Box<Formula>),
    /// $\phi \land \psi$
    And(Box<Formula>, Box<Formula>),
    /// $\phi \lor \psi$
    Or(Box<Formula>, Box<Formula>),
    /// $\phi \Rightarrow \psi$
    Implies(Box<Formula>, Box<Formula>),
    /// $\phi \iff \psi$
    Iff(Box<Formula>, Box<Formula>),
    /// $\mathbf{EX}\ \phi$
    ExistsNext(Box<Formula>),
    /// $\mathbf{AX}\ \phi$
    ForAllNext(Box<Formula>),
    /// $\mathbf{EG}\ \phi$
    ExistsAlways(Box<Formula>),
    /// $\mathbf{AG}\ \phi$
    ForAllAlways(Box<Formula>),
    /// $\mathbf{EF}\ \phi$
    ExistsEventually(Box<Formula>),
    /// $\mathbf{AF}\ \phi$
    ForAllEventually(Box<Formula>),
    /// $\mathbf{E}[\phi\ \mathbf{U}\ \psi]$
    ExistsUntil(Box<Formula>, Box<Formula>),
    /// $\mathbf{A}[\phi\ \mathbf{U}\ \psi]$
    ForAllUntil(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// Atomic proposition
    pub fn atomic(name: impl Into<String>) -> Self {
        Self::AtomicProposition(name.into())
    }

    /// $\neg \phi$
    pub fn not(f: Formula) -> Self {
        Self::Not(Box::new(f))
    }

    /// $\phi \land \psi$
    pub fn and(a: Formula, b: Formula) -> Self {
        Self::And(Box::new(a), Box::new(b))
    }

    /// $\phi \lor \psi$
    pub fn or(a: Formula, b: Formula) -> Self {
        Self::Or(Box::new(a), Box::new(b))
    }

    /// $\phi \Rightarrow \psi$
    pub fn implies(a: Formula, b: Formula) -> Self {
        Self::Implies(Box::new(a), Box::new(b))
    }

    /// $\phi \iff \psi$
    pub fn iff(a: Formula, b: Formula) -> Self {
        Self::Iff(Box::new(a), Box::new(b))
    }

    /// $\mathbf{EX}\ \phi$
    pub fn exists_next(f: Formula) -> Self {
        Self::ExistsNext(Box::new(f))
    }

    /// $\mathbf{AX}\ \phi$
    pub fn for_all_next(f: Formula) -> Self {
        Self::ForAllNext(Box::new(f))
    }

    /// $\mathbf{EG}\ \phi$
    pub fn exists_always(f: Formula) -> Self {
        Self::ExistsAlways(Box::new(f))
    }

    /// $\mathbf{AG}\ \phi$
    pub fn for_all_always(f: Formula) -> Self {
        Self::ForAllAlways(Box::new(f))
    }

    /// $\mathbf{EF}\ \phi$
    pub fn exists_eventually(f: Formula) -> Self {
        Self::ExistsEventually(Box::new(f))
    }

    /// $\mathbf{AF}\ \phi$
    pub fn for_all_eventually(f: Formula) -> Self {
        Self::ForAllEventually(Box::new(f))
    }

    /// $\mathbf{E}[\phi\ \mathbf{U}\ \psi]$
    pub fn exists_until(a: Formula, b: Formula) -> Self {
        Self::ExistsUntil(Box::new(a), Box::new(b))
    }

    /// $\mathbf{A}[\phi\ \mathbf{U}\ \psi]$
    pub fn for_all_until(a: Formula, b: Formula) -> Self {
        Self::ForAllUntil(Box::new(a), Box::new(b))
    }

    /// Returns true if the formula only contains basis operators, i.e., if it is its own
    /// [simplification](Formula::simplify).
    pub fn is_basic(&self) -> bool {
        match self {
            Self::True | Self::False | Self::AtomicProposition(_) => true,
            Self::Not(f) | Self::ExistsNext(f) | Self::ForAllNext(f) | Self::ExistsAlways(f) => {
                f.is_basic()
            }
            Self::And(a, b) | Self::ExistsUntil(a, b) => a.is_basic() && b.is_basic(),
            Self::Or(_, _)
            | Self::Implies(_, _)
            | Self::Iff(_, _)
            | Self::ForAllAlways(_)
            | Self::ExistsEventually(_)
            | Self::ForAllEventually(_)
            | Self::ForAllUntil(_, _) => false,
        }
    }

    /// Rewrite the formula into an equivalent formula, that only uses the basis operators (see the
    /// [module documentation](self)). This function is pure, and idempotent:
    ///
    /// ```
    /// use partialctl::Formula;
    ///
    /// let f = Formula::for_all_eventually(Formula::atomic("p") | Formula::atomic("q"));
    /// let s = f.simplify();
    /// assert!(s.is_basic());
    /// assert_eq!(s.simplify(), s);
    /// assert_eq!(s.to_string(), "!EG !!(!p && !q)");
    /// ```
    pub fn simplify(&self) -> Formula {
        match self {
            Self::True => Self::True,
            Self::False => Self::False,
            Self::AtomicProposition(p) => Self::AtomicProposition(p.clone()),
            Self::Not(f) => Self::not(f.simplify()),
            Self::And(a, b) => Self::and(a.simplify(), b.simplify()),
            Self::ExistsNext(f) => Self::exists_next(f.simplify()),
            Self::ForAllNext(f) => Self::for_all_next(f.simplify()),
            Self::ExistsAlways(f) => Self::exists_always(f.simplify()),
            Self::ExistsUntil(a, b) => Self::exists_until(a.simplify(), b.simplify()),
            Self::Or(a, b) => or_basic(a.simplify(), b.simplify()),
            Self::Implies(a, b) => implies_basic(a.simplify(), b.simplify()),
            Self::Iff(a, b) => {
                let (a, b) = (a.simplify(), b.simplify());
                Self::and(implies_basic(a.clone(), b.clone()), implies_basic(b, a))
            }
            Self::ForAllAlways(f) => {
                Self::not(Self::exists_until(Self::True, Self::not(f.simplify())))
            }
            Self::ExistsEventually(f) => Self::exists_until(Self::True, f.simplify()),
            Self::ForAllEventually(f) => {
                Self::not(Self::exists_always(Self::not(f.simplify())))
            }
            Self::ForAllUntil(a, b) => {
                let (a, b) = (a.simplify(), b.simplify());
                Self::and(
                    Self::not(Self::exists_until(
                        Self::not(b.clone()),
                        Self::and(Self::not(a), Self::not(b.clone())),
                    )),
                    Self::not(Self::exists_always(Self::not(b))),
                )
            }
        }
    }

    /// Returns the names of all atomic propositions in the formula.
    pub fn atomic_propositions(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_propositions(&mut names);
        names
    }

    fn collect_propositions<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::True | Self::False => {}
            Self::AtomicProposition(p) => {
                names.insert(p.as_str());
            }
            Self::Not(f)
            | Self::ExistsNext(f)
            | Self::ForAllNext(f)
            | Self::ExistsAlways(f)
            | Self::ForAllAlways(f)
            | Self::ExistsEventually(f)
            | Self::ForAllEventually(f) => f.collect_propositions(names),
            Self::And(a, b)
            | Self::Or(a, b)
            | Self::Implies(a, b)
            | Self::Iff(a, b)
            | Self::ExistsUntil(a, b)
            | Self::ForAllUntil(a, b) => {
                a.collect_propositions(names);
                b.collect_propositions(names);
            }
        }
    }
}

/// $\neg (\neg a \land \neg b)$, for already simplified `a` and `b`
fn or_basic(a: Formula, b: Formula) -> Formula {
    Formula::not(Formula::and(Formula::not(a), Formula::not(b)))
}

/// $\neg a \lor b$, for already simplified `a` and `b`
fn implies_basic(a: Formula, b: Formula) -> Formula {
    or_basic(Formula::not(a), b)
}

impl From<bool> for Formula {
    fn from(x: bool) -> Self {
        if x {
            Self::True
        } else {
            Self::False
        }
    }
}

impl Not for Formula {
    type Output = Self;
    fn not(self) -> Self::Output {
        Formula::not(self)
    }
}

impl BitAnd for Formula {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self::Output {
        Formula::and(self, rhs)
    }
}

impl BitOr for Formula {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Formula::or(self, rhs)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::AtomicProposition(p) => write!(f, "{}", p),
            Self::Not(a) => write!(f, "!{}", a),
            Self::And(a, b) => write!(f, "({} && {})", a, b),
            Self::Or(a, b) => write!(f, "({} || {})", a, b),
            Self::Implies(a, b) => write!(f, "({} -> {})", a, b),
            Self::Iff(a, b) => write!(f, "({} <-> {})", a, b),
            Self::ExistsNext(a) => write!(f, "EX {}", a),
            Self::ForAllNext(a) => write!(f, "AX {}", a),
            Self::ExistsAlways(a) => write!(f, "EG {}", a),
            Self::ForAllAlways(a) => write!(f, "AG {}", a),
            Self::ExistsEventually(a) => write!(f, "EF {}", a),
            Self::ForAllEventually(a) => write!(f, "AF {}", a),
            Self::ExistsUntil(a, b) => write!(f, "E[{} U {}]", a, b),
            Self::ForAllUntil(a, b) => write!(f, "A[{} U {}]", a, b),
        }
    }
}
