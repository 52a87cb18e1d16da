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

//! Small, hand-written systems

use super::ExampleSystem;
use crate::ts::{TransitionSystem, TransitionSystemBuilder};

/// # Two States
///
/// ```text
/// s0 ---> s1 (p)
/// ```
///
/// State `s1` is a complete dead end, and the proposition `p` only holds in `s1`. There are no
/// partial states.
pub struct TwoStates;

impl ExampleSystem for TwoStates {
    fn system() -> TransitionSystem {
        let mut b = TransitionSystemBuilder::new(2);
        b.add_edge(0, 1);
        b.add_label("p", 1);
        b.build().unwrap()
    }
}

/// # Partial Singleton
///
/// A single state `s0` without any known successor and without labels, flagged as partial.
pub struct PartialSingleton;

impl ExampleSystem for PartialSingleton {
    fn system() -> TransitionSystem {
        let mut b = TransitionSystemBuilder::new(1);
        b.mark_partial(0);
        b.build().unwrap()
    }
}

/// # Chain
///
/// ```text
/// s0 ---> s1 ---> ... ---> s(n-1) (q)
/// ```
///
/// The proposition `q` holds only at the last state, which is a complete dead end. The default
/// system has three states.
pub struct Chain;

impl Chain {
    /// Generate a chain with `n` states (at least one).
    pub fn with_length(n: usize) -> TransitionSystem {
        let n = n.max(1);
        let mut b = TransitionSystemBuilder::new(n);
        for s in 1..n {
            b.add_edge(s - 1, s);
        }
        b.add_label("q", n - 1);
        b.build().unwrap()
    }
}

impl ExampleSystem for Chain {
    fn system() -> TransitionSystem {
        Self::with_length(3)
    }
}

/// # Ring
///
/// ```text
/// s0 (p) ---> s1 ---> ... ---> s(n-1) ---> s0
///                                 |
///                                 +------> ?
/// ```
///
/// A cycle of `n` states, where `p` holds only in `s0`. The last state has an additional
/// transition to an unknown continuation, which makes it partial. The default system has four
/// states.
pub struct Ring;

impl Ring {
    /// Generate a ring with `n` states (at least one).
    pub fn with_length(n: usize) -> TransitionSystem {
        let n = n.max(1);
        let mut b = TransitionSystemBuilder::new(n);
        for s in 0..n {
            b.add_edge(s, (s + 1) % n);
        }
        b.add_unknown_edge(n - 1);
        b.add_label("p", 0);
        b.build().unwrap()
    }
}

impl ExampleSystem for Ring {
    fn system() -> TransitionSystem {
        Self::with_length(4)
    }
}
