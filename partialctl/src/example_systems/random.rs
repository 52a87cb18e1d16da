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

//! Randomly generated systems

use crate::ts::{TransitionSystem, TransitionSystemBuilder};

use rand::prelude::*;

/// # Random System
///
/// Generator for random transition systems. Every state either has unknown successors (with
/// probability `unexplored_probability`), or between zero and `max_out_degree` random successors.
/// Every state is flagged as partial with probability `partial_probability`, and every
/// proposition holds in every state with probability `label_probability`.
#[derive(Debug, Clone)]
pub struct RandomSystem {
    /// Number of states
    pub num_states: usize,
    /// Maximum number of known successors of a single state
    pub max_out_degree: usize,
    /// Probability that a state is flagged as partial
    pub partial_probability: f64,
    /// Probability that the successors of a state are unknown
    pub unexplored_probability: f64,
    /// Probability that a proposition holds in a state
    pub label_probability: f64,
    /// Names of the propositions
    pub propositions: Vec<String>,
}

impl Default for RandomSystem {
    fn default() -> Self {
        Self {
            num_states: 20,
            max_out_degree: 3,
            partial_probability: 0.2,
            unexplored_probability: 0.1,
            label_probability: 0.3,
            propositions: vec!["p".to_string(), "q".to_string()],
        }
    }
}

impl RandomSystem {
    /// Same generator, but without any partial states, and with known successors everywhere.
    pub fn fully_explored(mut self) -> Self {
        self.partial_probability = 0.0;
        self.unexplored_probability = 0.0;
        self
    }

    /// Generate a system, using the seed for the random number generator.
    pub fn generate(&self, seed: u64) -> TransitionSystem {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = self.num_states.max(1);
        let mut b = TransitionSystemBuilder::new(n);

        for p in self.propositions.iter() {
            b.add_proposition(p.clone());
        }

        for s in 0..n {
            if !rng.gen_bool(self.unexplored_probability) {
                b.set_dead_end(s);
                for _ in 0..rng.gen_range(0, self.max_out_degree + 1) {
                    b.add_edge(s, rng.gen_range(0, n));
                }
            }
            if rng.gen_bool(self.partial_probability) {
                b.mark_partial(s);
            }
            for p in self.propositions.iter() {
                if rng.gen_bool(self.label_probability) {
                    b.add_label(p.clone(), s);
                }
            }
        }

        b.build().unwrap()
    }
}
