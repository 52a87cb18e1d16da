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

//! Writer for the two-file text format, see [`loader`](super::loader).

use super::TransitionSystem;

use itertools::Itertools;
use std::io::{self, Write};

impl TransitionSystem {
    /// Write the transition file. A partial state whose known successors are empty is written as a
    /// single transition to `sink`. A complete state whose known successors are empty cannot be
    /// expressed in the format, and is written as a state with unknown successors.
    pub fn write_transitions<W: Write>(&self, w: &mut W, sink: i64) -> io::Result<()> {
        for source in self.successors.keys().sorted() {
            let targets = &self.successors[source];
            if targets.is_empty() && self.is_partial(*source) {
                writeln!(w, "{} -> {}", source, sink)?;
            }
            for target in targets.iter().sorted() {
                writeln!(w, "{} -> {}", source, target)?;
            }
        }
        writeln!(w, "{}", self.partial.iter().sorted().join(" "))?;
        writeln!(w, "{}", self.num_states)
    }

    /// Write the label file, adding `prefix` to every proposition name.
    pub fn write_labels<W: Write>(&self, w: &mut W, prefix: &str) -> io::Result<()> {
        writeln!(
            w,
            "{}",
            self.name_to_index
                .iter()
                .sorted_by_key(|(_, i)| **i)
                .map(|(name, i)| format!("{}={}{}", i, prefix, name))
                .join(" ")
        )?;
        for state in self.states() {
            let props = self
                .labelling
                .iter()
                .filter(|(_, states)| states.contains(&state))
                .map(|(i, _)| *i)
                .sorted()
                .collect::<Vec<_>>();
            if !props.is_empty() {
                writeln!(w, "{}: {}", state, props.iter().join(" "))?;
            }
        }
        Ok(())
    }
}
